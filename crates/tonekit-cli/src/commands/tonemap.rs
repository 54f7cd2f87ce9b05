//! Tonemap command

use crate::TonemapArgs;
use anyhow::Result;
use tonekit_core::ColorSpace;
use tonekit_io::ImageCodec;
use tonekit_ops::{tonemap, TonemapParams};
use tracing::info;

pub fn run(args: TonemapArgs, codec: &dyn ImageCodec) -> Result<()> {
    let hdr = super::load_hdr(codec, &args.input)?;

    let params = TonemapParams {
        exposure: args.exposure,
        filmic: args.filmic,
        color_space: ColorSpace::from_no_srgb(args.no_srgb),
    };

    info!(
        input = %args.input.display(),
        width = hdr.width(),
        height = hdr.height(),
        exposure = params.exposure,
        filmic = params.filmic,
        color_space = %params.color_space,
        "tonemapping"
    );

    let ldr = tonemap(&hdr, &params);
    super::save_ldr(codec, &args.output, &ldr)?;

    info!(output = %args.output.display(), "done");
    Ok(())
}
