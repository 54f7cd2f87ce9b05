//! Compose command

use crate::ComposeArgs;
use anyhow::{Context, Result};
use tonekit_core::ColorSpace;
use tonekit_io::ImageCodec;
use tonekit_ops::{compose, ComposeParams};
use tracing::{debug, info};

pub fn run(args: ComposeArgs, codec: &dyn ImageCodec) -> Result<()> {
    let layers = args
        .inputs
        .iter()
        .map(|path| {
            let layer = super::load_ldr(codec, path)?;
            debug!(
                path = %path.display(),
                width = layer.width(),
                height = layer.height(),
                "loaded layer"
            );
            Ok(layer)
        })
        .collect::<Result<Vec<_>>>()?;

    let params = ComposeParams {
        premultiplied: args.premultiplied,
        color_space: ColorSpace::from_no_srgb(args.no_srgb),
    };

    info!(
        layers = layers.len(),
        premultiplied = params.premultiplied,
        color_space = %params.color_space,
        "compositing"
    );

    let flat = compose(&layers, &params).context("Failed to compose layers")?;
    super::save_ldr(codec, &args.output, &flat)?;

    info!(output = %args.output.display(), "done");
    Ok(())
}
