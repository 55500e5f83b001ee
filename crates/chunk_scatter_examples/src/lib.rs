#![forbid(unsafe_code)]

mod rendering;

use std::path::Path;

use anyhow::Context;
use chunk_scatter::prelude::StreamConfig;

pub use rendering::{init_tracing, render_factory_to_png, CategoryStyle, RenderConfig};

/// Reads and validates a RON [`StreamConfig`]. Missing fields take their defaults.
pub fn load_ron_config(path: impl AsRef<Path>) -> anyhow::Result<StreamConfig> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let config: StreamConfig = ron::de::from_str(&text).map_err(|e| anyhow::anyhow!(e))?;
    config
        .validate()
        .with_context(|| format!("validating {}", path.display()))?;
    Ok(config)
}

/// Styles for the tree, rock and lake presets.
pub fn forest_styles(rc: RenderConfig) -> RenderConfig {
    rc.with_style(
        "tree",
        CategoryStyle::Circle {
            color: [34, 96, 40],
            radius: 6,
        },
    )
    .with_style(
        "rock",
        CategoryStyle::Square {
            color: [128, 128, 136],
            half_extent: 3,
        },
    )
    .with_style(
        "lake",
        CategoryStyle::Circle {
            color: [52, 112, 196],
            radius: 9,
        },
    )
}
