use std::path::PathBuf;

use chunk_scatter::prelude::*;
use chunk_scatter_examples::{
    forest_styles, init_tracing, load_ron_config, render_factory_to_png, RenderConfig,
};
use glam::Vec3;
use tracing::warn;

fn main() -> anyhow::Result<()> {
    init_tracing();

    let path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets/forest.ron"));
    let config = load_ron_config(&path)?;
    println!(
        "{}: chunk size {}, {} visible, {} categories ({:?} weights)",
        path.display(),
        config.chunk_size,
        config.visible_chunks,
        config.categories.len(),
        config.weight_shape
    );

    // Prefabs whose key equals their category id exist; the rest fail per placement.
    let mut known: Vec<String> = config
        .categories
        .iter()
        .filter(|c| c.prefab == c.id)
        .map(|c| c.prefab.clone())
        .collect();
    known.push(config.tile_prefab.clone());
    let mut factory = MemoryFactory::new().with_known_prefabs(known);

    let visible = config.visible_chunks;
    let mut streamer = ChunkStreamer::try_new(config)?;
    let mut sink = FnSink::new(|event| {
        if let StreamEvent::ResourceFailed { coord, prefab, message } = event {
            warn!("{coord}: {prefab}: {message}");
        }
    });

    // A circle around the origin.
    let radius = 30.0f32;
    for step in 0..=48 {
        let a = step as f32 / 48.0 * std::f32::consts::TAU;
        let viewer = Vec3::new(a.cos() * radius, a.sin() * radius, 0.0);
        streamer.tick_with_events(&viewer, &mut factory, &mut sink);
    }
    let end = Vec3::new(radius, 0.0, 0.0);
    println!(
        "{} chunks loaded, {} dormant, {} live instances",
        streamer.loaded_count(),
        streamer.dormant_count(),
        factory.len()
    );

    let rc = forest_styles(RenderConfig::for_window(
        (800, 800),
        streamer.mapper(),
        end.truncate(),
        visible,
    ));
    render_factory_to_png(&factory, streamer.mapper(), &rc, "config-ron.png")?;
    Ok(())
}
