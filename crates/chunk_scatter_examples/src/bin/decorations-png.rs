use chunk_scatter::prelude::*;
use chunk_scatter_examples::{forest_styles, init_tracing, render_factory_to_png, RenderConfig};
use glam::Vec2;

fn main() -> anyhow::Result<()> {
    init_tracing();

    let visible = 2;
    let config = StreamConfig::new(10, visible)
        .with_categories([Category::tree(50.0), Category::rock(30.0), Category::lake(20.0)])
        .with_spacing(SpacingRules::new(1.5, 3.0, 4.0))
        .with_density(0.35)
        .with_seed(42);
    let mut streamer = ChunkStreamer::try_new(config)?;
    let mut factory = MemoryFactory::new();

    let viewer = Vec2::new(5.0, 5.0);
    let report = streamer.tick(&viewer, &mut factory);
    println!(
        "loaded {} chunks, {} decorations placed, {} rejected for spacing",
        report.loaded.len(),
        report.placements,
        report.rejections
    );

    let rc = forest_styles(RenderConfig::for_window(
        (1000, 1000),
        streamer.mapper(),
        viewer,
        visible,
    ));
    render_factory_to_png(&factory, streamer.mapper(), &rc, "decorations-window.png")?;

    // Same seed, stricter spacing.
    let sparse = streamer
        .config()
        .clone()
        .with_spacing(SpacingRules::new(3.0, 5.0, 6.0));
    let mut sparse_streamer = ChunkStreamer::try_new(sparse)?;
    let mut sparse_factory = MemoryFactory::new();
    sparse_streamer.tick(&viewer, &mut sparse_factory);
    render_factory_to_png(
        &sparse_factory,
        sparse_streamer.mapper(),
        &rc,
        "decorations-window-sparse.png",
    )?;

    Ok(())
}
