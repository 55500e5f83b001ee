use chunk_scatter::prelude::*;
use chunk_scatter_examples::init_tracing;
use glam::Vec2;
use tracing::info;

fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = StreamConfig::new(10, 2)
        .with_categories([Category::tree(50.0), Category::rock(30.0), Category::lake(20.0)])
        .with_spacing(SpacingRules::new(1.5, 3.0, 4.0))
        .with_density(0.2)
        .with_max_decorations_per_chunk(20)
        .with_seed(7);
    let mut streamer = ChunkStreamer::try_new(config)?;
    let mut factory = MemoryFactory::new();
    let mut sink = VecSink::only([StreamEventKind::ResourceFailed, StreamEventKind::Warning]);

    // Walk east, turn back west along a parallel row, then return to the start.
    let mut path: Vec<Vec2> = (0..=60).map(|i| Vec2::new(i as f32, 5.0)).collect();
    path.extend((0..=60).rev().map(|i| Vec2::new(i as f32, 25.0)));
    path.push(Vec2::new(0.0, 5.0));

    let mut loads = 0;
    let mut reloads = 0;
    let mut unloads = 0;
    for viewer in &path {
        let report = streamer.tick_with_events(viewer, &mut factory, &mut sink);
        loads += report.loaded.len();
        reloads += report.reloaded.len();
        unloads += report.unloaded.len();
        if report.changed() {
            println!(
                "tick {:>3} viewer {:?} -> chunk {}: +{} -{} ({} placed, {} rejected)",
                report.tick,
                viewer,
                report.viewer_chunk,
                report.loaded.len(),
                report.unloaded.len(),
                report.placements,
                report.rejections
            );
        }
    }

    info!(
        "Walk finished: {} loads ({} from records), {} unloads, {} live instances, {} dormant chunks.",
        loads,
        reloads,
        unloads,
        factory.len(),
        streamer.dormant_count()
    );
    if !sink.is_empty() {
        info!("{} failures or warnings reported.", sink.len());
    }

    let released = streamer.unload_all(&mut factory);
    println!(
        "released {} instances; created {} / destroyed {} in total",
        released,
        factory.created_total(),
        factory.destroyed_total()
    );
    Ok(())
}
