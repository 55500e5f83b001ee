use std::collections::HashMap;
use std::path::Path;

use anyhow::Context;
use chunk_scatter::prelude::{ChunkMapper, MemoryFactory, MemoryInstance};
use glam::Vec2;
use image::{Rgb, RgbImage};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Installs a fmt subscriber honoring `RUST_LOG`, defaulting to `info`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// How a decoration category is drawn.
#[derive(Clone, Copy, Debug)]
pub enum CategoryStyle {
    Circle { color: [u8; 3], radius: u32 },
    Square { color: [u8; 3], half_extent: u32 },
}

/// Maps a world rectangle onto an image.
#[derive(Clone, Debug)]
pub struct RenderConfig {
    pub image_size: (u32, u32),
    pub world_min: Vec2,
    pub world_max: Vec2,
    pub background: [u8; 3],
    /// Tile colors alternating per chunk, so chunk borders are visible.
    pub tile_colors: [[u8; 3]; 2],
    pub fallback: CategoryStyle,
    styles: HashMap<String, CategoryStyle>,
}

impl RenderConfig {
    pub fn new(image_size: (u32, u32), world_min: Vec2, world_max: Vec2) -> Self {
        Self {
            image_size,
            world_min,
            world_max,
            background: [20, 20, 24],
            tile_colors: [[118, 160, 92], [106, 148, 84]],
            fallback: CategoryStyle::Circle {
                color: [230, 230, 230],
                radius: 2,
            },
            styles: HashMap::new(),
        }
    }

    /// Frames the window of `radius` chunks around `center`.
    pub fn for_window(image_size: (u32, u32), mapper: &ChunkMapper, center: Vec2, radius: u32) -> Self {
        let coord = mapper.coord_for(center);
        let size = mapper.chunk_size() as f32;
        let lo = mapper.world_origin_of(coord) - Vec2::splat(radius as f32 * size);
        let hi = lo + Vec2::splat((2 * radius + 1) as f32 * size);
        Self::new(image_size, lo, hi)
    }

    pub fn with_background(mut self, background: [u8; 3]) -> Self {
        self.background = background;
        self
    }

    pub fn with_style(mut self, category: impl Into<String>, style: CategoryStyle) -> Self {
        self.styles.insert(category.into(), style);
        self
    }

    fn style_for(&self, category: &str) -> CategoryStyle {
        self.styles.get(category).copied().unwrap_or(self.fallback)
    }

    fn to_pixel(&self, world: Vec2) -> (i64, i64) {
        let extent = (self.world_max - self.world_min).max(Vec2::splat(f32::EPSILON));
        let t = (world - self.world_min) / extent;
        let x = t.x * self.image_size.0 as f32;
        let y = (1.0 - t.y) * self.image_size.1 as f32;
        (x.floor() as i64, y.floor() as i64)
    }

    fn pixels_per_unit(&self) -> f32 {
        self.image_size.0 as f32 / (self.world_max.x - self.world_min.x).max(f32::EPSILON)
    }
}

/// Draws every live instance of `factory` and writes a PNG.
///
/// Tiles are drawn first, then decorations in ascending depth hint so that
/// higher hints end up on top.
pub fn render_factory_to_png(
    factory: &MemoryFactory,
    mapper: &ChunkMapper,
    rc: &RenderConfig,
    out_path: impl AsRef<Path>,
) -> anyhow::Result<()> {
    let (w, h) = rc.image_size;
    let mut img = RgbImage::from_pixel(w, h, Rgb(rc.background));

    let half_tile = ((rc.pixels_per_unit() * 0.5).ceil() as i64).max(1);
    for (_, tile) in factory.instances().filter(|(_, i)| i.is_tile()) {
        let p = tile.transform.position.truncate();
        let coord = mapper.coord_for(p);
        let color = rc.tile_colors[((coord.x + coord.y).rem_euclid(2)) as usize];
        let (cx, cy) = rc.to_pixel(p);
        fill_rect(&mut img, cx, cy, half_tile, color);
    }

    let mut decorations: Vec<&MemoryInstance> = factory
        .instances()
        .map(|(_, i)| i)
        .filter(|i| !i.is_tile())
        .collect();
    decorations.sort_by_key(|i| i.depth_hint.unwrap_or(i32::MIN));

    for deco in decorations {
        let (cx, cy) = rc.to_pixel(deco.transform.position.truncate());
        let scale = deco.transform.scale.x;
        match rc.style_for(deco.category().unwrap_or_default()) {
            CategoryStyle::Circle { color, radius } => {
                let r = ((radius as f32) * scale).round().max(1.0) as i64;
                fill_circle(&mut img, cx, cy, r, color);
            }
            CategoryStyle::Square { color, half_extent } => {
                let r = ((half_extent as f32) * scale).round().max(1.0) as i64;
                fill_rect(&mut img, cx, cy, r, color);
            }
        }
    }

    let path = out_path.as_ref();
    img.save(path)
        .with_context(|| format!("writing {}", path.display()))?;
    info!("Wrote {}", path.display());
    Ok(())
}

fn put(img: &mut RgbImage, x: i64, y: i64, color: [u8; 3]) {
    if x >= 0 && y >= 0 && (x as u32) < img.width() && (y as u32) < img.height() {
        img.put_pixel(x as u32, y as u32, Rgb(color));
    }
}

fn fill_rect(img: &mut RgbImage, cx: i64, cy: i64, half: i64, color: [u8; 3]) {
    for y in (cy - half)..(cy + half) {
        for x in (cx - half)..(cx + half) {
            put(img, x, y, color);
        }
    }
}

fn fill_circle(img: &mut RgbImage, cx: i64, cy: i64, r: i64, color: [u8; 3]) {
    let r2 = r * r;
    for dy in -r..=r {
        for dx in -r..=r {
            if dx * dx + dy * dy <= r2 {
                put(img, cx + dx, cy + dy, color);
            }
        }
    }
}
