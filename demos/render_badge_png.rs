use swf_raster::{
    PixelFormat, Rect, Renderer, RendererOpts, Rgba, Shape, Transform, pixels_to_twips,
};

const SIZE: u32 = 128;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let s = include_str!("../tests/data/badge_shape.json");
    let mut badge: Shape = serde_json::from_str(s)?;
    badge.bounds = badge.compute_bounds();

    let opts = RendererOpts::from_env()?;
    let stride = SIZE as usize * 4;
    let mut buf = vec![0u8; stride * SIZE as usize];
    {
        let mut renderer = Renderer::new(PixelFormat::Rgba32, opts)?;
        renderer.init_buffer(&mut buf, SIZE, SIZE, stride)?;
        renderer.begin_display(Rgba::opaque(18, 20, 28));

        // Left half through a mask, right half drawn directly.
        renderer.begin_submit_mask();
        let half = pixels_to_twips(f64::from(SIZE) / 2.0);
        let left = Shape::new(
            vec![swf_raster::FillStyle::solid(255, 255, 255)],
            vec![],
            vec![swf_raster::Path::rect(Rect::new(0.0, 0.0, half, half * 2.0), 1, 0, 0)],
        );
        renderer.draw_shape(&left, &Transform::default());
        renderer.end_submit_mask();
        renderer.draw_shape(&badge, &Transform::default());
        renderer.disable_mask();
        renderer.end_display();

        let stats = renderer.mask_pool_stats();
        eprintln!(
            "mask buffers: {} allocated, {} reused",
            stats.alloc_buffers, stats.reused_buffers
        );
    }

    let out_path = std::path::Path::new("target").join("render_badge.png");
    image::save_buffer_with_format(
        &out_path,
        &buf,
        SIZE,
        SIZE,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )?;

    eprintln!("wrote {}", out_path.display());
    Ok(())
}
