use std::str::FromStr;
use std::sync::Arc;

use clap::Parser;
use colored::*;
use tokio::sync::Mutex;

mod args;
mod output;

use args::Args;
use output::{parse_color_hex, PreviewWindow};
use tryon::camera::{CameraSource, StaticSource, VideoSource};
use tryon::config::AppConfig;
use tryon::detector::SyntheticDetector;
use tryon::tracker::TrackingSession;
use tryon::types::{Product, ProductCategory};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    if args.list {
        let cameras = nokhwa::query(nokhwa::utils::ApiBackend::Auto)?;
        println!("Available Cameras:");
        println!("{:<5} | {:<30} | {:<10}", "Index", "Name", "Misc");
        println!("{}", "-".repeat(60));
        for cam in cameras {
            println!("{:<5} | {:<30} | {:?}", cam.index(), cam.human_name(), cam.misc());
        }
        return Ok(());
    }

    // 0. Load Config
    let config = AppConfig::load()?;

    // 1. Product selection. Unknown categories are rejected here, before any
    // tracking machinery spins up.
    let category = ProductCategory::from_str(&args.category)?;
    let product = Product::new(args.product.clone(), category);
    println!(
        "{}",
        format!("Trying on: {} [{}]", product.name, product.category).green()
    );

    // 2. Video source
    let video: Arc<Mutex<dyn VideoSource>>;
    let frame_size;
    if args.headless {
        println!("Headless mode: synthetic still frame");
        let source = StaticSource::flat(640, 480, 128);
        frame_size = source.frame_size();
        video = Arc::new(Mutex::new(source));
    } else {
        let camera = CameraSource::new(args.cam_index as usize)?;
        println!("Opened camera: {}", camera.name());
        frame_size = camera.frame_size();
        video = Arc::new(Mutex::new(camera));
    }

    // 3. Session. The synthetic detector stands in for a real landmark
    // engine; swap in any LandmarkDetector implementation here.
    let runtime = tokio::runtime::Runtime::new()?;
    let mut session = TrackingSession::new(
        Box::new(SyntheticDetector::new()),
        Arc::clone(&video),
        product,
        config.tracking.clone(),
        config.lighting.clone(),
    );
    runtime.block_on(session.start())?;

    // 4. Preview loop
    let mut window = PreviewWindow::new(
        "Try-On Preview",
        frame_size.width as usize,
        frame_size.height as usize,
    )?;
    let overlay_rx = session.overlay();
    let lighting_rx = session.lighting();
    let metrics_rx = session.metrics();
    let quality_rx = session.quality();
    let color = parse_color_hex(&config.ui.overlay_color_hex);

    let mut last_quality = *quality_rx.borrow();
    println!("Controls: [Esc] Quit");

    while window.is_open() && !window.is_key_down(minifb::Key::Escape) {
        let mut frame = match video.blocking_lock().snapshot() {
            Ok(f) => f,
            Err(_) => continue,
        };
        if args.mirror || config.ui.mirror_mode {
            image::imageops::flip_horizontal_in_place(&mut frame);
        }

        let overlay = *overlay_rx.borrow();
        let lighting = *lighting_rx.borrow();
        window.update(&frame, &overlay, &lighting, color)?;

        if config.ui.show_hud {
            let quality = *quality_rx.borrow();
            if quality != last_quality {
                let m = *metrics_rx.borrow();
                println!(
                    "Quality: {} ({:.0} fps, {:.1} ms detect)",
                    quality.as_str().cyan(),
                    m.frame_rate,
                    m.detection_latency_ms
                );
                last_quality = quality;
            }
        }
    }

    runtime.block_on(session.stop());
    Ok(())
}
