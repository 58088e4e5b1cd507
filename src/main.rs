//! LED Imager: scene player with an HTTP API
//!
//! Discovers the built-in scenes, cycles through them on a fixed frame
//! clock, and serves the current frame and player controls over HTTP.
//! With the `hardware` feature the frames are also drawn on the panel.
//!
//! ## Architecture
//! - **Player** (main task): owns every scene and the frame clock
//! - **HTTP server** (tokio/axum): reads the shared snapshot, sends commands via channel
//! - **Render thread** (std::thread, `hardware` only): owns the LED matrix
//!
//! ## Rust concepts
//! - `#[tokio::main]` async entry point
//! - `tokio::spawn` for the server next to the player loop
//! - `tokio::sync::mpsc` channel from request handlers to the player
//! - `Box<dyn Error>` to bubble any bootstrap failure out of `main`
//!
//! ## Usage
//! ```sh
//! ./target/release/led-imager --assets-dir public/assets --port 8080
//! ```

use clap::{Parser, ValueEnum};
use led_imager::animation::AnimationController;
use led_imager::platform::{FileImageLoader, FontdueTextRenderer, MonoTextRenderer, Platform};
use led_imager::server::{self, AppState};
use led_imager::{PanelConfig, ScenePlayer, SharedSnapshot, builtin_scenes};
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

/// Directory tried for assets the configured directory does not have.
const FALLBACK_ASSETS_DIR: &str = "public/assets";

/// Commands buffered between the HTTP handlers and the player.
const COMMAND_QUEUE: usize = 32;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum TextBackend {
    /// Built-in bitmap fonts, no files needed
    Mono,
    /// TrueType fonts loaded from --fonts-dir
    Fontdue,
}

/// LED matrix scene player
#[derive(Parser)]
#[command(name = "led-imager")]
#[command(about = "Layered scene player for RGB LED matrix panels")]
#[command(version)]
struct Args {
    /// Directory containing scene images (bubblegum.png, ...)
    #[arg(long, default_value = "assets")]
    assets_dir: PathBuf,

    /// Directory of .ttf/.otf fonts for the fontdue text renderer
    #[arg(long, default_value = "fonts")]
    fonts_dir: PathBuf,

    /// Port to listen on
    #[arg(long, default_value = "8080")]
    port: u16,

    /// Number of rows on the LED panel
    #[arg(long, default_value = "64")]
    rows: u32,

    /// Number of columns on the LED panel
    #[arg(long, default_value = "64")]
    cols: u32,

    /// Milliseconds between frames
    #[arg(long, default_value = "100")]
    interval_ms: u64,

    /// Frames per animation cycle
    #[arg(long, default_value = "100")]
    max_frames: u32,

    /// Stay on the first scene instead of advancing each cycle
    #[arg(long)]
    no_cycling: bool,

    /// How text layers are rasterized
    #[arg(long, value_enum, default_value = "mono")]
    text_renderer: TextBackend,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_ansi(false) // Disable ANSI color codes for systemd/journald
        .compact()
        .init();

    let args = Args::parse();
    let panel = PanelConfig::new(args.rows, args.cols);

    tracing::info!("LED Imager v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Panel: {}x{}", panel.cols, panel.rows);
    tracing::info!("Assets dir: {}", args.assets_dir.display());
    tracing::info!("Port: {}", args.port);

    let platform = build_platform(&args)?;
    let scenes = builtin_scenes().discover(&platform)?;
    let mut player = ScenePlayer::new(scenes, !args.no_cycling)?;
    let scene_names: Vec<String> = player.scene_names().into_iter().map(String::from).collect();
    tracing::info!("Scenes: {}", scene_names.join(", "));

    let (tx, rx) = mpsc::channel(COMMAND_QUEUE);
    let running = led_imager::setup_signal_handler(tx.clone());

    // Shared snapshot: player writes, HTTP handlers read.
    let snapshot = SharedSnapshot::new(panel.dimensions());

    let app = server::create_router(AppState {
        commands: tx,
        snapshot: snapshot.clone(),
        scenes: scene_names.into(),
    });

    let addr = format!("0.0.0.0:{}", args.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on http://{}", addr);
    tracing::info!("API Documentation: http://localhost:{}/docs", args.port);
    tracing::info!("Try: curl http://localhost:{}/api/v1/status", args.port);

    let server = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!("Server error: {}", e);
        }
    });

    let mut controller = AnimationController::new();
    controller.start(Duration::from_millis(args.interval_ms), args.max_frames);

    #[cfg(feature = "hardware")]
    {
        let (panel_sink, render_handle) = led_imager::render::spawn_panel(panel);
        player.run(&mut controller, (snapshot, panel_sink), rx).await;
        // The sink is gone once run returns; wait for the panel to clear.
        if render_handle.join().is_err() {
            tracing::error!("Render thread panicked");
        }
    }
    #[cfg(not(feature = "hardware"))]
    player.run(&mut controller, snapshot, rx).await;

    server.abort();
    if !led_imager::is_running(&running) {
        tracing::info!("Stopped by signal");
    }
    Ok(())
}

/// Wire the image loader and the selected text renderer into a platform.
fn build_platform(args: &Args) -> Result<Platform, Box<dyn std::error::Error>> {
    let loader = FileImageLoader::new(args.assets_dir.clone()).with_fallback(FALLBACK_ASSETS_DIR);
    let builder = Platform::builder().image_loader(loader);
    let builder = match args.text_renderer {
        TextBackend::Mono => builder.text_renderer(MonoTextRenderer::new()),
        TextBackend::Fontdue => match FontdueTextRenderer::from_dir(&args.fonts_dir) {
            Ok(renderer) => builder.text_renderer(renderer),
            Err(e) => {
                tracing::warn!(
                    "Could not load fonts from {}: {}; using bitmap fonts",
                    args.fonts_dir.display(),
                    e
                );
                builder.text_renderer(MonoTextRenderer::new())
            }
        },
    };
    Ok(builder.build()?)
}
