use std::path::PathBuf;

use clap::Parser;
use glcourse_common::AppConfig;
use tracing_subscriber::EnvFilter;

mod app;
mod geometry;
mod scenes;

use app::DemoApp;
use scenes::Chapter;

#[derive(Parser)]
#[command(name = "glcourse-desktop", about = "OpenGL tutorial chapters in one window")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Configuration file; defaults apply when it does not exist
    #[arg(short, long, default_value = "glcourse.yaml")]
    config: PathBuf,

    /// Chapter to open first
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(1..=5))]
    chapter: u8,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let config = AppConfig::load_or_default(&cli.config)?;
    let chapter = Chapter::ALL[usize::from(cli.chapter - 1)];
    let title = config.window.title.clone();
    tracing::info!(
        "opening {}x{} window, starting at chapter '{}'",
        config.window.width,
        config.window.height,
        chapter.title()
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.window.width as f32, config.window.height as f32])
            .with_title(&title),
        depth_buffer: 24,
        ..Default::default()
    };

    eframe::run_native(
        &title,
        options,
        Box::new(move |cc| {
            let app = DemoApp::new(cc, config, chapter)?;
            Ok(Box::new(app))
        }),
    )
    .map_err(|e| anyhow::anyhow!("window closed with an error: {e}"))
}
