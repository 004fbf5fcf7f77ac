mod app;
mod box_file;
mod boxes;
mod config;
mod interaction;
mod transform;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

/// Draw, move and label glyph boxes over an image, saved as `<image>.box`.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Image to annotate (.png, .jpg, .jpeg). A file picker opens when omitted.
    image: Option<PathBuf>,

    /// Config file to use instead of the per-user one
    #[arg(long)]
    config: Option<PathBuf>,
}

fn pick_image() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .add_filter("Images", &["png", "jpg", "jpeg"])
        .set_title("Choose an image")
        .pick_file()
}

// ── Main ────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = config::load_config(args.config.as_deref());

    let Some(image_path) = args.image.or_else(pick_image) else {
        log::info!("No image selected.");
        return Ok(());
    };

    let image = image::open(&image_path)
        .with_context(|| format!("Failed to load image {}", image_path.display()))?;

    let title = format!(
        "box-editor - {}",
        image_path
            .file_name()
            .unwrap_or_default()
            .to_str()
            .unwrap_or("")
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_title(&title),
        ..Default::default()
    };

    eframe::run_native(
        &title,
        options,
        Box::new(move |cc| {
            Ok(Box::new(app::BoxEditorApp::new(
                cc, image_path, image, &config,
            )))
        }),
    )
    .map_err(|e| anyhow::anyhow!("Failed to run eframe: {e}"))
}
