mod app;

use app::DocsUploader;
use docs_uploader::config::load_settings;
use eframe::CreationContext;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), eframe::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = load_settings();

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([600.0, 600.0])
            .with_min_inner_size([400.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Document Uploader",
        options,
        Box::new(move |cc: &CreationContext| Box::new(DocsUploader::new(cc, settings))),
    )
}
