use std::path::PathBuf;

mod backend_bridge;
mod config;
mod controller;
mod ui;

use clap::Parser;
use crossbeam_channel::bounded;
use eframe::egui;
use tracing_subscriber::EnvFilter;

use backend_bridge::commands::BackendCommand;
use controller::events::UiEvent;

#[derive(Parser, Debug)]
#[command(name = "bookshelf", about = "Manage a remote book catalog")]
struct Args {
    /// Config file to read instead of the discovered one.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Base URL of the catalog API, e.g. http://localhost:8000/api
    #[arg(long)]
    api_url: Option<String>,
    #[arg(long)]
    items_per_page: Option<usize>,
}

fn main() -> eframe::Result<()> {
    let args = Args::parse();
    let (mut settings, notes) = config::load_settings(args.config.as_deref());

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();
    for note in notes {
        tracing::warn!("{note}");
    }
    settings.apply_overrides(args.api_url, args.items_per_page);
    tracing::info!(
        api_base_url = %settings.api_base_url,
        items_per_page = settings.items_per_page,
        "starting bookshelf"
    );

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(256);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(2048);
    backend_bridge::runtime::launch(settings.api_base_url.clone(), cmd_rx, ui_tx);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Book Manager")
            .with_inner_size([1100.0, 720.0])
            .with_min_inner_size([760.0, 480.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Book Manager",
        options,
        Box::new(move |_cc| Ok(Box::new(ui::BookshelfApp::new(cmd_tx, ui_rx, &settings)))),
    )
}
