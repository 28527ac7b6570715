mod app;
mod binding;
mod chrome;
mod commands;
mod context;
mod dialogs;
mod palette;
mod status;

use std::env;
use std::path::PathBuf;

use eframe::{egui, NativeOptions};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use blacknote_core::APP_NAME;
use blacknote_settings::AppConfig;

use crate::app::NotepadApp;
use crate::context::AppContext;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_level(true),
        )
        .with(filter)
        .init();
}

fn main() -> eframe::Result<()> {
    init_tracing();
    info!("starting {APP_NAME} v{}", env!("CARGO_PKG_VERSION"));

    let context = AppContext::init(AppConfig::from_env());
    let initial = env::args_os().nth(1).map(PathBuf::from);

    let options = NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(APP_NAME)
            .with_inner_size(context.config.window_size)
            .with_min_inner_size([320.0, 200.0])
            .with_decorations(false)
            .with_icon(palette::window_icon()),
        ..Default::default()
    };
    eframe::run_native(
        APP_NAME,
        options,
        Box::new(move |cc| Box::new(NotepadApp::new(cc, context, initial))),
    )
}
