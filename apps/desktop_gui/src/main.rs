use std::sync::Arc;

mod app;
mod bridge;

use app::TestBenchApp;
use bridge::{spawn_backend_thread, BackendCommand, UiEvent};
use client_core::{CredentialClient, DEFAULT_BASE_URL};
use crossbeam_channel::bounded;

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let base_url = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
    let client = match CredentialClient::new(&base_url) {
        Ok(client) => Arc::new(client),
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(16);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(64);
    spawn_backend_thread(client.clone(), cmd_rx, ui_tx);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Credentials API Test Bench")
            .with_inner_size([720.0, 680.0])
            .with_min_inner_size([560.0, 520.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Credentials API Test Bench",
        options,
        Box::new(|_cc| Ok(Box::new(TestBenchApp::new(client, cmd_tx, ui_rx)))),
    )
}
