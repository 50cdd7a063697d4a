mod app;
mod command;
mod connection;
mod log;
mod session;
#[cfg(test)]
mod testutil;

use anyhow::Result;
use eframe::egui;
use tracing::info;
use tracing_subscriber::fmt;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::app::RfidApp;

fn main() -> Result<()> {
    // Create a log layer for file output
    #[cfg(target_os = "linux")]
    let log_dir = "/tmp/rfid-station/logs";
    #[cfg(not(target_os = "linux"))]
    let log_dir = "logs";

    let file_appender = tracing_appender::rolling::hourly(log_dir, "tracing.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false); // Disable colors in file

    // Create a log layer for stdout
    let stdout_layer = fmt::layer().with_writer(std::io::stdout);

    // Combine both layers and enable logging
    tracing_subscriber::registry()
        .with(file_layer)
        .with(stdout_layer)
        .init();

    info!("Starting RFID controller...");

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([420.0, 540.0]),
        ..Default::default()
    };
    eframe::run_native(
        "RFID Controller",
        native_options,
        Box::new(|cc| Ok(Box::new(RfidApp::new(cc)))),
    )
    .map_err(|e| anyhow::anyhow!("failed to run UI: {}", e))?;

    Ok(())
}
