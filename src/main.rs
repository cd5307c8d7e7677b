mod analysis;
mod camera;
mod capture;
mod client;
mod config;
mod error;
mod models;
mod scores;
mod ui;

use analysis::AnalysisWorker;
use client::AnalysisClient;
use config::Config;
use error::Result;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};
use ui::BehaviorApp;

/// Initializes the logging system (file only, no console output)
fn init_logging() -> Result<()> {
    // Create log file
    let log_file = std::fs::File::create("behavior_lens.log").map_err(error::BehaviorLensError::Io)?;

    // Set up file layer only (no console output)
    let file_layer = fmt::layer()
        .with_writer(Arc::new(log_file))
        .with_ansi(false);

    // Initialize subscriber with file logging only
    tracing_subscriber::registry().with(file_layer).init();

    Ok(())
}

fn main() -> Result<()> {
    init_logging()?;

    let config = Config::load();
    info!("Using analysis service at {}", config.base_url);

    // Channels between the UI and the analysis worker
    let (job_sender, job_receiver) = mpsc::channel(4);
    let (outcome_sender, outcome_receiver) = mpsc::channel(4);

    // Spawn the analysis worker thread
    let client = AnalysisClient::new(&config.base_url);
    let worker = AnalysisWorker::new(client, config.jpeg_quality, job_receiver, outcome_sender);
    std::thread::spawn(move || worker.run());

    // Run application
    let camera_index = config.camera_index;
    let result = eframe::run_native(
        "Behavior Lens",
        eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_inner_size([1100.0, 720.0])
                .with_title("Behavior Lens"),
            ..Default::default()
        },
        Box::new(move |_cc| {
            Ok(Box::new(BehaviorApp::new(
                camera_index,
                job_sender,
                outcome_receiver,
            )))
        }),
    );

    if let Err(e) = result {
        error!("Application error: {}", e);
    }

    Ok(())
}
