//! Application entry point for the galaxy viewer.
//!
//! This binary sets up logging and eframe/egui, then delegates all
//! interactive logic and rendering to [`Viewer`] from the `viewer` module.

mod point_renderer;
mod viewer;

use tracing_subscriber::EnvFilter;
use viewer::Viewer;

const DEFAULT_LOG_DIRECTIVE: &str = "galaxy=info,galaxy_core=info";

/// Starts the native eframe application.
///
/// Logging honours `RUST_LOG`; without it, both crates log at `info`.
///
/// ### Returns
/// - `Ok(())` if the application runs to completion without errors.
/// - `Err` if eframe fails to create the native window or event loop, or
///   the initial galaxy cannot be generated.
fn main() -> eframe::Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_DIRECTIVE));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::info!("galaxy v{} starting", env!("CARGO_PKG_VERSION"));

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Galaxy")
            .with_inner_size([1280.0, 800.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Galaxy",
        options,
        Box::new(|_cc| {
            let viewer = Viewer::new()?;
            Ok(Box::new(viewer))
        }),
    )
}
