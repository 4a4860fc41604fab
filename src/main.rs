use returncast::application::session::DashboardSession;
use returncast::application::system::Application;
use returncast::config::Config;
use returncast::interfaces::ui::configure_style;

use tracing::{Level, info};
use tracing_subscriber::prelude::*;

// A writer that sends logs to the UI via a crossbeam channel
struct ChannelWriter {
    sender: crossbeam_channel::Sender<String>,
}

impl std::io::Write for ChannelWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let msg = String::from_utf8_lossy(buf).to_string();
        let _ = self.sender.try_send(msg);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

// Cloneable wrapper for MakeWriter
#[derive(Clone)]
struct ChannelWriterFactory {
    sender: crossbeam_channel::Sender<String>,
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for ChannelWriterFactory {
    type Writer = ChannelWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ChannelWriter {
            sender: self.sender.clone(),
        }
    }
}

fn main() -> anyhow::Result<()> {
    // 0. Load Env (before starting anything)
    dotenvy::dotenv().ok();

    // 1. Log channel feeding the activity panel
    let (log_tx, log_rx) = crossbeam_channel::bounded(1024);

    // 2. Logging (Stdout + UI)
    let stdout_layer = tracing_subscriber::fmt::layer().with_target(false).pretty();

    let ui_layer = tracing_subscriber::fmt::layer()
        .with_writer(ChannelWriterFactory { sender: log_tx })
        .with_ansi(false)
        .with_target(false);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(stdout_layer)
        .with(ui_layer)
        .init();

    info!("Initializing Returncast...");

    let config = Config::from_env()?;

    // 3. Tokio runtime in a background thread, hosting the render worker
    let (system_tx, system_rx) = crossbeam_channel::bounded(1);

    std::thread::spawn(move || {
        let rt = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(rt) => rt,
            Err(e) => {
                tracing::error!("Failed to build Tokio runtime: {}", e);
                return;
            }
        };

        rt.block_on(async move {
            info!("Background Runtime Started.");

            let app = match Application::build(config) {
                Ok(app) => app,
                Err(e) => {
                    tracing::error!("Failed to build application: {}", e);
                    return;
                }
            };

            let _ = system_tx.send(app.start());
            info!("Render worker running.");

            // The worker is detached; the runtime must stay alive with it.
            std::future::pending::<()>().await;
        });
    });

    // 4. Wait for the system handle
    info!("Waiting for System to boot...");
    let system_handle = system_rx
        .recv()
        .map_err(|_| anyhow::anyhow!("Background runtime exited before the system started"))?;
    info!("System Connected. Launching UI.");

    let session = DashboardSession::new(system_handle, log_rx);

    // 5. Run UI (blocks main thread)
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 860.0])
            .with_min_inner_size([800.0, 600.0])
            .with_title("Returncast: Stock Return Prediction"),
        ..Default::default()
    };

    eframe::run_native(
        "Returncast",
        options,
        Box::new(|cc| {
            configure_style(&cc.egui_ctx);
            Ok(Box::new(session))
        }),
    )
    .map_err(|e| anyhow::anyhow!("eframe error: {}", e))?;

    Ok(())
}
