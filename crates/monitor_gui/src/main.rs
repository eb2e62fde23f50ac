//! # ESP32 Serial Monitor
//!
//! Dashboard em tempo real para a telemetria serial do ESP32 UDP Lab:
//! cartões de sensores, indicadores de LED, consola com timestamps e
//! gráfico de temperatura, com envio de comandos pela mesma porta.
//!
//! ## Atalhos
//! - `T`: Alternar tema
//! - `Q` / `Esc`: Sair

mod dashboard;
mod panels;
mod serial_thread;
mod theme_egui;

use dashboard::MonitorApp;
use monitor_core::AppConfig;

fn main() -> eframe::Result<()> {
    // ── Logging ──
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    // ── Config ──
    let config_path = AppConfig::default_path();
    let config = AppConfig::load(&config_path);

    if !config_path.exists() {
        let _ = config.save(&config_path);
    }

    // ── Janela eframe ──
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_title("ESP32 UDP Lab – Serial Monitor")
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([1100.0, 700.0]),
        ..Default::default()
    };

    eframe::run_native(
        "ESP32 Serial Monitor",
        options,
        Box::new(move |cc| Ok(Box::new(MonitorApp::new(cc, config)))),
    )
}
