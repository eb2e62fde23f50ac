//! Painéis e widgets do dashboard renderizados com egui.
//!
//! Todos são funções puras de estado → pixels: recebem o
//! [`TelemetryState`] (ou um pedaço dele) e o tema, e não guardam nada.

use crate::theme_egui::EguiTheme;
use egui::{Color32, RichText, Ui};
use egui_plot::{Line, Plot, PlotPoints};
use monitor_core::state::TelemetryState;
use monitor_core::types::{self, LedId, NetworkKind, SignalQuality};
use monitor_core::{Command, ConsoleLog};

// ──────────────────────────────────────────
// Helpers
// ──────────────────────────────────────────

fn metric_row_string(ui: &mut Ui, label: &str, value: &str, color: Color32, dim: Color32) {
    ui.horizontal(|ui: &mut Ui| {
        ui.label(RichText::new(format!("{label}:")).color(dim).monospace());
        ui.with_layout(
            egui::Layout::right_to_left(egui::Align::Center),
            |ui: &mut Ui| {
                ui.label(RichText::new(value).color(color).monospace().strong());
            },
        );
    });
}

fn panel_frame(
    ui: &mut Ui,
    title: &str,
    accent: Color32,
    theme: &EguiTheme,
    add_body: impl FnOnce(&mut Ui),
) {
    egui::Frame::new()
        .fill(theme.panel)
        .stroke(egui::Stroke::new(2.0, accent))
        .corner_radius(4.0)
        .inner_margin(8.0)
        .show(ui, |ui: &mut Ui| {
            ui.vertical_centered(|ui: &mut Ui| {
                ui.label(
                    RichText::new(format!("── {title} ──"))
                        .color(accent)
                        .strong()
                        .monospace()
                        .size(13.0),
                );
            });
            ui.add_space(4.0);
            add_body(ui);
        });
}

// ──────────────────────────────────────────
// Cartões de sensor
// ──────────────────────────────────────────

/// Cartão de sensor com valor grande centralizado ("--" sem dados).
pub fn render_sensor_card(
    ui: &mut Ui,
    title: &str,
    value: Option<f64>,
    unit: &str,
    decimals: usize,
    accent: Color32,
    theme: &EguiTheme,
) {
    panel_frame(ui, title, accent, theme, |ui: &mut Ui| {
        ui.vertical_centered(|ui: &mut Ui| {
            let text = match value {
                Some(v) => format!("{v:.decimals$}"),
                None => "--".to_string(),
            };
            ui.label(
                RichText::new(text)
                    .color(accent)
                    .monospace()
                    .strong()
                    .size(28.0),
            );
            ui.label(RichText::new(unit).color(theme.dim).monospace().size(11.0));
        });
    });
}

// ──────────────────────────────────────────
// Indicadores de LED
// ──────────────────────────────────────────

/// Indicador de um LED do painel. Antes da primeira telemetria o pino
/// exibido é o de fábrica e o estado assume apagado.
pub fn render_led(
    ui: &mut Ui,
    led: LedId,
    reported: Option<monitor_core::LedState>,
    theme: &EguiTheme,
) {
    let on = reported.is_some_and(|s| s.on);
    let gpio = reported.map_or(led.default_gpio(), |s| s.gpio_pin);
    let accent = theme.led_color(on);

    panel_frame(ui, &format!("LED {}", led.index()), accent, theme, |ui: &mut Ui| {
        ui.vertical_centered(|ui: &mut Ui| {
            ui.label(
                RichText::new(format!("GPIO {gpio}"))
                    .color(theme.dim)
                    .monospace()
                    .size(10.0),
            );
            ui.label(RichText::new("●").color(accent).size(24.0));
            ui.label(
                RichText::new(if on { "ON" } else { "OFF" })
                    .color(accent)
                    .monospace()
                    .strong()
                    .size(10.0),
            );
        });
    });
}

// ──────────────────────────────────────────
// Botões de comando
// ──────────────────────────────────────────

/// Fileira de botões de comando. Retorna o comando clicado, se houver.
pub fn render_commands(ui: &mut Ui, enabled: bool) -> Option<Command> {
    let mut clicked = None;

    ui.horizontal_wrapped(|ui: &mut Ui| {
        for led in LedId::all() {
            if ui
                .add_enabled(enabled, egui::Button::new(format!("Test {}", led.index())))
                .clicked()
            {
                clicked = Some(Command::Test(led));
            }
        }
        if ui
            .add_enabled(enabled, egui::Button::new("Todos ON"))
            .clicked()
        {
            clicked = Some(Command::AllOn);
        }
        if ui
            .add_enabled(enabled, egui::Button::new("Todos OFF"))
            .clicked()
        {
            clicked = Some(Command::AllOff);
        }
        if ui
            .add_enabled(enabled, egui::Button::new("Status"))
            .clicked()
        {
            clicked = Some(Command::Status);
        }
    });

    clicked
}

// ──────────────────────────────────────────
// Gráfico de temperatura
// ──────────────────────────────────────────

/// Gráfico da janela deslizante de temperatura. O eixo x é o índice da
/// amostra, sempre re-baseado em zero depois que a janela enche.
pub fn render_temperature_plot(ui: &mut Ui, history: &[f64], theme: &EguiTheme) {
    panel_frame(ui, "📈 Temperatura (°C)", theme.temperature, theme, |ui: &mut Ui| {
        let points: PlotPoints = history
            .iter()
            .enumerate()
            .map(|(i, &v)| [i as f64, v])
            .collect();

        let line = Line::new(points).color(theme.temperature).width(2.0);

        Plot::new("temp_history")
            .height(200.0)
            .allow_drag(false)
            .allow_zoom(false)
            .allow_scroll(false)
            .allow_boxed_zoom(false)
            .include_x(0.0)
            .show(ui, |plot_ui| {
                plot_ui.line(line);
            });
    });
}

// ──────────────────────────────────────────
// Informação do sistema
// ──────────────────────────────────────────

/// Linhas de rede/uptime/contadores do painel lateral.
pub fn render_system_info(ui: &mut Ui, state: &TelemetryState, theme: &EguiTheme) {
    let wifi = if state.wifi_connected {
        ("CONECTADO", theme.ok)
    } else {
        ("--", theme.dim)
    };
    metric_row_string(ui, "WiFi", wifi.0, wifi.1, theme.dim);

    let net_row = |ui: &mut Ui, label: &str, kind: NetworkKind| {
        let value = state.network(kind).unwrap_or("--");
        metric_row_string(ui, label, value, theme.text, theme.dim);
    };
    net_row(ui, "IP ESP32", NetworkKind::EspIp);
    net_row(ui, "IP Teléfono", NetworkKind::PhoneIp);
    net_row(ui, "SSID", NetworkKind::Ssid);
    net_row(ui, "Gateway", NetworkKind::Gateway);

    // RSSI com etiqueta de qualidade ao lado do valor cru
    match state.network(NetworkKind::Rssi) {
        Some(raw) => {
            let quality = types::rssi_dbm(raw).map(SignalQuality::classify);
            let (text, color) = match quality {
                Some(q) => (format!("{raw} ({})", q.label()), theme.quality_color(q)),
                None => (raw.to_string(), theme.text),
            };
            metric_row_string(ui, "RSSI", &text, color, theme.dim);
        }
        None => metric_row_string(ui, "RSSI", "--", theme.dim, theme.dim),
    }

    let ports = match (
        state.network(NetworkKind::LocalPort),
        state.network(NetworkKind::RemotePort),
    ) {
        (Some(local), Some(remote)) => format!("{local} → {remote}"),
        _ => "--".to_string(),
    };
    metric_row_string(ui, "Puertos", &ports, theme.network, theme.dim);

    let uptime = state
        .uptime_seconds
        .map_or("--".to_string(), types::format_uptime);
    metric_row_string(ui, "Tiempo", &uptime, theme.text, theme.dim);

    let sent = state
        .messages_sent
        .map_or("--".to_string(), |n| n.to_string());
    metric_row_string(ui, "Enviados", &sent, theme.text, theme.dim);

    let received = state
        .commands_received
        .map_or("--".to_string(), |n| n.to_string());
    metric_row_string(ui, "Recibidos", &received, theme.text, theme.dim);
}

// ──────────────────────────────────────────
// Consola serial
// ──────────────────────────────────────────

/// Vista da consola: linhas monospace, presa ao fundo.
pub fn render_console(ui: &mut Ui, console: &ConsoleLog, theme: &EguiTheme) {
    egui::Frame::new()
        .fill(theme.console_bg)
        .stroke(egui::Stroke::new(1.0, theme.border))
        .corner_radius(4.0)
        .inner_margin(6.0)
        .show(ui, |ui: &mut Ui| {
            egui::ScrollArea::vertical()
                .stick_to_bottom(true)
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| {
                    for line in console.lines() {
                        ui.label(
                            RichText::new(line)
                                .color(theme.text)
                                .monospace()
                                .size(11.0),
                        );
                    }
                });
        });
}
