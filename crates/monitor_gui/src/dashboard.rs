//! Dashboard principal – App eframe/egui.
//!
//! Consumidor único dos eventos do worker serial: a cada frame drena o
//! channel, empurra cada linha para a consola e aplica as atualizações
//! decodificadas ao estado. A renderização é função pura do estado.

use crate::panels;
use crate::serial_thread::{self, PortEntry, SerialEvent, SerialLink};
use crate::theme_egui::{self, EguiTheme};
use chrono::Local;
use egui::{RichText, Ui};
use monitor_core::config::AppConfig;
use monitor_core::decoder::decode;
use monitor_core::types::LedId;
use monitor_core::{Command, ConsoleLog, TelemetryState};
use tracing::info;

const BAUD_OPTIONS: [u32; 5] = [9_600, 19_200, 38_400, 57_600, 115_200];

/// Estado do aplicativo.
pub struct MonitorApp {
    config: AppConfig,
    theme: EguiTheme,
    theme_index: usize,
    all_themes: Vec<EguiTheme>,

    // Conexão
    link: Option<SerialLink>,
    available_ports: Vec<PortEntry>,
    selected_port: Option<String>,
    baud_rate: u32,
    last_error: Option<String>,

    // Dados
    state: TelemetryState,
    console: ConsoleLog,
}

impl MonitorApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: AppConfig) -> Self {
        let all_themes = theme_egui::all_themes();
        let theme_index = all_themes
            .iter()
            .position(|t| t.name == config.ui.theme)
            .unwrap_or(0);
        let theme = all_themes[theme_index].clone();

        let available_ports = serial_thread::scan_ports();
        let selected_port = if config.serial.port.is_empty() {
            available_ports.first().map(|p| p.port_name.clone())
        } else {
            Some(config.serial.port.clone())
        };
        let baud_rate = config.serial.baud_rate;

        Self {
            config,
            theme,
            theme_index,
            all_themes,
            link: None,
            available_ports,
            selected_port,
            baud_rate,
            last_error: None,
            state: TelemetryState::new(),
            console: ConsoleLog::new(),
        }
    }

    // ──────────────────────────────────────
    // Conexão e comandos
    // ──────────────────────────────────────

    /// Drena os eventos pendentes do worker, na ordem de chegada.
    fn poll_serial(&mut self) {
        let Some(link) = &self.link else { return };

        let mut events = Vec::new();
        while let Ok(event) = link.events().try_recv() {
            events.push(event);
        }

        let mut lost = None;
        for event in events {
            match event {
                SerialEvent::Line(line) => {
                    self.console.push(&line);
                    for update in decode(&line) {
                        self.state.apply(update);
                    }
                }
                SerialEvent::Disconnected(message) => lost = Some(message),
            }
        }

        if let Some(message) = lost {
            self.console.push(&format!("Conexión perdida: {message}"));
            self.last_error = Some(message);
            self.teardown_link();
        }
    }

    fn connect(&mut self) {
        let Some(port) = self.selected_port.clone() else {
            self.last_error = Some("Selecciona un puerto".into());
            return;
        };

        let mut serial_cfg = self.config.serial.clone();
        serial_cfg.port = port;
        serial_cfg.baud_rate = self.baud_rate;

        match SerialLink::connect(&serial_cfg) {
            Ok(mut link) => {
                // Estado nasce vazio a cada conexão
                self.state = TelemetryState::new();
                self.last_error = None;
                self.console.push(&format!(
                    "Conectado a {} @ {} baud",
                    link.port_name(),
                    serial_cfg.baud_rate
                ));
                // Povoa o painel de rede sem esperar o dump periódico
                link.send_command(Command::Status);
                self.link = Some(link);

                self.config.serial = serial_cfg;
                let _ = self.config.save(&AppConfig::default_path());
            }
            Err(e) => {
                self.console.push(&format!("Error al conectar: {e}"));
                self.last_error = Some(e.to_string());
            }
        }
    }

    fn disconnect(&mut self) {
        if self.link.is_some() {
            self.teardown_link();
            self.console.push("Desconectado");
        }
    }

    /// Para o worker e solta a porta (síncrono; seguro chamar sem link).
    fn teardown_link(&mut self) {
        if let Some(mut link) = self.link.take() {
            link.disconnect();
            info!("Porta {} liberada", link.port_name());
        }
    }

    fn send(&mut self, command: Command) {
        let Some(link) = self.link.as_mut() else {
            return;
        };
        if link.send_command(command) {
            self.console.push(&format!("> {command}"));
        } else {
            self.console.push(&format!("Error al enviar comando: {command}"));
        }
    }

    fn refresh_ports(&mut self) {
        self.available_ports = serial_thread::scan_ports();
        if self.selected_port.is_none() {
            self.selected_port = self.available_ports.first().map(|p| p.port_name.clone());
        }
    }

    fn save_log(&mut self) {
        let default_name = format!("esp32_log_{}.txt", Local::now().format("%Y%m%d_%H%M%S"));
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Text", &["txt"])
            .set_file_name(default_name)
            .save_file()
        else {
            return;
        };

        match self.console.save_to(&path) {
            Ok(()) => {
                self.console
                    .push(&format!("Log guardado en: {}", path.display()));
            }
            Err(e) => {
                self.last_error = Some(format!("Error al guardar log: {e}"));
            }
        }
    }

    fn cycle_theme(&mut self) {
        self.theme_index = (self.theme_index + 1) % self.all_themes.len();
        self.theme = self.all_themes[self.theme_index].clone();
        self.config.ui.theme = self.theme.name.clone();
        info!("Tema: {}", self.theme.name);
    }

    // ──────────────────────────────────────
    // Painéis
    // ──────────────────────────────────────

    fn render_controls(&mut self, ui: &mut Ui) {
        ui.label(
            RichText::new("🔌 Conexión Serial")
                .color(self.theme.title)
                .strong()
                .monospace(),
        );
        ui.add_space(4.0);

        let connected = self.link.is_some();

        // Porta e baud travados enquanto conectado
        ui.add_enabled_ui(!connected, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                let selected_display = self
                    .available_ports
                    .iter()
                    .find(|p| Some(&p.port_name) == self.selected_port.as_ref())
                    .map(|p| p.display.clone())
                    .or_else(|| self.selected_port.clone())
                    .unwrap_or_else(|| "—".into());

                egui::ComboBox::from_id_salt("port")
                    .width(165.0)
                    .selected_text(selected_display)
                    .show_ui(ui, |ui: &mut Ui| {
                        for entry in &self.available_ports {
                            ui.selectable_value(
                                &mut self.selected_port,
                                Some(entry.port_name.clone()),
                                &entry.display,
                            );
                        }
                    });

                if ui.button("🔄").clicked() {
                    self.refresh_ports();
                }
            });

            egui::ComboBox::from_id_salt("baud")
                .width(120.0)
                .selected_text(self.baud_rate.to_string())
                .show_ui(ui, |ui: &mut Ui| {
                    for baud in BAUD_OPTIONS {
                        ui.selectable_value(&mut self.baud_rate, baud, baud.to_string());
                    }
                });
        });

        ui.add_space(6.0);
        let label = if connected {
            "🔌 Desconectar"
        } else {
            "🔗 Conectar"
        };
        if ui.button(label).clicked() {
            if connected {
                self.disconnect();
            } else {
                self.connect();
            }
        }

        ui.add_space(8.0);
        ui.separator();
        ui.label(
            RichText::new("📊 Información del Sistema")
                .color(self.theme.title)
                .strong()
                .monospace(),
        );
        ui.add_space(4.0);
        panels::render_system_info(ui, &self.state, &self.theme);

        ui.add_space(8.0);
        ui.separator();
        ui.label(
            RichText::new("🎮 Controles")
                .color(self.theme.title)
                .strong()
                .monospace(),
        );
        ui.add_space(4.0);
        if ui.button("🗑 Limpiar Consola").clicked() {
            self.console.clear();
        }
        if ui.button("💾 Guardar Log").clicked() {
            self.save_log();
        }
        if ui.button("🌙 Cambiar Tema").clicked() {
            self.cycle_theme();
        }

        if let Some(err) = &self.last_error {
            ui.add_space(6.0);
            ui.label(RichText::new(err).color(self.theme.critical).size(11.0));
        }
    }

    fn render_dashboard(&mut self, ui: &mut Ui) {
        ui.vertical_centered(|ui: &mut Ui| {
            ui.label(
                RichText::new("📊 ESP32 UDP Lab Dashboard")
                    .color(self.theme.title)
                    .size(20.0)
                    .strong()
                    .monospace(),
            );
        });

        // Indicador de estado da conexão
        ui.vertical_centered(|ui: &mut Ui| {
            match &self.link {
                Some(link) => ui.label(
                    RichText::new(format!("● Conectado a {}", link.port_name()))
                        .color(self.theme.ok)
                        .monospace(),
                ),
                None => ui.label(
                    RichText::new("○ Desconectado")
                        .color(self.theme.critical)
                        .monospace(),
                ),
            };
        });

        ui.add_space(8.0);

        // ── Sensores ──
        ui.columns(3, |cols| {
            panels::render_sensor_card(
                &mut cols[0],
                "🌡 Temperatura",
                self.state.temperature,
                "°C",
                1,
                self.theme.temperature,
                &self.theme,
            );
            panels::render_sensor_card(
                &mut cols[1],
                "💧 Humedad",
                self.state.humidity,
                "%",
                1,
                self.theme.humidity,
                &self.theme,
            );
            panels::render_sensor_card(
                &mut cols[2],
                "☀ Luminosidad",
                self.state.light,
                "%",
                0,
                self.theme.light,
                &self.theme,
            );
        });

        ui.add_space(6.0);

        // ── LEDs ──
        ui.columns(4, |cols| {
            for led in LedId::all() {
                panels::render_led(
                    &mut cols[led.slot()],
                    led,
                    self.state.led(led.index()),
                    &self.theme,
                );
            }
        });

        ui.add_space(6.0);

        // ── Comandos ──
        if let Some(command) = panels::render_commands(ui, self.link.is_some()) {
            self.send(command);
        }

        ui.add_space(6.0);

        // ── Gráfico ──
        panels::render_temperature_plot(ui, self.state.temp_history(), &self.theme);

        // ── Help bar (fundo) ──
        ui.with_layout(
            egui::Layout::bottom_up(egui::Align::Center),
            |ui: &mut Ui| {
                ui.label(
                    RichText::new("[T] Tema | [Q/Esc] Salir")
                        .color(self.theme.dim)
                        .monospace()
                        .size(10.0),
                );
            },
        );
    }
}

impl eframe::App for MonitorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ── Poll serial ──
        self.poll_serial();

        // ── Repaint contínuo (60 FPS) ──
        ctx.request_repaint_after(std::time::Duration::from_millis(16));

        // ── Estilo visual baseado no tema ──
        let mut visuals = if self.theme.name == "light" {
            egui::Visuals::light()
        } else {
            egui::Visuals::dark()
        };
        visuals.panel_fill = self.theme.bg;
        visuals.window_fill = self.theme.panel;
        visuals.override_text_color = Some(self.theme.text);
        ctx.set_visuals(visuals);

        // ── Atalhos de teclado ──
        ctx.input(|i: &egui::InputState| {
            if i.key_pressed(egui::Key::T) {
                self.cycle_theme();
            }
            if i.key_pressed(egui::Key::Q) || i.key_pressed(egui::Key::Escape) {
                ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            }
        });

        // ── Painéis ──
        egui::SidePanel::left("controls")
            .resizable(false)
            .default_width(250.0)
            .show(ctx, |ui: &mut Ui| {
                self.render_controls(ui);
            });

        egui::SidePanel::right("console")
            .default_width(380.0)
            .show(ctx, |ui: &mut Ui| {
                ui.label(
                    RichText::new("📺 Consola Serial")
                        .color(self.theme.title)
                        .strong()
                        .monospace(),
                );
                ui.add_space(4.0);
                panels::render_console(ui, &self.console, &self.theme);
            });

        egui::CentralPanel::default().show(ctx, |ui: &mut Ui| {
            self.render_dashboard(ui);
        });
    }
}
