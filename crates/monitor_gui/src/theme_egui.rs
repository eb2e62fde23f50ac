//! Conversão de temas para `egui::Color32`.

use egui::Color32;
use monitor_core::theme::{self, Theme};
use monitor_core::types::SignalQuality;

/// Tema convertido para tipos egui.
#[derive(Clone)]
pub struct EguiTheme {
    pub name: String,
    pub bg: Color32,
    pub panel: Color32,
    pub border: Color32,
    pub console_bg: Color32,
    pub text: Color32,
    pub dim: Color32,
    pub title: Color32,
    pub temperature: Color32,
    pub humidity: Color32,
    pub light: Color32,
    pub network: Color32,
    pub led_on: Color32,
    pub led_off: Color32,
    pub ok: Color32,
    pub warning: Color32,
    pub critical: Color32,
}

impl EguiTheme {
    /// Converte um [`Theme`] da core para [`EguiTheme`].
    pub fn from_core(t: &Theme) -> Self {
        Self {
            name: t.name.clone(),
            bg: hex_color(&t.bg),
            panel: hex_color(&t.panel),
            border: hex_color(&t.border),
            console_bg: hex_color(&t.console_bg),
            text: hex_color(&t.text),
            dim: hex_color(&t.dim),
            title: hex_color(&t.title),
            temperature: hex_color(&t.temperature),
            humidity: hex_color(&t.humidity),
            light: hex_color(&t.light),
            network: hex_color(&t.network),
            led_on: hex_color(&t.led_on),
            led_off: hex_color(&t.led_off),
            ok: hex_color(&t.ok),
            warning: hex_color(&t.warning),
            critical: hex_color(&t.critical),
        }
    }

    /// Cor do indicador de LED conforme o estado.
    pub fn led_color(&self, on: bool) -> Color32 {
        if on { self.led_on } else { self.led_off }
    }

    /// Cor da etiqueta de qualidade de sinal.
    pub fn quality_color(&self, quality: SignalQuality) -> Color32 {
        match quality {
            SignalQuality::Excellent => self.ok,
            SignalQuality::Good => self.warning,
            SignalQuality::Weak => self.critical,
        }
    }
}

fn hex_color(hex: &str) -> Color32 {
    let (r, g, b) = theme::hex_to_rgb(hex);
    Color32::from_rgb(r, g, b)
}

/// Carrega todos os temas disponíveis.
pub fn all_themes() -> Vec<EguiTheme> {
    theme::theme_names()
        .iter()
        .map(|name| EguiTheme::from_core(&theme::get_theme(name)))
        .collect()
}
