//! Definição de temas visuais para o dashboard.

use serde::{Deserialize, Serialize};

/// Definição completa de um tema de cores.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    // Cores de fundo
    pub bg: Color32Hex,
    pub panel: Color32Hex,
    pub border: Color32Hex,
    pub console_bg: Color32Hex,
    // Cores de texto
    pub text: Color32Hex,
    pub dim: Color32Hex,
    pub title: Color32Hex,
    // Cores por widget
    pub temperature: Color32Hex,
    pub humidity: Color32Hex,
    pub light: Color32Hex,
    pub network: Color32Hex,
    pub led_on: Color32Hex,
    pub led_off: Color32Hex,
    // Cores de estado
    pub ok: Color32Hex,
    pub warning: Color32Hex,
    pub critical: Color32Hex,
}

/// Cor em formato hex string (ex: "#e74c3c") para serialização.
/// A conversão para `egui::Color32` é feita na crate da GUI.
pub type Color32Hex = String;

/// Converte uma string hex "#RRGGBB" para tupla (r, g, b).
pub fn hex_to_rgb(hex: &str) -> (u8, u8, u8) {
    let hex = hex.trim_start_matches('#');
    if hex.len() != 6 {
        return (255, 255, 255); // fallback branco
    }
    let r = u8::from_str_radix(&hex[0..2], 16).unwrap_or(255);
    let g = u8::from_str_radix(&hex[2..4], 16).unwrap_or(255);
    let b = u8::from_str_radix(&hex[4..6], 16).unwrap_or(255);
    (r, g, b)
}

/// Tema Escuro (padrão).
pub fn dark_theme() -> Theme {
    Theme {
        name: "dark".into(),
        bg: "#2c3e50".into(),
        panel: "#34495e".into(),
        border: "#3d566e".into(),
        console_bg: "#1e1e1e".into(),
        text: "#ecf0f1".into(),
        dim: "#95a5a6".into(),
        title: "#3498db".into(),
        temperature: "#e74c3c".into(),
        humidity: "#3498db".into(),
        light: "#f39c12".into(),
        network: "#2ecc71".into(),
        led_on: "#27ae60".into(),
        led_off: "#7f8c8d".into(),
        ok: "#27ae60".into(),
        warning: "#f39c12".into(),
        critical: "#e74c3c".into(),
    }
}

/// Tema Claro.
pub fn light_theme() -> Theme {
    Theme {
        name: "light".into(),
        bg: "#f5f6fa".into(),
        panel: "#ffffff".into(),
        border: "#d0d3d4".into(),
        console_bg: "#ecf0f1".into(),
        text: "#2c3e50".into(),
        dim: "#7f8c8d".into(),
        title: "#2980b9".into(),
        temperature: "#c0392b".into(),
        humidity: "#2980b9".into(),
        light: "#d68910".into(),
        network: "#1e8449".into(),
        led_on: "#1e8449".into(),
        led_off: "#95a5a6".into(),
        ok: "#1e8449".into(),
        warning: "#b9770e".into(),
        critical: "#a93226".into(),
    }
}

/// Retorna tema pelo nome.
pub fn get_theme(name: &str) -> Theme {
    match name.to_lowercase().as_str() {
        "light" => light_theme(),
        _ => dark_theme(),
    }
}

/// Nomes de temas disponíveis.
pub fn theme_names() -> Vec<&'static str> {
    vec!["dark", "light"]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_to_rgb_valid() {
        assert_eq!(hex_to_rgb("#e74c3c"), (231, 76, 60));
        assert_eq!(hex_to_rgb("#27ae60"), (39, 174, 96));
        assert_eq!(hex_to_rgb("2c3e50"), (44, 62, 80));
    }

    #[test]
    fn hex_to_rgb_malformed_falls_back_to_white() {
        assert_eq!(hex_to_rgb("#fff"), (255, 255, 255));
        assert_eq!(hex_to_rgb(""), (255, 255, 255));
    }

    #[test]
    fn all_themes_load() {
        for name in theme_names() {
            let t = get_theme(name);
            assert_eq!(t.name, name);
        }
    }

    #[test]
    fn unknown_theme_returns_dark() {
        let t = get_theme("nonexistent");
        assert_eq!(t.name, "dark");
    }
}
