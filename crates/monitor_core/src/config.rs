//! Configuração unificada via TOML.
//!
//! Um único `config.toml` ao lado do executável. Carga permissiva:
//! arquivo ausente ou inválido cai nos padrões com um aviso no log.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Configuração da porta serial.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SerialConfig {
    /// Nome da porta (ex: "COM7", "/dev/ttyUSB0"; vazio = escolher na UI)
    pub port: String,
    /// Baud rate (115200 no firmware de fábrica)
    pub baud_rate: u32,
    /// Pausa entre iterações vazias do worker de leitura (ms)
    pub poll_interval_ms: u64,
    /// Timeout de leitura da porta (ms)
    pub read_timeout_ms: u64,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            port: String::new(),
            baud_rate: 115_200,
            poll_interval_ms: 10,
            read_timeout_ms: 50,
        }
    }
}

/// Configuração de interface.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Tema: "dark" ou "light"
    pub theme: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            theme: "dark".into(),
        }
    }
}

/// Configuração raiz do aplicativo.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub serial: SerialConfig,
    pub ui: UiConfig,
}

impl AppConfig {
    /// Carrega configuração de um arquivo TOML.
    pub fn load(path: &Path) -> Self {
        if path.exists() {
            match std::fs::read_to_string(path) {
                Ok(content) => match toml::from_str::<AppConfig>(&content) {
                    Ok(config) => {
                        info!("Configuração carregada de {}", path.display());
                        return config;
                    }
                    Err(e) => {
                        warn!("Erro ao parsear {}: {}", path.display(), e);
                    }
                },
                Err(e) => {
                    warn!("Erro ao ler {}: {}", path.display(), e);
                }
            }
        }

        info!("Usando configuração padrão");
        AppConfig::default()
    }

    /// Salva configuração em arquivo TOML.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        let content = toml::to_string_pretty(self).map_err(|e| e.to_string())?;
        std::fs::write(path, content).map_err(|e| e.to_string())?;
        info!("Configuração salva em {}", path.display());
        Ok(())
    }

    /// Retorna o caminho padrão do config.toml.
    pub fn default_path() -> PathBuf {
        let exe_dir = std::env::current_exe()
            .map(|p| p.parent().unwrap_or(Path::new(".")).to_path_buf())
            .unwrap_or_else(|_| PathBuf::from("."));
        exe_dir.join("config.toml")
    }

    /// Valida a configuração e retorna lista de erros.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.serial.baud_rate == 0 {
            errors.push("Baud rate não pode ser 0".into());
        }
        if self.serial.poll_interval_ms == 0 || self.serial.poll_interval_ms > 1000 {
            errors.push(format!(
                "Intervalo de polling inválido: {} ms (1–1000)",
                self.serial.poll_interval_ms
            ));
        }
        if self.serial.read_timeout_ms == 0 || self.serial.read_timeout_ms > 5000 {
            errors.push(format!(
                "Timeout de leitura inválido: {} ms (1–5000)",
                self.serial.read_timeout_ms
            ));
        }
        if !crate::theme::theme_names().contains(&self.ui.theme.as_str()) {
            errors.push(format!("Tema desconhecido: {}", self.ui.theme));
        }

        errors
    }
}
