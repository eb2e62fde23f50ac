//! # Monitor Core
//!
//! Crate compartilhada do ESP32 Serial Monitor: decodificação das linhas
//! de telemetria, estado agregado do dashboard, vocabulário de comandos,
//! console com timestamps, configuração TOML e temas.
//!
//! ## Módulos
//! - [`types`] – Campos tipados ([`FieldUpdate`]), LEDs, qualidade de sinal
//! - [`decoder`] – Linha de texto → atualizações de campo
//! - [`state`] – Agregador: último valor por campo + janela de temperatura
//! - [`commands`] – Comandos de saída (test1..test4, allon, alloff, status)
//! - [`console`] – Buffer de console com timestamps e exportação
//! - [`config`] – Configuração unificada via TOML
//! - [`theme`] – Temas visuais (dark, light)

pub mod commands;
pub mod config;
pub mod console;
pub mod decoder;
pub mod state;
pub mod theme;
pub mod types;

// Re-exports convenientes
pub use commands::Command;
pub use config::AppConfig;
pub use console::ConsoleLog;
pub use decoder::decode;
pub use state::{LedState, TelemetryState};
pub use types::FieldUpdate;
