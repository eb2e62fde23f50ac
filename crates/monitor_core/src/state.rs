//! Estado agregado de telemetria.
//!
//! Guarda o último valor conhecido de cada campo mais a janela deslizante
//! de temperatura usada pelo gráfico. Criado vazio ao conectar, mutado
//! apenas via [`TelemetryState::apply`] na ordem de chegada, descartado ao
//! desconectar.

use crate::types::{CounterKind, FieldUpdate, NetworkKind, SensorKind};
use std::collections::BTreeMap;

/// Capacidade da janela de histórico de temperatura.
pub const TEMP_HISTORY_LEN: usize = 100;

/// Último estado reportado de um LED.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedState {
    pub gpio_pin: u32,
    pub on: bool,
}

/// Estado completo do dashboard, redutor puro sobre [`FieldUpdate`]s.
#[derive(Debug, Clone, Default)]
pub struct TelemetryState {
    /// Último valor por campo de rede.
    network: BTreeMap<NetworkKind, String>,
    pub wifi_connected: bool,
    pub uptime_seconds: Option<u32>,
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub light: Option<f64>,
    /// Janela de amostras de temperatura. O eixo x do gráfico é o índice
    /// da amostra: ao evictar a mais antiga, os índices re-baseiam em
    /// 0..len-1 – o eixo visível desliza em vez de rolar.
    temp_history: Vec<f64>,
    /// Estado por índice de LED como reportado. Índices fora de 1..=4 são
    /// aceitos e guardados; só não têm widget correspondente.
    leds: BTreeMap<u32, LedState>,
    pub messages_sent: Option<u32>,
    pub commands_received: Option<u32>,
}

impl TelemetryState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Aplica uma atualização decodificada: sobrescreve o último valor do
    /// campo. Só temperatura acumula histórico; nenhuma transição falha.
    pub fn apply(&mut self, update: FieldUpdate) {
        match update {
            FieldUpdate::Network { kind, value } => {
                self.network.insert(kind, value);
            }
            FieldUpdate::WifiConnected { connected } => self.wifi_connected = connected,
            FieldUpdate::Uptime { seconds } => self.uptime_seconds = Some(seconds),
            FieldUpdate::Sensor { kind, value } => self.apply_sensor(kind, value),
            FieldUpdate::Led {
                index,
                gpio_pin,
                on,
            } => {
                self.leds.insert(index, LedState { gpio_pin, on });
            }
            FieldUpdate::Counter { kind, value } => match kind {
                CounterKind::MessagesSent => self.messages_sent = Some(value),
                CounterKind::CommandsReceived => self.commands_received = Some(value),
            },
        }
    }

    fn apply_sensor(&mut self, kind: SensorKind, value: f64) {
        match kind {
            SensorKind::Temperature => {
                self.temperature = Some(value);
                self.temp_history.push(value);
                if self.temp_history.len() > TEMP_HISTORY_LEN {
                    self.temp_history.remove(0);
                }
            }
            SensorKind::Humidity => self.humidity = Some(value),
            SensorKind::Light => self.light = Some(value),
        }
    }

    /// Último valor de um campo de rede, se já reportado.
    pub fn network(&self, kind: NetworkKind) -> Option<&str> {
        self.network.get(&kind).map(String::as_str)
    }

    /// Último estado reportado de um LED (por índice do firmware).
    pub fn led(&self, index: u32) -> Option<LedState> {
        self.leds.get(&index).copied()
    }

    /// Amostras de temperatura na ordem de chegada (mais antiga primeiro).
    pub fn temp_history(&self) -> &[f64] {
        &self.temp_history
    }
}

// ──────────────────────────────────────────────
// Testes
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::decode;

    fn temp(value: f64) -> FieldUpdate {
        FieldUpdate::Sensor {
            kind: SensorKind::Temperature,
            value,
        }
    }

    #[test]
    fn sensor_updates_overwrite_latest() {
        let mut state = TelemetryState::new();
        state.apply(temp(21.0));
        state.apply(temp(22.5));
        assert_eq!(state.temperature, Some(22.5));
        assert_eq!(state.temp_history(), &[21.0, 22.5]);
    }

    #[test]
    fn history_window_drops_oldest_after_100() {
        let mut state = TelemetryState::new();
        // 101 amostras t0..t100: sobra exatamente t1..t100.
        for i in 0..=100 {
            state.apply(temp(i as f64));
        }
        assert_eq!(state.temp_history().len(), 100);
        assert_eq!(state.temp_history()[0], 1.0);
        assert_eq!(state.temp_history()[99], 100.0);
    }

    #[test]
    fn only_temperature_keeps_history() {
        let mut state = TelemetryState::new();
        state.apply(FieldUpdate::Sensor {
            kind: SensorKind::Humidity,
            value: 40.0,
        });
        state.apply(FieldUpdate::Sensor {
            kind: SensorKind::Light,
            value: 80.0,
        });
        assert_eq!(state.humidity, Some(40.0));
        assert_eq!(state.light, Some(80.0));
        assert!(state.temp_history().is_empty());
    }

    #[test]
    fn unknown_led_index_is_stored() {
        let mut state = TelemetryState::new();
        state.apply(FieldUpdate::Led {
            index: 7,
            gpio_pin: 33,
            on: true,
        });
        assert_eq!(
            state.led(7),
            Some(LedState {
                gpio_pin: 33,
                on: true
            })
        );
        assert_eq!(state.led(1), None);
    }

    #[test]
    fn counters_overwrite() {
        let mut state = TelemetryState::new();
        state.apply(FieldUpdate::Counter {
            kind: CounterKind::MessagesSent,
            value: 10,
        });
        state.apply(FieldUpdate::Counter {
            kind: CounterKind::MessagesSent,
            value: 11,
        });
        assert_eq!(state.messages_sent, Some(11));
        assert_eq!(state.commands_received, None);
    }

    #[test]
    fn stream_end_to_end() {
        // Fluxo completo: decode → apply, na ordem de chegada.
        let lines = [
            "WiFi: CONECTADO",
            "IP ESP32: 192.168.1.50",
            "Temperatura: 21.0",
            "Temperatura: 22.5",
            "LED 1 GPIO 5 ENCENDIDO",
        ];

        let mut state = TelemetryState::new();
        for line in lines {
            for update in decode(line) {
                state.apply(update);
            }
        }

        assert!(state.wifi_connected);
        assert_eq!(state.network(NetworkKind::EspIp), Some("192.168.1.50"));
        assert_eq!(state.temperature, Some(22.5));
        assert_eq!(state.temp_history(), &[21.0, 22.5]);
        assert_eq!(
            state.led(1),
            Some(LedState {
                gpio_pin: 5,
                on: true
            })
        );
    }
}
