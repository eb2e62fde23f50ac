//! Tipos de telemetria decodificados das linhas seriais do ESP32.
//!
//! Cada linha de texto recebida vira zero ou mais [`FieldUpdate`]s tipados.
//! Os tipos aqui são transientes: produzidos pelo decoder, consumidos pelo
//! agregador de estado, descartados em seguida.

use lazy_static::lazy_static;
use regex::Regex;

// ──────────────────────────────────────────────
// Campos reconhecidos
// ──────────────────────────────────────────────

/// Campos de rede reportados pelo firmware.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum NetworkKind {
    /// IP do próprio ESP32 (marcadores "IP ESP32:" e "IP Local:")
    EspIp,
    /// IP do telefone pareado ("IP Teléfono:" e "Teléfono destino:")
    PhoneIp,
    Ssid,
    Gateway,
    /// Intensidade do sinal WiFi, texto cru (ex: "-62 dBm")
    Rssi,
    LocalPort,
    RemotePort,
}

/// Sensores analógicos do laboratório.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorKind {
    Temperature,
    Humidity,
    Light,
}

/// Contadores de tráfego do firmware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterKind {
    MessagesSent,
    CommandsReceived,
}

/// Um fato tipado extraído de uma linha de telemetria.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldUpdate {
    Network { kind: NetworkKind, value: String },
    WifiConnected { connected: bool },
    /// Tempo de funcionamento em segundos totais (a formatação HH:MM:SS
    /// acontece na borda de apresentação, ver [`format_uptime`]).
    Uptime { seconds: u32 },
    Sensor { kind: SensorKind, value: f64 },
    /// Estado de um LED reportado pelo firmware. O índice vem da linha e
    /// pode estar fora de 1..=4 – o agregador guarda mesmo assim.
    Led { index: u32, gpio_pin: u32, on: bool },
    Counter { kind: CounterKind, value: u32 },
}

// ──────────────────────────────────────────────
// LEDs do painel
// ──────────────────────────────────────────────

/// Quantidade de widgets de LED no dashboard.
pub const LED_COUNT: usize = 4;

/// Pinos GPIO de fábrica dos quatro LEDs, na ordem 1..=4.
/// Exibidos antes da primeira telemetria chegar.
pub const LED_GPIO_PINS: [u32; LED_COUNT] = [5, 18, 36, 21];

/// Índice de LED validado na construção (1..=4).
///
/// Os widgets do painel formam um array fixo indexado por `LedId`;
/// índices desconhecidos vindos da telemetria ficam só no agregador.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct LedId(u32);

/// Índice de LED fora de 1..=4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Índice de LED inválido: {0} (esperado 1..={LED_COUNT})")]
pub struct InvalidLed(pub u32);

impl LedId {
    pub fn new(index: u32) -> Result<Self, InvalidLed> {
        if (1..=LED_COUNT as u32).contains(&index) {
            Ok(Self(index))
        } else {
            Err(InvalidLed(index))
        }
    }

    /// Índice 1..=4 como reportado pelo firmware.
    pub fn index(self) -> u32 {
        self.0
    }

    /// Posição 0..=3 no array de widgets.
    pub fn slot(self) -> usize {
        (self.0 - 1) as usize
    }

    /// Pino GPIO de fábrica deste LED.
    pub fn default_gpio(self) -> u32 {
        LED_GPIO_PINS[self.slot()]
    }

    /// Itera os quatro LEDs do painel em ordem.
    pub fn all() -> impl Iterator<Item = LedId> {
        (1..=LED_COUNT as u32).map(LedId)
    }
}

// ──────────────────────────────────────────────
// Qualidade de sinal (apresentação)
// ──────────────────────────────────────────────

/// Classificação do RSSI para exibição ao lado do valor cru.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalQuality {
    Excellent,
    Good,
    Weak,
}

impl SignalQuality {
    /// Classifica um RSSI em dBm: > -50 excelente, > -70 boa, senão fraca.
    pub fn classify(dbm: i32) -> Self {
        if dbm > -50 {
            SignalQuality::Excellent
        } else if dbm > -70 {
            SignalQuality::Good
        } else {
            SignalQuality::Weak
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SignalQuality::Excellent => "Excelente",
            SignalQuality::Good => "Boa",
            SignalQuality::Weak => "Fraca",
        }
    }
}

lazy_static! {
    static ref DBM_RE: Regex = Regex::new(r"-?\d+").unwrap();
}

/// Extrai o valor inteiro em dBm do texto de RSSI (ex: "-62 dBm" → -62).
pub fn rssi_dbm(value: &str) -> Option<i32> {
    DBM_RE.find(value)?.as_str().parse().ok()
}

// ──────────────────────────────────────────────
// Uptime
// ──────────────────────────────────────────────

/// Formata segundos totais como HH:MM:SS (3725 → "01:02:05").
pub fn format_uptime(total_seconds: u32) -> String {
    let hours = total_seconds / 3600;
    let remainder = total_seconds % 3600;
    format!("{:02}:{:02}:{:02}", hours, remainder / 60, remainder % 60)
}

// ──────────────────────────────────────────────
// Testes
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn led_id_accepts_1_to_4() {
        for i in 1..=4 {
            let led = LedId::new(i).unwrap();
            assert_eq!(led.index(), i);
            assert_eq!(led.slot(), (i - 1) as usize);
        }
    }

    #[test]
    fn led_id_rejects_out_of_range() {
        assert_eq!(LedId::new(0), Err(InvalidLed(0)));
        assert_eq!(LedId::new(5), Err(InvalidLed(5)));
    }

    #[test]
    fn led_default_gpios_match_factory_order() {
        let pins: Vec<u32> = LedId::all().map(LedId::default_gpio).collect();
        assert_eq!(pins, vec![5, 18, 36, 21]);
    }

    #[test]
    fn signal_quality_thresholds() {
        assert_eq!(SignalQuality::classify(-40), SignalQuality::Excellent);
        assert_eq!(SignalQuality::classify(-50), SignalQuality::Good);
        assert_eq!(SignalQuality::classify(-70), SignalQuality::Weak);
        assert_eq!(SignalQuality::classify(-90), SignalQuality::Weak);
    }

    #[test]
    fn rssi_dbm_extracts_integer() {
        assert_eq!(rssi_dbm("-62 dBm"), Some(-62));
        assert_eq!(rssi_dbm("-45dBm"), Some(-45));
        assert_eq!(rssi_dbm("sem sinal"), None);
    }

    #[test]
    fn uptime_formats_hms() {
        assert_eq!(format_uptime(3725), "01:02:05");
        assert_eq!(format_uptime(0), "00:00:00");
        assert_eq!(format_uptime(86399), "23:59:59");
    }
}
