//! Decodificador de linhas de telemetria.
//!
//! Transforma uma linha de texto crua do firmware em zero ou mais
//! [`FieldUpdate`]s tipados. Função pura e determinística: linha sem
//! marcador conhecido (ou com captura numérica inválida) rende um vetor
//! vazio, nunca um erro — telemetria malformada não interrompe o fluxo.
//!
//! A categoria primária (rede / wifi / uptime / sensores) é uma cadeia de
//! prioridade: o primeiro marcador que casar vence e os demais primários
//! são pulados naquela linha. LED, contadores e sub-campos de rede são
//! verificados em toda linha, independentemente da cadeia primária — uma
//! linha real carrega um campo primário e, às vezes, uma menção de LED ou
//! contador junto.

use crate::types::{CounterKind, FieldUpdate, NetworkKind, SensorKind};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref UPTIME_RE: Regex = Regex::new(r"(\d+) segundos").unwrap();
    static ref TEMP_RE: Regex = Regex::new(r"Temperatura:\s*([0-9.-]+)").unwrap();
    static ref HUMIDITY_RE: Regex = Regex::new(r"Humedad:\s*([0-9.-]+)").unwrap();
    static ref LIGHT_RE: Regex = Regex::new(r"Luminosidad:\s*([0-9.-]+)").unwrap();
    static ref LED_RE: Regex =
        Regex::new(r"LED (\d+).*?GPIO (\d+).*?(ENCENDIDO|APAGADO|ON|OFF)").unwrap();
    static ref SENT_RE: Regex = Regex::new(r"Mensajes enviados:\s*(\d+)").unwrap();
    static ref RECEIVED_RE: Regex = Regex::new(r"Comandos recibidos:\s*(\d+)").unwrap();
    static ref LOCAL_PORT_RE: Regex = Regex::new(r"Puerto local \(escucha\):\s*(\d+)").unwrap();
    static ref REMOTE_PORT_RE: Regex = Regex::new(r"Puerto remoto \(envío\):\s*(\d+)").unwrap();
}

/// Decodifica uma linha de telemetria em atualizações de campo.
///
/// A ordem do vetor é fixa: campo primário (se houver), LED, contadores,
/// sub-campos de rede, portas.
pub fn decode(line: &str) -> Vec<FieldUpdate> {
    let mut updates = Vec::new();

    if let Some(update) = decode_primary(line) {
        updates.push(update);
    }
    decode_led(line, &mut updates);
    decode_counters(line, &mut updates);
    decode_network_extras(line, &mut updates);

    updates
}

// ──────────────────────────────────────────────
// Cadeia primária (exclusiva por linha)
// ──────────────────────────────────────────────

fn decode_primary(line: &str) -> Option<FieldUpdate> {
    if let Some(value) = after_marker(line, "IP ESP32:") {
        return Some(FieldUpdate::Network {
            kind: NetworkKind::EspIp,
            value,
        });
    }
    if let Some(value) = after_marker(line, "IP Teléfono:") {
        return Some(FieldUpdate::Network {
            kind: NetworkKind::PhoneIp,
            value,
        });
    }
    if line.contains("WiFi:") && line.contains("CONECTADO") {
        return Some(FieldUpdate::WifiConnected { connected: true });
    }
    // Os ramos seguintes consomem a cadeia mesmo quando a captura numérica
    // falha: marcador presente + número ilegível = linha primária perdida.
    if line.contains("Tiempo funcionamiento:") {
        return capture_u32(&UPTIME_RE, line).map(|seconds| FieldUpdate::Uptime { seconds });
    }
    if line.contains("Temperatura:") {
        return capture_f64(&TEMP_RE, line).map(|value| FieldUpdate::Sensor {
            kind: SensorKind::Temperature,
            value,
        });
    }
    if line.contains("Humedad:") {
        return capture_f64(&HUMIDITY_RE, line).map(|value| FieldUpdate::Sensor {
            kind: SensorKind::Humidity,
            value,
        });
    }
    if line.contains("Luminosidad:") {
        return capture_f64(&LIGHT_RE, line).map(|value| FieldUpdate::Sensor {
            kind: SensorKind::Light,
            value,
        });
    }
    None
}

// ──────────────────────────────────────────────
// Verificações independentes (toda linha)
// ──────────────────────────────────────────────

fn decode_led(line: &str, out: &mut Vec<FieldUpdate>) {
    // Índice, GPIO e token de estado podem aparecer em qualquer ponto da
    // linha, nessa ordem relativa (casamento não-guloso).
    if let Some(caps) = LED_RE.captures(line) {
        let index = caps[1].parse::<u32>().ok();
        let gpio_pin = caps[2].parse::<u32>().ok();
        if let (Some(index), Some(gpio_pin)) = (index, gpio_pin) {
            let on = matches!(&caps[3], "ENCENDIDO" | "ON");
            out.push(FieldUpdate::Led {
                index,
                gpio_pin,
                on,
            });
        }
    }
}

fn decode_counters(line: &str, out: &mut Vec<FieldUpdate>) {
    if let Some(value) = capture_u32(&SENT_RE, line) {
        out.push(FieldUpdate::Counter {
            kind: CounterKind::MessagesSent,
            value,
        });
    }
    if let Some(value) = capture_u32(&RECEIVED_RE, line) {
        out.push(FieldUpdate::Counter {
            kind: CounterKind::CommandsReceived,
            value,
        });
    }
}

fn decode_network_extras(line: &str, out: &mut Vec<FieldUpdate>) {
    const MARKERS: [(&str, NetworkKind); 5] = [
        ("SSID:", NetworkKind::Ssid),
        ("IP Local:", NetworkKind::EspIp),
        ("Gateway:", NetworkKind::Gateway),
        ("Teléfono destino:", NetworkKind::PhoneIp),
        ("RSSI:", NetworkKind::Rssi),
    ];
    for (marker, kind) in MARKERS {
        if let Some(value) = after_marker(line, marker) {
            out.push(FieldUpdate::Network { kind, value });
        }
    }

    // As portas só são emitidas quando a linha combinada traz ambas:
    // escuta e envio. Qualquer uma sozinha não rende nada.
    let local = capture_str(&LOCAL_PORT_RE, line);
    let remote = capture_str(&REMOTE_PORT_RE, line);
    if let (Some(local), Some(remote)) = (local, remote) {
        out.push(FieldUpdate::Network {
            kind: NetworkKind::LocalPort,
            value: local,
        });
        out.push(FieldUpdate::Network {
            kind: NetworkKind::RemotePort,
            value: remote,
        });
    }
}

// ──────────────────────────────────────────────
// Helpers
// ──────────────────────────────────────────────

/// Texto depois da primeira ocorrência do marcador, aparado.
fn after_marker(line: &str, marker: &str) -> Option<String> {
    line.split_once(marker)
        .map(|(_, rest)| rest.trim().to_string())
}

fn capture_u32(re: &Regex, line: &str) -> Option<u32> {
    re.captures(line)?.get(1)?.as_str().parse().ok()
}

fn capture_f64(re: &Regex, line: &str) -> Option<f64> {
    re.captures(line)?.get(1)?.as_str().parse().ok()
}

fn capture_str(re: &Regex, line: &str) -> Option<String> {
    Some(re.captures(line)?.get(1)?.as_str().to_string())
}

// ──────────────────────────────────────────────
// Testes
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temperature_with_surrounding_text() {
        let updates = decode("[sensor] Temperatura: 23.5 (DHT22 ok)");
        assert_eq!(
            updates,
            vec![FieldUpdate::Sensor {
                kind: SensorKind::Temperature,
                value: 23.5
            }]
        );
    }

    #[test]
    fn humidity_and_light() {
        assert_eq!(
            decode("Humedad: 48.2"),
            vec![FieldUpdate::Sensor {
                kind: SensorKind::Humidity,
                value: 48.2
            }]
        );
        assert_eq!(
            decode("Luminosidad: 73"),
            vec![FieldUpdate::Sensor {
                kind: SensorKind::Light,
                value: 73.0
            }]
        );
    }

    #[test]
    fn led_encendido() {
        let updates = decode("LED 2 (GPIO 18) -> ENCENDIDO");
        assert_eq!(
            updates,
            vec![FieldUpdate::Led {
                index: 2,
                gpio_pin: 18,
                on: true
            }]
        );
    }

    #[test]
    fn led_apagado_and_english_tokens() {
        assert_eq!(
            decode("LED 3 GPIO 36 APAGADO"),
            vec![FieldUpdate::Led {
                index: 3,
                gpio_pin: 36,
                on: false
            }]
        );
        assert_eq!(
            decode("LED 1 GPIO 5 ON"),
            vec![FieldUpdate::Led {
                index: 1,
                gpio_pin: 5,
                on: true
            }]
        );
        assert_eq!(
            decode("LED 4 GPIO 21 OFF"),
            vec![FieldUpdate::Led {
                index: 4,
                gpio_pin: 21,
                on: false
            }]
        );
    }

    #[test]
    fn led_rides_along_with_primary_field() {
        // LED não é exclusivo com a cadeia primária.
        let updates = decode("Temperatura: 20.0 | LED 1 GPIO 5 ENCENDIDO");
        assert_eq!(updates.len(), 2);
        assert_eq!(
            updates[0],
            FieldUpdate::Sensor {
                kind: SensorKind::Temperature,
                value: 20.0
            }
        );
        assert_eq!(
            updates[1],
            FieldUpdate::Led {
                index: 1,
                gpio_pin: 5,
                on: true
            }
        );
    }

    #[test]
    fn primary_chain_first_match_wins() {
        // "IP ESP32:" vem antes de "Temperatura:" na cadeia; a linha rende
        // só o campo de rede, nunca os dois primários.
        let updates = decode("IP ESP32: 192.168.1.50 Temperatura: 21.0");
        assert_eq!(updates.len(), 1);
        assert_eq!(
            updates[0],
            FieldUpdate::Network {
                kind: NetworkKind::EspIp,
                value: "192.168.1.50 Temperatura: 21.0".into()
            }
        );
    }

    #[test]
    fn wifi_requires_both_markers() {
        assert_eq!(
            decode("WiFi: CONECTADO a red paisanet"),
            vec![FieldUpdate::WifiConnected { connected: true }]
        );
        assert!(decode("WiFi: buscando redes...").is_empty());
    }

    #[test]
    fn uptime_seconds() {
        assert_eq!(
            decode("Tiempo funcionamiento: 3725 segundos"),
            vec![FieldUpdate::Uptime { seconds: 3725 }]
        );
    }

    #[test]
    fn uptime_without_number_is_dropped() {
        // Marcador presente mas sem captura: a cadeia primária é consumida
        // e nada é emitido.
        assert!(decode("Tiempo funcionamiento: indeterminado").is_empty());
    }

    #[test]
    fn malformed_numeric_capture_is_silent() {
        assert!(decode("Temperatura: --").is_empty());
    }

    #[test]
    fn unknown_line_yields_nothing() {
        assert!(decode("boot: esp32 rev3, flash 4MB").is_empty());
        assert!(decode("................").is_empty());
    }

    #[test]
    fn counters() {
        assert_eq!(
            decode("Mensajes enviados: 142"),
            vec![FieldUpdate::Counter {
                kind: CounterKind::MessagesSent,
                value: 142
            }]
        );
        assert_eq!(
            decode("Comandos recibidos: 37"),
            vec![FieldUpdate::Counter {
                kind: CounterKind::CommandsReceived,
                value: 37
            }]
        );
    }

    #[test]
    fn network_extras() {
        assert_eq!(
            decode("SSID: paisanet"),
            vec![FieldUpdate::Network {
                kind: NetworkKind::Ssid,
                value: "paisanet".into()
            }]
        );
        assert_eq!(
            decode("Gateway: 192.168.1.1"),
            vec![FieldUpdate::Network {
                kind: NetworkKind::Gateway,
                value: "192.168.1.1".into()
            }]
        );
        assert_eq!(
            decode("RSSI: -62 dBm"),
            vec![FieldUpdate::Network {
                kind: NetworkKind::Rssi,
                value: "-62 dBm".into()
            }]
        );
        assert_eq!(
            decode("Teléfono destino: 192.168.1.77"),
            vec![FieldUpdate::Network {
                kind: NetworkKind::PhoneIp,
                value: "192.168.1.77".into()
            }]
        );
    }

    #[test]
    fn ports_require_combined_line() {
        assert!(decode("Puerto local (escucha): 8080").is_empty());
        assert!(decode("Puerto remoto (envío): 4210").is_empty());

        let updates = decode("Puerto local (escucha): 4211 | Puerto remoto (envío): 4210");
        assert_eq!(
            updates,
            vec![
                FieldUpdate::Network {
                    kind: NetworkKind::LocalPort,
                    value: "4211".into()
                },
                FieldUpdate::Network {
                    kind: NetworkKind::RemotePort,
                    value: "4210".into()
                },
            ]
        );
    }
}
