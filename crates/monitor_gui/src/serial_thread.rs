//! Worker de leitura serial.
//!
//! Um worker por conexão ativa: lê os bytes disponíveis na porta, monta
//! linhas completas terminadas em `\n` e as entrega, na ordem do fio, à
//! thread de UI via channel limitado. A UI nunca toca a porta de leitura;
//! o worker nunca toca o estado da UI.

use crossbeam_channel::{Receiver, Sender, TrySendError, bounded};
use monitor_core::Command;
use monitor_core::config::SerialConfig;
use serialport::SerialPort;
use std::io::{Read, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Capacidade do channel worker → UI. Cheio = linha nova descartada.
const CHANNEL_BOUND: usize = 256;

/// Evento entregue pelo worker à thread de UI.
#[derive(Debug, Clone)]
pub enum SerialEvent {
    /// Uma linha completa de telemetria, aparada, nunca vazia.
    Line(String),
    /// Erro de transporte; o worker já parou sozinho.
    Disconnected(String),
}

/// Erros da conexão serial.
#[derive(Debug, thiserror::Error)]
pub enum LinkError {
    #[error("Falha ao abrir {port}: {source}")]
    Open {
        port: String,
        source: serialport::Error,
    },

    #[error("Falha ao clonar handle da porta: {0}")]
    Clone(serialport::Error),

    #[error("Falha ao criar thread de leitura: {0}")]
    Spawn(std::io::Error),
}

// ──────────────────────────────────────────────
// Conexão
// ──────────────────────────────────────────────

/// Conexão serial ativa: metade de escrita + worker de leitura.
///
/// `disconnect` é síncrono (espera o worker terminar) e idempotente;
/// também roda no `Drop`, então largar o link fecha a conexão.
pub struct SerialLink {
    port_name: String,
    writer: Box<dyn SerialPort>,
    worker: WorkerHandle,
    rx: Receiver<SerialEvent>,
}

impl SerialLink {
    /// Abre a porta e inicia o worker de leitura.
    pub fn connect(cfg: &SerialConfig) -> Result<Self, LinkError> {
        let port_name = cfg.port.clone();
        let reader = serialport::new(&port_name, cfg.baud_rate)
            .timeout(Duration::from_millis(cfg.read_timeout_ms))
            .open()
            .map_err(|source| LinkError::Open {
                port: port_name.clone(),
                source,
            })?;
        let writer = reader.try_clone().map_err(LinkError::Clone)?;

        let running = Arc::new(AtomicBool::new(true));
        let (tx, rx) = bounded::<SerialEvent>(CHANNEL_BOUND);

        let thread = std::thread::Builder::new()
            .name("serial-reader".into())
            .spawn({
                let running = Arc::clone(&running);
                let poll = Duration::from_millis(cfg.poll_interval_ms.max(1));
                move || reader_loop(reader, &tx, &running, poll)
            })
            .map_err(LinkError::Spawn)?;

        info!("Conectado a {port_name} @ {} baud", cfg.baud_rate);

        Ok(Self {
            port_name,
            writer,
            worker: WorkerHandle {
                running,
                thread: Some(thread),
            },
            rx,
        })
    }

    pub fn port_name(&self) -> &str {
        &self.port_name
    }

    /// Channel de eventos do worker, drenado pela UI a cada frame.
    pub fn events(&self) -> &Receiver<SerialEvent> {
        &self.rx
    }

    /// Escreve um comando terminado em newline. Sem retry: o resultado é
    /// devolvido ao chamador e fica por isso mesmo.
    pub fn send_command(&mut self, command: Command) -> bool {
        let result = self
            .writer
            .write_all(command.wire_line().as_bytes())
            .and_then(|_| self.writer.flush());
        match result {
            Ok(()) => {
                debug!("→ {command}");
                true
            }
            Err(e) => {
                warn!("Falha ao enviar {command}: {e}");
                false
            }
        }
    }

    /// Para o worker e libera a porta. Chamar de novo é no-op.
    pub fn disconnect(&mut self) {
        self.worker.stop();
    }
}

impl Drop for SerialLink {
    fn drop(&mut self) {
        self.disconnect();
    }
}

// ──────────────────────────────────────────────
// Worker
// ──────────────────────────────────────────────

/// Flag de parada + join do worker. O worker é o único leitor da flag e
/// o controlador o único escritor, então um load/store por iteração basta.
struct WorkerHandle {
    running: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl WorkerHandle {
    fn stop(&mut self) {
        self.running.store(false, Ordering::Relaxed);
        if let Some(handle) = self.thread.take() {
            let _ = handle.join();
        }
    }
}

fn reader_loop(
    mut port: Box<dyn SerialPort>,
    tx: &Sender<SerialEvent>,
    running: &AtomicBool,
    poll: Duration,
) {
    let mut assembler = LineAssembler::new();
    let mut buf = [0u8; 1024];

    while running.load(Ordering::Relaxed) {
        match port.read(&mut buf) {
            Ok(0) => std::thread::sleep(poll),
            Ok(n) => {
                for line in assembler.push(&buf[..n]) {
                    // Non-blocking: se a UI está lenta, descarta a linha nova
                    if let Err(TrySendError::Full(_)) = tx.try_send(SerialEvent::Line(line)) {
                        debug!("Channel cheio, descartando linha");
                    }
                }
            }
            Err(ref e)
                if e.kind() == std::io::ErrorKind::TimedOut
                    || e.kind() == std::io::ErrorKind::WouldBlock =>
            {
                // Timeout normal de leitura, segue o loop
                std::thread::sleep(poll);
            }
            Err(e) => {
                error!("Erro de leitura serial: {e}");
                send_disconnected(tx, running, e.to_string());
                break;
            }
        }
    }
}

/// Entrega o evento de desconexão mesmo com o channel cheio, sem nunca
/// bloquear indefinidamente (a flag de parada encerra a tentativa).
fn send_disconnected(tx: &Sender<SerialEvent>, running: &AtomicBool, message: String) {
    let mut event = SerialEvent::Disconnected(message);
    while running.load(Ordering::Relaxed) {
        match tx.try_send(event) {
            Ok(()) => break,
            Err(TrySendError::Full(back)) => {
                event = back;
                std::thread::sleep(Duration::from_millis(1));
            }
            Err(TrySendError::Disconnected(_)) => break,
        }
    }
}

// ──────────────────────────────────────────────
// Montagem de linhas
// ──────────────────────────────────────────────

/// Monta linhas completas a partir de chunks arbitrários de bytes.
///
/// Bytes não-UTF8 viram U+FFFD (decodificação lossy); linhas vazias após
/// aparar são descartadas; o resto fica no buffer até o próximo `\n`.
struct LineAssembler {
    buf: Vec<u8>,
}

impl LineAssembler {
    fn new() -> Self {
        Self { buf: Vec::new() }
    }

    fn push(&mut self, bytes: &[u8]) -> Vec<String> {
        self.buf.extend_from_slice(bytes);

        let mut lines = Vec::new();
        while let Some(pos) = self.buf.iter().position(|&b| b == b'\n') {
            let raw: Vec<u8> = self.buf.drain(..=pos).collect();
            let text = String::from_utf8_lossy(&raw);
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                lines.push(trimmed.to_string());
            }
        }
        lines
    }
}

// ──────────────────────────────────────────────
// Enumeração de portas
// ──────────────────────────────────────────────

/// Uma porta disponível, com nome de exibição amigável.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortEntry {
    pub port_name: String,
    pub display: String,
}

/// Lista as portas seriais do sistema, ordenadas pelo nome de exibição.
pub fn scan_ports() -> Vec<PortEntry> {
    let mut out = Vec::new();

    if let Ok(ports) = serialport::available_ports() {
        for p in ports {
            let display = match p.port_type {
                serialport::SerialPortType::UsbPort(info) => {
                    let mut parts = Vec::new();
                    if let Some(m) = info.manufacturer {
                        parts.push(m);
                    }
                    if let Some(prod) = info.product {
                        parts.push(prod);
                    }
                    if parts.is_empty() {
                        format!("{}: USB Serial", p.port_name)
                    } else {
                        format!("{}: {}", p.port_name, parts.join(" "))
                    }
                }
                serialport::SerialPortType::BluetoothPort => {
                    format!("{}: Bluetooth", p.port_name)
                }
                serialport::SerialPortType::PciPort => format!("{}: PCI", p.port_name),
                serialport::SerialPortType::Unknown => p.port_name.clone(),
            };

            out.push(PortEntry {
                port_name: p.port_name,
                display,
            });
        }
    }

    out.sort_by(|a, b| a.display.cmp(&b.display));
    out
}

// ──────────────────────────────────────────────
// Testes
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assembler_joins_partial_chunks() {
        let mut asm = LineAssembler::new();
        assert!(asm.push(b"Temperatura: 2").is_empty());
        let lines = asm.push(b"3.5\nHumedad: ");
        assert_eq!(lines, vec!["Temperatura: 23.5".to_string()]);
        let lines = asm.push(b"48\n");
        assert_eq!(lines, vec!["Humedad: 48".to_string()]);
    }

    #[test]
    fn assembler_strips_carriage_return_and_blank_lines() {
        let mut asm = LineAssembler::new();
        let lines = asm.push(b"WiFi: CONECTADO\r\n\r\n\n  \nLED 1 GPIO 5 ON\r\n");
        assert_eq!(
            lines,
            vec!["WiFi: CONECTADO".to_string(), "LED 1 GPIO 5 ON".to_string()]
        );
    }

    #[test]
    fn assembler_tolerates_invalid_utf8() {
        let mut asm = LineAssembler::new();
        let lines = asm.push(b"Temp\xFFeratura: 1.0\n");
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("eratura: 1.0"));
    }

    #[test]
    fn worker_stop_is_idempotent() {
        let running = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&running);
        let thread = std::thread::spawn(move || {
            while flag.load(Ordering::Relaxed) {
                std::thread::sleep(Duration::from_millis(1));
            }
        });

        let mut worker = WorkerHandle {
            running,
            thread: Some(thread),
        };
        worker.stop();
        // Segunda chamada não tem worker para esperar: no-op
        worker.stop();
        assert!(worker.thread.is_none());
    }
}
