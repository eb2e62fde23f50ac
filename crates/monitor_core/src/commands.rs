//! Vocabulário de comandos enviados ao firmware.
//!
//! Palavras fixas, transmitidas verbatim e terminadas em newline. O
//! firmware não responde com ACK; o resultado do envio é só o sucesso da
//! escrita serial.

use crate::types::LedId;

/// Comando de saída para o ESP32.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Pisca o LED indicado (`test1`..`test4`).
    Test(LedId),
    /// Acende todos os LEDs.
    AllOn,
    /// Apaga todos os LEDs.
    AllOff,
    /// Pede o dump de status completo.
    Status,
}

impl Command {
    /// Palavra exata do protocolo, sem terminador.
    pub fn as_str(self) -> &'static str {
        match self {
            Command::Test(led) => match led.index() {
                1 => "test1",
                2 => "test2",
                3 => "test3",
                _ => "test4",
            },
            Command::AllOn => "allon",
            Command::AllOff => "alloff",
            Command::Status => "status",
        }
    }

    /// Linha completa para escrita na serial (palavra + `\n`).
    pub fn wire_line(self) -> String {
        format!("{}\n", self.as_str())
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commands_map_to_led_index() {
        let words: Vec<&str> = LedId::all()
            .map(|led| Command::Test(led).as_str())
            .collect();
        assert_eq!(words, vec!["test1", "test2", "test3", "test4"]);
    }

    #[test]
    fn fixed_vocabulary() {
        assert_eq!(Command::AllOn.as_str(), "allon");
        assert_eq!(Command::AllOff.as_str(), "alloff");
        assert_eq!(Command::Status.as_str(), "status");
    }

    #[test]
    fn wire_line_is_newline_terminated() {
        assert_eq!(Command::Status.wire_line(), "status\n");
        assert_eq!(
            Command::Test(LedId::new(2).unwrap()).wire_line(),
            "test2\n"
        );
    }
}
