//! Console serial em memória, com timestamps.
//!
//! Cada linha recebe o prefixo `[HH:MM:SS.mmm]` no momento do push. O
//! buffer é limitado (a linha mais antiga sai primeiro) para manter a
//! memória estável em sessões longas.

use chrono::Local;
use std::collections::VecDeque;
use std::path::Path;

/// Máximo de linhas retidas no console.
pub const MAX_LINES: usize = 5000;

/// Buffer de linhas do console, já formatadas para exibição.
#[derive(Debug, Default)]
pub struct ConsoleLog {
    entries: VecDeque<String>,
}

impl ConsoleLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acrescenta uma linha com timestamp local `HH:MM:SS.mmm`.
    pub fn push(&mut self, text: &str) {
        if self.entries.len() >= MAX_LINES {
            self.entries.pop_front();
        }
        let stamp = Local::now().format("%H:%M:%S%.3f");
        self.entries.push_back(format!("[{stamp}] {text}"));
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Grava o buffer inteiro no caminho dado: uma única escrita,
    /// sobrescrevendo o arquivo se já existir.
    pub fn save_to(&self, path: &Path) -> std::io::Result<()> {
        let mut contents = String::new();
        for line in &self.entries {
            contents.push_str(line);
            contents.push('\n');
        }
        std::fs::write(path, contents)
    }
}

// ──────────────────────────────────────────────
// Testes
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_prefixes_timestamp() {
        let mut console = ConsoleLog::new();
        console.push("WiFi: CONECTADO");
        let line = console.lines().next().unwrap();
        // "[HH:MM:SS.mmm] texto"
        let re = regex::Regex::new(r"^\[\d{2}:\d{2}:\d{2}\.\d{3}\] WiFi: CONECTADO$").unwrap();
        assert!(re.is_match(line), "linha inesperada: {line}");
    }

    #[test]
    fn buffer_is_bounded() {
        let mut console = ConsoleLog::new();
        for i in 0..(MAX_LINES + 10) {
            console.push(&format!("linha {i}"));
        }
        assert_eq!(console.len(), MAX_LINES);
        // As 10 primeiras linhas foram descartadas.
        assert!(console.lines().next().unwrap().ends_with("linha 10"));
    }

    #[test]
    fn clear_empties_buffer() {
        let mut console = ConsoleLog::new();
        console.push("a");
        console.push("b");
        console.clear();
        assert!(console.is_empty());
    }

    #[test]
    fn save_writes_whole_buffer() {
        let mut console = ConsoleLog::new();
        console.push("primeira");
        console.push("segunda");

        let path = std::env::temp_dir().join("monitor_core_console_test.txt");
        console.save_to(&path).unwrap();

        let saved = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = saved.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("primeira"));
        assert!(lines[1].ends_with("segunda"));

        let _ = std::fs::remove_file(&path);
    }
}
