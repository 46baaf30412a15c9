//! Line-based terminal front end for the interaction shell.
//!
//! [`TerminalUi`] implements [`UserInterface`] over any async line reader and
//! writer.  The binary uses stdin/stdout; tests feed it a scripted reader and
//! capture the output in a `Vec<u8>`.
//!
//! Input conventions:
//!
//! | Screen        | Input                                     |
//! |---------------|-------------------------------------------|
//! | main menu     | one key per line (`a`, `b`, `r`, `q`)     |
//! | list choice   | 1-based number; empty line cancels        |
//! | text prompt   | new value; empty line keeps the shown one |
//!
//! End of input cancels whatever is being asked and exits the main menu.

use async_trait::async_trait;
use tokio::io::{
    AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Stdin, Stdout,
};
use tracing::warn;

use crate::application::shell::{Action, UserInterface};

/// Terminal UI over an async reader/writer pair.
pub struct TerminalUi<R, W> {
    input: R,
    output: W,
}

impl TerminalUi<BufReader<Stdin>, Stdout> {
    /// UI on the process's stdin and stdout.
    pub fn stdio() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
    }
}

impl<R, W> TerminalUi<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Consumes the UI, returning the writer.
    pub fn into_output(self) -> W {
        self.output
    }

    async fn write(&mut self, text: &str) {
        let result: std::io::Result<()> = async {
            self.output.write_all(text.as_bytes()).await?;
            self.output.flush().await
        }
        .await;
        if let Err(e) = result {
            warn!("terminal write failed: {e}");
        }
    }

    /// Reads one line without its line ending.  `None` at end of input.
    async fn read_line(&mut self) -> Option<String> {
        let mut line = String::new();
        match self.input.read_line(&mut line).await {
            Ok(0) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
            Err(e) => {
                warn!("terminal read failed: {e}");
                None
            }
        }
    }
}

#[async_trait]
impl<R, W> UserInterface for TerminalUi<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn choose(&mut self, title: &str, items: &[String]) -> Option<usize> {
        let mut screen = format!("\n{title}\n");
        for (n, item) in items.iter().enumerate() {
            screen.push_str(&format!("  {:>3}. {item}\n", n + 1));
        }
        self.write(&screen).await;

        loop {
            self.write("Select number (empty to cancel): ").await;
            let line = self.read_line().await?;
            let line = line.trim();
            if line.is_empty() {
                return None;
            }
            match line.parse::<usize>() {
                Ok(n) if (1..=items.len()).contains(&n) => return Some(n - 1),
                _ => self.write(&format!("No entry {line:?}\n")).await,
            }
        }
    }

    async fn prompt_text(&mut self, label: &str, initial: &str) -> Option<String> {
        self.write(&format!("{label} [{initial}]: ")).await;
        let line = self.read_line().await?;
        if line.trim().is_empty() {
            Some(initial.to_string())
        } else {
            Some(line)
        }
    }

    async fn notice(&mut self, title: &str, text: &str) {
        self.write(&format!("\n[{title}] {text}\n")).await;
    }

    async fn waiting(&mut self, title: &str, text: &str) {
        self.write(&format!("[{title}] {text}\n")).await;
    }

    async fn next_action(&mut self) -> Action {
        let mut menu = String::from("\n");
        for action in Action::ALL {
            menu.push_str(&format!("  {}  {}\n", action.key(), action.label()));
        }
        self.write(&menu).await;

        loop {
            self.write("> ").await;
            let Some(line) = self.read_line().await else {
                return Action::Exit;
            };
            let key = line.trim().chars().next();
            if let Some(action) = key.and_then(Action::from_key) {
                return action;
            }
            if !line.trim().is_empty() {
                self.write(&format!("Unknown key {:?}\n", line.trim())).await;
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::io::Builder;

    fn ui(script: &[u8]) -> TerminalUi<BufReader<tokio_test::io::Mock>, Vec<u8>> {
        let mut builder = Builder::new();
        if !script.is_empty() {
            builder.read(script);
        }
        let mock = builder.build();
        TerminalUi::new(BufReader::new(mock), Vec::new())
    }

    fn items(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_choose_returns_zero_based_index() {
        // Arrange
        let mut ui = ui(b"2\n");

        // Act
        let choice = ui.choose("Patterns", &items(&["Fire", "Rainbow"])).await;

        // Assert
        assert_eq!(choice, Some(1));
        let out = String::from_utf8(ui.into_output()).unwrap();
        assert!(out.contains("    1. Fire\n"));
        assert!(out.contains("    2. Rainbow\n"));
    }

    #[tokio::test]
    async fn test_choose_reasks_on_bad_number() {
        let mut ui = ui(b"9\nx\n1\n");

        let choice = ui.choose("Patterns", &items(&["Fire"])).await;

        assert_eq!(choice, Some(0));
        let out = String::from_utf8(ui.into_output()).unwrap();
        assert!(out.contains("No entry \"9\""));
        assert!(out.contains("No entry \"x\""));
    }

    #[tokio::test]
    async fn test_choose_empty_line_cancels() {
        let mut ui = ui(b"\n");
        assert_eq!(ui.choose("Patterns", &items(&["Fire"])).await, None);
    }

    #[tokio::test]
    async fn test_prompt_keeps_initial_on_empty_line() {
        let mut ui = ui(b"\r\n");

        let value = ui.prompt_text("Brightness", "0.1").await;

        assert_eq!(value.as_deref(), Some("0.1"));
        let out = String::from_utf8(ui.into_output()).unwrap();
        assert_eq!(out, "Brightness [0.1]: ");
    }

    #[tokio::test]
    async fn test_prompt_returns_typed_text() {
        let mut ui = ui(b"0.8\n");
        assert_eq!(ui.prompt_text("Brightness", "0.1").await.as_deref(), Some("0.8"));
    }

    #[tokio::test]
    async fn test_end_of_input_cancels_prompt_and_exits_menu() {
        let mut ui = ui(b"");

        assert_eq!(ui.prompt_text("Host", "192.168.4.1").await, None);
        assert_eq!(ui.next_action().await, Action::Exit);
    }

    #[tokio::test]
    async fn test_next_action_skips_unknown_keys() {
        let mut ui = ui(b"z\n\nB\n");

        let action = ui.next_action().await;

        assert_eq!(action, Action::Brightness);
        let out = String::from_utf8(ui.into_output()).unwrap();
        assert!(out.contains("  a  Patterns\n"));
        assert!(out.contains("Unknown key \"z\""));
    }

    #[tokio::test]
    async fn test_notice_and_waiting_are_printed() {
        let mut ui = ui(b"");

        ui.waiting("Patterns", "Loading patterns...").await;
        ui.notice("Patterns", "Fire activated").await;

        let out = String::from_utf8(ui.into_output()).unwrap();
        assert_eq!(out, "[Patterns] Loading patterns...\n\n[Patterns] Fire activated\n");
    }
}
