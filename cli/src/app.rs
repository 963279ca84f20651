use anyhow::{Context, Result};
use askllm_core::{Bridge, EMPTY_QUERY_MESSAGE};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, BufRead, Write};
use std::time::Duration;
use tracing::debug;

use crate::output::{write_answer, write_failure};

fn spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner()
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
        .template("{spinner} {msg}")
    {
        spinner.set_style(style);
    }
    spinner.set_message("Waiting for the model...");
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner
}

/// Sends one query and writes either the answer or the failure message
async fn ask<W: Write>(bridge: &Bridge, query: &str, out: &mut W) -> Result<()> {
    let spinner = spinner();
    let result = bridge.try_answer(query).await;
    spinner.finish_and_clear();

    let written = match result {
        Ok(answer) => write_answer(out, &answer),
        Err(e) => write_failure(out, &e.user_message()),
    };
    written.context("Failed to write answer")
}

/// Runs a single query mode, sending one prompt and displaying the response
pub async fn run_single_query(prompt: &str, bridge: &Bridge) -> Result<()> {
    let mut stdout = io::stdout();
    if prompt.trim().is_empty() {
        return write_failure(&mut stdout, EMPTY_QUERY_MESSAGE).context("Failed to write answer");
    }
    ask(bridge, prompt, &mut stdout).await
}

/// Runs an interactive chat session on stdin/stdout
pub async fn run_interactive_chat(bridge: &Bridge) -> Result<()> {
    let stdin = io::stdin();
    run_chat_loop(bridge, stdin.lock(), io::stdout()).await
}

/// Reads questions line by line until EOF, `exit` or `quit`
pub async fn run_chat_loop<R: BufRead, W: Write>(
    bridge: &Bridge,
    mut input: R,
    mut out: W,
) -> Result<()> {
    writeln!(out, "Starting interactive session with {}.", bridge.model_name())?;
    writeln!(out, "Type 'exit' or 'quit' to end the session.")?;
    writeln!(out)?;

    loop {
        // Prompt for user input
        write!(out, "{}: ", "You".green().bold())?;
        out.flush().context("Failed to flush stdout")?;

        let mut line = String::new();
        if input.read_line(&mut line).context("Failed to read input")? == 0 {
            writeln!(out)?;
            break;
        }

        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        // Check for exit command
        if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
            writeln!(out, "Exiting session.")?;
            break;
        }

        debug!(query_len = line.len(), "Sending query");
        ask(bridge, line, &mut out).await?;
        writeln!(out)?; // Add spacing between interactions
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use askllm_core::{BridgeError, BridgeResult, TextGenerator};
    use async_trait::async_trait;
    use std::io::Cursor;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Default)]
    struct CountingGenerator {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl TextGenerator for CountingGenerator {
        async fn generate(&self, prompt: &str) -> BridgeResult<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if prompt == "slow" {
                return Err(BridgeError::Timeout(Duration::from_secs(30)));
            }
            Ok(format!("answer to {}", prompt))
        }

        fn model_name(&self) -> &str {
            "counting"
        }
    }

    async fn run(input: &str) -> (String, usize) {
        let generator = Arc::new(CountingGenerator::default());
        let bridge = Bridge::new(generator.clone());
        let mut out = Vec::new();
        run_chat_loop(&bridge, Cursor::new(input.to_string()), &mut out)
            .await
            .unwrap();
        (
            String::from_utf8(out).unwrap(),
            generator.calls.load(Ordering::SeqCst),
        )
    }

    #[tokio::test]
    async fn test_loop_answers_each_line_until_exit() {
        let (out, calls) = run("first\n\nsecond\nexit\nnever\n").await;
        assert!(out.contains("answer to first"));
        assert!(out.contains("answer to second"));
        assert!(!out.contains("answer to never"));
        assert!(out.contains("Exiting session."));
        assert_eq!(calls, 2);
    }

    #[tokio::test]
    async fn test_loop_stops_at_eof() {
        let (out, calls) = run("only").await;
        assert!(out.contains("answer to only"));
        assert_eq!(calls, 1);
    }

    #[tokio::test]
    async fn test_loop_survives_failures() {
        let (out, calls) = run("slow\nQUIT\n").await;
        assert!(out.contains("30 seconds"));
        assert_eq!(calls, 1);
    }
}
