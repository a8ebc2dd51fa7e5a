//! Line-oriented prompts on stdin.

use std::io::Write as _;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

pub struct Input {
    lines: Lines<BufReader<Stdin>>,
}

impl Input {
    pub fn stdin() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }

    /// Print `label` and read one line. `None` at end of input.
    pub async fn prompt(&mut self, label: &str) -> Result<Option<String>> {
        print!("{label}");
        std::io::stdout().flush().context("failed to flush stdout")?;
        let line = self
            .lines
            .next_line()
            .await
            .context("failed to read from stdin")?;
        Ok(line.map(|l| l.trim_end_matches('\r').to_owned()))
    }

    /// Ask a yes/no question; anything but `y`/`yes` (or end of input) is no.
    pub async fn confirm(&mut self, question: &str) -> Result<bool> {
        let answer = self.prompt(&format!("{question} [y/N] ")).await?;
        Ok(answer.is_some_and(|a| matches!(a.trim().to_ascii_lowercase().as_str(), "y" | "yes")))
    }
}
