//! Line input.

use std::io::Write;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};

/// Reads commands and form answers line by line.
pub struct Prompter<R> {
    lines: Lines<R>,
}

impl<R: AsyncBufRead + Unpin> Prompter<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
        }
    }

    /// Next line, or `None` at end of input.
    pub async fn line(&mut self, prompt: &str) -> std::io::Result<Option<String>> {
        print!("{prompt}");
        std::io::stdout().flush()?;
        self.lines.next_line().await
    }

    /// Ask for one field. An empty answer takes the default, if any.
    pub async fn ask(&mut self, label: &str, default: Option<&str>) -> std::io::Result<Option<String>> {
        let prompt = match default {
            Some(default) if !default.is_empty() => format!("{label} [{default}]: "),
            _ => format!("{label}: "),
        };

        Ok(self.line(&prompt).await?.map(|answer| {
            let answer = answer.trim();
            match default {
                Some(default) if answer.is_empty() => default.to_string(),
                _ => answer.to_string(),
            }
        }))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_ask_uses_default_on_empty_answer() {
        let input: &[u8] = b"\n  typed  \n";
        let mut prompter = Prompter::new(input);

        assert_eq!(
            prompter.ask("Email", Some("ana@example.com")).await.unwrap(),
            Some("ana@example.com".to_string())
        );
        assert_eq!(
            prompter.ask("Title", Some("Lamp")).await.unwrap(),
            Some("typed".to_string())
        );
        assert_eq!(prompter.ask("More", None).await.unwrap(), None);
    }
}
