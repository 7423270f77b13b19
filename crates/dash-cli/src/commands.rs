//! REPL command parsing

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("Unknown command: /{0}")]
    Unknown(String),

    #[error("Empty command")]
    Empty,
}

/// One line of REPL input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Select a ticker, or clear it when none is given
    Ticker { symbol: Option<String> },
    /// Chart the selected ticker
    Chart,
    /// Show help
    Help,
    /// Leave the REPL
    Exit,
    /// Anything else goes to the chatbot, blank lines included
    Message { text: String },
}

impl Command {
    pub fn parse(input: &str) -> Result<Self, CommandError> {
        let input = input.trim();

        let Some(rest) = input.strip_prefix('/') else {
            return Ok(Command::Message {
                text: input.to_string(),
            });
        };

        let mut parts = rest.split_whitespace();
        let cmd = parts.next().ok_or(CommandError::Empty)?.to_lowercase();

        match cmd.as_str() {
            "ticker" | "t" => Ok(Command::Ticker {
                symbol: parts.next().map(str::to_string),
            }),
            "chart" | "c" => Ok(Command::Chart),
            "help" | "h" | "?" => Ok(Command::Help),
            "exit" | "quit" | "q" => Ok(Command::Exit),
            _ => Err(CommandError::Unknown(cmd)),
        }
    }

    pub fn help_text() -> &'static str {
        r"
Commands:
  /ticker <symbol>   select the ticker for charts and chat (/t)
  /ticker            clear the selected ticker
  /chart             chart history and forecast for the ticker (/c)
  /help              show this help (/h, /?)
  /exit              leave (/quit, /q)

Anything else is sent to the chatbot. Mention price or forecast,
recommendation, or news to get data about the selected ticker.
"
    }
}
