//! stockdash: price chart and chatbot for a stock ticker
//!
//! # Usage
//!
//! ```bash
//! export ALPHA_VANTAGE_API_KEY="..."
//! export GROQ_API_KEY="..."        # optional, enables recommendations
//!
//! stockdash chart AAPL
//! stockdash chat --ticker AAPL "any news today?"
//! stockdash repl --ticker AAPL
//! ```

mod commands;
mod render;

use clap::{Parser, Subcommand};
use commands::Command;
use dash_llm::LLMProvider;
use dash_llm::providers::ChatCompletionProvider;
use dash_stock::{Dashboard, StockConfig};
use dash_utils::{AppConfig, require_env};
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "stockdash")]
#[command(version, about = "Stock price forecasts and chat from the terminal", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Chart history and forecast for a ticker
    Chart {
        ticker: String,

        /// Print the figure as JSON
        #[arg(long)]
        json: bool,

        /// Historical closes to show in the table
        #[arg(long, default_value_t = 10)]
        rows: usize,
    },

    /// Send one chat message
    Chat {
        /// Selected ticker
        #[arg(short, long)]
        ticker: Option<String>,

        #[arg(required = true, num_args = 1..)]
        message: Vec<String>,
    },

    /// Interactive chat session
    Repl {
        /// Ticker selected at start
        #[arg(short, long)]
        ticker: Option<String>,

        /// Historical closes to show for /chart
        #[arg(long, default_value_t = 10)]
        rows: usize,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env_file = dash_utils::load_env_file();
    dash_utils::init_tracing_with_default("warn,dash_stock=info");

    let app = AppConfig::from_env();
    info!(environment = %app.environment, "Starting {}", app.app_name);
    if let Some(path) = env_file {
        info!("Loaded environment from {}", path.display());
    }

    let cli = Cli::parse();
    let dashboard = build_dashboard()?;

    match cli.command {
        Commands::Chart { ticker, json, rows } => {
            let figure = dashboard.update_price_trend(Some(&ticker)).await;
            if json {
                println!("{}", serde_json::to_string_pretty(&figure)?);
            } else {
                println!("{}", render::figure_text(&figure, rows));
            }
        }
        Commands::Chat { ticker, message } => {
            let message = message.join(" ");
            let reply = dashboard
                .update_chatbot(Some(1), Some(&message), ticker.as_deref())
                .await;
            println!("{reply}");
        }
        Commands::Repl { ticker, rows } => run_repl(&dashboard, ticker, rows).await?,
    }

    Ok(())
}

/// Configuration comes from the environment once, here
fn build_dashboard() -> anyhow::Result<Dashboard> {
    let config = StockConfig::builder()
        .alpha_vantage_api_key(require_env("ALPHA_VANTAGE_API_KEY")?)
        .with_env_llm_model()
        .build()?;

    let llm: Option<Arc<dyn LLMProvider>> = match ChatCompletionProvider::from_env() {
        Ok(provider) => Some(Arc::new(provider)),
        Err(e) => {
            warn!("Recommendations disabled: {}", e);
            None
        }
    };

    Ok(Dashboard::with_alpha_vantage(&config, llm)?)
}

async fn run_repl(dashboard: &Dashboard, mut ticker: Option<String>, rows: usize) -> anyhow::Result<()> {
    println!("stockdash - type /help for commands");

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut clicks: u64 = 0;

    loop {
        print!("{}> ", ticker.as_deref().unwrap_or("stockdash"));
        stdout.flush()?;

        let mut input = String::new();
        match stdin.lock().read_line(&mut input) {
            Ok(0) => {
                // EOF
                println!();
                break;
            }
            Ok(_) => {}
            Err(e) => {
                eprintln!("Error reading input: {e}");
                continue;
            }
        }

        let command = match Command::parse(&input) {
            Ok(command) => command,
            Err(e) => {
                eprintln!("{e}");
                continue;
            }
        };

        match command {
            Command::Ticker { symbol } => {
                ticker = symbol;
                match &ticker {
                    Some(symbol) => println!("Ticker set to {}", symbol.to_uppercase()),
                    None => println!("Ticker cleared"),
                }
            }
            Command::Chart => {
                let figure = dashboard.update_price_trend(ticker.as_deref()).await;
                println!("{}\n", render::figure_text(&figure, rows));
            }
            Command::Help => println!("{}", Command::help_text()),
            Command::Exit => break,
            Command::Message { text } => {
                clicks += 1;
                let reply = dashboard
                    .update_chatbot(Some(clicks), Some(&text), ticker.as_deref())
                    .await;
                println!("{reply}\n");
            }
        }
    }

    Ok(())
}
