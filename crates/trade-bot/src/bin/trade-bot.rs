//! Trade Bot CLI
//!
//! An interactive command-line conversation with the trading bot.
//!
//! # Usage
//!
//! ```bash
//! # Start with the demo portfolio
//! cargo run --bin trade-bot -p trade-bot -- --seed-demo
//!
//! # Spanish number formats, nothing written to disk
//! cargo run --bin trade-bot -p trade-bot -- --locale es --in-memory
//! ```

use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use trade_bot::bot::{Command, TradeBot};
use trade_bot::config::BotConfig;
use trade_bot::interface::{CliFormatter, Formatter};
use trade_bot::recognizer::Locale;
use trade_bot::store::{InMemoryStore, JsonFileStore, PortfolioRecord, PortfolioStore};

/// Talk to a simulated stock trading bot
#[derive(Debug, Parser)]
#[command(name = "trade-bot", version, about)]
struct Args {
    /// Conversation key; also names the portfolio file
    #[arg(short, long, default_value = "default")]
    conversation: String,

    /// Directory of the portfolio files
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Locale used to read numbers and dates (en, es, fr, de)
    #[arg(short, long)]
    locale: Option<String>,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "warn,trade_bot=info")]
    log_level: String,

    /// Keep the portfolio in memory only
    #[arg(long)]
    in_memory: bool,

    /// Start the conversation with the demo holdings
    #[arg(long)]
    seed_demo: bool,
}

fn print_banner() {
    println!(
        r"
╔══════════════════════════════════════════════════════════════╗
║                         Trade Bot                            ║
║                                                              ║
║  Say anything to open the menu, then pick Trade and try:     ║
║    Buy 25 MSFT for $120                                      ║
║    sell 10 Netflix at $301 on 2024-03-01                     ║
║                                                              ║
║  Commands:                                                   ║
║    /portfolio   - Show holdings                              ║
║    /history     - Orders confirmed in this session           ║
║    /cancel      - Abandon the current dialog                 ║
║    /help        - Help                                       ║
║    /exit        - Exit                                       ║
╚══════════════════════════════════════════════════════════════╝
"
    );
}

async fn build_store(
    args: &Args,
    config: &BotConfig,
) -> anyhow::Result<Arc<dyn PortfolioStore>> {
    if args.in_memory {
        let store = InMemoryStore::new();
        if args.seed_demo {
            store
                .insert(args.conversation.clone(), PortfolioRecord::demo())
                .await;
        }
        return Ok(Arc::new(store));
    }

    let store = JsonFileStore::new(&config.data_dir);
    if args.seed_demo {
        store.seed_demo(&args.conversation).await?;
        println!(
            "Demo portfolio written to {}",
            store.path_for(&args.conversation).display()
        );
    }
    Ok(Arc::new(store))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize tracing
    trade_utils::init_tracing_with(&args.log_level);

    let mut builder = BotConfig::builder();
    if let Some(dir) = &args.data_dir {
        builder = builder.data_dir(dir);
    }
    if let Some(code) = &args.locale {
        builder = builder.locale(Locale::from_code(code));
    }
    let config = builder.from_env()?.build()?;

    print_banner();

    println!("Configuration:");
    println!("  Conversation: {}", args.conversation);
    println!("  Locale: {}", config.locale.name());
    if args.in_memory {
        println!("  Storage: in memory");
    } else {
        println!("  Storage: {}", config.data_dir.display());
    }
    println!();

    let store = build_store(&args, &config).await?;
    let bot = TradeBot::new(config, store)?;
    let formatter = CliFormatter;

    println!("{}\n", bot.welcome());

    // Run REPL
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        // Print prompt
        print!("{}", bot.prompt());
        stdout.flush()?;

        // Read input
        let mut input = String::new();
        match stdin.lock().read_line(&mut input) {
            Ok(0) => {
                // EOF
                println!("\nGoodbye!");
                break;
            }
            Ok(_) => {}
            Err(e) => {
                eprintln!("Error reading input: {e}");
                continue;
            }
        }

        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        let command = match Command::parse(input) {
            Ok(command) => command,
            Err(e) => {
                eprintln!("{}\n", formatter.format_error(&e.to_string()));
                continue;
            }
        };
        let exit = command == Command::Exit;

        match bot.execute_command(&args.conversation, command).await {
            Ok(response) => println!("{}\n", formatter.render(&response)),
            Err(e) => eprintln!("{}\n", formatter.format_error(&e.to_string())),
        }

        if exit {
            break;
        }
    }

    Ok(())
}
