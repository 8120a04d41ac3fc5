use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use treasury_cli::commands;
use treasury_cli::prompt::Prompter;
use treasury_common::config::AppConfig;
use treasury_engine::batch::load_companies;
use treasury_render::RendererRegistry;

#[derive(Parser)]
#[command(name = "treasury", version, about = "BTC treasury company coverage model")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Disable bold highlighting in tables
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Enter one company's figures interactively
    Analyze {
        /// Also write a stat card PNG to this path
        #[arg(long)]
        card: Option<PathBuf>,
    },
    /// Analyze every company in a CSV sheet
    Batch {
        /// Company sheet (default: TREASURY_COMPANY_DATA or company_data.csv)
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Write `{ticker}_stat_card.png` files into this directory
        #[arg(long)]
        cards_dir: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so tables on stdout stay clean
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "treasury_cli=info,treasury_engine=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = AppConfig::from_env()?;

    let ansi = !cli.no_color && std::io::stdout().is_terminal();
    let registry = RendererRegistry::new(&config, ansi);
    let today = chrono::Local::now().date_naive();

    match cli.command {
        Command::Analyze { card } => {
            let stdin = std::io::stdin();
            let mut prompter = Prompter::new(stdin.lock(), std::io::stdout());
            commands::analyze(
                &mut prompter,
                &registry,
                today,
                card.as_deref(),
                &mut std::io::stdout(),
            )?;
        }
        Command::Batch { csv, cards_dir } => {
            let path = csv.unwrap_or(config.company_data_path.clone());
            let sheet = load_companies(&path)?;
            let summary = commands::batch(
                sheet,
                &registry,
                today,
                cards_dir.as_deref(),
                &mut std::io::stdout().lock(),
            )?;

            if summary.failed > 0 {
                anyhow::bail!(
                    "{} of {} companies could not be analyzed",
                    summary.failed,
                    summary.failed + summary.analyzed
                );
            }
        }
    }

    Ok(())
}
