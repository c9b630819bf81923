mod cmd;
mod output;
mod render;

use clap::{Parser, Subcommand};
use cmd::config::ConfigSubcommand;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "wyd",
    about = "WYD: turn your goals into an adventure: chat, get a mission plan, level up",
    version,
    propagate_version = true
)]
struct Cli {
    /// Config file (default: ~/.wyd/config.yaml when present)
    #[arg(long, global = true, env = "WYD_CONFIG")]
    config: Option<PathBuf>,

    /// API key for the generative-language service
    #[arg(long, global = true, env = "GEMINI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive session (default)
    Play,

    /// Generate a mission plan from a JSON transcript of chat messages
    Plan {
        /// File holding `[{"sender": "user"|"ai", "text": "..."}, ...]`
        #[arg(long)]
        transcript: PathBuf,
    },

    /// Apply mission completions to a plan offline and show the result
    Simulate {
        /// Plan JSON file (default: the built-in rescue plan)
        #[arg(long)]
        plan: Option<PathBuf>,

        /// Player name
        #[arg(long, default_value = "Aventurero")]
        name: String,

        /// Mission level to mark done, in order (repeatable); focus missions need --focus
        #[arg(long = "complete", value_name = "LEVEL")]
        complete: Vec<u32>,

        /// Mission level to reopen after the completions (repeatable)
        #[arg(long = "undo", value_name = "LEVEL")]
        undo: Vec<u32>,

        /// Number of focus sessions to run to expiry afterwards
        #[arg(long, default_value = "0")]
        focus: u32,
    },

    /// Print the JSON schema requested for generated plans
    Schema,

    /// Inspect configuration
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let api_key = cli
        .api_key
        .clone()
        .or_else(|| std::env::var("API_KEY").ok())
        .filter(|k| !k.trim().is_empty());
    let ctx = cmd::Context {
        config_path: cli.config.clone(),
        api_key,
        json: cli.json,
    };

    let result = match cli.command.unwrap_or(Commands::Play) {
        Commands::Play => cmd::play::run(&ctx),
        Commands::Plan { transcript } => cmd::plan::run(&ctx, &transcript),
        Commands::Simulate {
            plan,
            name,
            complete,
            undo,
            focus,
        } => cmd::simulate::run(
            &ctx,
            cmd::simulate::Steps {
                plan: plan.as_deref(),
                name: &name,
                complete: &complete,
                undo: &undo,
                focus,
            },
        ),
        Commands::Schema => cmd::schema::run(),
        Commands::Config { subcommand } => cmd::config::run(&ctx, subcommand),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
