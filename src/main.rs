use std::io::Read;
use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use holdem_agent::agent::{Agent, AgentConfig, DecisionRequest};
use holdem_agent::cards::Card;
use holdem_agent::evaluator::{KickerMode, evaluate};
use holdem_agent::game::{ActionKind, Decision};
use holdem_agent::policy::StrengthScale;
use holdem_agent::web;
use owo_colors::OwoColorize;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "holdem-agent",
    version,
    about = "Hold'em decision agent: hand evaluation and action policy",
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// RNG seed (random if omitted)
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// JSON file with agent configuration
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// How kicker bits are packed into hand strength
    #[arg(long = "kicker-mode", global = true)]
    kicker_mode: Option<KickerModeArg>,

    /// Scale used when comparing strength against pot odds
    #[arg(long = "strength-scale", global = true)]
    strength_scale: Option<StrengthScaleArg>,

    /// Disable ANSI colors in CLI output
    #[arg(long = "no-color", global = true, default_value_t = false)]
    no_color: bool,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Answer one decision request (JSON) from a file or stdin
    Decide {
        /// Request file; stdin when omitted
        #[arg(long)]
        input: Option<PathBuf>,

        /// Print the decision as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Classify 2 to 7 cards, e.g. `evaluate Ah Kh Qh Jh Th`
    Evaluate {
        #[arg(required = true, num_args = 2..=7)]
        cards: Vec<String>,
    },
    /// Run the decision web service
    Serve {
        /// Address to bind (HOST:PORT)
        #[arg(long, default_value = "0.0.0.0:8080")]
        addr: String,
    },
}

#[derive(Debug, Clone, ValueEnum)]
enum KickerModeArg {
    Reference,
    Full,
}

impl From<KickerModeArg> for KickerMode {
    fn from(arg: KickerModeArg) -> Self {
        match arg {
            KickerModeArg::Reference => KickerMode::Reference,
            KickerModeArg::Full => KickerMode::Full,
        }
    }
}

#[derive(Debug, Clone, ValueEnum)]
enum StrengthScaleArg {
    Packed,
    Normalized,
}

impl From<StrengthScaleArg> for StrengthScale {
    fn from(arg: StrengthScaleArg) -> Self {
        match arg {
            StrengthScaleArg::Packed => StrengthScale::Packed,
            StrengthScaleArg::Normalized => StrengthScale::Normalized,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = color_eyre::install();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    match cli.command {
        Commands::Decide { input, json } => run_decide(config, input, json, cli.no_color),
        Commands::Evaluate { cards } => run_evaluate(config.kicker_mode, &cards, cli.no_color),
        Commands::Serve { addr } => run_server(addr, config).await,
    }
}

fn load_config(cli: &Cli) -> Result<AgentConfig> {
    let mut config = match &cli.config {
        Some(path) => AgentConfig::from_json_file(path)
            .with_context(|| format!("reading config {}", path.display()))?,
        None => AgentConfig::default(),
    };
    if let Some(mode) = cli.kicker_mode.clone() {
        config.kicker_mode = mode.into();
    }
    if let Some(scale) = cli.strength_scale.clone() {
        config.strength_scale = scale.into();
    }
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    Ok(config)
}

#[derive(Debug, serde::Deserialize)]
struct CliRequest {
    player_id: String,
    #[serde(flatten)]
    request: DecisionRequest,
}

fn run_decide(config: AgentConfig, input: Option<PathBuf>, json: bool, no_color: bool) -> Result<()> {
    let raw = match &input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading request {}", path.display()))?,
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };
    let parsed: CliRequest = serde_json::from_str(&raw).context("parsing decision request")?;

    let mut agent = Agent::new(parsed.player_id, config);
    let decision = agent.respond(&parsed.request)?;

    if json {
        println!("{}", serde_json::to_string(&decision)?);
    } else {
        print_decision(&decision, no_color);
    }
    Ok(())
}

fn print_decision(decision: &Decision, no_color: bool) {
    let label = match decision.action {
        ActionKind::Fold => "Fold".to_string(),
        ActionKind::Call => format!("Call {}", decision.amount),
        ActionKind::Raise => format!("Raise to {}", decision.amount),
    };
    if no_color {
        println!("Decision: {label}");
    } else {
        println!("{} {}", "Decision".bold().magenta(), label.bold().green());
    }
}

fn run_evaluate(mode: KickerMode, codes: &[String], no_color: bool) -> Result<()> {
    let cards = codes
        .iter()
        .map(|code| code.parse::<Card>())
        .collect::<Result<Vec<_>, _>>()?;
    let evaluation = evaluate(&cards, mode)?;
    let hand = cards.iter().map(Card::notation).collect::<Vec<_>>().join(" ");

    if no_color {
        println!(
            "Hand {} | {} | strength {}",
            hand,
            evaluation.category,
            evaluation.strength.value()
        );
    } else {
        println!(
            "{} {} {} {} {}",
            "Hand".bold().cyan(),
            hand.bold().yellow(),
            evaluation.category.to_string().bold().green(),
            "Strength".bold().white(),
            evaluation.strength.value()
        );
    }
    Ok(())
}

async fn run_server(addr: String, config: AgentConfig) -> Result<()> {
    let addr: SocketAddr = addr.parse()?;
    web::serve(addr, config).await
}
