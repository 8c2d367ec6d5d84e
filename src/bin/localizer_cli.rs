use anyhow::{bail, Context, Result};
use clap::Parser;
use grid_localizer::{BeliefSnapshot, Cell, Direction, FilterSession, Mode, SessionConfig};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::{error, info};

/// Terminal front end for the grid localizer
#[derive(Parser, Debug)]
#[command(name = "localizer_cli", version, about)]
struct Cli {
    /// JSON file holding a session config
    #[arg(long)]
    config: Option<PathBuf>,

    /// Grid width (overrides the config file)
    #[arg(long)]
    width: Option<usize>,

    /// Grid height (overrides the config file)
    #[arg(long)]
    height: Option<usize>,

    /// Number of distinct cell identities
    #[arg(long)]
    identities: Option<usize>,

    /// Seed for a reproducible session
    #[arg(long)]
    seed: Option<u64>,

    /// Start in game mode with the agent hidden
    #[arg(long)]
    game: bool,

    /// Print snapshots as JSON
    #[arg(long)]
    json: bool,
}

enum Command {
    Move(Direction),
    Sense,
    Guess(Cell),
    SensorError(f64),
    MoveError(f64),
    Switch(Mode),
    Reset,
    Show,
    Help,
    Quit,
}

const HELP: &str = "commands: up|down|left|right (w/s/a/d), sense (or empty line), \
guess X Y, sensor-error V, move-error V, game, learn, reset, show, help, quit";

fn parse_command(line: &str) -> Result<Command> {
    let mut words = line.split_whitespace();
    let command = match words.next().unwrap_or("sense") {
        "up" | "w" => Command::Move(Direction::Up),
        "down" | "s" => Command::Move(Direction::Down),
        "left" | "a" => Command::Move(Direction::Left),
        "right" | "d" => Command::Move(Direction::Right),
        "sense" | "space" => Command::Sense,
        "guess" | "g" => {
            let x = words.next().context("guess needs X and Y")?.parse()?;
            let y = words.next().context("guess needs X and Y")?.parse()?;
            Command::Guess(Cell::new(x, y))
        }
        "sensor-error" => {
            Command::SensorError(words.next().context("sensor-error needs a value")?.parse()?)
        }
        "move-error" => {
            Command::MoveError(words.next().context("move-error needs a value")?.parse()?)
        }
        "game" => Command::Switch(Mode::Game),
        "learn" => Command::Switch(Mode::Inspection),
        "reset" => Command::Reset,
        "show" => Command::Show,
        "help" | "?" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,
        other => bail!("unknown command `{}`", other),
    };
    Ok(command)
}

fn load_config(cli: &Cli) -> Result<SessionConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("failed to parse config {}", path.display()))?
        }
        None => SessionConfig::default(),
    };

    if let Some(width) = cli.width {
        config.width = width;
    }
    if let Some(height) = cli.height {
        config.height = height;
    }
    if let Some(identities) = cli.identities {
        config.identity_count = identities;
    }
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    config.validate()?;
    Ok(config)
}

fn render(out: &mut impl Write, snapshot: &BeliefSnapshot, json: bool) -> Result<()> {
    if json {
        writeln!(out, "{}", serde_json::to_string(snapshot)?)?;
    } else {
        write!(out, "{}", snapshot)?;
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let config = load_config(&cli)?;
    let mode = if cli.game { Mode::Game } else { Mode::Inspection };
    let mut session = FilterSession::new(config, mode)?;
    info!(?config, %mode, "starting localizer");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "{}", HELP)?;
    render(&mut out, &session.snapshot()?, cli.json)?;

    for line in io::stdin().lock().lines() {
        let line = line?;
        let command = match parse_command(line.trim()) {
            Ok(command) => command,
            Err(e) => {
                writeln!(out, "{:#}", e)?;
                continue;
            }
        };

        let outcome = match command {
            Command::Move(direction) => session.move_agent(direction).map(Some),
            Command::Sense => session.sense().map(|(_, snapshot)| Some(snapshot)),
            Command::Guess(cell) => match session.guess(cell) {
                Ok(true) => {
                    writeln!(out, "Correct! You win!")?;
                    Ok(None)
                }
                Ok(false) => {
                    writeln!(out, "Incorrect! Try again!")?;
                    Ok(None)
                }
                Err(e) => Err(e),
            },
            Command::SensorError(value) => session.set_sensor_error_rate(value).map(|_| None),
            Command::MoveError(value) => session.set_motion_failure_rate(value).map(|_| None),
            Command::Switch(mode) => session.reset(mode).map(Some),
            Command::Reset => session.restart().map(Some),
            Command::Show => session.snapshot().map(Some),
            Command::Help => {
                writeln!(out, "{}", HELP)?;
                Ok(None)
            }
            Command::Quit => break,
        };

        match outcome {
            Ok(Some(snapshot)) => render(&mut out, &snapshot, cli.json)?,
            Ok(None) => {}
            Err(e) => {
                error!(%e, "operation failed");
                writeln!(out, "error: {}", e)?;
            }
        }
    }

    Ok(())
}
