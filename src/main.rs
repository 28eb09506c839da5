use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use reversi_engine::config::{ControlModes, GameConfig, PlayerIds, SelectionPolicy};
use reversi_engine::session::GameSession;
use reversi_engine::types::{ControlMode, GameSnapshot, Player, Position};
use reversi_engine::view::ViewEvent;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "reversi")]
#[command(about = "Play Reversi in the terminal", long_about = None)]
#[command(version)]
struct Cli {
    /// TOML game configuration; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Board edge length
    #[arg(long)]
    size: Option<usize>,

    /// Delay before an automated move, in milliseconds
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Pick automated moves at random from this seed instead of first-legal
    #[arg(long)]
    seed: Option<u64>,

    /// Read player 1's moves ("x y") from stdin
    #[arg(long)]
    human: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let human = config.control.player1 == ControlMode::Human;

    let (session, mut events) = GameSession::start(&config)?;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    info!(size = config.board_size, human, "session started");

    loop {
        tokio::select! {
            event = events.recv() => {
                let Some(event) = event else { break };
                match event {
                    ViewEvent::LegalMoves { player, moves } => {
                        println!("{}", render(&session.snapshot().await?, &config.player_ids));
                        if human && player == Player::Player1 {
                            println!("your move {}: ", format_moves(&moves));
                        }
                    }
                    ViewEvent::TurnPassed { player } => println!("{player} passes"),
                    ViewEvent::GameOver { result } => {
                        println!("{}", render(&session.snapshot().await?, &config.player_ids));
                        match result.winner {
                            Some(winner) => println!(
                                "{winner} wins {}-{}",
                                result.player1_count, result.player2_count
                            ),
                            None => println!("draw {}-{}", result.player1_count, result.player2_count),
                        }
                        break;
                    }
                    _ => {}
                }
            }
            line = lines.next_line(), if human => {
                let Some(line) = line? else { break };
                match line.trim() {
                    "quit" | "q" => break,
                    "reset" => session.reset().await?,
                    input => match parse_target(input) {
                        Some(target) => {
                            if let Err(err) = session.submit_target(target).await {
                                warn!(%err, "move refused");
                            }
                        }
                        None => println!("enter a move as \"x y\", \"reset\" or \"quit\""),
                    },
                }
            }
        }
    }

    let controller = session.shutdown().await?;
    info!(moves = controller.history().len(), "session closed");
    Ok(())
}

fn load_config(cli: &Cli) -> Result<GameConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let source = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            GameConfig::from_toml_str(&source)?
        }
        None => GameConfig::default(),
    };

    if let Some(size) = cli.size {
        config.board_size = size;
        config.opening = None;
    }
    if let Some(delay_ms) = cli.delay_ms {
        config.autoplay_delay_ms = delay_ms;
    }
    if let Some(seed) = cli.seed {
        config.selection = SelectionPolicy::Random { seed };
    }
    if cli.config.is_none() {
        config.control = ControlModes {
            player1: if cli.human {
                ControlMode::Human
            } else {
                ControlMode::Automated
            },
            player2: ControlMode::Automated,
        };
    } else if cli.human {
        config.control.player1 = ControlMode::Human;
    }

    config.validate()?;
    Ok(config)
}

fn parse_target(input: &str) -> Option<Position> {
    let mut parts = input.split_whitespace();
    let x = parts.next()?.parse().ok()?;
    let y = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some(Position::new(x, y))
}

fn format_moves(moves: &[Position]) -> String {
    moves
        .iter()
        .map(|mv| format!("{} {}", mv.x, mv.y))
        .collect::<Vec<_>>()
        .join(" | ")
}

fn render(snapshot: &GameSnapshot, ids: &PlayerIds) -> String {
    let mut out = String::new();
    out.push_str("  ");
    for x in 0..snapshot.size {
        out.push_str(&format!("{}", x % 10));
    }
    out.push('\n');
    for (y, row) in snapshot.board.chunks(snapshot.size).enumerate() {
        out.push_str(&format!("{} ", y % 10));
        for &cell in row {
            out.push(match cell {
                id if id == ids.player1 => 'X',
                id if id == ids.player2 => 'O',
                _ => '.',
            });
        }
        out.push('\n');
    }
    out.push_str(&format!(
        "player 1: {}  player 2: {}",
        snapshot.player1_count, snapshot.player2_count
    ));
    out
}
