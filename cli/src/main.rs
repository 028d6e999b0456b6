use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use snapboard_core::codec::{decode, encode};
use snapboard_core::{PuzzleConfig, PuzzleSession, SessionSnapshot};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod bot;

use bot::BotArgs;

#[derive(Parser)]
#[command(name = "snapboard", version, about = "Headless driver for the snapboard puzzle engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scramble a new puzzle and let the bot assemble it.
    Solve {
        #[arg(long, env = "SNAPBOARD_CONFIG")]
        config: Option<PathBuf>,
        #[arg(long)]
        seed: Option<String>,
        #[arg(long)]
        grid_size: Option<u32>,
        #[arg(long)]
        piece_size: Option<f32>,
        #[command(flatten)]
        bot: BotArgs,
        #[arg(long)]
        save: Option<PathBuf>,
    },
    /// Continue a saved session.
    Resume {
        path: PathBuf,
        #[command(flatten)]
        bot: BotArgs,
        #[arg(long)]
        save: Option<PathBuf>,
    },
    /// Print what a saved session contains.
    Inspect { path: PathBuf },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Solve {
            config,
            seed,
            grid_size,
            piece_size,
            bot,
            save,
        } => {
            let mut config = match config {
                Some(path) => PuzzleConfig::load(&path)?,
                None => PuzzleConfig::default(),
            };
            if let Some(raw) = seed.as_deref() {
                config.tray.seed = parse_seed_arg(raw)?;
            }
            if let Some(grid_size) = grid_size {
                config.grid_size = grid_size;
            }
            if let Some(piece_size) = piece_size {
                config.piece_size = piece_size;
            }
            let mut session = PuzzleSession::new(&config)?;
            info!(
                grid_size = config.grid_size,
                piece_size = config.piece_size,
                seed = %format!("{:#x}", config.tray.seed),
                "new puzzle"
            );
            run_bot(&mut session, &bot, save.as_deref())
        }
        Commands::Resume { path, bot, save } => {
            let snapshot = read_snapshot(&path)?;
            let mut session = PuzzleSession::restore(&snapshot)?;
            let save = save.unwrap_or(path);
            run_bot(&mut session, &bot, Some(&save))
        }
        Commands::Inspect { path } => {
            let snapshot = read_snapshot(&path)?;
            print_snapshot(&snapshot);
            Ok(())
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

fn run_bot(
    session: &mut PuzzleSession,
    args: &BotArgs,
    save: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let report = bot::play(session, args);
    let total = session.board().total_pieces();
    println!(
        "moves: {}  merges: {}  locks: {}  locked: {}/{}  elapsed: {:.1}s",
        report.moves,
        report.merges,
        report.locks,
        session.locked_piece_count(),
        total,
        session.elapsed().as_secs_f32()
    );
    if report.completed {
        println!("puzzle complete");
    } else {
        println!("{} groups left on the table", session.live_groups().count());
    }
    if let Some(path) = save {
        let bytes = encode(&session.snapshot())?;
        fs::write(path, bytes)?;
        info!(path = %path.display(), "saved session");
    }
    Ok(())
}

fn read_snapshot(path: &Path) -> Result<SessionSnapshot, Box<dyn std::error::Error>> {
    let bytes = fs::read(path)?;
    Ok(decode::<SessionSnapshot>(&bytes)?)
}

fn print_snapshot(snapshot: &SessionSnapshot) {
    let total = (snapshot.grid_size as usize).pow(2);
    println!("version: {}", snapshot.version);
    println!(
        "grid: {}x{} ({} pieces, size {})",
        snapshot.grid_size, snapshot.grid_size, total, snapshot.piece_size
    );
    println!(
        "rules: snap {} / lock {}",
        snapshot.rules.snap_threshold, snapshot.rules.board_lock_threshold
    );
    println!("elapsed: {:.1}s", snapshot.elapsed_ms as f64 / 1000.0);
    println!("locked: {}/{}", snapshot.locked_piece_count(), total);
    for (index, cells) in snapshot.locked.iter().enumerate() {
        println!("  locked #{index}: {} pieces", cells.len());
    }
    for (index, group) in snapshot.loose.iter().enumerate() {
        println!(
            "  loose #{index}: {} pieces at ({:.1}, {:.1})",
            group.pieces.len(),
            group.position.0,
            group.position.1
        );
    }
}

fn parse_seed_arg(raw: &str) -> Result<u32, Box<dyn std::error::Error>> {
    let trimmed = raw.trim();
    let value = if let Some(hex) = trimmed.strip_prefix("0x").or_else(|| trimmed.strip_prefix("0X"))
    {
        u32::from_str_radix(hex, 16)?
    } else {
        trimmed.parse::<u32>()?
    };
    Ok(value)
}
