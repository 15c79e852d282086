//! ChessVoice - play chess by voice
//!
//! Reads one transcript per line from stdin (as delivered by a speech
//! backend) and prints what the assistant would say back.

use anyhow::{Context, Result};
use chessvoice::audit::AuditLog;
use chessvoice::config::{parse_side, Config};
use chessvoice::game::GameSession;
use chessvoice::{Position, VoiceResolver};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Start from this FEN instead of the configured position
    #[arg(long)]
    fen: Option<String>,

    /// Side the player moves: white, black or both
    #[arg(long)]
    color: Option<String>,

    /// Do not write resolution traces to the audit log
    #[arg(long)]
    no_audit: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = Config::load()?;

    // Setup logging
    let level = if args.verbose {
        "debug".to_string()
    } else {
        config.log_level.to_lowercase()
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("♟️ ChessVoice v{} starting...", env!("CARGO_PKG_VERSION"));

    let resolver = VoiceResolver::from_config(&config).context("rules engine setup failed")?;

    let fen = args.fen.as_ref().or(config.start_fen.as_ref());
    let position = match fen {
        Some(fen) => Position::from_fen(fen)?,
        None => Position::starting(),
    };
    let player_color = match &args.color {
        Some(color) => parse_side(color)?,
        None => config.player_side()?,
    };

    let mut game = GameSession::new(position, player_color);
    if config.audit_enabled && !args.no_audit {
        let audit = AuditLog::open_default();
        debug!("Audit log: {}", audit.path().display());
        game = game.with_audit(audit);
    }

    let mut rng = StdRng::from_entropy();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    info!("✅ ChessVoice ready - say a move");
    info!("   Try: 'e two e four', 'knight f three', 'undo', 'recap', 'test checks'");
    info!("   Opponent moves: '!e7e5'");

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.eq_ignore_ascii_case("quit") || line.eq_ignore_ascii_case("exit") {
            break;
        }

        // Moves made on the other side of the board bypass the voice path
        if let Some(opponent) = line.strip_prefix('!') {
            match game.apply_uci(resolver.rules(), opponent) {
                Ok(played) => println!("Opponent played {}.", played.phrase),
                Err(e) => warn!("❌ {}", e),
            }
            continue;
        }

        info!("📝 Heard: '{}'", line);
        let reply = game.handle_utterance(&resolver, line, &mut rng);
        println!("{}", reply.text());
    }

    info!("👋 Goodbye");
    Ok(())
}
