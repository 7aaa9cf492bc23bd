//! Chinchón simulator - plays seeded matches through the public move API.
//!
//! Every seat closes whenever the validator allows it and otherwise
//! discards one of its most expensive cards, so matches exercise the whole
//! draw/discard/meld/review cycle.

use std::time::Instant;

use chinchon_engine::{
    Chinchon, ChinchonConfig, GameRng, GameState, Move, MoveError, MoveOutcome, PlayerId,
    RulesEngine,
};
use clap::Parser;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "chinchon-sim")]
#[command(about = "Play seeded Chinchón matches between simple bots")]
struct Args {
    /// Number of matches to play
    #[arg(short, long, default_value = "1")]
    games: u32,

    /// Base seed; match N uses seed + N
    #[arg(long, default_value = "0")]
    seed: u64,

    /// Seats at the table
    #[arg(short, long, default_value = "2")]
    players: usize,

    /// Jokers in the deck
    #[arg(long, default_value = "2")]
    jokers: u8,

    /// Points above which a player is eliminated
    #[arg(long, default_value = "100")]
    threshold: u32,

    /// Give up on a match after this many moves
    #[arg(long, default_value = "20000")]
    max_moves: u32,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// How a simulated match ended.
struct MatchReport {
    winner: Option<PlayerId>,
    rounds: u32,
    moves: u32,
    rejected: u32,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let filter = if args.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = ChinchonConfig::default()
        .with_player_count(args.players)
        .with_jokers(args.jokers)
        .with_elimination_threshold(args.threshold);
    let engine = Chinchon::new(config)?;

    let start = Instant::now();
    let mut wins = vec![0u32; args.players];
    let mut unfinished = 0;

    for game_num in 0..args.games {
        let seed = args.seed.wrapping_add(u64::from(game_num));
        let report = play_match(&engine, seed, args.max_moves);

        match report.winner {
            Some(winner) => wins[winner.index()] += 1,
            None => {
                unfinished += 1;
                warn!(game = game_num, seed, moves = report.moves, "Match hit the move limit");
            }
        }
        if report.rejected > 0 {
            warn!(game = game_num, seed, rejected = report.rejected, "Bots submitted rejected moves");
        }
        info!(
            game = game_num,
            seed,
            rounds = report.rounds,
            moves = report.moves,
            winner = ?report.winner,
            "Match finished"
        );
    }

    let elapsed = start.elapsed();
    println!("Played {} matches in {:.2?}", args.games, elapsed);
    for (seat, count) in wins.iter().enumerate() {
        println!("  Player {seat}: {count} wins");
    }
    if unfinished > 0 {
        println!("  Unfinished: {unfinished}");
    }
    Ok(())
}

fn play_match(engine: &Chinchon, seed: u64, max_moves: u32) -> MatchReport {
    let mut state = engine.new_match(seed);
    // Separate stream so bot choices never disturb the deck shuffles.
    let mut bot_rng = GameRng::new(seed ^ 0x5eed_b075);
    let mut moves = 0;
    let mut rejected = 0;

    while engine.result(&state).is_none() && moves < max_moves {
        let actors: Vec<PlayerId> = state.active_players().into_iter().map(|(p, _)| p).collect();
        for player in actors {
            let Some(mv) = choose_move(engine, &state, player, &mut bot_rng) else {
                continue;
            };
            moves += 1;
            match engine.apply(&mut state, player, mv) {
                Ok(MoveOutcome::RoundEnded(summary)) => {
                    info!(round = summary.round, melder = ?summary.melder, "Round ended");
                }
                Ok(_) => {}
                Err(MoveError::EmptyDeckUnrecoverable) => {
                    warn!(round = state.round(), "Round abandoned, deck exhausted");
                }
                Err(err) => {
                    rejected += 1;
                    warn!(player = %player, error = %err, "Move rejected");
                }
            }
        }
    }

    MatchReport {
        winner: state.winner(),
        rounds: state.round(),
        moves,
        rejected,
    }
}

/// Close if possible, otherwise shed one of the most expensive cards.
fn choose_move(engine: &Chinchon, state: &GameState, player: PlayerId, rng: &mut GameRng) -> Option<Move> {
    let legal = engine.legal_moves(state, player);
    if let Some(close) = legal.iter().find(|m| matches!(m, Move::Meld { .. })) {
        return Some(*close);
    }

    let scoring = &engine.config().scoring;
    let costliest = legal
        .iter()
        .filter_map(|m| match m {
            Move::Discard { card } => Some(scoring.card_value(*card)),
            _ => None,
        })
        .max();
    let candidates: Vec<Move> = match costliest {
        Some(value) => legal
            .into_iter()
            .filter(|m| matches!(m, Move::Discard { card } if scoring.card_value(*card) == value))
            .collect(),
        None => legal,
    };
    rng.choose(&candidates).copied()
}
