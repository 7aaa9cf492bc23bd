//! Dealing, round conclusion and elimination.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::cards::make_deck;
use crate::core::config::{ChinchonConfig, HAND_SIZE};
use crate::core::player::PlayerId;
use crate::core::state::{GameState, Phase, Stage};
use crate::piles::Pile;
use crate::scoring::deadwood;

/// What happens after a round ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundOutcome {
    /// A new round was dealt and `first_player` is to draw.
    NextRound { round: u32, first_player: PlayerId },
    /// Only `winner` is left.
    MatchWon { winner: PlayerId },
}

/// Scores and eliminations of a finished round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundSummary {
    /// The round that ended.
    pub round: u32,
    /// Who closed it. `None` when the round was abandoned.
    pub melder: Option<PlayerId>,
    /// Points charged to each player still in the match, in turn order.
    pub deadwood: Vec<(PlayerId, u32)>,
    /// Players who went over the threshold this round.
    pub eliminated: Vec<PlayerId>,
    pub outcome: RoundOutcome,
}

/// Shuffle a fresh deck and deal the next round.
pub(crate) fn deal_round(state: &mut GameState, config: &ChinchonConfig) {
    let mut deck = Pile::from_cards(make_deck(config.jokers));
    deck.shuffle(&mut state.rng);

    for &player in &state.play_order {
        let seat = &mut state.players[player];
        seat.hand.clear();
        seat.melded = None;
    }
    state.dealt = state.play_order.clone();
    for _ in 0..HAND_SIZE {
        for &player in &state.play_order {
            if let Some(card) = deck.pop_top() {
                state.players[player].hand.push(card);
            }
        }
    }

    state.discard_pile = Pile::new();
    if let Some(card) = deck.pop_top() {
        state.discard_pile.push(card);
    }
    state.draw_pile = deck;

    state.round += 1;
    state.phase = Phase::Play;
    state.melder = None;
    state.active_players.clear();
    if let Some(&first) = state.play_order.first() {
        state.current_player = first;
        state.set_stage(first, Stage::Draw);
    }

    info!(
        round = state.round,
        players = state.play_order.len(),
        draw_pile = state.draw_pile.len(),
        "Dealt new round"
    );
}

/// Charge deadwood, eliminate and either deal again or end the match.
pub(crate) fn conclude_round(state: &mut GameState, config: &ChinchonConfig) -> RoundSummary {
    let round = state.round;
    let melder = state.melder;

    let mut charged = Vec::with_capacity(state.play_order.len());
    for &player in &state.play_order {
        let points = if Some(player) == melder {
            0
        } else {
            deadwood(&state.players[player].hand, &config.scoring)
        };
        state.players[player].points += points;
        charged.push((player, points));
    }

    let threshold = config.elimination_threshold;
    let eliminated: Vec<_> = state
        .play_order
        .iter()
        .copied()
        .filter(|&p| state.players[p].points > threshold)
        .collect();
    for &player in &eliminated {
        info!(round, player = %player, points = state.players[player].points, "Player eliminated");
    }
    state.play_order.retain(|p| !eliminated.contains(p));

    info!(round, melder = ?melder, eliminated = eliminated.len(), "Round concluded");

    let outcome = match state.play_order.len() {
        1 => {
            let winner = state.play_order[0];
            finish(state, winner)
        }
        // The melder scores nothing, so an empty table needs a round with
        // no closer.
        0 => {
            let winner = lowest_points(state);
            finish(state, winner)
        }
        _ => {
            deal_round(state, config);
            RoundOutcome::NextRound {
                round: state.round,
                first_player: state.current_player,
            }
        }
    };

    RoundSummary {
        round,
        melder,
        deadwood: charged,
        eliminated,
        outcome,
    }
}

/// Throw the round away without scoring and deal again.
pub(crate) fn abandon_round(state: &mut GameState, config: &ChinchonConfig) -> RoundSummary {
    let round = state.round;
    info!(round, "Round abandoned without scoring");
    deal_round(state, config);
    RoundSummary {
        round,
        melder: None,
        deadwood: Vec::new(),
        eliminated: Vec::new(),
        outcome: RoundOutcome::NextRound {
            round: state.round,
            first_player: state.current_player,
        },
    }
}

fn finish(state: &mut GameState, winner: PlayerId) -> RoundOutcome {
    state.phase = Phase::GameOver;
    state.winner = Some(winner);
    state.current_player = winner;
    state.active_players.clear();
    info!(round = state.round, winner = %winner, "Match over");
    RoundOutcome::MatchWon { winner }
}

fn lowest_points(state: &GameState) -> PlayerId {
    state
        .players
        .iter()
        .min_by_key(|(_, seat)| seat.points)
        .map_or(state.current_player, |(player, _)| player)
}
