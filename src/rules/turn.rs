//! Per-round move transitions.
//!
//! Each function validates one move against the state and applies it.
//! A rejected move returns before the first mutation, so callers can rely
//! on the state being untouched after any error except
//! `EmptyDeckUnrecoverable`, which the round controller handles.

use tracing::warn;

use crate::cards::Card;
use crate::core::action::DrawSource;
use crate::core::error::{DiscardRejection, DrawRejection, MoveError};
use crate::core::player::PlayerId;
use crate::core::state::{GameState, Phase, Stage};
use crate::meld::{find_meld, Meld, MeldError, MeldRules, MELD_HAND_SIZE};
use crate::piles::Pile;

/// A card taken by a draw.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Drawn {
    pub card: Card,
    /// The discard pile was shuffled into a new draw pile first.
    pub reshuffled: bool,
}

/// Reject play moves from anyone but the current player during `Play`.
fn require_current(state: &GameState, player: PlayerId) -> Result<(), MoveError> {
    if state.phase != Phase::Play || state.current_player != player {
        return Err(MoveError::NotCurrentPlayer(player));
    }
    Ok(())
}

pub(crate) fn draw(
    state: &mut GameState,
    player: PlayerId,
    from: DrawSource,
) -> Result<Drawn, MoveError> {
    require_current(state, player)?;
    if state.stage(player) != Some(Stage::Draw) {
        return Err(MoveError::IllegalDraw(DrawRejection::AlreadyDrawn));
    }

    let mut reshuffled = false;
    let card = match from {
        DrawSource::DiscardPile => state
            .discard_pile
            .pop_top()
            .ok_or(MoveError::IllegalDraw(DrawRejection::EmptyDiscardPile))?,
        DrawSource::DrawPile => {
            if state.draw_pile.is_empty() {
                let rest = state.discard_pile.take_all_but_top();
                if rest.is_empty() {
                    warn!(round = state.round, player = %player, "Draw pile and discard pile exhausted");
                    return Err(MoveError::EmptyDeckUnrecoverable);
                }
                warn!(
                    round = state.round,
                    cards = rest.len(),
                    "Draw pile empty, reshuffling discard pile"
                );
                let mut pile = Pile::from_cards(rest);
                pile.shuffle(&mut state.rng);
                state.draw_pile = pile;
                reshuffled = true;
            }
            state
                .draw_pile
                .pop_top()
                .ok_or(MoveError::EmptyDeckUnrecoverable)?
        }
    };

    state.players[player].hand.push(card);
    state.set_stage(player, Stage::Discard);
    Ok(Drawn { card, reshuffled })
}

/// Discard `card` and pass the turn. Returns the next player.
pub(crate) fn discard(
    state: &mut GameState,
    player: PlayerId,
    card: Card,
) -> Result<PlayerId, MoveError> {
    require_current(state, player)?;
    if state.stage(player) != Some(Stage::Discard) {
        return Err(MoveError::IllegalDiscard(DiscardRejection::MustDrawFirst));
    }
    let pos = state.players[player]
        .hand
        .iter()
        .position(|&c| c == card)
        .ok_or(MoveError::IllegalDiscard(DiscardRejection::NotInHand(card)))?;

    state.players[player].hand.remove(pos);
    state.discard_pile.push(card);
    state.active_players.remove(&player);

    let next = state.next_in_order(player);
    state.current_player = next;
    state.set_stage(next, Stage::Draw);
    Ok(next)
}

/// Close the round by discarding `card`. Every other seat still playing is
/// asked to review.
pub(crate) fn meld(
    state: &mut GameState,
    player: PlayerId,
    card: Card,
    rules: &MeldRules,
) -> Result<Meld, MoveError> {
    require_current(state, player)?;
    let hand = &state.players[player].hand;
    if state.stage(player) != Some(Stage::Discard) {
        return Err(MeldError::InvalidHandSize {
            expected: MELD_HAND_SIZE,
            actual: hand.len(),
        }
        .into());
    }
    let meld = find_meld(hand, card, rules)?;

    let seat = &mut state.players[player];
    seat.hand.clear();
    seat.melded = Some(meld.clone());
    state.discard_pile.push(card);

    state.phase = Phase::Review;
    state.melder = Some(player);
    state.active_players.clear();
    let reviewers: Vec<_> = state.play_order.iter().copied().filter(|&p| p != player).collect();
    for reviewer in reviewers {
        state.set_stage(reviewer, Stage::ReviewRound);
    }
    Ok(meld)
}

/// Acknowledge the review. Returns how many players are still reviewing.
pub(crate) fn end_review(state: &mut GameState, player: PlayerId) -> Result<usize, MoveError> {
    if state.stage(player) != Some(Stage::ReviewRound) {
        return Err(MoveError::NotReviewing(player));
    }
    state.active_players.remove(&player);
    Ok(state.active_players.len())
}
