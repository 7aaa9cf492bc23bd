//! Per-viewer snapshots.
//!
//! A `GameView` is what one participant may see. Opponents' hands are
//! reduced to their length until the match is over, or the viewer has
//! been eliminated and is only watching.

use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::core::player::PlayerId;
use crate::core::state::{GameState, Phase, Stage};
use crate::meld::Meld;

/// A hand as seen by someone.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum HandView {
    Visible(Vec<Card>),
    Hidden { len: usize },
}

impl HandView {
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            HandView::Visible(cards) => cards.len(),
            HandView::Hidden { len } => *len,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerView {
    pub player: PlayerId,
    pub points: u32,
    pub eliminated: bool,
    pub stage: Option<Stage>,
    pub hand: HandView,
    /// A close on the table is public.
    pub melded: Option<Meld>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameView {
    pub viewer: Option<PlayerId>,
    pub round: u32,
    pub phase: Phase,
    pub current_player: PlayerId,
    pub play_order: Vec<PlayerId>,
    pub draw_pile_len: usize,
    pub discard_pile_len: usize,
    pub discard_top: Option<Card>,
    /// Every seat, eliminated ones included, by id.
    pub players: Vec<PlayerView>,
    pub melder: Option<PlayerId>,
    pub winner: Option<PlayerId>,
}

impl GameView {
    /// The view of one seat.
    #[must_use]
    pub fn player(&self, player: PlayerId) -> Option<&PlayerView> {
        self.players.iter().find(|p| p.player == player)
    }
}

/// Build the snapshot `viewer` is entitled to.
pub(crate) fn view(state: &GameState, viewer: Option<PlayerId>) -> GameView {
    let reveal_all = state.phase == Phase::GameOver || viewer.is_some_and(|v| state.is_eliminated(v));

    let players = state
        .players
        .iter()
        .map(|(player, seat)| {
            let hand = if reveal_all || viewer == Some(player) {
                HandView::Visible(seat.hand.clone())
            } else {
                HandView::Hidden { len: seat.hand.len() }
            };
            PlayerView {
                player,
                points: seat.points,
                eliminated: state.is_eliminated(player),
                stage: state.stage(player),
                hand,
                melded: seat.melded.clone(),
            }
        })
        .collect();

    GameView {
        viewer,
        round: state.round,
        phase: state.phase,
        current_player: state.current_player,
        play_order: state.play_order.clone(),
        draw_pile_len: state.draw_pile.len(),
        discard_pile_len: state.discard_pile.len(),
        discard_top: state.discard_pile.top(),
        players,
        melder: state.melder,
        winner: state.winner,
    }
}
