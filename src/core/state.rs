//! Game state.
//!
//! `GameState` is the single authoritative record of a match: seats and
//! their hands and points, both piles, the play order, the phase, the
//! per-player pending stages, the move log and the shuffle RNG.
//!
//! Fields are crate-private. Outside the engine the state is read through
//! accessors and changed only by `Chinchon::apply`.

use im::Vector;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::action::{Move, MoveRecord};
use super::error::SnapshotError;
use super::player::{PlayerId, PlayerMap};
use super::rng::{GameRng, GameRngState};
use crate::cards::Card;
use crate::meld::Meld;
use crate::piles::Pile;

/// Round phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Players take turns drawing and discarding.
    Play,
    /// Someone closed; the others acknowledge the round.
    Review,
    /// One player is left in the play order.
    GameOver,
}

/// A pending action for one player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stage {
    Draw,
    Discard,
    ReviewRound,
}

/// Per-seat state. Survives elimination for end-of-match reporting.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    /// Cards in hand, in the order the player arranged them.
    pub hand: Vec<Card>,

    /// Accumulated penalty points.
    pub points: u32,

    /// The close this player laid down in the current round, if any.
    pub melded: Option<Meld>,
}

/// Full match state.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameState {
    pub(crate) players: PlayerMap<PlayerState>,
    pub(crate) draw_pile: Pile,
    pub(crate) discard_pile: Pile,
    /// Seats still in the match, in turn order.
    pub(crate) play_order: Vec<PlayerId>,
    /// Seats that received cards in the current deal. Eliminated seats
    /// keep their last hand but drop out of this list at the next deal.
    pub(crate) dealt: Vec<PlayerId>,
    pub(crate) current_player: PlayerId,
    pub(crate) phase: Phase,
    /// Absence of an entry means no pending action.
    pub(crate) active_players: FxHashMap<PlayerId, Stage>,
    /// Current round number, starting at 1 once dealt.
    pub(crate) round: u32,
    /// Who closed the current round.
    pub(crate) melder: Option<PlayerId>,
    pub(crate) winner: Option<PlayerId>,
    pub(crate) history: Vector<MoveRecord>,
    pub(crate) rng: GameRng,
}

impl GameState {
    /// Create an undealt state with every seat in the play order.
    #[must_use]
    pub fn new(player_count: usize, seed: u64) -> Self {
        Self {
            players: PlayerMap::with_default(player_count),
            draw_pile: Pile::new(),
            discard_pile: Pile::new(),
            play_order: PlayerId::all(player_count).collect(),
            dealt: Vec::new(),
            current_player: PlayerId::new(0),
            phase: Phase::Play,
            active_players: FxHashMap::default(),
            round: 0,
            melder: None,
            winner: None,
            history: Vector::new(),
            rng: GameRng::new(seed),
        }
    }

    // === Players ===

    /// Number of seats, eliminated ones included.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.players.player_count()
    }

    /// All seats with their state.
    #[must_use]
    pub fn players(&self) -> &PlayerMap<PlayerState> {
        &self.players
    }

    /// A seat's state, or `None` for an unknown id.
    #[must_use]
    pub fn player(&self, player: PlayerId) -> Option<&PlayerState> {
        self.players.try_get(player)
    }

    /// A seat's hand. Empty for unknown ids.
    #[must_use]
    pub fn hand(&self, player: PlayerId) -> &[Card] {
        self.players.try_get(player).map_or(&[], |p| p.hand.as_slice())
    }

    /// Seats still playing, in turn order.
    #[must_use]
    pub fn play_order(&self) -> &[PlayerId] {
        &self.play_order
    }

    #[must_use]
    pub fn is_eliminated(&self, player: PlayerId) -> bool {
        self.players.contains(player) && !self.play_order.contains(&player)
    }

    // === Turn ===

    #[must_use]
    pub fn current_player(&self) -> PlayerId {
        self.current_player
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn round(&self) -> u32 {
        self.round
    }

    #[must_use]
    pub fn melder(&self) -> Option<PlayerId> {
        self.melder
    }

    #[must_use]
    pub fn winner(&self) -> Option<PlayerId> {
        self.winner
    }

    /// The pending stage of a player, if any.
    #[must_use]
    pub fn stage(&self, player: PlayerId) -> Option<Stage> {
        self.active_players.get(&player).copied()
    }

    /// Every pending stage, ordered by seat.
    #[must_use]
    pub fn active_players(&self) -> Vec<(PlayerId, Stage)> {
        let mut active: Vec<_> = self.active_players.iter().map(|(&p, &s)| (p, s)).collect();
        active.sort_by_key(|&(p, _)| p);
        active
    }

    pub(crate) fn set_stage(&mut self, player: PlayerId, stage: Stage) {
        self.active_players.insert(player, stage);
    }

    /// Index of the player after `player` in the play order, wrapping.
    pub(crate) fn next_in_order(&self, player: PlayerId) -> PlayerId {
        match self.play_order.iter().position(|&p| p == player) {
            Some(idx) => self.play_order[(idx + 1) % self.play_order.len()],
            None => self.play_order.first().copied().unwrap_or(player),
        }
    }

    // === Piles ===

    #[must_use]
    pub fn draw_pile(&self) -> &Pile {
        &self.draw_pile
    }

    #[must_use]
    pub fn discard_pile(&self) -> &Pile {
        &self.discard_pile
    }

    /// Cards of the current deal: both piles plus the hands and closes of
    /// the seats dealt in. Constant from one deal to the next, including
    /// after the match ends.
    #[must_use]
    pub fn card_count(&self) -> usize {
        let held: usize = self
            .dealt
            .iter()
            .filter_map(|&player| self.players.try_get(player))
            .map(|p| p.hand.len() + p.melded.as_ref().map_or(0, |m| m.cards().count()))
            .sum();
        self.draw_pile.len() + self.discard_pile.len() + held
    }

    // === Move log ===

    /// Accepted moves, oldest first. A draw that abandoned the round is
    /// logged too, since the redeal it caused moved the RNG.
    #[must_use]
    pub fn history(&self) -> &Vector<MoveRecord> {
        &self.history
    }

    /// Append an accepted move made during `round`.
    pub(crate) fn record(&mut self, player: PlayerId, mv: Move, round: u32) {
        let sequence = self.history.len() as u32;
        self.history.push_back(MoveRecord::new(player, mv, round, sequence));
    }

    // === Snapshots ===

    /// Position of the shuffle RNG.
    #[must_use]
    pub fn rng_state(&self) -> GameRngState {
        self.rng.state()
    }

    /// Encode the full state for resuming later.
    pub fn to_bytes(&self) -> Result<Vec<u8>, SnapshotError> {
        Ok(bincode::serialize(self)?)
    }

    /// Decode a state produced by [`GameState::to_bytes`] and check it with
    /// [`GameState::validate`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SnapshotError> {
        let state: Self = bincode::deserialize(bytes)?;
        state.validate()?;
        Ok(state)
    }

    /// Check the seat references and pending stages of a decoded state.
    ///
    /// `from_bytes` runs this itself; call it after decoding through any
    /// other serde format.
    pub fn validate(&self) -> Result<(), SnapshotError> {
        let known = |player: &PlayerId| self.players.contains(*player);

        if !self.play_order.iter().all(known) {
            return Err(SnapshotError::Inconsistent("play order names an unknown seat"));
        }
        if self.play_order.iter().enumerate().any(|(i, p)| self.play_order[..i].contains(p)) {
            return Err(SnapshotError::Inconsistent("play order repeats a seat"));
        }
        if !self.dealt.iter().all(known) {
            return Err(SnapshotError::Inconsistent("dealt seats name an unknown seat"));
        }
        if !self.melder.iter().chain(self.winner.iter()).all(known) {
            return Err(SnapshotError::Inconsistent("melder or winner is an unknown seat"));
        }
        if !self.active_players.keys().all(|p| self.play_order.contains(p)) {
            return Err(SnapshotError::Inconsistent("pending stage for a seat outside the play order"));
        }

        match self.phase {
            Phase::Play => {
                if !self.play_order.contains(&self.current_player) {
                    return Err(SnapshotError::Inconsistent("current player is not in the play order"));
                }
                let turn_only = self.active_players.iter().all(|(&p, &stage)| {
                    p == self.current_player && matches!(stage, Stage::Draw | Stage::Discard)
                });
                if !turn_only {
                    return Err(SnapshotError::Inconsistent("play phase with a stage off the current turn"));
                }
            }
            Phase::Review => {
                if self.melder.is_none() {
                    return Err(SnapshotError::Inconsistent("review phase without a melder"));
                }
                if self.active_players.values().any(|&stage| stage != Stage::ReviewRound) {
                    return Err(SnapshotError::Inconsistent("review phase with a turn stage pending"));
                }
            }
            Phase::GameOver => {
                if self.winner.is_none() || !self.active_players.is_empty() {
                    return Err(SnapshotError::Inconsistent("finished match without a winner"));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::action::DrawSource;

    #[test]
    fn test_new_state() {
        let state = GameState::new(3, 42);

        assert_eq!(state.player_count(), 3);
        assert_eq!(state.play_order(), &[PlayerId::new(0), PlayerId::new(1), PlayerId::new(2)]);
        assert_eq!(state.phase(), Phase::Play);
        assert_eq!(state.round(), 0);
        assert_eq!(state.card_count(), 0);
        assert!(state.active_players().is_empty());
    }

    #[test]
    fn test_unknown_player_access() {
        let state = GameState::new(2, 42);

        assert!(state.player(PlayerId::new(5)).is_none());
        assert!(state.hand(PlayerId::new(5)).is_empty());
        assert!(!state.is_eliminated(PlayerId::new(5)));
    }

    #[test]
    fn test_next_in_order_wraps() {
        let mut state = GameState::new(3, 42);
        assert_eq!(state.next_in_order(PlayerId::new(0)), PlayerId::new(1));
        assert_eq!(state.next_in_order(PlayerId::new(2)), PlayerId::new(0));

        state.play_order.retain(|&p| p != PlayerId::new(1));
        assert_eq!(state.next_in_order(PlayerId::new(0)), PlayerId::new(2));
        assert!(state.is_eliminated(PlayerId::new(1)));
    }

    #[test]
    fn test_active_players_sorted() {
        let mut state = GameState::new(4, 42);
        state.set_stage(PlayerId::new(3), Stage::ReviewRound);
        state.set_stage(PlayerId::new(1), Stage::ReviewRound);

        assert_eq!(
            state.active_players(),
            vec![(PlayerId::new(1), Stage::ReviewRound), (PlayerId::new(3), Stage::ReviewRound)]
        );
        assert_eq!(state.stage(PlayerId::new(0)), None);
    }

    #[test]
    fn test_record_sequences() {
        let mut state = GameState::new(2, 42);
        state.record(PlayerId::new(0), Move::Draw { from: DrawSource::DrawPile }, 3);
        state.record(PlayerId::new(1), Move::EndReview, 4);

        let log: Vec<_> = state.history().iter().map(|r| (r.player, r.round, r.sequence)).collect();
        assert_eq!(log, vec![(PlayerId::new(0), 3, 0), (PlayerId::new(1), 4, 1)]);
    }

    #[test]
    fn test_bytes_round_trip() {
        let mut state = GameState::new(2, 42);
        state.players[PlayerId::new(1)].points = 37;
        state.discard_pile.push("5♣".parse().unwrap());
        state.set_stage(PlayerId::new(0), Stage::Draw);

        let bytes = state.to_bytes().unwrap();
        let restored = GameState::from_bytes(&bytes).unwrap();

        assert_eq!(restored.players(), state.players());
        assert_eq!(restored.discard_pile(), state.discard_pile());
        assert_eq!(restored.active_players(), state.active_players());
        assert_eq!(restored.rng_state(), state.rng_state());
    }

    fn encode_and_decode(state: &GameState) -> Result<GameState, SnapshotError> {
        GameState::from_bytes(&state.to_bytes().unwrap())
    }

    #[test]
    fn test_from_bytes_rejects_unknown_seat_in_order() {
        let mut state = GameState::new(2, 42);
        state.play_order.push(PlayerId::new(5));

        assert!(matches!(encode_and_decode(&state), Err(SnapshotError::Inconsistent(_))));
    }

    #[test]
    fn test_from_bytes_rejects_stuck_review() {
        let mut state = GameState::new(3, 42);
        state.phase = Phase::Review;
        state.melder = Some(PlayerId::new(0));
        state.play_order.retain(|&p| p != PlayerId::new(2));
        state.set_stage(PlayerId::new(1), Stage::ReviewRound);
        assert!(encode_and_decode(&state).is_ok());

        state.set_stage(PlayerId::new(2), Stage::ReviewRound);
        assert!(matches!(encode_and_decode(&state), Err(SnapshotError::Inconsistent(_))));
    }

    #[test]
    fn test_validate_turn_stages() {
        let mut state = GameState::new(3, 42);
        state.set_stage(PlayerId::new(0), Stage::Draw);
        assert!(state.validate().is_ok());

        state.current_player = PlayerId::new(1);
        assert!(state.validate().is_err());

        state.current_player = PlayerId::new(0);
        state.play_order.retain(|&p| p != PlayerId::new(0));
        assert!(state.validate().is_err());
    }

    #[test]
    fn test_validate_finished_match_needs_winner() {
        let mut state = GameState::new(2, 42);
        state.phase = Phase::GameOver;
        assert!(state.validate().is_err());

        state.winner = Some(PlayerId::new(1));
        assert!(state.validate().is_ok());
    }

    #[test]
    fn test_from_bytes_rejects_garbage() {
        assert!(GameState::from_bytes(&[1, 2, 3]).is_err());
    }
}
