//! Rules engine trait and the Chinchón implementation.
//!
//! `RulesEngine` is the seam callers program against:
//! - What moves are legal
//! - How a move changes the state
//! - Whether the match is over
//!
//! `Chinchon` implements it on top of the turn transitions in
//! [`super::turn`] and the round controller in [`super::round`].

use tracing::{debug, warn};

use super::round::{self, RoundOutcome, RoundSummary};
use super::turn;
use super::view::{self, GameView};
use crate::cards::Card;
use crate::core::action::{DrawSource, Move};
use crate::core::config::{ChinchonConfig, ConfigError};
use crate::core::error::MoveError;
use crate::core::player::PlayerId;
use crate::core::state::{GameState, Phase, Stage};
use crate::meld::{can_meld, Meld, MeldRules};

/// Result of a completed match.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameResult {
    /// Last player standing.
    Winner(PlayerId),
}

impl GameResult {
    /// Check if a player won.
    #[must_use]
    pub fn is_winner(&self, player: PlayerId) -> bool {
        match self {
            GameResult::Winner(p) => *p == player,
        }
    }
}

/// What an accepted move did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    Drew {
        card: Card,
        from: DrawSource,
        /// The discard pile was recycled into the draw pile first.
        reshuffled: bool,
    },
    Discarded {
        card: Card,
        next_player: PlayerId,
    },
    /// The round is closed and under review.
    Melded(Meld),
    /// Review acknowledged; `waiting` players still have to.
    ReviewAcknowledged { waiting: usize },
    /// The last review closed the round.
    RoundEnded(RoundSummary),
}

/// Rules engine trait.
///
/// ## Implementation Notes
///
/// - `legal_moves`: Return empty vec if the player can't act
/// - `apply`: Must be deterministic given the state's RNG
/// - `result`: Return None while the match continues
pub trait RulesEngine {
    /// Get the match configuration.
    fn config(&self) -> &ChinchonConfig;

    /// Every move `player` could submit right now.
    fn legal_moves(&self, state: &GameState, player: PlayerId) -> Vec<Move>;

    /// Validate and apply one move.
    fn apply(&self, state: &mut GameState, player: PlayerId, mv: Move) -> Result<MoveOutcome, MoveError>;

    /// Check if the match is over.
    fn result(&self, state: &GameState) -> Option<GameResult>;
}

/// The Chinchón rules for one configuration.
///
/// ```
/// use chinchon_engine::core::{ChinchonConfig, DrawSource, Move, PlayerId};
/// use chinchon_engine::rules::{Chinchon, MoveOutcome, RulesEngine};
///
/// let engine = Chinchon::new(ChinchonConfig::default()).unwrap();
/// let mut state = engine.new_match(42);
///
/// let p0 = PlayerId::new(0);
/// let outcome = engine.apply(&mut state, p0, Move::Draw { from: DrawSource::DrawPile }).unwrap();
/// assert!(matches!(outcome, MoveOutcome::Drew { .. }));
/// assert_eq!(state.hand(p0).len(), 8);
/// ```
#[derive(Clone, Debug)]
pub struct Chinchon {
    config: ChinchonConfig,
    rules: MeldRules,
}

impl Chinchon {
    /// Create an engine, rejecting configurations that cannot run a match.
    pub fn new(config: ChinchonConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let rules = config.meld_rules();
        Ok(Self { config, rules })
    }

    /// Start a match from `seed` with round 1 dealt.
    #[must_use]
    pub fn new_match(&self, seed: u64) -> GameState {
        let mut state = GameState::new(self.config.player_count, seed);
        round::deal_round(&mut state, &self.config);
        state
    }

    #[must_use]
    pub fn meld_rules(&self) -> &MeldRules {
        &self.rules
    }

    /// Whether `hand` closes by discarding `card` under this configuration.
    #[must_use]
    pub fn can_meld(&self, hand: &[Card], card: Card) -> bool {
        can_meld(hand, card, &self.rules)
    }

    /// What `viewer` is allowed to see. `None` views as an outsider.
    #[must_use]
    pub fn view(&self, state: &GameState, viewer: Option<PlayerId>) -> GameView {
        view::view(state, viewer)
    }

    fn apply_move(&self, state: &mut GameState, player: PlayerId, mv: Move) -> Result<MoveOutcome, MoveError> {
        if !state.players.contains(player) {
            return Err(MoveError::UnknownPlayer(player));
        }
        if state.phase == Phase::GameOver {
            return Err(MoveError::GameOver);
        }

        let current_round = state.round;
        let outcome = match mv {
            Move::Draw { from } => match turn::draw(state, player, from) {
                Ok(drawn) => MoveOutcome::Drew {
                    card: drawn.card,
                    from,
                    reshuffled: drawn.reshuffled,
                },
                Err(MoveError::EmptyDeckUnrecoverable) => {
                    warn!(round = current_round, player = %player, "Abandoning round with no cards left to draw");
                    // The redeal consumes the RNG, so replays need the draw too.
                    state.record(player, mv, current_round);
                    round::abandon_round(state, &self.config);
                    return Err(MoveError::EmptyDeckUnrecoverable);
                }
                Err(err) => return Err(err),
            },
            Move::Discard { card } => {
                let next_player = turn::discard(state, player, card)?;
                MoveOutcome::Discarded { card, next_player }
            }
            Move::Meld { card } => MoveOutcome::Melded(turn::meld(state, player, card, &self.rules)?),
            Move::EndReview => {
                let waiting = turn::end_review(state, player)?;
                if waiting > 0 {
                    MoveOutcome::ReviewAcknowledged { waiting }
                } else {
                    state.record(player, mv, current_round);
                    debug!(round = current_round, player = %player, mv = ?mv, "Move applied");
                    return Ok(MoveOutcome::RoundEnded(round::conclude_round(state, &self.config)));
                }
            }
        };

        state.record(player, mv, current_round);
        debug!(round = current_round, player = %player, mv = ?mv, "Move applied");
        Ok(outcome)
    }
}

impl RulesEngine for Chinchon {
    fn config(&self) -> &ChinchonConfig {
        &self.config
    }

    fn legal_moves(&self, state: &GameState, player: PlayerId) -> Vec<Move> {
        if state.phase == Phase::GameOver {
            return Vec::new();
        }
        match state.stage(player) {
            Some(Stage::Draw) => {
                let mut moves = Vec::with_capacity(2);
                if !state.draw_pile.is_empty() || state.discard_pile.len() > 1 {
                    moves.push(Move::Draw { from: DrawSource::DrawPile });
                }
                if !state.discard_pile.is_empty() {
                    moves.push(Move::Draw { from: DrawSource::DiscardPile });
                }
                moves
            }
            Some(Stage::Discard) => {
                let hand = state.hand(player);
                let mut moves: Vec<Move> = hand.iter().map(|&card| Move::Discard { card }).collect();
                moves.extend(
                    hand.iter()
                        .filter(|&&card| can_meld(hand, card, &self.rules))
                        .map(|&card| Move::Meld { card }),
                );
                moves
            }
            Some(Stage::ReviewRound) => vec![Move::EndReview],
            None => Vec::new(),
        }
    }

    fn apply(&self, state: &mut GameState, player: PlayerId, mv: Move) -> Result<MoveOutcome, MoveError> {
        self.apply_move(state, player, mv)
    }

    fn result(&self, state: &GameState) -> Option<GameResult> {
        match (state.phase, state.winner) {
            (Phase::GameOver, Some(winner)) => Some(GameResult::Winner(winner)),
            _ => None,
        }
    }
}

impl MoveOutcome {
    /// The match winner, if this move ended the match.
    #[must_use]
    pub fn winner(&self) -> Option<PlayerId> {
        match self {
            MoveOutcome::RoundEnded(RoundSummary {
                outcome: RoundOutcome::MatchWon { winner },
                ..
            }) => Some(*winner),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::parse_cards;
    use crate::core::error::DrawRejection;
    use crate::meld::MeldError;
    use crate::piles::Pile;

    fn engine(players: usize) -> Chinchon {
        Chinchon::new(ChinchonConfig::default().with_player_count(players)).unwrap()
    }

    #[test]
    fn test_game_result_is_winner() {
        let result = GameResult::Winner(PlayerId::new(1));
        assert!(!result.is_winner(PlayerId::new(0)));
        assert!(result.is_winner(PlayerId::new(1)));
    }

    #[test]
    fn test_new_rejects_bad_config() {
        let err = Chinchon::new(ChinchonConfig::default().with_player_count(6)).unwrap_err();
        assert_eq!(err, ConfigError::PlayerCount(6));
    }

    #[test]
    fn test_unknown_player_rejected() {
        let engine = engine(2);
        let mut state = engine.new_match(3);

        assert_eq!(
            engine.apply(&mut state, PlayerId::new(7), Move::EndReview),
            Err(MoveError::UnknownPlayer(PlayerId::new(7)))
        );
    }

    #[test]
    fn test_out_of_turn_rejected() {
        let engine = engine(3);
        let mut state = engine.new_match(3);

        assert_eq!(
            engine.apply(&mut state, PlayerId::new(1), Move::Draw { from: DrawSource::DrawPile }),
            Err(MoveError::NotCurrentPlayer(PlayerId::new(1)))
        );
        assert!(state.history().is_empty());
    }

    #[test]
    fn test_legal_moves_follow_stage() {
        let engine = engine(2);
        let mut state = engine.new_match(11);
        let p0 = PlayerId::new(0);

        assert_eq!(
            engine.legal_moves(&state, p0),
            vec![
                Move::Draw { from: DrawSource::DrawPile },
                Move::Draw { from: DrawSource::DiscardPile }
            ]
        );
        assert!(engine.legal_moves(&state, PlayerId::new(1)).is_empty());

        engine.apply(&mut state, p0, Move::Draw { from: DrawSource::DrawPile }).unwrap();
        let moves = engine.legal_moves(&state, p0);
        let discards = moves.iter().filter(|m| matches!(m, Move::Discard { .. })).count();
        assert_eq!(discards, 8);
    }

    #[test]
    fn test_legal_moves_offer_meld() {
        let engine = engine(2);
        let mut state = engine.new_match(11);
        let p0 = PlayerId::new(0);
        state.players[p0].hand = parse_cards("A♥,2♥,3♥,4♥,5♥,6♥,7♥,K♣").unwrap();
        state.set_stage(p0, Stage::Discard);

        let melds: Vec<_> = engine
            .legal_moves(&state, p0)
            .into_iter()
            .filter(|m| matches!(m, Move::Meld { .. }))
            .collect();
        assert_eq!(melds, vec![Move::Meld { card: "K♣".parse().unwrap() }]);
    }

    #[test]
    fn test_rejected_meld_leaves_state() {
        let engine = engine(2);
        let mut state = engine.new_match(11);
        let p0 = PlayerId::new(0);
        engine.apply(&mut state, p0, Move::Draw { from: DrawSource::DrawPile }).unwrap();
        let before = state.clone();

        let not_held = Card::joker(crate::cards::Suit::Clubs);
        assert_eq!(
            engine.apply(&mut state, p0, Move::Meld { card: not_held }),
            Err(MoveError::Meld(MeldError::InvalidMeldCard(not_held)))
        );
        assert_eq!(state.players(), before.players());
        assert_eq!(state.history().len(), 1);
    }

    #[test]
    fn test_empty_deck_abandons_round() {
        let engine = engine(2);
        let mut state = engine.new_match(11);
        state.draw_pile = Pile::new();
        state.discard_pile = Pile::from_cards(parse_cards("5♣").unwrap());
        state.players[PlayerId::new(1)].points = 12;

        let err = engine
            .apply(&mut state, PlayerId::new(0), Move::Draw { from: DrawSource::DrawPile })
            .unwrap_err();

        assert!(err.is_fatal());
        assert_eq!(state.round(), 2);
        assert_eq!(state.card_count(), 54);
        assert_eq!(state.player(PlayerId::new(1)).unwrap().points, 12);
        assert_eq!(state.stage(PlayerId::new(0)), Some(Stage::Draw));
    }

    #[test]
    fn test_abandoning_draw_is_logged_for_replay() {
        let engine = engine(2);
        let mut state = engine.new_match(11);
        let p0 = PlayerId::new(0);
        let draw = Move::Draw { from: DrawSource::DrawPile };
        state.draw_pile = Pile::new();
        state.discard_pile = Pile::from_cards(parse_cards("5♣").unwrap());
        let mut replay = state.clone();

        assert!(engine.apply(&mut state, p0, draw).is_err());
        let last = state.history().last().cloned().unwrap();
        assert_eq!((last.player, last.mv, last.round), (p0, draw, 1));

        for record in state.history().iter().skip(replay.history().len()) {
            let _ = engine.apply(&mut replay, record.player, record.mv);
        }
        assert_eq!(replay.rng_state(), state.rng_state());
        assert_eq!(replay.players(), state.players());
        assert_eq!(replay.draw_pile(), state.draw_pile());
    }

    #[test]
    fn test_empty_discard_pile_draw_rejected() {
        let engine = engine(2);
        let mut state = engine.new_match(11);
        state.discard_pile = Pile::new();

        assert_eq!(
            engine.apply(&mut state, PlayerId::new(0), Move::Draw { from: DrawSource::DiscardPile }),
            Err(MoveError::IllegalDraw(DrawRejection::EmptyDiscardPile))
        );
        assert!(!engine
            .legal_moves(&state, PlayerId::new(0))
            .contains(&Move::Draw { from: DrawSource::DiscardPile }));
    }

    #[test]
    fn test_no_moves_after_match() {
        let engine = engine(2);
        let mut state = engine.new_match(11);
        state.phase = Phase::GameOver;
        state.winner = Some(PlayerId::new(1));

        assert_eq!(engine.result(&state), Some(GameResult::Winner(PlayerId::new(1))));
        assert!(engine.legal_moves(&state, PlayerId::new(0)).is_empty());
        assert_eq!(
            engine.apply(&mut state, PlayerId::new(0), Move::EndReview),
            Err(MoveError::GameOver)
        );
    }

    /// Hand the current player a seven-card run, the rest heavy deadwood,
    /// then close and review the round.
    fn close_round(engine: &Chinchon, state: &mut GameState) -> MoveOutcome {
        let closer = state.current_player();
        let others: Vec<_> = state.play_order().iter().copied().filter(|&p| p != closer).collect();
        state.players[closer].hand = parse_cards("A♥,2♥,3♥,4♥,5♥,6♥,7♥").unwrap();
        for &p in &others {
            state.players[p].hand = parse_cards("K♠,K♣,Q♠,Q♣,J♠,J♣,9♦").unwrap();
        }

        engine.apply(state, closer, Move::Draw { from: DrawSource::DrawPile }).unwrap();
        let drawn = *state.hand(closer).last().unwrap();
        let outcome = engine.apply(state, closer, Move::Meld { card: drawn }).unwrap();
        assert!(matches!(outcome, MoveOutcome::Melded(_)));

        let mut last = outcome;
        for p in others {
            last = engine.apply(state, p, Move::EndReview).unwrap();
        }
        last
    }

    #[test]
    fn test_round_flow_scores_and_redeals() {
        let engine = engine(3);
        let mut state = engine.new_match(21);

        let outcome = close_round(&engine, &mut state);
        let MoveOutcome::RoundEnded(summary) = outcome else {
            panic!("expected round end, got {outcome:?}");
        };

        assert_eq!(summary.round, 1);
        assert_eq!(summary.melder, Some(PlayerId::new(0)));
        assert_eq!(
            summary.deadwood,
            vec![(PlayerId::new(0), 0), (PlayerId::new(1), 69), (PlayerId::new(2), 69)]
        );
        assert!(summary.eliminated.is_empty());
        assert_eq!(state.round(), 2);
        assert_eq!(state.phase(), Phase::Play);
        assert_eq!(state.card_count(), 54);
        assert_eq!(state.history().last().map(|r| (r.mv, r.round)), Some((Move::EndReview, 1)));
    }

    #[test]
    fn test_elimination_keeps_one_deck_in_play() {
        let engine = engine(3);
        let mut state = engine.new_match(21);
        state.players[PlayerId::new(1)].points = 90;

        let outcome = close_round(&engine, &mut state);
        let MoveOutcome::RoundEnded(summary) = outcome else {
            panic!("expected round end, got {outcome:?}");
        };

        assert_eq!(summary.eliminated, vec![PlayerId::new(1)]);
        assert_eq!(state.player(PlayerId::new(1)).unwrap().points, 159);
        assert_eq!(state.play_order(), &[PlayerId::new(0), PlayerId::new(2)]);
        assert_eq!(state.round(), 2);
        assert_eq!(state.card_count(), 54);
        assert_eq!(state.draw_pile().len(), 54 - 2 * 7 - 1);

        close_round(&engine, &mut state);
        assert_eq!(state.card_count(), 54);
    }

    #[test]
    fn test_match_ends_with_last_player() {
        let engine = engine(3);
        let mut state = engine.new_match(21);

        close_round(&engine, &mut state);
        let outcome = close_round(&engine, &mut state);

        assert_eq!(outcome.winner(), Some(PlayerId::new(0)));
        assert_eq!(engine.result(&state), Some(GameResult::Winner(PlayerId::new(0))));
        assert!(state.is_eliminated(PlayerId::new(1)));
        assert!(state.is_eliminated(PlayerId::new(2)));
        assert_eq!(state.player(PlayerId::new(1)).unwrap().points, 138);
        assert_eq!(state.card_count(), 54);
        assert_eq!(
            engine.apply(&mut state, PlayerId::new(0), Move::Draw { from: DrawSource::DrawPile }),
            Err(MoveError::GameOver)
        );
    }

    #[test]
    fn test_review_moves_only_for_reviewers() {
        let engine = engine(2);
        let mut state = engine.new_match(4);
        let p0 = PlayerId::new(0);
        state.players[p0].hand = parse_cards("A♥,2♥,3♥,4♥,5♥,6♥,7♥").unwrap();
        engine.apply(&mut state, p0, Move::Draw { from: DrawSource::DrawPile }).unwrap();
        let drawn = *state.hand(p0).last().unwrap();
        engine.apply(&mut state, p0, Move::Meld { card: drawn }).unwrap();

        assert!(engine.legal_moves(&state, p0).is_empty());
        assert_eq!(engine.legal_moves(&state, PlayerId::new(1)), vec![Move::EndReview]);
        assert_eq!(
            engine.apply(&mut state, p0, Move::EndReview),
            Err(MoveError::NotReviewing(p0))
        );
        assert_eq!(
            engine.apply(&mut state, p0, Move::Discard { card: drawn }),
            Err(MoveError::NotCurrentPlayer(p0))
        );
    }

    #[test]
    fn test_repeated_end_review_never_double_counts() {
        let engine = engine(3);
        let mut state = engine.new_match(5);
        let p0 = PlayerId::new(0);
        let p1 = PlayerId::new(1);
        state.players[p0].hand = parse_cards("A♥,2♥,3♥,4♥,5♥,6♥,7♥").unwrap();
        state.players[p1].hand = parse_cards("K♠,2♣").unwrap();
        engine.apply(&mut state, p0, Move::Draw { from: DrawSource::DrawPile }).unwrap();
        let drawn = *state.hand(p0).last().unwrap();
        engine.apply(&mut state, p0, Move::Meld { card: drawn }).unwrap();

        assert_eq!(
            engine.apply(&mut state, p1, Move::EndReview),
            Ok(MoveOutcome::ReviewAcknowledged { waiting: 1 })
        );
        assert_eq!(engine.apply(&mut state, p1, Move::EndReview), Err(MoveError::NotReviewing(p1)));
        assert_eq!(state.player(p1).unwrap().points, 0);
        assert_eq!(state.phase(), Phase::Review);

        let outcome = engine.apply(&mut state, PlayerId::new(2), Move::EndReview).unwrap();
        assert!(matches!(outcome, MoveOutcome::RoundEnded(_)));
        assert_eq!(state.player(p1).unwrap().points, 12);
    }
}
