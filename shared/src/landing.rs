//! Derives follow-up actions from the local player's moves.
//!
//! Property landings need player interaction (a quiz before buying) or a
//! delayed automatic payment, so the reducer leaves them alone. Each
//! participant runs a [`LandingWatcher`] over the states it observes and
//! turns "I moved onto X" into new actions.

use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;
use std::time::Duration;

use crate::board::{Question, QUESTIONS};
use crate::model::{GameState, PeerId, TileKind};
use crate::protocol::Action;
use crate::rules::GameRules;

/// A purchase offer gated by a quiz question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizOffer {
    pub tile_id: usize,
    pub tile_name: String,
    pub price: i64,
    pub question: &'static Question,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizOutcome {
    /// `buy` is set only when the player also confirmed the purchase.
    Correct { buy: Option<Action> },
    /// The purchase is forfeited for this landing.
    Wrong { correct_answer: &'static str },
}

impl QuizOffer {
    pub fn answer(&self, choice: usize, confirm_buy: bool) -> QuizOutcome {
        if choice == self.question.correct_index {
            QuizOutcome::Correct {
                buy: confirm_buy.then(|| Action::BuyProperty {
                    tile_id: self.tile_id,
                }),
            }
        } else {
            QuizOutcome::Wrong {
                correct_answer: self.question.correct_answer(),
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LandingEffect {
    Quiz(QuizOffer),
    /// Pay `amount` to `to` once `delay` has elapsed, no confirmation.
    Rent {
        tile_id: usize,
        tile_name: String,
        amount: i64,
        to: PeerId,
        delay: Duration,
    },
}

impl LandingEffect {
    /// The action a rent effect emits when its delay fires.
    pub fn rent_action(&self) -> Option<Action> {
        match self {
            LandingEffect::Rent { amount, to, .. } => Some(Action::PayRent {
                amount: *amount,
                to: to.clone(),
            }),
            LandingEffect::Quiz(_) => None,
        }
    }
}

/// Watches one player's position across successive states.
///
/// Compares positions rather than state identity, since every snapshot
/// replaces the previous one wholesale.
#[derive(Debug, Clone)]
pub struct LandingWatcher {
    own_id: PeerId,
    last_position: usize,
    rent_delay: Duration,
}

impl LandingWatcher {
    pub fn new(own_id: PeerId, rules: &GameRules) -> Self {
        Self {
            own_id,
            last_position: 0,
            rent_delay: rules.rent_delay(),
        }
    }

    pub fn last_position(&self) -> usize {
        self.last_position
    }

    pub fn observe<R: Rng + ?Sized>(
        &mut self,
        state: &GameState,
        rng: &mut R,
    ) -> Option<LandingEffect> {
        let me = state.player(&self.own_id)?;
        if me.position == self.last_position {
            return None;
        }
        debug!(
            "{} moved from {} to {}",
            self.own_id, self.last_position, me.position
        );
        self.last_position = me.position;

        let tile = state.tile(me.position)?;
        if tile.kind != TileKind::Property || !state.is_turn_of(&self.own_id) {
            return None;
        }

        match &tile.owner_id {
            None => {
                let question = QUESTIONS.choose(rng)?;
                Some(LandingEffect::Quiz(QuizOffer {
                    tile_id: tile.id,
                    tile_name: tile.name.clone(),
                    price: tile.price.unwrap_or(0),
                    question,
                }))
            }
            Some(owner) if owner != &self.own_id => Some(LandingEffect::Rent {
                tile_id: tile.id,
                tile_name: tile.name.clone(),
                amount: tile.rent.unwrap_or(0),
                to: owner.clone(),
                delay: self.rent_delay,
            }),
            Some(_) => None,
        }
    }
}
