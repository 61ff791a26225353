use rand::Rng;

use crate::{action::Action, discretize::Observation, space::ActionSpace};

pub mod plan;
pub mod rollout;

/// Something that picks management actions from observations.
pub trait Policy {
    fn act(&mut self, observation: Observation, rng: &mut impl Rng) -> Action;

    /// Called before the first action of every episode.
    fn reset(&mut self) {}
}

/// Picks any action with equal probability.
#[derive(Clone, Copy, Debug, Default)]
pub struct Uniform(pub ActionSpace);

impl Policy for Uniform {
    fn act(&mut self, _observation: Observation, rng: &mut impl Rng) -> Action {
        self.0.sample(rng)
    }
}

/// Always requests the same action.
#[derive(Clone, Copy, Debug)]
pub struct Constant(pub Action);

impl Policy for Constant {
    fn act(&mut self, _observation: Observation, _rng: &mut impl Rng) -> Action {
        self.0
    }
}
