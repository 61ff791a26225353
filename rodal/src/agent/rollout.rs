use rand::Rng;

use super::Policy;
use crate::{
    discretize::Observation,
    env::{StandEnv, Step, StepError},
};

/// Record of one rotation.
#[derive(Clone, Debug, PartialEq)]
pub struct Episode {
    pub initial: Observation,
    pub planting_density: f64,
    pub steps: Vec<Step>,
    pub total_reward: f64,
    /// The stand was still standing when the step limit was reached.
    pub truncated: bool,
}

impl Episode {
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Volume removed by thinnings.
    #[must_use]
    pub fn thinned_volume(&self) -> f64 {
        self.steps
            .iter()
            .filter(|step| step.info.applied.is_thinning())
            .map(|step| step.reward)
            .sum()
    }

    /// Volume removed by the final harvest, zero if truncated.
    #[must_use]
    pub fn harvested_volume(&self) -> f64 {
        self.steps
            .last()
            .filter(|step| step.done)
            .map_or(0.0, |step| step.reward)
    }
}

/// Reset `env` and play `policy` until the stand is harvested
/// or `max_steps` decisions were taken.
///
/// # Errors
///
/// Propagates step errors, which a freshly reset environment does not produce.
pub fn rollout<R: Rng, P: Policy>(
    env: &mut StandEnv<R>,
    policy: &mut P,
    rng: &mut impl Rng,
    max_steps: usize,
) -> Result<Episode, StepError> {
    let initial = env.reset();
    policy.reset();
    let mut steps = Vec::new();
    let mut done = false;
    while !done && steps.len() < max_steps {
        let action = policy.act(env.observation(), rng);
        let step = env.step_action(action)?;
        done = step.done;
        steps.push(step);
    }
    let total_reward = steps.iter().map(|step| step.reward).sum();
    Ok(Episode {
        initial,
        planting_density: env.planting_density(),
        steps,
        total_reward,
        truncated: !done,
    })
}
