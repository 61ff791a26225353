use rand::{seq::SliceRandom, thread_rng, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use thiserror::Error;

use crate::{
    action::{Action, InvalidAction},
    discretize::{Discretizer, Observation, Stand},
    growth::{initial_basal_area, project_basal_area},
    site::{ConfigError, SiteParams},
    space::{ActionSpace, ObservationSpace},
    transition::transition,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    Active,
    Terminated,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StepError {
    #[error(transparent)]
    InvalidAction(#[from] InvalidAction),
    #[error("the stand was harvested, reset before stepping again")]
    Terminated,
    #[error("observation {0} is outside of the observation space")]
    ObservationOutOfBounds(Observation),
}

/// Side information about a step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepInfo {
    pub requested: Action,
    /// Differs from `requested` only when harvest was forced at the maximum age.
    pub applied: Action,
    pub forced_harvest: bool,
    /// The resulting basal area did not fit the observation space.
    pub clamped: bool,
    /// Representative stand the step started from.
    pub stand: Stand,
    /// Stand after growth, `None` after harvest.
    pub next: Option<Stand>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Step {
    pub observation: Observation,
    pub reward: f64,
    pub done: bool,
    pub info: StepInfo,
}

/// A single even-aged stand managed one decision period at a time.
#[derive(Clone, Debug)]
pub struct StandEnv<R = ChaCha8Rng> {
    site: SiteParams,
    discretizer: Discretizer,
    action_space: ActionSpace,
    observation_space: ObservationSpace,
    observation: Observation,
    status: Status,
    planting_density: f64,
    rng: R,
}

impl<R: Rng + SeedableRng> StandEnv<R> {
    /// Create an environment seeded with `seed`, or with a random seed.
    ///
    /// # Errors
    ///
    /// Fails if the site parameters are invalid.
    pub fn new(site: SiteParams, seed: Option<u64>) -> Result<Self, ConfigError> {
        let seed = seed.unwrap_or_else(|| thread_rng().gen());
        log::debug!("seed: {seed}");
        Self::with_rng(site, R::seed_from_u64(seed))
    }

    /// Reseed the random source. Returns the seed that was applied.
    pub fn seed(&mut self, seed: Option<u64>) -> u64 {
        let seed = seed.unwrap_or_else(|| thread_rng().gen());
        log::debug!("seed: {seed}");
        self.rng = R::seed_from_u64(seed);
        seed
    }
}

impl<R: Rng> StandEnv<R> {
    /// Create an environment drawing planting densities from `rng`.
    /// The environment starts out reset.
    ///
    /// # Errors
    ///
    /// Fails if the site parameters are invalid.
    pub fn with_rng(site: SiteParams, rng: R) -> Result<Self, ConfigError> {
        site.validate()?;
        let mut env = Self {
            discretizer: Discretizer::from(&site),
            action_space: ActionSpace::default(),
            observation_space: ObservationSpace::from(&site),
            observation: Observation::TERMINAL,
            status: Status::Terminated,
            planting_density: 0.0,
            site,
            rng,
        };
        env.reset();
        Ok(env)
    }

    /// Plant a new stand and grow it to the first thinning age.
    ///
    /// # Panics
    ///
    /// Panics if there are no planting densities, which validation rules out.
    pub fn reset(&mut self) -> Observation {
        let site = &self.site;
        self.planting_density = *site
            .planting_densities
            .choose(&mut self.rng)
            .expect("validated site should have planting densities");
        let basal_area = project_basal_area(
            site.first_thinning_age,
            initial_basal_area(
                self.planting_density,
                site.site_index,
                site.initial_age,
                site.survival,
            ),
            site.site_index,
        );
        let encoded = self.discretizer.encode_clamped(Stand {
            basal_area,
            age: site.first_thinning_age,
        });
        log::debug!(
            "planted {} trees/ha, basal area {basal_area:.2} at age {}, observation {}",
            self.planting_density,
            site.first_thinning_age,
            encoded.observation
        );
        self.observation = encoded.observation;
        self.status = Status::Active;
        self.observation
    }

    /// Apply an action given by its index in the action space.
    ///
    /// # Errors
    ///
    /// Fails without touching the state if the action is outside of the
    /// action space or the stand has already been harvested.
    pub fn step(&mut self, action: usize) -> Result<Step, StepError> {
        let action = Action::try_from(action)?;
        self.step_action(action)
    }

    /// Apply an action for one decision period.
    ///
    /// # Errors
    ///
    /// Fails if the stand has already been harvested.
    pub fn step_action(&mut self, requested: Action) -> Result<Step, StepError> {
        if self.status == Status::Terminated {
            return Err(StepError::Terminated);
        }
        let stand = self.discretizer.decode(self.observation);
        let outcome = transition(&self.site, stand, requested);
        if outcome.forced_harvest {
            log::debug!("{requested} replaced by harvest at age {}", stand.age);
        }

        let (observation, clamped) = match outcome.next {
            Some(next) => {
                let encoded = self.discretizer.encode_clamped(next);
                (encoded.observation, encoded.clamped)
            }
            None => {
                self.status = Status::Terminated;
                (Observation::TERMINAL, false)
            }
        };
        log::trace!(
            "{} --{}--> {observation}, reward {:.2}",
            self.observation,
            outcome.applied,
            outcome.reward
        );
        self.observation = observation;

        Ok(Step {
            observation,
            reward: outcome.reward,
            done: self.status == Status::Terminated,
            info: StepInfo {
                requested,
                applied: outcome.applied,
                forced_harvest: outcome.forced_harvest,
                clamped,
                stand,
                next: outcome.next,
            },
        })
    }

    /// Put the stand into the state described by `observation`.
    ///
    /// # Errors
    ///
    /// Fails if the observation is outside of the observation space.
    pub fn restore(&mut self, observation: Observation) -> Result<(), StepError> {
        if !self.observation_space.contains(observation) {
            return Err(StepError::ObservationOutOfBounds(observation));
        }
        self.observation = observation;
        self.status = Status::Active;
        Ok(())
    }
}

impl<R> StandEnv<R> {
    #[must_use]
    pub const fn observation(&self) -> Observation {
        self.observation
    }

    #[must_use]
    pub const fn status(&self) -> Status {
        self.status
    }

    #[must_use]
    pub const fn site(&self) -> &SiteParams {
        &self.site
    }

    /// Planting density of the current rotation in trees/ha.
    #[must_use]
    pub const fn planting_density(&self) -> f64 {
        self.planting_density
    }

    #[must_use]
    pub const fn action_space(&self) -> ActionSpace {
        self.action_space
    }

    #[must_use]
    pub const fn observation_space(&self) -> ObservationSpace {
        self.observation_space
    }
}
