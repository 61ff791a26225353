use std::fmt;

use ordered_float::NotNan;
use rand::Rng;

use super::Policy;
use crate::{
    action::Action,
    discretize::{class_to_age_mark, Discretizer, Observation},
    site::SiteParams,
    space::ObservationSpace,
    transition::transition,
};

#[derive(Clone, Copy, Debug)]
struct Edge {
    applied: Action,
    reward: f64,
    next: Option<usize>,
}

/// Finite-horizon solution of the stand MDP.
#[derive(Clone, Debug)]
pub struct Plan {
    space: ObservationSpace,
    age_class_width: u32,
    /// Indexed by `[decisions left - 1][observation index]`.
    values: Box<[Box<[NotNan<f64>]>]>,
    actions: Box<[Box<[Action]>]>,
}

/// Solve the MDP by backward induction over `horizon` decisions.
/// The stand is always harvested on the last decision.
///
/// # Panics
///
/// Panics if `horizon` is zero or a return is NaN.
#[must_use]
pub fn solve(site: &SiteParams, horizon: usize, discount: f64) -> Plan {
    assert!(horizon > 0, "there should be at least one decision");
    let space = ObservationSpace::from(site);
    let discretizer = Discretizer::from(site);

    let edges: Vec<[Edge; 4]> = space
        .observations()
        .map(|observation| {
            let stand = discretizer.decode(observation);
            Action::ALL.map(|action| {
                let outcome = transition(site, stand, action);
                Edge {
                    applied: outcome.applied,
                    reward: outcome.reward,
                    next: outcome
                        .next
                        .map(|next| space.index(discretizer.encode_clamped(next).observation)),
                }
            })
        })
        .collect();

    let mut values: Vec<Box<[NotNan<f64>]>> = Vec::with_capacity(horizon);
    let mut actions: Vec<Box<[Action]>> = Vec::with_capacity(horizon);
    for stage in 0..horizon {
        let future = values.last();
        let (stage_values, stage_actions): (Vec<_>, Vec<_>) = edges
            .iter()
            .map(|edges| {
                // Requests that would be overridden are not choices.
                // Reversed so that ties go to the gentlest action.
                Action::ALL
                    .into_iter()
                    .zip(edges)
                    .filter(|(action, edge)| {
                        edge.applied == *action && (stage > 0 || *action == Action::Harvest)
                    })
                    .rev()
                    .map(|(action, edge)| {
                        let future = match (edge.next, future) {
                            (Some(next), Some(future)) => discount * future[next].into_inner(),
                            _ => 0.0,
                        };
                        let value =
                            NotNan::new(edge.reward + future).expect("return should not be NaN");
                        (value, action)
                    })
                    .max_by_key(|(value, _)| *value)
                    .expect("harvest should always be available")
            })
            .unzip();
        values.push(stage_values.into());
        actions.push(stage_actions.into());
    }

    Plan {
        space,
        age_class_width: site.age_class_width,
        values: values.into(),
        actions: actions.into(),
    }
}

impl Plan {
    #[must_use]
    pub fn horizon(&self) -> usize {
        self.values.len()
    }

    fn stage(&self, decisions_left: usize) -> usize {
        decisions_left.clamp(1, self.horizon()) - 1
    }

    /// Best achievable return with `decisions_left` decisions to go.
    ///
    /// # Panics
    ///
    /// Panics if the observation is outside of the observation space.
    #[must_use]
    pub fn value(&self, observation: Observation, decisions_left: usize) -> f64 {
        self.values[self.stage(decisions_left)][self.space.index(observation)].into_inner()
    }

    /// Action achieving [`Plan::value`].
    ///
    /// # Panics
    ///
    /// Panics if the observation is outside of the observation space.
    #[must_use]
    pub fn action(&self, observation: Observation, decisions_left: usize) -> Action {
        self.actions[self.stage(decisions_left)][self.space.index(observation)]
    }

    #[must_use]
    pub const fn follow(&self) -> Greedy<'_> {
        Greedy {
            plan: self,
            taken: 0,
        }
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let horizon = self.horizon();
        write!(f, "age\\G")?;
        for g_class in 0..self.space.g.n {
            write!(f, "{g_class:>10}")?;
        }
        writeln!(f)?;
        for e_class in 0..self.space.e.n {
            write!(f, "{:>5}", class_to_age_mark(e_class, self.age_class_width))?;
            for g_class in 0..self.space.g.n {
                let observation = Observation::new(g_class, e_class);
                let action = match self.action(observation, horizon) {
                    Action::NoAction => "-",
                    Action::ThinLight => "T15",
                    Action::ThinHeavy => "T30",
                    Action::Harvest => "H",
                };
                write!(f, "{action:>10}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Follows a [`Plan`], counting down the decisions left.
#[derive(Clone, Copy, Debug)]
pub struct Greedy<'a> {
    plan: &'a Plan,
    taken: usize,
}

impl Policy for Greedy<'_> {
    fn act(&mut self, observation: Observation, _rng: &mut impl Rng) -> Action {
        let decisions_left = self.plan.horizon().saturating_sub(self.taken);
        self.taken += 1;
        self.plan.action(observation, decisions_left)
    }

    fn reset(&mut self) {
        self.taken = 0;
    }
}
