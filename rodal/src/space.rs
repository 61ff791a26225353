use rand::Rng;

use crate::{action::Action, discretize::Observation, site::SiteParams};

/// Finite range `0..n`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Discrete {
    pub n: usize,
}

impl Discrete {
    #[must_use]
    pub const fn new(n: usize) -> Self {
        Self { n }
    }

    #[must_use]
    pub const fn contains(&self, x: usize) -> bool {
        x < self.n
    }

    pub fn sample(&self, rng: &mut impl Rng) -> usize {
        rng.gen_range(0..self.n)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ActionSpace(pub Discrete);

impl Default for ActionSpace {
    fn default() -> Self {
        Self(Discrete::new(Action::ALL.len()))
    }
}

impl ActionSpace {
    #[must_use]
    pub const fn contains(&self, action: usize) -> bool {
        self.0.contains(action)
    }

    pub fn sample(&self, rng: &mut impl Rng) -> Action {
        Action::ALL[self.0.sample(rng)]
    }
}

/// Basal area classes times age classes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ObservationSpace {
    pub g: Discrete,
    pub e: Discrete,
}

impl From<&SiteParams> for ObservationSpace {
    fn from(site: &SiteParams) -> Self {
        Self {
            g: Discrete::new(site.num_g_classes),
            e: Discrete::new(site.num_e_classes),
        }
    }
}

impl ObservationSpace {
    #[must_use]
    pub const fn contains(&self, observation: Observation) -> bool {
        self.g.contains(observation.g_class) && self.e.contains(observation.e_class)
    }

    pub fn sample(&self, rng: &mut impl Rng) -> Observation {
        Observation::new(self.g.sample(rng), self.e.sample(rng))
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.g.n * self.e.n
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flat index of an observation, age major.
    #[must_use]
    pub const fn index(&self, observation: Observation) -> usize {
        observation.e_class * self.g.n + observation.g_class
    }

    /// Every observation in flat index order.
    pub fn observations(&self) -> impl Iterator<Item = Observation> {
        let g = self.g.n;
        (0..self.e.n)
            .flat_map(move |e_class| (0..g).map(move |g_class| Observation::new(g_class, e_class)))
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::{ActionSpace, ObservationSpace};
    use crate::{discretize::Observation, site::SiteParams};

    #[test]
    fn bounds() {
        let space = ObservationSpace::from(&SiteParams::default());
        assert_eq!(space.len(), 60);
        assert!(space.contains(Observation::new(9, 5)));
        assert!(!space.contains(Observation::new(10, 5)));
        assert!(!space.contains(Observation::new(9, 6)));
        let actions = ActionSpace::default();
        assert!(actions.contains(3));
        assert!(!actions.contains(4));
    }

    #[test]
    fn flat_indices_follow_iteration_order() {
        let space = ObservationSpace::from(&SiteParams::default());
        for (i, observation) in space.observations().enumerate() {
            assert_eq!(space.index(observation), i);
        }
        assert_eq!(space.observations().count(), space.len());
    }

    #[test]
    fn samples_stay_inside() {
        let mut rng = ChaCha8Rng::seed_from_u64(123);
        let space = ObservationSpace::from(&SiteParams::default());
        let actions = ActionSpace::default();
        for _ in 0..1000 {
            assert!(space.contains(space.sample(&mut rng)));
            assert!(actions.contains(actions.sample(&mut rng).index()));
        }
    }
}
