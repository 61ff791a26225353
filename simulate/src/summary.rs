use std::{fmt, iter::Sum, ops::AddAssign};

use rodal::agent::rollout::Episode;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub episodes: u32,
    pub truncated: u32,
    pub steps: usize,
    pub total_reward: f64,
    pub thinned: f64,
    pub harvested: f64,
    pub min_reward: f64,
    pub max_reward: f64,
}

impl Default for Summary {
    fn default() -> Self {
        Self {
            episodes: 0,
            truncated: 0,
            steps: 0,
            total_reward: 0.0,
            thinned: 0.0,
            harvested: 0.0,
            min_reward: f64::INFINITY,
            max_reward: f64::NEG_INFINITY,
        }
    }
}

impl From<&Episode> for Summary {
    fn from(episode: &Episode) -> Self {
        Self {
            episodes: 1,
            truncated: episode.truncated.into(),
            steps: episode.len(),
            total_reward: episode.total_reward,
            thinned: episode.thinned_volume(),
            harvested: episode.harvested_volume(),
            min_reward: episode.total_reward,
            max_reward: episode.total_reward,
        }
    }
}

impl AddAssign for Summary {
    fn add_assign(&mut self, rhs: Self) {
        self.episodes += rhs.episodes;
        self.truncated += rhs.truncated;
        self.steps += rhs.steps;
        self.total_reward += rhs.total_reward;
        self.thinned += rhs.thinned;
        self.harvested += rhs.harvested;
        self.min_reward = self.min_reward.min(rhs.min_reward);
        self.max_reward = self.max_reward.max(rhs.max_reward);
    }
}

impl Sum for Summary {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), |mut a, b| {
            a += b;
            a
        })
    }
}

impl Summary {
    pub fn mean_reward(&self) -> f64 {
        self.total_reward / f64::from(self.episodes.max(1))
    }

    pub fn mean_length(&self) -> f64 {
        #![allow(clippy::cast_precision_loss)]
        self.steps as f64 / f64::from(self.episodes.max(1))
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let episodes = f64::from(self.episodes.max(1));
        write!(
            f,
            "{} rotations, reward {:.1} m^3/ha (min {:.1}, max {:.1}), thinned {:.1}, harvested \
             {:.1}, {:.2} decisions, {} truncated",
            self.episodes,
            self.mean_reward(),
            self.min_reward,
            self.max_reward,
            self.thinned / episodes,
            self.harvested / episodes,
            self.mean_length(),
            self.truncated,
        )
    }
}
