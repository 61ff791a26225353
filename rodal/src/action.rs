use std::fmt;

use thiserror::Error;

/// Management action taken at the start of a decision period.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    NoAction,
    ThinLight,
    ThinHeavy,
    Harvest,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("action {action} is outside of the action space")]
pub struct InvalidAction {
    pub action: usize,
}

impl Action {
    pub const ALL: [Self; 4] = [Self::NoAction, Self::ThinLight, Self::ThinHeavy, Self::Harvest];

    /// Fraction of basal area removed by a thinning.
    #[must_use]
    pub const fn removal(self) -> f64 {
        match self {
            Self::ThinLight => 0.15,
            Self::ThinHeavy => 0.30,
            Self::NoAction | Self::Harvest => 0.0,
        }
    }

    /// Fraction of basal area left standing before growth.
    #[must_use]
    pub fn retained(self) -> f64 {
        1.0 - self.removal()
    }

    #[must_use]
    pub const fn is_thinning(self) -> bool {
        matches!(self, Self::ThinLight | Self::ThinHeavy)
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl TryFrom<usize> for Action {
    type Error = InvalidAction;

    fn try_from(action: usize) -> Result<Self, Self::Error> {
        Self::ALL
            .get(action)
            .copied()
            .ok_or(InvalidAction { action })
    }
}

impl From<Action> for usize {
    fn from(value: Action) -> Self {
        value.index()
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoAction => write!(f, "none"),
            Self::ThinLight => write!(f, "thin 15%"),
            Self::ThinHeavy => write!(f, "thin 30%"),
            Self::Harvest => write!(f, "harvest"),
        }
    }
}
