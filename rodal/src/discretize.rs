use std::fmt;

use thiserror::Error;

use crate::site::SiteParams;

/// Index (base 0) of the basal area class.
#[inline]
#[must_use]
pub fn basal_area_to_class(basal_area: f64, class_width: f64) -> usize {
    (basal_area / class_width).floor() as usize
}

/// Central mark of a basal area class.
#[inline]
#[must_use]
pub fn class_to_basal_area_mark(index: usize, class_width: f64) -> f64 {
    (index as f64).mul_add(class_width, class_width / 2.0)
}

/// Index (base 0) of the age class. Classes are labelled by their upper bound,
/// so the first class holds ages in `[width, 2 * width)`.
///
/// # Errors
///
/// Returns [`DiscretizeError::AgeBelowFirstClass`] if `age < class_width`.
#[inline]
pub const fn age_to_class(age: u32, class_width: u32) -> Result<usize, DiscretizeError> {
    if age < class_width {
        return Err(DiscretizeError::AgeBelowFirstClass {
            age,
            width: class_width,
        });
    }
    Ok((age / class_width - 1) as usize)
}

/// Upper bound of an age class, used as its representative age.
#[inline]
#[must_use]
pub const fn class_to_age_mark(index: usize, class_width: u32) -> u32 {
    index as u32 * class_width + class_width
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DiscretizeError {
    #[error("age {age} is below the first age class of width {width}")]
    AgeBelowFirstClass { age: u32, width: u32 },
    #[error("age class {class} is outside of the {classes} age classes")]
    AgeOutOfRange { class: usize, classes: usize },
    #[error("basal area class {class} is outside of the {classes} basal area classes")]
    BasalAreaOutOfRange { class: usize, classes: usize },
}

/// Discrete stand observation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Observation {
    pub g_class: usize,
    pub e_class: usize,
}

impl Observation {
    /// Observation left behind by a harvest, until the next reset.
    pub const TERMINAL: Self = Self::new(0, 0);

    #[must_use]
    pub const fn new(g_class: usize, e_class: usize) -> Self {
        Self { g_class, e_class }
    }
}

impl fmt::Display for Observation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.g_class, self.e_class)
    }
}

/// Continuous stand state, only alive inside a single transition.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stand {
    pub basal_area: f64,
    pub age: u32,
}

/// Result of encoding with clamping into the observation space.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Encoded {
    pub observation: Observation,
    pub clamped: bool,
}

/// Maps continuous stand states to observations and back.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Discretizer {
    basal_area_class_width: f64,
    age_class_width: u32,
    num_g_classes: usize,
    num_e_classes: usize,
}

impl From<&SiteParams> for Discretizer {
    fn from(site: &SiteParams) -> Self {
        Self {
            basal_area_class_width: site.basal_area_class_width,
            age_class_width: site.age_class_width,
            num_g_classes: site.num_g_classes,
            num_e_classes: site.num_e_classes,
        }
    }
}

impl Discretizer {
    /// Strict encoding that refuses anything outside of the observation space.
    ///
    /// # Errors
    ///
    /// Fails if either class index falls outside of its range.
    pub fn encode(&self, stand: Stand) -> Result<Observation, DiscretizeError> {
        let g_class = basal_area_to_class(stand.basal_area, self.basal_area_class_width);
        if g_class >= self.num_g_classes {
            return Err(DiscretizeError::BasalAreaOutOfRange {
                class: g_class,
                classes: self.num_g_classes,
            });
        }
        let e_class = age_to_class(stand.age, self.age_class_width)?;
        if e_class >= self.num_e_classes {
            return Err(DiscretizeError::AgeOutOfRange {
                class: e_class,
                classes: self.num_e_classes,
            });
        }
        Ok(Observation { g_class, e_class })
    }

    /// Encoding that always lands in the observation space.
    ///
    /// Basal area above the last class is clamped into it. Ages outside of
    /// the age classes are never produced by the transition engine, so they
    /// are treated as a broken invariant.
    #[must_use]
    pub fn encode_clamped(&self, stand: Stand) -> Encoded {
        let mut clamped = false;
        let mut g_class = basal_area_to_class(stand.basal_area, self.basal_area_class_width);
        if g_class >= self.num_g_classes {
            log::warn!(
                "basal area {:.2} is above the last class, clamping class {g_class}",
                stand.basal_area
            );
            g_class = self.num_g_classes - 1;
            clamped = true;
        }
        let e_class = age_to_class(stand.age, self.age_class_width)
            .ok()
            .filter(|e_class| *e_class < self.num_e_classes);
        debug_assert!(e_class.is_some(), "age {} cannot be encoded", stand.age);
        let e_class = e_class.unwrap_or_else(|| {
            log::error!("age {} cannot be encoded, clamping", stand.age);
            clamped = true;
            if stand.age < self.age_class_width {
                0
            } else {
                self.num_e_classes - 1
            }
        });
        Encoded {
            observation: Observation { g_class, e_class },
            clamped,
        }
    }

    /// Representative continuous state of an observation.
    #[must_use]
    pub fn decode(&self, observation: Observation) -> Stand {
        Stand {
            basal_area: class_to_basal_area_mark(observation.g_class, self.basal_area_class_width),
            age: class_to_age_mark(observation.e_class, self.age_class_width),
        }
    }
}
