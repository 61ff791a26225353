use thiserror::Error;

/// Site index of the modelled Pinus taeda stand.
pub const SITE_INDEX: f64 = 20.0;
/// Fraction of planted trees alive at the initial age.
pub const SURVIVAL: f64 = 0.95;
/// Age at which planting density is converted to basal area.
pub const INITIAL_AGE: u32 = 4;
/// First age at which a management decision is taken.
pub const FIRST_THINNING_AGE: u32 = 5;
/// Maximum rotation age. Only harvest is allowed here.
pub const MAX_ROTATION_AGE: u32 = 30;
/// Width of a basal area class in m^2/ha.
pub const BASAL_AREA_CLASS_WIDTH: f64 = 6.0;
/// Width of an age class in years, also the decision period.
pub const AGE_CLASS_WIDTH: u32 = 5;
/// Planting densities in trees/ha, roughly 4x4, 3.5x3.5, 3x3, 2.5x2.5 and 2x2 m spacing.
pub const PLANTING_DENSITIES: [f64; 5] = [625.0, 816.0, 1111.0, 1600.0, 2500.0];
pub const NUM_G_CLASSES: usize = 10;
pub const NUM_E_CLASSES: usize = 6;

/// How far the stand age moves after one decision period of growth.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AgeAdvance {
    /// Basal area is grown over a whole period but the age only advances by one year.
    #[default]
    Year,
    /// The age advances to the end of the grown period.
    Period,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("there must be at least one planting density")]
    NoPlantingDensities,
    #[error("planting density {0} is not positive")]
    NonPositiveDensity(f64),
    #[error("survival {0} is outside of (0, 1]")]
    Survival(f64),
    #[error("site index {0} is not positive")]
    SiteIndex(f64),
    #[error("basal area class width {0} is not positive")]
    BasalAreaClassWidth(f64),
    #[error("age class width must be positive")]
    AgeClassWidth,
    #[error("first thinning age {0} is below 2")]
    FirstThinningAge(u32),
    #[error("initial age {initial} must be positive and below the first thinning age {first}")]
    InitialAge { initial: u32, first: u32 },
    #[error("age {age} is not on an age class boundary of width {width}")]
    OffBoundary { age: u32, width: u32 },
    #[error("maximum rotation age {max} does not end the last of {classes} age classes")]
    MaxRotationAge { max: u32, classes: usize },
    #[error("there must be at least one class on each axis")]
    NoClasses,
}

/// Immutable parameters of a single stand simulation.
#[derive(Clone, Debug, PartialEq)]
pub struct SiteParams {
    pub site_index: f64,
    pub survival: f64,
    pub initial_age: u32,
    pub first_thinning_age: u32,
    pub max_rotation_age: u32,
    pub basal_area_class_width: f64,
    pub age_class_width: u32,
    pub planting_densities: Box<[f64]>,
    pub num_g_classes: usize,
    pub num_e_classes: usize,
    pub age_advance: AgeAdvance,
}

impl Default for SiteParams {
    fn default() -> Self {
        Self {
            site_index: SITE_INDEX,
            survival: SURVIVAL,
            initial_age: INITIAL_AGE,
            first_thinning_age: FIRST_THINNING_AGE,
            max_rotation_age: MAX_ROTATION_AGE,
            basal_area_class_width: BASAL_AREA_CLASS_WIDTH,
            age_class_width: AGE_CLASS_WIDTH,
            planting_densities: PLANTING_DENSITIES.into(),
            num_g_classes: NUM_G_CLASSES,
            num_e_classes: NUM_E_CLASSES,
            age_advance: AgeAdvance::default(),
        }
    }
}

impl SiteParams {
    #[must_use]
    pub fn with_site_index(mut self, site_index: f64) -> Self {
        self.site_index = site_index;
        self
    }

    #[must_use]
    pub fn with_survival(mut self, survival: f64) -> Self {
        self.survival = survival;
        self
    }

    #[must_use]
    pub fn with_age_advance(mut self, age_advance: AgeAdvance) -> Self {
        self.age_advance = age_advance;
        self
    }

    #[must_use]
    pub fn with_planting_densities(mut self, densities: impl Into<Box<[f64]>>) -> Self {
        self.planting_densities = densities.into();
        self
    }

    /// Number of years the age advances after one decision period.
    #[must_use]
    pub const fn age_step(&self) -> u32 {
        match self.age_advance {
            AgeAdvance::Year => 1,
            AgeAdvance::Period => self.age_class_width,
        }
    }

    /// Largest number of decisions an episode can take when the age
    /// advances by whole periods. At least one for any parameters.
    #[must_use]
    pub const fn horizon(&self) -> usize {
        let span = self.max_rotation_age.saturating_sub(self.first_thinning_age);
        match span.checked_div(self.age_class_width) {
            Some(periods) => periods as usize + 1,
            None => 1,
        }
    }

    /// Check that the parameters describe a usable stand.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.planting_densities.is_empty() {
            return Err(ConfigError::NoPlantingDensities);
        }
        if let Some(&density) = self.planting_densities.iter().find(|d| **d <= 0.0 || d.is_nan()) {
            return Err(ConfigError::NonPositiveDensity(density));
        }
        if !(self.survival > 0.0 && self.survival <= 1.0) {
            return Err(ConfigError::Survival(self.survival));
        }
        if self.site_index.is_nan() || self.site_index <= 0.0 {
            return Err(ConfigError::SiteIndex(self.site_index));
        }
        if self.basal_area_class_width.is_nan() || self.basal_area_class_width <= 0.0 {
            return Err(ConfigError::BasalAreaClassWidth(self.basal_area_class_width));
        }
        if self.age_class_width == 0 {
            return Err(ConfigError::AgeClassWidth);
        }
        if self.num_g_classes == 0 || self.num_e_classes == 0 {
            return Err(ConfigError::NoClasses);
        }
        if self.first_thinning_age < 2 {
            return Err(ConfigError::FirstThinningAge(self.first_thinning_age));
        }
        if self.initial_age == 0 || self.initial_age >= self.first_thinning_age {
            return Err(ConfigError::InitialAge {
                initial: self.initial_age,
                first: self.first_thinning_age,
            });
        }
        for age in [self.first_thinning_age, self.max_rotation_age] {
            if age % self.age_class_width != 0 {
                return Err(ConfigError::OffBoundary {
                    age,
                    width: self.age_class_width,
                });
            }
        }
        let last_class = (self.max_rotation_age / self.age_class_width) as usize;
        if self.max_rotation_age < self.first_thinning_age || last_class != self.num_e_classes {
            return Err(ConfigError::MaxRotationAge {
                max: self.max_rotation_age,
                classes: self.num_e_classes,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{AgeAdvance, ConfigError, SiteParams};

    #[test]
    fn default_is_valid() {
        let site = SiteParams::default();
        assert_eq!(site.validate(), Ok(()));
        assert_eq!(site.horizon(), 6);
        assert_eq!(site.age_step(), 1);
        assert_eq!(site.with_age_advance(AgeAdvance::Period).age_step(), 5);
    }

    #[test]
    fn horizon_of_unvalidated_parameters() {
        let inverted = SiteParams {
            max_rotation_age: 0,
            ..Default::default()
        };
        assert!(inverted.validate().is_err());
        assert_eq!(inverted.horizon(), 1);
        let no_width = SiteParams {
            age_class_width: 0,
            ..Default::default()
        };
        assert_eq!(no_width.validate(), Err(ConfigError::AgeClassWidth));
        assert_eq!(no_width.horizon(), 1);
    }

    #[test]
    fn rejects_bad_parameters() {
        assert_eq!(
            SiteParams::default()
                .with_planting_densities(Vec::<f64>::new())
                .validate(),
            Err(ConfigError::NoPlantingDensities)
        );
        assert_eq!(
            SiteParams::default()
                .with_planting_densities(vec![625.0_f64, 0.0])
                .validate(),
            Err(ConfigError::NonPositiveDensity(0.0))
        );
        assert_eq!(
            SiteParams::default().with_survival(1.5).validate(),
            Err(ConfigError::Survival(1.5))
        );
        assert_eq!(
            SiteParams::default().with_site_index(-1.0).validate(),
            Err(ConfigError::SiteIndex(-1.0))
        );
        assert_eq!(
            SiteParams {
                max_rotation_age: 32,
                ..Default::default()
            }
            .validate(),
            Err(ConfigError::OffBoundary { age: 32, width: 5 })
        );
        assert_eq!(
            SiteParams {
                max_rotation_age: 35,
                ..Default::default()
            }
            .validate(),
            Err(ConfigError::MaxRotationAge {
                max: 35,
                classes: 6
            })
        );
        assert_eq!(
            SiteParams {
                initial_age: 5,
                ..Default::default()
            }
            .validate(),
            Err(ConfigError::InitialAge {
                initial: 5,
                first: 5
            })
        );
    }
}
