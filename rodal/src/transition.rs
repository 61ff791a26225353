//! Thinning, growth and harvested-volume reward over one decision period.

use crate::{
    action::Action,
    discretize::Stand,
    growth::{project_basal_area, volume},
    site::SiteParams,
};

/// Remove basal area according to `action`, then grow the stand
/// for one decision period.
///
/// Basal area is always grown over `age_class_width` years. The age of the
/// returned stand moves by [`SiteParams::age_step`].
#[must_use]
pub fn apply_action(site: &SiteParams, stand: Stand, action: Action) -> Stand {
    let mut basal_area = stand.basal_area * action.retained();
    for age_end in (stand.age + 1)..=(stand.age + site.age_class_width) {
        basal_area = project_basal_area(age_end, basal_area, site.site_index);
    }
    Stand {
        basal_area,
        age: stand.age + site.age_step(),
    }
}

/// Volume removed from the stand by `action`.
#[must_use]
pub fn compute_reward(site: &SiteParams, stand: Stand, action: Action) -> f64 {
    match action {
        Action::NoAction => 0.0,
        Action::ThinLight | Action::ThinHeavy => {
            let before = volume(stand.age, stand.basal_area, site.site_index);
            let after = volume(
                stand.age,
                stand.basal_area * action.retained(),
                site.site_index,
            );
            before - after
        }
        Action::Harvest => volume(stand.age, stand.basal_area, site.site_index),
    }
}

/// Action that is actually applied. Only harvest is allowed at the maximum age.
#[must_use]
pub const fn effective_action(site: &SiteParams, age: u32, requested: Action) -> Action {
    if age == site.max_rotation_age {
        Action::Harvest
    } else {
        requested
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Outcome {
    pub applied: Action,
    pub forced_harvest: bool,
    pub reward: f64,
    /// Stand after the period, `None` once harvested.
    pub next: Option<Stand>,
}

/// Full transition of a continuous stand under a requested action.
#[must_use]
pub fn transition(site: &SiteParams, stand: Stand, requested: Action) -> Outcome {
    let applied = effective_action(site, stand.age, requested);
    let reward = compute_reward(site, stand, applied);
    let next = match applied {
        Action::Harvest => None,
        _ => Some(apply_action(site, stand, applied)),
    };
    Outcome {
        applied,
        forced_harvest: applied != requested,
        reward,
        next,
    }
}

#[cfg(test)]
mod tests {
    use super::{apply_action, compute_reward, transition};
    use crate::{
        action::Action,
        discretize::{Discretizer, Stand},
        growth::volume,
        site::{AgeAdvance, SiteParams},
        space::ObservationSpace,
    };

    #[test]
    fn light_thinning_at_first_decision() {
        let site = SiteParams::default();
        let stand = Stand {
            basal_area: 30.0,
            age: 5,
        };
        let reward = compute_reward(&site, stand, Action::ThinLight);
        assert!(reward > 0.0);
        let next = apply_action(&site, stand, Action::ThinLight);
        assert_eq!(next.age, 6);
        assert!(next.basal_area > 30.0 * 0.85);

        let site = site.with_age_advance(AgeAdvance::Period);
        assert_eq!(apply_action(&site, stand, Action::ThinLight).age, 10);
    }

    #[test]
    fn growth_does_not_depend_on_age_advance() {
        let stand = Stand {
            basal_area: 15.0,
            age: 10,
        };
        let year = apply_action(&SiteParams::default(), stand, Action::NoAction);
        let period = apply_action(
            &SiteParams::default().with_age_advance(AgeAdvance::Period),
            stand,
            Action::NoAction,
        );
        assert!((year.basal_area - period.basal_area).abs() < f64::EPSILON);
    }

    #[test]
    fn heavier_thinning_leaves_less() {
        let site = SiteParams::default();
        let stand = Stand {
            basal_area: 33.0,
            age: 15,
        };
        let none = apply_action(&site, stand, Action::NoAction).basal_area;
        let light = apply_action(&site, stand, Action::ThinLight).basal_area;
        let heavy = apply_action(&site, stand, Action::ThinHeavy).basal_area;
        assert!(none > light && light > heavy);
        let light = compute_reward(&site, stand, Action::ThinLight);
        let heavy = compute_reward(&site, stand, Action::ThinHeavy);
        assert!(heavy > light);
    }

    #[test]
    fn rewards_over_every_observation() {
        let site = SiteParams::default();
        let discretizer = Discretizer::from(&site);
        for observation in ObservationSpace::from(&site).observations() {
            let stand = discretizer.decode(observation);
            let full = volume(stand.age, stand.basal_area, site.site_index);
            assert!(compute_reward(&site, stand, Action::ThinLight) >= 0.0);
            assert!(compute_reward(&site, stand, Action::ThinHeavy) >= 0.0);
            assert!(compute_reward(&site, stand, Action::NoAction).abs() < f64::EPSILON);
            assert!((compute_reward(&site, stand, Action::Harvest) - full).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn harvest_is_forced_at_maximum_age() {
        let site = SiteParams::default();
        for age in [5, 10, 15, 20, 25, 30] {
            for requested in Action::ALL {
                let stand = Stand {
                    basal_area: 27.0,
                    age,
                };
                let outcome = transition(&site, stand, requested);
                let forced = age == site.max_rotation_age && requested != Action::Harvest;
                assert_eq!(outcome.forced_harvest, forced);
                if age == site.max_rotation_age {
                    assert_eq!(outcome.applied, Action::Harvest);
                    assert_eq!(outcome.next, None);
                    let full = volume(age, 27.0, site.site_index);
                    assert!((outcome.reward - full).abs() < f64::EPSILON);
                } else {
                    assert_eq!(outcome.applied, requested);
                    assert_eq!(outcome.next.is_none(), requested == Action::Harvest);
                }
            }
        }
    }
}
