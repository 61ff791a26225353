//! Growth and yield equations for a Pinus taeda stand.
//!
//! The coefficients are site regression constants. They are not tunables.

/// Broken preconditions are fatal in debug builds. Release builds log them
/// and the caller clamps the input.
fn precondition(holds: bool, message: &str) {
    debug_assert!(holds, "{message}");
    if !holds {
        log::error!("{message}, clamping");
    }
}

/// Basal area (m^2/ha) at the initial age, from planting density (trees/ha).
#[must_use]
pub fn initial_basal_area(
    planting_density: f64,
    site_index: f64,
    initial_age: u32,
    survival: f64,
) -> f64 {
    precondition(planting_density > 0.0, "planting density must be positive");
    precondition(initial_age > 0, "initial age must be positive");
    let initial_age = initial_age.max(1);
    (-4.701_985 - 0.353_551 * site_index / f64::from(initial_age)
        + 0.596_669 * (planting_density.max(0.0) * survival).ln()
        + 0.220_277 * site_index)
        .exp()
}

/// Basal area at the end of one year of growth ending at `age_end`,
/// given the basal area at `age_end - 1`.
#[must_use]
pub fn project_basal_area(age_end: u32, basal_area_start: f64, site_index: f64) -> f64 {
    precondition(age_end >= 2, "growth is undefined before the second year");
    precondition(basal_area_start > 0.0, "basal area must be positive");
    let age_end = f64::from(age_end.max(2));
    let ratio = (age_end - 1.0) / age_end;
    (ratio * basal_area_start.max(0.0).ln()
        + 2.098_464 * (1.0 - ratio)
        + 0.096_649 * site_index * (1.0 - ratio))
        .exp()
}

/// Basal area that repeated growth converges to.
#[must_use]
pub fn asymptote(site_index: f64) -> f64 {
    0.096_649_f64.mul_add(site_index, 2.098_464).exp()
}

/// Total volume over bark (m^3/ha).
#[must_use]
pub fn volume(age: u32, basal_area: f64, site_index: f64) -> f64 {
    precondition(age > 0, "age must be positive");
    precondition(basal_area > 0.0, "basal area must be positive");
    (1.627_362 + 0.058_201 * site_index - 6.937_454 / f64::from(age.max(1))
        + 0.949_623 * basal_area.max(0.0).ln())
    .exp()
}

#[cfg(test)]
mod tests {
    use super::{asymptote, initial_basal_area, project_basal_area, volume};
    use crate::site::{
        FIRST_THINNING_AGE,
        INITIAL_AGE,
        MAX_ROTATION_AGE,
        PLANTING_DENSITIES,
        SITE_INDEX,
        SURVIVAL,
    };

    #[test]
    fn known_values() {
        let initial = initial_basal_area(625.0, SITE_INDEX, INITIAL_AGE, SURVIVAL);
        assert!((initial - 5.7337).abs() < 1e-3, "{initial}");
        let grown = project_basal_area(FIRST_THINNING_AGE, initial, SITE_INDEX);
        assert!((grown - 9.0565).abs() < 1e-3, "{grown}");
        let v = volume(5, 27.0, SITE_INDEX);
        assert!((v - 93.1).abs() < 0.5, "{v}");
    }

    #[test]
    fn denser_plantings_start_with_more_basal_area() {
        let areas: Vec<_> = PLANTING_DENSITIES
            .iter()
            .map(|&np| initial_basal_area(np, SITE_INDEX, INITIAL_AGE, SURVIVAL))
            .collect();
        assert!(areas.iter().all(|g| *g > 0.0));
        assert!(areas.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn volume_increases_with_basal_area() {
        for age in (5..=MAX_ROTATION_AGE).step_by(5) {
            let mut previous = 0.0;
            for tenths in 1..=600 {
                let v = volume(age, f64::from(tenths) / 10.0, SITE_INDEX);
                assert!(v > previous, "age {age}, basal area {tenths}/10");
                previous = v;
            }
        }
    }

    #[test]
    fn growth_does_not_decrease_below_asymptote() {
        let limit = asymptote(SITE_INDEX);
        for &np in &PLANTING_DENSITIES {
            let mut basal_area = initial_basal_area(np, SITE_INDEX, INITIAL_AGE, SURVIVAL);
            for age_end in (INITIAL_AGE + 1)..=(MAX_ROTATION_AGE + 5) {
                let next = project_basal_area(age_end, basal_area, SITE_INDEX);
                assert!(next >= basal_area, "density {np}, age {age_end}");
                assert!(next <= limit);
                basal_area = next;
            }
        }
    }

    #[test]
    fn asymptote_is_a_fixed_point() {
        let limit = asymptote(SITE_INDEX);
        for age_end in 2..50 {
            let next = project_basal_area(age_end, limit, SITE_INDEX);
            assert!((next - limit).abs() < 1e-9);
        }
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic = "basal area must be positive"]
    fn volume_of_empty_stand_is_fatal_in_debug() {
        let _ = volume(10, 0.0, SITE_INDEX);
    }

    #[test]
    #[cfg(not(debug_assertions))]
    fn broken_preconditions_are_clamped_in_release() {
        assert!(volume(10, -1.0, SITE_INDEX).abs() < f64::EPSILON);
        assert!(volume(0, 20.0, SITE_INDEX).is_finite());
        assert!(project_basal_area(6, -1.0, SITE_INDEX).abs() < f64::EPSILON);
        assert!(project_basal_area(0, 10.0, SITE_INDEX).is_finite());
        let initial = initial_basal_area(-625.0, SITE_INDEX, INITIAL_AGE, SURVIVAL);
        assert!(initial.abs() < f64::EPSILON);
    }
}
