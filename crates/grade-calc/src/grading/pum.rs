use super::domain::{Grade, GradeOutcome, Tier};
use super::thresholds::ThresholdSet;
use super::weighting::round_to_integer;

const PUM_CEILING: i64 = 100;

/// A uniform mark could not be interpolated for the resolved grade.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InterpolationError {
    #[error("grade {grade} has no boundary in the threshold set")]
    MissingBoundary { grade: Grade },
    #[error("grade {grade} band is degenerate (lower {lower}, upper {upper})")]
    DegenerateBand { grade: Grade, lower: f64, upper: f64 },
    #[error("maximum weighted total is zero")]
    ZeroMaximum,
}

/// Map a syllabus total onto the 0-100 uniform mark scale.
///
/// Core tier sets use a straight percentage of the maximum weighted total. Extended tier
/// sets interpolate inside the resolved grade's band, with the next offered grade (or the
/// maximum total) as the upper limit, and cap the result at 100. Ungraded totals have no
/// uniform mark.
pub fn compute_pum(
    syllabus_total: i64,
    outcome: GradeOutcome,
    thresholds: &ThresholdSet,
    max_weighted_total: f64,
) -> Result<Option<i64>, InterpolationError> {
    let Some(grade) = outcome.grade() else {
        return Ok(None);
    };
    let total = syllabus_total as f64;

    if thresholds.tier() == Tier::Core {
        if max_weighted_total == 0.0 {
            return Err(InterpolationError::ZeroMaximum);
        }
        return Ok(Some(round_to_integer(total / max_weighted_total * 100.0)));
    }

    let lower = thresholds
        .boundary(grade)
        .ok_or(InterpolationError::MissingBoundary { grade })?;
    let upper = thresholds
        .next_higher(grade)
        .map(|(_, boundary)| boundary)
        .unwrap_or(max_weighted_total);

    if upper == lower {
        return Err(InterpolationError::DegenerateBand {
            grade,
            lower,
            upper,
        });
    }

    let band = grade.pum_band();
    let position = (total - lower) / (upper - lower);
    let pum = position * f64::from(band.multiplier) + f64::from(band.base);
    Ok(Some(round_to_integer(pum).min(PUM_CEILING)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extended() -> ThresholdSet {
        ThresholdSet::from_boundaries([
            (Grade::AStar, 80.0),
            (Grade::A, 70.0),
            (Grade::B, 60.0),
            (Grade::C, 50.0),
            (Grade::D, 40.0),
            (Grade::E, 30.0),
        ])
    }

    fn core() -> ThresholdSet {
        ThresholdSet::from_boundaries([
            (Grade::C, 65.0),
            (Grade::D, 50.0),
            (Grade::E, 35.0),
            (Grade::F, 25.0),
            (Grade::G, 15.0),
        ])
    }

    fn pum_for(total: i64, set: &ThresholdSet, max: f64) -> Option<i64> {
        compute_pum(total, set.resolve_grade(total), set, max).expect("interpolates")
    }

    #[test]
    fn extended_interpolates_inside_band() {
        let set = extended();
        assert_eq!(pum_for(77, &set, 100.0), Some(87));
        assert_eq!(pum_for(70, &set, 100.0), Some(80));
        assert_eq!(pum_for(55, &set, 100.0), Some(65));
    }

    #[test]
    fn top_grade_uses_maximum_total_and_caps_at_one_hundred() {
        let set = extended();
        assert_eq!(pum_for(90, &set, 100.0), Some(96));
        assert_eq!(pum_for(100, &set, 100.0), Some(100));
        assert_eq!(pum_for(110, &set, 100.0), Some(100));
    }

    #[test]
    fn extended_is_monotone_and_capped() {
        let set = extended();
        let mut previous = None;
        for total in 30..=100 {
            let pum = pum_for(total, &set, 100.0);
            assert!(pum >= previous, "total {total} lowered the uniform mark");
            assert!(pum.is_some_and(|value| value <= 100));
            previous = pum;
        }
    }

    #[test]
    fn core_is_a_plain_percentage() {
        let set = core();
        assert_eq!(pum_for(50, &set, 100.0), Some(50));
        assert_eq!(pum_for(100, &set, 100.0), Some(100));
        assert_eq!(pum_for(130, &set, 160.0), Some(81));
    }

    #[test]
    fn ungraded_has_no_uniform_mark() {
        let set = extended();
        assert_eq!(pum_for(10, &set, 100.0), None);
    }

    #[test]
    fn degenerate_band_is_an_error() {
        let set = ThresholdSet::from_boundaries([(Grade::A, 70.0), (Grade::B, 70.0)]);
        let err = compute_pum(70, GradeOutcome::Graded(Grade::B), &set, 100.0).unwrap_err();
        assert_eq!(
            err,
            InterpolationError::DegenerateBand {
                grade: Grade::B,
                lower: 70.0,
                upper: 70.0
            }
        );

        let top = ThresholdSet::from_boundaries([(Grade::A, 100.0)]);
        assert!(compute_pum(100, GradeOutcome::Graded(Grade::A), &top, 100.0).is_err());
    }

    #[test]
    fn core_with_zero_maximum_is_an_error() {
        let set = core();
        let err = compute_pum(20, GradeOutcome::Graded(Grade::G), &set, 0.0).unwrap_err();
        assert_eq!(err, InterpolationError::ZeroMaximum);
    }

    #[test]
    fn grade_outside_the_set_is_missing_boundary() {
        let set = extended();
        let err = compute_pum(5, GradeOutcome::Graded(Grade::G), &set, 100.0).unwrap_err();
        assert_eq!(err, InterpolationError::MissingBoundary { grade: Grade::G });
    }

    #[test]
    fn totals_below_the_band_are_not_floor_clamped() {
        let set = extended();
        let pum = compute_pum(65, GradeOutcome::Graded(Grade::A), &set, 100.0).expect("computes");
        assert_eq!(pum, Some(75));
    }
}
