use super::domain::{MarkEntry, WeightedResult};
use serde::Serialize;

/// Totals produced by applying weighting factors to validated marks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightedSummary {
    pub syllabus_total: i64,
    pub max_weighted_total: f64,
    pub details: Vec<WeightedResult>,
}

/// Round half to even; the single rounding rule for totals and uniform marks.
pub(crate) fn round_to_integer(value: f64) -> i64 {
    value.round_ties_even() as i64
}

pub(crate) fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// Weight each mark and sum into the syllabus total.
///
/// The syllabus total is rounded from the unrounded weighted sum; per-component weighted
/// marks are rounded to two decimals for display only. The maximum total is the exact sum
/// of each component's maximum weighted mark.
pub fn apply_weighting(entries: &[MarkEntry<'_>]) -> WeightedSummary {
    let mut weighted_sum = 0.0;
    let mut details = Vec::with_capacity(entries.len());

    for entry in entries {
        let weighting = entry.weighting;
        let weighted_mark = entry.raw_mark * weighting.weighting_factor;
        weighted_sum += weighted_mark;

        details.push(WeightedResult {
            component_code: entry.component_code().to_string(),
            raw_mark: entry.raw_mark,
            max_raw_mark: weighting.max_raw_mark,
            weighting_factor: weighting.weighting_factor,
            weighted_mark: round_to_hundredths(weighted_mark),
            max_weighted_mark: weighting.max_weighted_mark,
        });
    }

    let max_weighted_total = entries
        .iter()
        .map(|entry| entry.weighting.max_weighted_mark)
        .sum();

    WeightedSummary {
        syllabus_total: round_to_integer(weighted_sum),
        max_weighted_total,
        details,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grading::domain::ComponentWeighting;

    fn weighting(code: &str, max_raw: f64, factor: f64) -> ComponentWeighting {
        ComponentWeighting {
            component_code: code.to_string(),
            max_raw_mark: max_raw,
            max_weighted_mark: max_raw * factor,
            weighting_factor: factor,
        }
    }

    #[test]
    fn weights_marks_and_sums_totals() {
        let weightings = vec![
            weighting("21", 40.0, 0.75),
            weighting("41", 80.0, 0.625),
            weighting("61", 40.0, 0.5),
        ];
        let entries: Vec<MarkEntry<'_>> = [36.0, 54.0, 32.0]
            .into_iter()
            .zip(&weightings)
            .map(|(raw_mark, weighting)| MarkEntry {
                raw_mark,
                weighting,
            })
            .collect();

        let summary = apply_weighting(&entries);

        assert_eq!(summary.syllabus_total, 77);
        assert_eq!(summary.max_weighted_total, 100.0);
        let weighted: Vec<f64> = summary.details.iter().map(|d| d.weighted_mark).collect();
        assert_eq!(weighted, vec![27.0, 33.75, 16.0]);
        assert_eq!(summary.details[1].component_code, "41");
        assert_eq!(summary.details[1].max_weighted_mark, 50.0);
    }

    #[test]
    fn total_rounds_the_unrounded_sum() {
        let weightings = vec![weighting("11", 3.0, 1.0 / 3.0), weighting("12", 3.0, 1.0 / 3.0)];
        let entries: Vec<MarkEntry<'_>> = weightings
            .iter()
            .map(|weighting| MarkEntry {
                raw_mark: 2.0,
                weighting,
            })
            .collect();

        let summary = apply_weighting(&entries);

        assert_eq!(summary.details[0].weighted_mark, 0.67);
        assert_eq!(summary.syllabus_total, 1);
    }

    #[test]
    fn weighted_mark_never_decreases_with_raw_mark() {
        let component = weighting("41", 80.0, 0.625);
        let mut previous = f64::MIN;
        for raw in 0..=80 {
            let entry = MarkEntry {
                raw_mark: f64::from(raw),
                weighting: &component,
            };
            let summary = apply_weighting(&[entry]);
            let weighted = summary.details[0].weighted_mark;
            assert!(weighted >= previous, "raw {raw} produced {weighted}");
            previous = weighted;
        }
    }

    #[test]
    fn rounding_ties_go_to_even() {
        assert_eq!(round_to_integer(76.5), 76);
        assert_eq!(round_to_integer(77.5), 78);
        assert_eq!(round_to_integer(76.75), 77);
    }
}
