// Color classification policies
use super::dataset::ColorTag;

const HIGH_DEVIATIONS: f64 = 1.5;
const MEDIUM_DEVIATIONS: f64 = 0.75;
const HIGH_PRIORITY: f64 = 8.0;
const MEDIUM_PRIORITY: f64 = 5.0;

/// Mean and sample standard deviation of a set of values
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub count: usize,
    pub mean: f64,
    pub std_dev: f64,
}

impl Summary {
    /// Returns `None` for an empty slice. The deviation uses the n - 1
    /// denominator and is 0 when fewer than two values are present.
    pub fn of(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let count = values.len();
        let mean = values.iter().sum::<f64>() / count as f64;
        let std_dev = if count < 2 {
            0.0
        } else {
            let squared: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
            (squared / (count - 1) as f64).sqrt()
        };

        Some(Self {
            count,
            mean,
            std_dev,
        })
    }

    /// Three-tier rule relative to the mean. Zero spread means every value
    /// sits at the mean, which is never flagged.
    pub fn tier(&self, value: f64) -> ColorTag {
        if self.std_dev <= 0.0 || !self.std_dev.is_finite() {
            return ColorTag::Low;
        }

        if value >= self.mean + HIGH_DEVIATIONS * self.std_dev {
            ColorTag::High
        } else if value >= self.mean + MEDIUM_DEVIATIONS * self.std_dev {
            ColorTag::Medium
        } else {
            ColorTag::Low
        }
    }
}

/// How a dataset's values map to color tags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassificationPolicy {
    /// Every value against the dataset's mean and deviation
    Statistical,
    /// Only the first row is tiered; the rest are baseline context
    FirstRowOnly,
    /// Fixed priority cut-offs, independent of the distribution
    FixedThreshold,
}

impl ClassificationPolicy {
    pub fn classify(&self, values: &[f64]) -> Vec<ColorTag> {
        match self {
            ClassificationPolicy::Statistical => match Summary::of(values) {
                Some(summary) => values.iter().map(|v| summary.tier(*v)).collect(),
                None => Vec::new(),
            },
            ClassificationPolicy::FirstRowOnly => match Summary::of(values) {
                Some(summary) => std::iter::once(summary.tier(values[0]))
                    .chain(std::iter::repeat_n(ColorTag::Baseline, values.len() - 1))
                    .collect(),
                None => Vec::new(),
            },
            ClassificationPolicy::FixedThreshold => {
                values.iter().map(|v| priority_tier(*v)).collect()
            }
        }
    }
}

fn priority_tier(priority: f64) -> ColorTag {
    if priority >= HIGH_PRIORITY {
        ColorTag::High
    } else if priority >= MEDIUM_PRIORITY {
        ColorTag::Medium
    } else {
        ColorTag::Low
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ColorTag::*;

    #[test]
    fn test_summary_uses_sample_deviation() {
        let summary = Summary::of(&[50.0, 10.0, 10.0, 10.0]).unwrap();
        assert_eq!(summary.count, 4);
        assert_eq!(summary.mean, 20.0);
        assert_eq!(summary.std_dev, 20.0);

        assert!(Summary::of(&[]).is_none());
        assert_eq!(Summary::of(&[7.0]).unwrap().std_dev, 0.0);
    }

    #[test]
    fn test_statistical_zero_spread_is_low() {
        let tags = ClassificationPolicy::Statistical.classify(&[10.0, 10.0, 10.0]);
        assert_eq!(tags, vec![Low, Low, Low]);

        let tags = ClassificationPolicy::Statistical.classify(&[42.0]);
        assert_eq!(tags, vec![Low]);
    }

    #[test]
    fn test_statistical_tiers() {
        // mean 13, sample std ~ 19.68
        let values = [50.0, 30.0, 2.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 42.0];
        let summary = Summary::of(&values).unwrap();
        assert!(50.0 >= summary.mean + 1.5 * summary.std_dev);
        assert!(30.0 >= summary.mean + 0.75 * summary.std_dev);
        assert!(30.0 < summary.mean + 1.5 * summary.std_dev);

        let tags = ClassificationPolicy::Statistical.classify(&values);
        assert_eq!(tags[0], High);
        assert_eq!(tags[1], Medium);
        assert_eq!(tags[2], Low);
        assert_eq!(tags[9], Medium);
    }

    #[test]
    fn test_first_row_only_flags_head() {
        let tags = ClassificationPolicy::FirstRowOnly.classify(&[50.0, 10.0, 10.0, 10.0]);
        assert_eq!(tags, vec![High, Baseline, Baseline, Baseline]);
    }

    #[test]
    fn test_first_row_only_ignores_tail_magnitude() {
        let tags = ClassificationPolicy::FirstRowOnly.classify(&[1.0, 1.0, 1.0, 500.0]);
        assert_eq!(tags, vec![Low, Baseline, Baseline, Baseline]);
    }

    #[test]
    fn test_first_row_only_degenerate_inputs() {
        assert!(ClassificationPolicy::FirstRowOnly.classify(&[]).is_empty());
        assert_eq!(ClassificationPolicy::FirstRowOnly.classify(&[9.0]), vec![Low]);
    }

    #[test]
    fn test_fixed_threshold_boundaries() {
        let tags = ClassificationPolicy::FixedThreshold.classify(&[9.0, 7.0, 5.0, 3.0]);
        assert_eq!(tags, vec![High, Medium, Medium, Low]);

        let tags = ClassificationPolicy::FixedThreshold.classify(&[8.0, 4.9, 5.0]);
        assert_eq!(tags, vec![High, Low, Medium]);

        assert!(ClassificationPolicy::FixedThreshold.classify(&[]).is_empty());
    }
}
