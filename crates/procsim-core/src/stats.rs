//! Summary statistics over sojourn times

use average::Variance;
use serde::{Deserialize, Serialize};

/// Mean and spread of a sample of sojourn times
///
/// Built only from non-empty samples: an empty sample has no summary, which
/// callers see as `None` ("no data") rather than a NaN.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (n - 1 denominator); 0.0 for a single sample
    pub std_dev: f64,
    /// Population standard deviation (n denominator)
    pub population_std_dev: f64,
    pub min: f64,
    pub max: f64,
}

impl Summary {
    /// Summarize `samples`, or `None` if there are none
    pub fn from_samples(samples: &[f64]) -> Option<Summary> {
        if samples.is_empty() {
            return None;
        }

        let variance: Variance = samples.iter().copied().collect();
        let std_dev = if samples.len() < 2 {
            0.0
        } else {
            variance.sample_variance().sqrt()
        };

        let min = samples.iter().copied().fold(f64::INFINITY, f64::min);
        let max = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Some(Summary {
            count: samples.len(),
            mean: variance.mean(),
            std_dev,
            population_std_dev: variance.population_variance().sqrt(),
            min,
            max,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_empty_sample_has_no_summary() {
        assert!(Summary::from_samples(&[]).is_none());
    }

    #[test]
    fn test_single_sample() {
        let summary = Summary::from_samples(&[20.0]).unwrap();
        assert_eq!(summary.count, 1);
        assert_eq!(summary.mean, 20.0);
        assert_eq!(summary.std_dev, 0.0);
        assert_eq!(summary.population_std_dev, 0.0);
        assert_eq!(summary.min, 20.0);
        assert_eq!(summary.max, 20.0);
    }

    #[test]
    fn test_mean_and_deviations() {
        // mean 5, squared deviations sum to 32
        let samples = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let summary = Summary::from_samples(&samples).unwrap();

        assert_eq!(summary.count, 8);
        assert!(approx(summary.mean, 5.0));
        assert!(approx(summary.population_std_dev, 2.0));
        assert!(approx(summary.std_dev, (32.0f64 / 7.0).sqrt()));
        assert_eq!(summary.min, 2.0);
        assert_eq!(summary.max, 9.0);
    }
}
