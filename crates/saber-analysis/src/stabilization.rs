//! Stabilization points derived from reliability results.
//!
//! A statistic is considered stabilized at the smallest threshold whose reliability
//! reaches a target (conventionally 0.7, where roughly half of the observed variance is
//! signal).

use std::fmt;

use serde::Serialize;

use crate::reliability::ReliabilityResult;

pub const DEFAULT_STABILIZATION_TARGET: f64 = 0.7;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StabilizationPoint {
    pub category: String,
    pub statistic: String,
    /// Smallest threshold whose reliability reaches the target
    pub threshold: Option<u32>,
    /// Reliability at [`Self::threshold`]
    pub reliability: Option<f64>,
    /// Largest threshold with a reported result
    pub max_threshold: u32,
}

impl StabilizationPoint {
    /// One point per `(category, statistic)`, in order of first appearance.
    ///
    /// Results are scanned in ascending threshold order within each statistic, whatever
    /// their order in `results`.
    #[must_use]
    pub fn from_results(results: &[ReliabilityResult], target: f64) -> Vec<Self> {
        let mut statistics: Vec<(&str, &str)> = Vec::new();
        for result in results {
            let key = (result.category.as_str(), result.statistic.as_str());
            if !statistics.contains(&key) {
                statistics.push(key);
            }
        }

        statistics
            .into_iter()
            .filter_map(|(category, statistic)| {
                let mut curve = results
                    .iter()
                    .filter(|r| r.category == category && r.statistic == statistic)
                    .collect::<Vec<_>>();
                curve.sort_by_key(|r| r.threshold);

                let max_threshold = curve.last()?.threshold;
                let reached = curve.iter().find(|r| r.reliability >= target);
                Some(Self {
                    category: category.to_owned(),
                    statistic: statistic.to_owned(),
                    threshold: reached.map(|r| r.threshold),
                    reliability: reached.map(|r| r.reliability),
                    max_threshold,
                })
            })
            .collect()
    }

    #[must_use]
    pub fn is_stabilized(&self) -> bool {
        self.threshold.is_some()
    }
}

impl fmt::Display for StabilizationPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.threshold, self.reliability) {
            (Some(threshold), Some(reliability)) => write!(
                f,
                "{} ({}): stabilizes at {threshold} (r = {reliability:.3})",
                self.statistic, self.category
            ),
            _ => write!(
                f,
                "{} ({}): not stabilized within {}",
                self.statistic, self.category, self.max_threshold
            ),
        }
    }
}
