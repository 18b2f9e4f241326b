//! Split-half reliability analysis
//!
//! For every statistic and every plate-appearance threshold, the analyzer estimates how
//! reliable a player-season rate is once the player has at least that many eligible
//! events.
//!
//! # Algorithm
//!
//! For one statistic and one threshold:
//!
//! 1. Order each player-season's eligible events chronologically (ordinal from 1)
//! 2. Keep player-seasons with at least `threshold` eligible events
//! 3. Split each kept sample into odd and even ordinals
//! 4. Average the statistic value within each half
//! 5. Pair the two half-means of every player-season
//! 6. Compute the Pearson correlation `r` across the pairs
//! 7. Apply the Spearman-Brown correction `2r / (1 + r)`
//! 8. Report the corrected value rounded to 3 decimals
//!
//! Steps 2, 5, 6 and 7 can each fail for lack of data. Such a combination is skipped
//! with a [`SkipReason`] (logged at info level) and never aborts the analysis; only
//! structural problems with the input are [`AnalyzeError`]s.
//!
//! # Determinism
//!
//! Samples are grouped in a [`BTreeMap`](std::collections::BTreeMap) keyed by
//! player-season, events are ordered by their sequence key with row order as the
//! tie-breaker, and the split is by parity rather than random. Statistics are evaluated
//! in parallel, but results are always returned in statistic order, then ascending
//! threshold.
//!
//! # Examples
//!
//! ```
//! use saber_analysis::{
//!     event::{Column, EventRecord, EventTable},
//!     reliability::{ReliabilityAnalyzer, ReliabilityConfig},
//!     statistic::find_statistic_definitions,
//! };
//! # use chrono::NaiveDate;
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//!
//! let date = NaiveDate::from_ymd_opt(2023, 4, 1).unwrap();
//! let mut records = Vec::new();
//! for player in 0..12_u32 {
//!     for pa in 0..4_u32 {
//!         records.push(EventRecord {
//!             batter: Some(player.to_string()),
//!             launch_speed: Some(f64::from(80 + player)),
//!             ..EventRecord::new(date, u64::from(player), pa)
//!         });
//!     }
//! }
//! let table = EventTable::new(Column::ALL, records);
//!
//! let analyzer = ReliabilityAnalyzer::new(ReliabilityConfig {
//!     thresholds: vec![2, 4, 6],
//!     min_qualified_players: 10,
//!     min_paired_seasons: 10,
//! })?;
//! let statistics = find_statistic_definitions(["exit_velocity"])?;
//! let results = analyzer.analyze(&table, &statistics)?;
//!
//! // nobody reaches 6 events
//! assert_eq!(results.len(), 2);
//! assert_eq!(results[0].threshold, 2);
//! assert_eq!(results[0].reliability, 1.0);
//! # Ok(())
//! # }
//! ```

use rayon::prelude::*;
use saber_stats::correlation;
use serde::{Deserialize, Serialize};

use crate::{
    event::{Column, EventTable},
    sample::PlayerSeasonSamples,
    statistic::{BoxedStatisticDefinition, StatisticDefinition},
};

pub const DEFAULT_THRESHOLDS: [u32; 12] = [
    50, 100, 150, 200, 250, 300, 350, 400, 450, 500, 550, 600,
];
pub const DEFAULT_MIN_QUALIFIED_PLAYERS: usize = 50;
pub const DEFAULT_MIN_PAIRED_SEASONS: usize = 10;

/// Analysis policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReliabilityConfig {
    /// Minimum eligible events per player-season, strictly ascending
    pub thresholds: Vec<u32>,
    /// Fewest qualified player-seasons (before splitting) to report a threshold
    pub min_qualified_players: usize,
    /// Fewest player-seasons with two non-empty halves to report a threshold
    pub min_paired_seasons: usize,
}

impl Default for ReliabilityConfig {
    fn default() -> Self {
        Self {
            thresholds: DEFAULT_THRESHOLDS.to_vec(),
            min_qualified_players: DEFAULT_MIN_QUALIFIED_PLAYERS,
            min_paired_seasons: DEFAULT_MIN_PAIRED_SEASONS,
        }
    }
}

impl ReliabilityConfig {
    /// Checks that the thresholds are non-empty, positive and strictly ascending.
    pub fn validate(&self) -> Result<(), AnalyzeError> {
        let invalid = |reason: &str| AnalyzeError::InvalidThresholds {
            reason: reason.to_owned(),
        };
        if self.thresholds.is_empty() {
            return Err(invalid("no thresholds given"));
        }
        if self.thresholds.contains(&0) {
            return Err(invalid("thresholds must be positive"));
        }
        if !self.thresholds.is_sorted_by(|a, b| a < b) {
            return Err(invalid("thresholds must be strictly ascending"));
        }
        Ok(())
    }
}

/// Reliability of one statistic at one threshold.
///
/// Serialized with the column names of the result table: `category,stat,pa,correlation`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReliabilityResult {
    pub category: String,
    #[serde(rename = "stat")]
    pub statistic: String,
    #[serde(rename = "pa")]
    pub threshold: u32,
    /// Spearman-Brown corrected split-half correlation, rounded to 3 decimals
    #[serde(rename = "correlation")]
    pub reliability: f64,
}

/// Why a (statistic, threshold) combination produced no result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum SkipReason {
    #[display("{qualified} qualified player-seasons, {required} required")]
    TooFewQualified { qualified: usize, required: usize },
    #[display("{paired} paired player-seasons, {required} required")]
    TooFewPaired { paired: usize, required: usize },
    #[display("correlation is undefined")]
    UndefinedCorrelation,
    #[display("Spearman-Brown correction is undefined")]
    UndefinedCorrection,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ThresholdOutcome {
    Reported(ReliabilityResult),
    Skipped(SkipReason),
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum AnalyzeError {
    #[display("event table is empty")]
    EmptyTable,
    #[display("no statistics to analyze")]
    NoStatistics,
    #[display("invalid thresholds: {reason}")]
    InvalidThresholds { reason: String },
    #[display("statistic '{statistic}' requires column '{column}', which the event table lacks")]
    MissingColumn { statistic: String, column: Column },
}

#[derive(Debug, Clone)]
pub struct ReliabilityAnalyzer {
    config: ReliabilityConfig,
}

impl ReliabilityAnalyzer {
    /// Creates an analyzer with a validated policy.
    pub fn new(config: ReliabilityConfig) -> Result<Self, AnalyzeError> {
        config.validate()?;
        Ok(Self { config })
    }

    #[must_use]
    pub fn config(&self) -> &ReliabilityConfig {
        &self.config
    }

    /// Runs the analysis for every statistic at every configured threshold.
    ///
    /// Returns one result per reported (statistic, threshold), in the order of
    /// `statistics`, then ascending threshold. Skipped combinations are absent.
    ///
    /// # Errors
    ///
    /// Fails before any computation if the table is empty, no statistics are given,
    /// or a statistic needs a column the table does not provide.
    pub fn analyze(
        &self,
        events: &EventTable,
        statistics: &[BoxedStatisticDefinition],
    ) -> Result<Vec<ReliabilityResult>, AnalyzeError> {
        if events.is_empty() {
            return Err(AnalyzeError::EmptyTable);
        }
        if statistics.is_empty() {
            return Err(AnalyzeError::NoStatistics);
        }
        for statistic in statistics {
            if let Some(column) = statistic
                .required_columns()
                .into_iter()
                .find(|&column| !events.has_column(column))
            {
                return Err(AnalyzeError::MissingColumn {
                    statistic: statistic.id().to_owned(),
                    column,
                });
            }
        }

        let order = events.chronological_order();
        let results = statistics
            .par_iter()
            .map(|statistic| self.analyze_statistic(events, &order, statistic))
            .collect::<Vec<_>>();

        Ok(results.into_iter().flatten().collect())
    }

    fn analyze_statistic<S>(
        &self,
        events: &EventTable,
        order: &[usize],
        statistic: &S,
    ) -> Vec<ReliabilityResult>
    where
        S: StatisticDefinition + ?Sized,
    {
        let samples = PlayerSeasonSamples::collect(events, order, statistic);
        tracing::debug!(
            statistic = statistic.id(),
            player_seasons = samples.map.len(),
            "collected samples"
        );

        self.config
            .thresholds
            .iter()
            .filter_map(
                |&threshold| match self.evaluate(&samples, statistic, threshold) {
                    ThresholdOutcome::Reported(result) => Some(result),
                    ThresholdOutcome::Skipped(reason) => {
                        tracing::info!(
                            statistic = statistic.id(),
                            threshold,
                            %reason,
                            "skipped threshold"
                        );
                        None
                    }
                },
            )
            .collect()
    }

    /// Evaluates one statistic at one threshold.
    ///
    /// `samples` must have been collected for `statistic`.
    #[must_use]
    pub fn evaluate<S>(
        &self,
        samples: &PlayerSeasonSamples,
        statistic: &S,
        threshold: u32,
    ) -> ThresholdOutcome
    where
        S: StatisticDefinition + ?Sized,
    {
        let min_count = usize::try_from(threshold).unwrap_or(usize::MAX);

        let qualified = samples.qualified_count(min_count);
        let required = self.config.min_qualified_players;
        if qualified < required {
            return ThresholdOutcome::Skipped(SkipReason::TooFewQualified {
                qualified,
                required,
            });
        }

        let (odd_means, even_means): (Vec<f64>, Vec<f64>) = samples
            .qualified(min_count)
            .filter_map(|(_, sample)| sample.split_halves().means())
            .unzip();

        let paired = odd_means.len();
        let required = self.config.min_paired_seasons;
        if paired < required {
            return ThresholdOutcome::Skipped(SkipReason::TooFewPaired { paired, required });
        }

        let Some(r) = correlation::pearson(&odd_means, &even_means) else {
            return ThresholdOutcome::Skipped(SkipReason::UndefinedCorrelation);
        };
        let Some(corrected) = correlation::spearman_brown(r) else {
            return ThresholdOutcome::Skipped(SkipReason::UndefinedCorrection);
        };

        ThresholdOutcome::Reported(ReliabilityResult {
            category: statistic.category().to_owned(),
            statistic: statistic.name().to_owned(),
            threshold,
            reliability: round3(corrected),
        })
    }
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use proptest::prelude::*;

    use crate::{
        event::{EventRecord, Outcome},
        statistic::find_statistic_definitions,
    };

    use super::*;

    /// One exit-velocity sample per entry of `values`, one player per row.
    fn launch_speed_table(values: &[Vec<f64>]) -> EventTable {
        let date = NaiveDate::from_ymd_opt(2023, 4, 1).unwrap();
        let mut records = Vec::new();
        for (player, samples) in values.iter().enumerate() {
            for (i, &speed) in samples.iter().enumerate() {
                records.push(EventRecord {
                    batter: Some(format!("p{player}")),
                    launch_speed: Some(speed),
                    ..EventRecord::new(date, player as u64, i as u32)
                });
            }
        }
        EventTable::new(Column::ALL, records)
    }

    fn analyzer(thresholds: &[u32], min_qualified: usize, min_paired: usize) -> ReliabilityAnalyzer {
        ReliabilityAnalyzer::new(ReliabilityConfig {
            thresholds: thresholds.to_vec(),
            min_qualified_players: min_qualified,
            min_paired_seasons: min_paired,
        })
        .unwrap()
    }

    fn exit_velocity() -> Vec<BoxedStatisticDefinition> {
        find_statistic_definitions(["exit_velocity"]).unwrap()
    }

    fn evaluate(
        analyzer: &ReliabilityAnalyzer,
        table: &EventTable,
        threshold: u32,
    ) -> ThresholdOutcome {
        let stats = exit_velocity();
        let samples = PlayerSeasonSamples::collect(table, &table.chronological_order(), &stats[0]);
        analyzer.evaluate(&samples, &stats[0], threshold)
    }

    #[test]
    fn test_default_config() {
        let config = ReliabilityConfig::default();
        assert_eq!(config.thresholds.first(), Some(&50));
        assert_eq!(config.thresholds.last(), Some(&600));
        assert_eq!(config.min_qualified_players, 50);
        assert_eq!(config.min_paired_seasons, 10);
    }

    #[test]
    fn test_config_fields_are_optional() {
        let config: ReliabilityConfig =
            serde_json::from_str(r#"{ "min_paired_seasons": 20 }"#).unwrap();
        assert_eq!(config.thresholds, DEFAULT_THRESHOLDS.to_vec());
        assert_eq!(config.min_paired_seasons, 20);
    }

    #[test]
    fn test_invalid_thresholds() {
        for thresholds in [vec![], vec![0, 50], vec![100, 50], vec![50, 50]] {
            let config = ReliabilityConfig {
                thresholds,
                ..ReliabilityConfig::default()
            };
            assert!(matches!(
                ReliabilityAnalyzer::new(config),
                Err(AnalyzeError::InvalidThresholds { .. })
            ));
        }
    }

    #[test]
    fn test_two_players_fail_minimum_pairing() {
        let table = launch_speed_table(&[
            vec![1.0, 0.0, 1.0, 0.0, 1.0, 0.0],
            vec![0.0, 1.0, 0.0, 1.0, 0.0, 1.0],
        ]);
        let analyzer = analyzer(&[6], 1, 10);

        assert_eq!(
            evaluate(&analyzer, &table, 6),
            ThresholdOutcome::Skipped(SkipReason::TooFewPaired {
                paired: 2,
                required: 10
            })
        );
        let results = analyzer.analyze(&table, &exit_velocity()).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_one_player_short_of_qualification() {
        let values = (0..49)
            .map(|p| vec![f64::from(p); 50])
            .collect::<Vec<_>>();
        let table = launch_speed_table(&values);
        let analyzer = analyzer(&[50], 50, 10);

        assert_eq!(
            evaluate(&analyzer, &table, 50),
            ThresholdOutcome::Skipped(SkipReason::TooFewQualified {
                qualified: 49,
                required: 50
            })
        );
    }

    #[test]
    fn test_consistent_players_are_perfectly_reliable() {
        let values = (0..12)
            .map(|p| vec![f64::from(p); 8])
            .collect::<Vec<_>>();
        let table = launch_speed_table(&values);
        let results = analyzer(&[4, 8, 12], 10, 10)
            .analyze(&table, &exit_velocity())
            .unwrap();

        let expected = [4, 8].map(|threshold| ReliabilityResult {
            category: "Offense".to_owned(),
            statistic: "Exit Velocity".to_owned(),
            threshold,
            reliability: 1.0,
        });
        assert_eq!(results, expected);
    }

    #[test]
    fn test_constant_values_have_undefined_correlation() {
        let table = launch_speed_table(&vec![vec![95.0; 4]; 12]);
        assert_eq!(
            evaluate(&analyzer(&[4], 10, 10), &table, 4),
            ThresholdOutcome::Skipped(SkipReason::UndefinedCorrelation)
        );
    }

    #[test]
    fn test_inexact_constant_half_has_undefined_correlation() {
        // every odd half averages to 0.1, which floating point cannot hold exactly
        let values = (0..12)
            .map(|p| {
                let even = f64::from(p);
                vec![0.1, even, 0.1, even]
            })
            .collect::<Vec<_>>();
        let table = launch_speed_table(&values);
        let analyzer = analyzer(&[4], 10, 10);
        assert_eq!(
            evaluate(&analyzer, &table, 4),
            ThresholdOutcome::Skipped(SkipReason::UndefinedCorrelation)
        );
        assert!(analyzer.analyze(&table, &exit_velocity()).unwrap().is_empty());

        let table = launch_speed_table(&vec![vec![0.1, 0.7, 0.1, 0.7]; 12]);
        assert_eq!(
            evaluate(&analyzer, &table, 4),
            ThresholdOutcome::Skipped(SkipReason::UndefinedCorrelation)
        );
    }

    #[test]
    fn test_single_event_seasons_are_not_paired() {
        let mut values = (0..10)
            .map(|p| {
                let v = f64::from(p);
                vec![v, v, v, v]
            })
            .collect::<Vec<_>>();
        values.push(vec![1.0]);
        values.push(vec![2.0]);
        let table = launch_speed_table(&values);

        // all twelve qualify at threshold 1, but only ten have two halves
        assert_eq!(
            evaluate(&analyzer(&[1], 12, 11), &table, 1),
            ThresholdOutcome::Skipped(SkipReason::TooFewPaired {
                paired: 10,
                required: 11
            })
        );
        assert_eq!(
            evaluate(&analyzer(&[1], 12, 10), &table, 1),
            ThresholdOutcome::Reported(ReliabilityResult {
                category: "Offense".to_owned(),
                statistic: "Exit Velocity".to_owned(),
                threshold: 1,
                reliability: 1.0,
            })
        );
    }

    #[test]
    fn test_perfect_negative_correlation_is_skipped() {
        let values = (0..10)
            .map(|p| {
                let (odd, even) = (f64::from(p), f64::from(10 - p));
                vec![odd, even, odd, even]
            })
            .collect::<Vec<_>>();
        let table = launch_speed_table(&values);
        assert_eq!(
            evaluate(&analyzer(&[4], 10, 10), &table, 4),
            ThresholdOutcome::Skipped(SkipReason::UndefinedCorrection)
        );
    }

    #[test]
    fn test_structural_errors() {
        let analyzer = analyzer(&[4], 1, 1);
        let empty = EventTable::new(Column::ALL, vec![]);
        assert!(matches!(
            analyzer.analyze(&empty, &exit_velocity()),
            Err(AnalyzeError::EmptyTable)
        ));

        let table = launch_speed_table(&[vec![90.0; 4]]);
        assert!(matches!(
            analyzer.analyze(&table, &[]),
            Err(AnalyzeError::NoStatistics)
        ));

        let no_speed = EventTable::new(
            [Column::GameDate, Column::GamePk, Column::AtBatNumber, Column::Batter],
            table.records().to_vec(),
        );
        let err = analyzer.analyze(&no_speed, &exit_velocity()).unwrap_err();
        assert!(matches!(
            &err,
            AnalyzeError::MissingColumn { statistic, column: Column::LaunchSpeed }
                if statistic == "exit_velocity"
        ));
    }

    #[test]
    fn test_results_follow_statistic_order() {
        let date = NaiveDate::from_ymd_opt(2023, 4, 1).unwrap();
        let mut records = Vec::new();
        for player in 0..12_u32 {
            for pa in 0..8_u32 {
                // strikeout rate rises with the player index; the home run pattern alternates
                let outcome = if pa < player % 8 {
                    Outcome::Strikeout
                } else if (player + pa) % 3 == 0 {
                    Outcome::HomeRun
                } else {
                    Outcome::FieldOut
                };
                records.push(EventRecord {
                    batter: Some(player.to_string()),
                    events: Some(outcome),
                    ..EventRecord::new(date, u64::from(player), pa)
                });
            }
        }
        let table = EventTable::new(Column::ALL, records);
        let stats = find_statistic_definitions(["hr_rate", "k_rate"]).unwrap();
        let results = analyzer(&[2, 4, 8], 10, 10)
            .analyze(&table, &stats)
            .unwrap();

        let keys = results
            .iter()
            .map(|r| (r.statistic.as_str(), r.threshold))
            .collect::<Vec<_>>();
        let mut sorted = keys.clone();
        sorted.sort_by_key(|&(stat, threshold)| (stat != "Home Run Rate", threshold));
        assert_eq!(keys, sorted);
        assert!(keys.contains(&("Strikeout Rate", 8)));
    }

    proptest! {
        #[test]
        fn results_do_not_depend_on_row_order(
            values in prop::collection::vec(prop::collection::vec(80.0f64..110.0, 8), 12),
            seed in any::<u64>(),
        ) {
            let table = launch_speed_table(&values);
            let mut shuffled = table.records().to_vec();
            // deterministic permutation of the rows
            shuffled.sort_by_key(|r| (r.game_pk ^ seed, u64::from(r.at_bat_number) ^ seed));
            let shuffled = EventTable::new(Column::ALL, shuffled);

            let analyzer = analyzer(&[2, 4, 8], 10, 10);
            let stats = exit_velocity();
            let first = analyzer.analyze(&table, &stats).unwrap();
            let second = analyzer.analyze(&shuffled, &stats).unwrap();
            let third = analyzer.analyze(&table, &stats).unwrap();
            prop_assert_eq!(&first, &second);
            prop_assert_eq!(&first, &third);
        }

        #[test]
        fn reported_values_are_rounded_and_bounded(
            values in prop::collection::vec(prop::collection::vec(0.0f64..1.0, 6), 10..20),
        ) {
            let table = launch_speed_table(&values);
            let results = analyzer(&[6], 10, 10).analyze(&table, &exit_velocity()).unwrap();
            for result in results {
                prop_assert!(result.reliability <= 1.0);
                let scaled = result.reliability * 1000.0;
                prop_assert!((scaled - scaled.round()).abs() < 1e-6);
            }
        }
    }
}
