//! Player-season samples and split-half partitioning
//!
//! This module implements the grouping pass of the reliability analysis: the eligible
//! events of one statistic are collected per player-season in chronological order, and
//! each player-season sample can be split into its odd and even halves.
//!
//! # Overview
//!
//! ```text
//! EventTable ──(chronological order, eligibility filter)──▶ PlayerSeasonSamples
//!                                                          └─ (season, player) → [v1, v2, v3, ...]
//!
//! [v1, v2, v3, v4, v5]  ──split_halves──▶  odd:  [v1, v3, v5]   (ordinals 1, 3, 5)
//!                                          even: [v2, v4]       (ordinals 2, 4)
//! ```
//!
//! The split is fixed by ordinal position, not random, so identical input always yields
//! identical halves.
//!
//! # Examples
//!
//! ```
//! use saber_analysis::sample::PlayerSeasonSample;
//!
//! let sample = PlayerSeasonSample {
//!     values: vec![1.0, 0.0, 1.0, 0.0, 1.0, 0.0],
//! };
//! let halves = sample.split_halves();
//! assert_eq!(halves.odd, vec![1.0, 1.0, 1.0]);
//! assert_eq!(halves.even, vec![0.0, 0.0, 0.0]);
//! assert_eq!(halves.means(), Some((1.0, 0.0)));
//! ```

use std::collections::BTreeMap;

use saber_stats::descriptive;

use crate::{
    event::{EventTable, PlayerSeasonKey},
    statistic::StatisticDefinition,
};

/// Eligible values of one statistic for one player-season, in chronological order.
///
/// The value at index `i` has ordinal `i + 1`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerSeasonSample {
    pub values: Vec<f64>,
}

/// Odd-ordinal and even-ordinal halves of a player-season sample.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitHalves {
    pub odd: Vec<f64>,
    pub even: Vec<f64>,
}

impl PlayerSeasonSample {
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Partitions the sample by ordinal parity.
    #[must_use]
    pub fn split_halves(&self) -> SplitHalves {
        SplitHalves {
            odd: self.values.iter().copied().step_by(2).collect(),
            even: self.values.iter().copied().skip(1).step_by(2).collect(),
        }
    }
}

impl SplitHalves {
    /// Mean of each half, or `None` if either half is empty.
    #[must_use]
    pub fn means(&self) -> Option<(f64, f64)> {
        let odd = descriptive::mean(self.odd.iter().copied())?;
        let even = descriptive::mean(self.even.iter().copied())?;
        Some((odd, even))
    }
}

/// Samples of one statistic for every player-season in an event table.
#[derive(Debug, Clone, Default)]
pub struct PlayerSeasonSamples {
    pub map: BTreeMap<PlayerSeasonKey, PlayerSeasonSample>,
}

impl PlayerSeasonSamples {
    /// Collects the eligible values of `statistic`, grouped by player-season.
    ///
    /// `order` lists the table's row indices in chronological order (see
    /// [`EventTable::chronological_order()`]); values are appended in that order, so
    /// each sample's index gives the event's ordinal within its player-season.
    ///
    /// Events without a recorded subject identity, outside the statistic's population,
    /// or without a value are skipped.
    ///
    /// # Panics
    ///
    /// Panics if `order` holds an index outside `table.records()`, i.e. if it was not
    /// built from `table`.
    #[must_use]
    pub fn collect<S>(table: &EventTable, order: &[usize], statistic: &S) -> Self
    where
        S: StatisticDefinition + ?Sized,
    {
        let subject = statistic.subject();
        let records = table.records();
        let mut map: BTreeMap<PlayerSeasonKey, PlayerSeasonSample> = BTreeMap::new();

        for event in order.iter().map(|&i| &records[i]) {
            let Some(player) = subject.identity(event) else {
                continue;
            };
            let Some(value) = statistic.eligible_value(event) else {
                continue;
            };
            let key = PlayerSeasonKey {
                season: event.season,
                player: player.to_owned(),
            };
            map.entry(key).or_default().values.push(value);
        }

        Self { map }
    }

    /// Player-seasons with at least `threshold` eligible events.
    pub fn qualified(
        &self,
        threshold: usize,
    ) -> impl Iterator<Item = (&PlayerSeasonKey, &PlayerSeasonSample)> {
        self.map
            .iter()
            .filter(move |(_, sample)| sample.len() >= threshold)
    }

    #[must_use]
    pub fn qualified_count(&self, threshold: usize) -> usize {
        self.qualified(threshold).count()
    }
}
