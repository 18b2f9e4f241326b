//! Statistic stabilization analysis for pitch-level baseball data
//!
//! This crate answers the question "after how many plate appearances does a player's
//! rate statistic mostly reflect skill rather than noise?" by measuring split-half
//! reliability at a series of sample-size thresholds.
//!
//! # Overview
//!
//! The analysis pipeline:
//!
//! 1. **Load Events** ([`event::EventTable`]): Read a pitch-level CSV export
//! 2. **Choose Statistics** ([`statistic::StatisticDefinition`]): Built-in registry or
//!    custom definitions
//! 3. **Group Samples** ([`sample::PlayerSeasonSamples`]): Chronological eligible values per
//!    player-season
//! 4. **Measure Reliability** ([`reliability::ReliabilityAnalyzer`]): Odd/even split,
//!    Pearson correlation, Spearman-Brown correction per threshold
//! 5. **Find Stabilization Points** ([`stabilization::StabilizationPoint`]): First
//!    threshold reaching a target reliability
//!
//! [`summary::EventSummary`] describes a loaded table independently of the analysis.
//!
//! # Examples
//!
//! ```no_run
//! use saber_analysis::{
//!     event::EventTable,
//!     reliability::{ReliabilityAnalyzer, ReliabilityConfig},
//!     stabilization::StabilizationPoint,
//!     statistic::all_statistic_definitions,
//! };
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//!
//! let table = EventTable::from_csv_path("statcast_2023.csv")?;
//! let analyzer = ReliabilityAnalyzer::new(ReliabilityConfig::default())?;
//! let results = analyzer.analyze(&table, &all_statistic_definitions())?;
//!
//! for point in StabilizationPoint::from_results(&results, 0.7) {
//!     println!("{point}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod event;
pub mod reliability;
pub mod sample;
pub mod stabilization;
pub mod statistic;
pub mod summary;
