//! Statistical primitives for the saber workspace.
//!
//! This crate provides the numeric building blocks used by the reliability analysis:
//!
//! - **Descriptive statistics**: mean, median, variance, standard deviation
//! - **Correlation**: Pearson correlation of paired series
//! - **Reliability correction**: Spearman-Brown prophecy formula
//!
//! # Modules
//!
//! - [`descriptive`]: Descriptive statistics for summarizing datasets
//! - [`correlation`]: Correlation and reliability coefficients
//!
//! # Examples
//!
//! ## Computing descriptive statistics
//!
//! ```
//! use saber_stats::descriptive::DescriptiveStats;
//!
//! let values = [1.0, 2.0, 3.0, 4.0, 5.0];
//! let stats = DescriptiveStats::new(values).unwrap();
//! assert_eq!(stats.mean, 3.0);
//! ```
//!
//! ## Split-half reliability
//!
//! ```
//! use saber_stats::correlation::{pearson, spearman_brown};
//!
//! // Per-player means of the odd and even halves of their samples
//! let odd = [0.30, 0.25, 0.20, 0.28];
//! let even = [0.28, 0.24, 0.22, 0.30];
//!
//! let r = pearson(&odd, &even).unwrap();
//! let reliability = spearman_brown(r).unwrap();
//! assert!(reliability > r);
//! ```

pub mod correlation;
pub mod descriptive;
