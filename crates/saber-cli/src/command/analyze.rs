//! Reliability analysis command
//!
//! Loads a pitch-level events CSV, measures split-half reliability of the selected
//! statistics at each threshold, and writes the result table.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use saber_analysis::{
    reliability::{ReliabilityAnalyzer, ReliabilityConfig},
    stabilization::{DEFAULT_STABILIZATION_TARGET, StabilizationPoint},
    statistic::{BoxedStatisticDefinition, all_statistic_definitions, find_statistic_definitions},
};

use crate::{
    table,
    util::{self, Destination, Output},
};

#[derive(Debug, Clone, Args)]
pub(crate) struct AnalyzeArg {
    /// Path to the pitch-level events CSV file
    pub events: PathBuf,

    /// Output CSV path (stdout if omitted)
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Analysis policy JSON file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Minimum eligible events per player-season (comma-separated, ascending)
    #[arg(long, value_delimiter = ',')]
    pub thresholds: Option<Vec<u32>>,

    /// Fewest qualified player-seasons to report a threshold
    #[arg(long)]
    pub min_qualified_players: Option<usize>,

    /// Fewest paired player-seasons to report a threshold
    #[arg(long)]
    pub min_paired_seasons: Option<usize>,

    /// Statistic IDs to analyze (comma-separated, all built-ins if omitted)
    #[arg(long, value_delimiter = ',')]
    pub stats: Option<Vec<String>>,

    /// Reliability at which a statistic counts as stabilized
    #[arg(long, default_value_t = DEFAULT_STABILIZATION_TARGET)]
    pub stabilization_target: f64,
}

impl AnalyzeArg {
    /// Command-line values over the config file over defaults.
    fn resolve_config(&self) -> anyhow::Result<ReliabilityConfig> {
        let mut config = match &self.config {
            Some(path) => util::read_json_file("config", path)?,
            None => ReliabilityConfig::default(),
        };
        if let Some(thresholds) = &self.thresholds {
            config.thresholds.clone_from(thresholds);
        }
        if let Some(n) = self.min_qualified_players {
            config.min_qualified_players = n;
        }
        if let Some(n) = self.min_paired_seasons {
            config.min_paired_seasons = n;
        }
        Ok(config)
    }

    fn analyzer(&self) -> anyhow::Result<ReliabilityAnalyzer> {
        let analyzer = ReliabilityAnalyzer::new(self.resolve_config()?)
            .context("Invalid analysis configuration")?;
        let config = analyzer.config();
        tracing::info!(
            thresholds = ?config.thresholds,
            min_qualified_players = config.min_qualified_players,
            min_paired_seasons = config.min_paired_seasons,
            "analysis policy"
        );
        Ok(analyzer)
    }

    fn statistics(&self) -> anyhow::Result<Vec<BoxedStatisticDefinition>> {
        match &self.stats {
            Some(ids) => Ok(find_statistic_definitions(ids)?),
            None => Ok(all_statistic_definitions()),
        }
    }
}

pub(crate) fn run(arg: &AnalyzeArg) -> anyhow::Result<()> {
    let analyzer = arg.analyzer()?;
    let statistics = arg.statistics()?;
    let table = util::read_events_file(&arg.events)?;

    let results = analyzer
        .analyze(&table, &statistics)
        .with_context(|| format!("Failed to analyze events file: {}", arg.events.display()))?;
    tracing::info!(results = results.len(), "analysis finished");

    let mut output = Output::create(arg.output.clone())?;
    output.write_results_csv(&results)?;

    // stdout already carries the CSV otherwise
    if let Destination::File(path) = output.destination() {
        println!("Saved {} results to {}", results.len(), path.display());
        println!();
        let points = StabilizationPoint::from_results(&results, arg.stabilization_target);
        table::print_stabilization_points(&points, arg.stabilization_target);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::{fmt::Write as _, fs};

    use clap::Parser;

    use super::*;

    #[derive(Debug, Parser)]
    struct TestArgs {
        #[clap(flatten)]
        analyze: AnalyzeArg,
    }

    fn parse(args: &[&str]) -> AnalyzeArg {
        TestArgs::try_parse_from(["analyze"].iter().chain(args))
            .unwrap()
            .analyze
    }

    #[test]
    fn test_command_line_overrides_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.json");
        fs::write(
            &config_path,
            r#"{ "thresholds": [10, 20], "min_paired_seasons": 5 }"#,
        )
        .unwrap();

        let arg = parse(&[
            "events.csv",
            "--config",
            config_path.to_str().unwrap(),
            "--thresholds",
            "30,40,50",
        ]);
        let config = arg.resolve_config().unwrap();
        assert_eq!(config.thresholds, [30, 40, 50]);
        assert_eq!(config.min_paired_seasons, 5);
        assert_eq!(config.min_qualified_players, 50);
    }

    #[test]
    fn test_analyzer_uses_resolved_policy() {
        let arg = parse(&["events.csv", "--thresholds", "5,10", "--min-paired-seasons", "3"]);
        let analyzer = arg.analyzer().unwrap();
        assert_eq!(analyzer.config().thresholds, [5, 10]);
        assert_eq!(analyzer.config().min_paired_seasons, 3);

        let arg = parse(&["events.csv", "--thresholds", "10,5"]);
        let err = arg.analyzer().unwrap_err();
        assert_eq!(err.to_string(), "Invalid analysis configuration");
    }

    #[test]
    fn test_unknown_statistic() {
        let arg = parse(&["events.csv", "--stats", "k_rate,war"]);
        let err = arg.statistics().unwrap_err();
        assert_eq!(err.to_string(), "unknown statistic 'war'");
    }

    #[test]
    fn test_analyze_writes_result_file() {
        let dir = tempfile::tempdir().unwrap();
        let events = dir.path().join("events.csv");
        let output = dir.path().join("results.csv");

        // both halves of every batter hold the same number of strikeouts
        let mut csv = String::from("game_date,game_pk,at_bat_number,batter,events\n");
        for batter in 0..12 {
            for pa in 0..8 {
                let outcome = if pa / 2 < batter % 4 { "strikeout" } else { "field_out" };
                writeln!(csv, "2023-04-01,{batter},{pa},{batter},{outcome}").unwrap();
            }
        }
        fs::write(&events, csv).unwrap();

        let arg = parse(&[
            events.to_str().unwrap(),
            "--output",
            output.to_str().unwrap(),
            "--thresholds",
            "4,8,16",
            "--min-qualified-players",
            "10",
            "--stats",
            "k_rate",
        ]);
        run(&arg).unwrap();

        let results = util::read_results_file(&output).unwrap();
        let thresholds = results.iter().map(|r| r.threshold).collect::<Vec<_>>();
        assert_eq!(thresholds, [4, 8]);
        assert!(results.iter().all(|r| r.statistic == "Strikeout Rate"));
        assert!(results.iter().all(|r| r.reliability == 1.0));
    }
}
