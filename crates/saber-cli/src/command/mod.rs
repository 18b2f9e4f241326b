use clap::{Parser, Subcommand};

use crate::logging;

use self::{
    analyze::AnalyzeArg, list_stats::ListStatsArg, stabilization::StabilizationArg,
    summarize::SummarizeArg,
};

mod analyze;
mod list_stats;
mod stabilization;
mod summarize;

#[derive(Debug, Clone, Parser)]
#[command(name = "saber", author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit log lines as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Measure split-half reliability of statistics at sample-size thresholds
    Analyze(#[clap(flatten)] AnalyzeArg),
    /// Report stabilization points of an existing result table
    Stabilization(#[clap(flatten)] StabilizationArg),
    /// Summarize an events file as JSON
    Summarize(#[clap(flatten)] SummarizeArg),
    /// List the built-in statistics
    ListStats(#[clap(flatten)] ListStatsArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    logging::init_tracing(args.log_json, args.verbose);
    match args.mode {
        Mode::Analyze(arg) => analyze::run(&arg)?,
        Mode::Stabilization(arg) => stabilization::run(&arg)?,
        Mode::Summarize(arg) => summarize::run(&arg)?,
        Mode::ListStats(arg) => list_stats::run(&arg),
    }
    Ok(())
}
