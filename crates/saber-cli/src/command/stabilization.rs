use std::path::PathBuf;

use clap::Args;
use saber_analysis::stabilization::{DEFAULT_STABILIZATION_TARGET, StabilizationPoint};

use crate::{table, util};

#[derive(Debug, Clone, Args)]
pub(crate) struct StabilizationArg {
    /// Path to a result table written by `analyze`
    pub results: PathBuf,

    /// Reliability at which a statistic counts as stabilized
    #[arg(long, default_value_t = DEFAULT_STABILIZATION_TARGET)]
    pub target: f64,
}

pub(crate) fn run(arg: &StabilizationArg) -> anyhow::Result<()> {
    let results = util::read_results_file(&arg.results)?;
    let points = StabilizationPoint::from_results(&results, arg.target);
    table::print_stabilization_points(&points, arg.target);
    Ok(())
}
