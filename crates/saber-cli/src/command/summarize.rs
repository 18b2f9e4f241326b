use std::path::PathBuf;

use clap::Args;
use saber_analysis::summary::EventSummary;

use crate::util::{self, Output};

#[derive(Debug, Clone, Args)]
pub(crate) struct SummarizeArg {
    /// Path to the pitch-level events CSV file
    pub events: PathBuf,

    /// Output JSON path (stdout if omitted)
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Number of most frequent players to list
    #[arg(long, default_value_t = 10)]
    pub top: usize,
}

pub(crate) fn run(arg: &SummarizeArg) -> anyhow::Result<()> {
    let table = util::read_events_file(&arg.events)?;
    let summary = EventSummary::from_table(&table, arg.top);
    Output::save_json(&summary, arg.output.clone())
}
