use clap::Args;
use saber_analysis::statistic::{StatisticDefinition as _, all_statistic_definitions};

use crate::table;

#[derive(Debug, Clone, Args)]
pub(crate) struct ListStatsArg {
    /// Only list statistics of this category (e.g. `Pitching`)
    #[arg(long)]
    pub category: Option<String>,
}

pub(crate) fn run(arg: &ListStatsArg) {
    let statistics = all_statistic_definitions()
        .into_iter()
        .filter(|stat| {
            arg.category
                .as_deref()
                .is_none_or(|category| stat.category().eq_ignore_ascii_case(category))
        })
        .collect::<Vec<_>>();
    table::print_statistics(&statistics);
}
