//! Plain-text tables printed to stdout.

use saber_analysis::{
    stabilization::StabilizationPoint,
    statistic::{BoxedStatisticDefinition, StatisticDefinition as _},
};

/// Print stabilization points, one row per statistic
pub(crate) fn print_stabilization_points(points: &[StabilizationPoint], target: f64) {
    println!("Stabilization Points (reliability >= {target:.2})");
    println!("==========================================\n");

    if points.is_empty() {
        println!("  No results");
        return;
    }

    println!(
        "  {:<10} {:<20} {:>12} {:>12}",
        "Category", "Statistic", "Stabilizes", "Reliability"
    );
    // category(10) + statistic(20) + stabilizes(12) + reliability(12) + spaces(3)
    println!("  {}", "-".repeat(57));
    for point in points {
        match (point.threshold, point.reliability) {
            (Some(threshold), Some(reliability)) => println!(
                "  {:<10} {:<20} {:>12} {:>12.3}",
                point.category, point.statistic, threshold, reliability
            ),
            _ => println!(
                "  {:<10} {:<20} {:>12} {:>12}",
                point.category,
                point.statistic,
                format!(">{}", point.max_threshold),
                "-"
            ),
        }
    }

    let unstable = points.iter().filter(|p| !p.is_stabilized()).count();
    if unstable > 0 {
        println!();
        println!("  {unstable} statistic(s) did not reach the target within the analysed range");
    }
}

/// Print the statistic registry
pub(crate) fn print_statistics(statistics: &[BoxedStatisticDefinition]) {
    println!(
        "  {:<10} {:<16} {:<16} {:<8} Columns",
        "Category", "ID", "Name", "Subject"
    );
    println!("  {}", "-".repeat(80));
    for stat in statistics {
        let columns = stat
            .required_columns()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",");
        println!(
            "  {:<10} {:<16} {:<16} {:<8} {}",
            stat.category(),
            stat.id(),
            stat.name(),
            stat.subject(),
            columns
        );
    }
}
