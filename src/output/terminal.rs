//! Terminal output formatting with colors.

use colored::Colorize;

use crate::result::ClusterTestResult;

/// Format a ClusterTestResult for human-readable terminal output.
///
/// One header block with the test configuration, then one line per
/// observed cluster with its span, mass, and p-value. Clusters at or
/// below p = 0.05 are highlighted.
pub fn format_result(result: &ClusterTestResult) -> String {
    let mut output = String::new();
    let sep = "\u{2500}".repeat(62);
    let meta = &result.metadata;

    output.push_str("erds-cluster\n");
    output.push_str(&sep);
    output.push('\n');
    output.push('\n');

    output.push_str(&format!(
        "  Data: {} epochs \u{00d7} {} timepoints\n",
        meta.n_epochs, meta.n_timepoints
    ));
    output.push_str(&format!(
        "  Tail: {} | threshold t = {:.3}\n",
        meta.tail, meta.threshold
    ));
    let mode = if meta.exact {
        "exact enumeration".to_string()
    } else {
        format!("random draws (seed {})", meta.seed)
    };
    output.push_str(&format!("  Permutations: {} ({})\n", meta.n_draws, mode));
    if meta.step_down_applied {
        output.push_str("  Step-down refinement applied\n");
    }
    output.push('\n');

    if result.clusters.is_empty() {
        output.push_str(&format!(
            "  {}\n",
            "No supra-threshold clusters".dimmed()
        ));
    } else {
        output.push_str("  Clusters:\n");
        for (i, (cluster, &p)) in result.clusters.iter().zip(&result.p_values).enumerate() {
            let line = format!(
                "    #{:<2} [{:>4}, {:>4})  mass {:>10.3}  p = {:.4}",
                i, cluster.start, cluster.end, cluster.mass, p
            );
            if p <= 0.05 {
                output.push_str(&format!("{} {}\n", line.green().bold(), "\u{2713}".green()));
            } else {
                output.push_str(&format!("{}\n", line));
            }
        }
    }

    output.push('\n');
    output.push_str(&sep);
    output.push('\n');
    output.push_str(&format!("  Runtime: {:.3} s\n", meta.runtime_secs));
    output
}
