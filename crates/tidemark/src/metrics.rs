use std::io::Write;

use anyhow::{Context, Result};
use tidemark_config::TidemarkConfig;
use tidemark_core::list_metrics;

use crate::table::write_table;

pub fn run_list_metrics_command(config: &TidemarkConfig, out: &mut dyn Write) -> Result<()> {
    let headers = ["Metric", "Description", "Type", "Measure"]
        .map(str::to_owned)
        .to_vec();
    let rows = list_metrics()
        .into_iter()
        .map(|metric| {
            vec![
                metric.identifier(),
                metric.display_name,
                metric.kind.as_str().to_owned(),
                metric.directionality.as_str().to_owned(),
            ]
        })
        .collect::<Vec<_>>();

    write_table(&headers, &rows, config.report.grid_style, out)
        .context("failed to write metrics table")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_every_registered_metric() {
        let mut out = Vec::new();
        run_list_metrics_command(&TidemarkConfig::default(), &mut out).expect("list metrics");
        let rendered = String::from_utf8(out).expect("utf8 output");

        assert!(rendered.contains("cyclomatic.complexity"));
        assert!(rendered.contains("Maintainability Ranking"));
        assert!(rendered.contains("aim_high"));
        for metric in list_metrics() {
            assert!(rendered.contains(&metric.identifier()));
        }
    }
}
