use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use tidemark_analysis::{
    AnsiRenderer, DeltaRenderer, PlainRenderer, ReportAssembler, ReportRequest,
};
use tidemark_config::TidemarkConfig;
use tidemark_store::CacheStore;

use crate::cli::ReportArgs;
use crate::table::write_table;

pub fn run_report_command(
    workspace: &Path,
    config: &TidemarkConfig,
    args: ReportArgs,
    out: &mut dyn Write,
) -> Result<()> {
    // Resolved before touching the cache so bad identifiers fail fast.
    let request = ReportRequest::new(
        &args.metric,
        args.path,
        args.limit
            .unwrap_or_else(|| config.report.effective_limit()) as usize,
        args.message,
    )
    .with_context(|| format!("cannot report on metric '{}'", args.metric))?;

    let store = CacheStore::open_existing(workspace).with_context(|| {
        format!(
            "failed to open revision cache in {}",
            workspace.display()
        )
    })?;

    let renderer: &dyn DeltaRenderer = if args.no_color || !config.report.color {
        &PlainRenderer
    } else {
        &AnsiRenderer
    };

    let report = ReportAssembler::new(&store, renderer)
        .assemble(&request)
        .context("report failed")?;

    let style = args.style.unwrap_or(config.report.grid_style);
    write_table(&report.headers, &report.table_rows(), style, out)
        .context("failed to write report table")?;
    Ok(())
}
