use tidemark_core::{MetricDescriptor, format_date};
use tidemark_store::RevisionCache;
use tracing::{debug, info};

use crate::classify::DeltaRenderer;
use crate::error::ReportError;
use crate::history::{HistoryWalker, ReportRow};
use crate::resolve::resolve_metric;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRequest {
    pub metric: MetricDescriptor,
    pub path: String,
    pub limit: usize,
    pub include_message: bool,
}

impl ReportRequest {
    /// Resolves the dotted `operator.key` identifier; this is the only resolution
    /// a report performs.
    pub fn new(
        identifier: &str,
        path: impl Into<String>,
        limit: usize,
        include_message: bool,
    ) -> Result<Self, ReportError> {
        Ok(Self {
            metric: resolve_metric(identifier)?,
            path: path.into(),
            limit,
            include_message,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryReport {
    pub metric: MetricDescriptor,
    pub include_message: bool,
    pub headers: Vec<String>,
    /// Display order: each archiver's rows newest first, archivers in reverse enumeration order.
    pub rows: Vec<ReportRow>,
}

impl HistoryReport {
    pub fn table_rows(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| {
                let mut cells = Vec::with_capacity(self.headers.len());
                cells.push(row.revision_id.clone());
                if self.include_message {
                    cells.push(row.message.clone().unwrap_or_default());
                }
                cells.push(row.author_name.clone());
                cells.push(format_date(row.commit_date));
                cells.push(row.rendered_value.clone());
                cells
            })
            .collect()
    }
}

pub fn report_headers(metric: &MetricDescriptor, include_message: bool) -> Vec<String> {
    let mut headers = vec!["Revision".to_owned()];
    if include_message {
        headers.push("Message".to_owned());
    }
    headers.push("Author".to_owned());
    headers.push("Date".to_owned());
    headers.push(metric.display_name.clone());
    headers
}

pub struct ReportAssembler<'a> {
    cache: &'a dyn RevisionCache,
    renderer: &'a dyn DeltaRenderer,
}

impl<'a> ReportAssembler<'a> {
    pub fn new(cache: &'a dyn RevisionCache, renderer: &'a dyn DeltaRenderer) -> Self {
        Self { cache, renderer }
    }

    pub fn assemble(&self, request: &ReportRequest) -> Result<HistoryReport, ReportError> {
        let metric = &request.metric;
        info!("History for {}", metric.identifier());

        let archivers = self
            .cache
            .list_archivers()
            .map_err(ReportError::ArchiverListing)?;

        let walker = HistoryWalker::new(self.cache, self.renderer);
        let mut rows = Vec::new();
        for archiver in &archivers {
            let walked = walker.walk(
                archiver,
                metric,
                &request.path,
                request.limit,
                request.include_message,
            )?;
            debug!(archiver = %archiver, rows = walked.len(), "archiver history collected");
            rows.extend(walked);
        }
        rows.reverse();

        Ok(HistoryReport {
            headers: report_headers(metric, request.include_message),
            include_message: request.include_message,
            metric: metric.clone(),
            rows,
        })
    }
}
