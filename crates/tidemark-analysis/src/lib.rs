mod classify;
mod error;
mod history;
mod report;
mod resolve;

pub use classify::{AnsiRenderer, DeltaClass, DeltaRenderer, PlainRenderer, classify_delta};
pub use error::ReportError;
pub use history::{
    DeltaTracker, HistoryCell, HistoryWalker, MAX_MESSAGE_WIDTH, NOT_FOUND_CELL, ReportRow,
    ValueNotFound, extract_value, truncate_message,
};
pub use report::{HistoryReport, ReportAssembler, ReportRequest, report_headers};
pub use resolve::{parse_metric_identifier, resolve_metric};
