use thiserror::Error;
use tidemark_store::CacheError;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("invalid metric identifier '{0}', expected <operator>.<key>")]
    InvalidMetricIdentifier(String),
    #[error("unknown metric '{operator}.{key}'")]
    UnknownMetric { operator: String, key: String },
    #[error("failed to enumerate archivers: {0}")]
    ArchiverListing(#[source] CacheError),
    #[error("failed to read revision index for archiver '{archiver}': {source}")]
    ArchiverAccess {
        archiver: String,
        #[source]
        source: CacheError,
    },
    #[error("failed to read cached revision '{revision}' for archiver '{archiver}': {source}")]
    CacheAccess {
        archiver: String,
        revision: String,
        #[source]
        source: CacheError,
    },
}
