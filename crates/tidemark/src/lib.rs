pub mod cli;
pub mod logging;
pub mod metrics;
pub mod report;
pub mod table;
