use tidemark_core::{MetricDescriptor, lookup};

use crate::error::ReportError;

/// Splits `operator.key`; both halves must be non-empty and there must be exactly one dot.
pub fn parse_metric_identifier(identifier: &str) -> Result<(&str, &str), ReportError> {
    let trimmed = identifier.trim();
    let mut parts = trimmed.split('.');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(operator), Some(key), None) if !operator.is_empty() && !key.is_empty() => {
            Ok((operator, key))
        }
        _ => Err(ReportError::InvalidMetricIdentifier(identifier.to_owned())),
    }
}

pub fn resolve_metric(identifier: &str) -> Result<MetricDescriptor, ReportError> {
    let (operator, key) = parse_metric_identifier(identifier)?;
    lookup(operator, key).ok_or_else(|| ReportError::UnknownMetric {
        operator: operator.to_owned(),
        key: key.to_owned(),
    })
}

#[cfg(test)]
mod tests {
    use tidemark_core::{Directionality, MetricKind};

    use super::*;

    #[test]
    fn resolves_registered_metric() {
        let metric = resolve_metric("raw.loc").expect("resolve raw.loc");
        assert_eq!(metric.operator_key, "raw");
        assert_eq!(metric.key, "loc");
        assert_eq!(metric.display_name, "Lines of Code");
        assert_eq!(metric.kind, MetricKind::Numeric);
        assert_eq!(metric.directionality, Directionality::Informational);
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        let metric = resolve_metric("  cyclomatic.complexity ").expect("resolve");
        assert_eq!(metric.directionality, Directionality::AimLow);
    }

    #[test]
    fn malformed_identifiers_are_rejected_before_lookup() {
        for identifier in ["raw", "raw.", ".loc", "raw.loc.extra", "", "."] {
            let err = resolve_metric(identifier).expect_err("expected invalid identifier");
            assert!(
                matches!(err, ReportError::InvalidMetricIdentifier(ref value) if value == identifier),
                "unexpected error for {identifier:?}: {err}"
            );
        }
    }

    #[test]
    fn well_formed_but_unregistered_metric_is_unknown() {
        let err = resolve_metric("raw.bogus").expect_err("expected unknown metric");
        match err {
            ReportError::UnknownMetric { operator, key } => {
                assert_eq!(operator, "raw");
                assert_eq!(key, "bogus");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
