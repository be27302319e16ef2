use crate::{Directionality, MetricDescriptor, MetricKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricSpec {
    pub key: &'static str,
    pub description: &'static str,
    pub kind: MetricKind,
    pub directionality: Directionality,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperatorSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub metrics: &'static [MetricSpec],
}

const fn numeric(
    key: &'static str,
    description: &'static str,
    directionality: Directionality,
) -> MetricSpec {
    MetricSpec {
        key,
        description,
        kind: MetricKind::Numeric,
        directionality,
    }
}

const CYCLOMATIC_METRICS: &[MetricSpec] = &[numeric(
    "complexity",
    "Cyclomatic Complexity",
    Directionality::AimLow,
)];

const RAW_METRICS: &[MetricSpec] = &[
    numeric("loc", "Lines of Code", Directionality::Informational),
    numeric("lloc", "L Lines of Code", Directionality::AimLow),
    numeric("sloc", "S Lines of Code", Directionality::AimLow),
    numeric("comments", "Multi-line comments", Directionality::AimHigh),
    numeric("multi", "Multi lines", Directionality::Informational),
    numeric("blank", "blank lines", Directionality::Informational),
    numeric(
        "single_comments",
        "Single comment lines",
        Directionality::Informational,
    ),
];

const MAINTAINABILITY_METRICS: &[MetricSpec] = &[
    MetricSpec {
        key: "rank",
        description: "Maintainability Ranking",
        kind: MetricKind::Text,
        directionality: Directionality::Informational,
    },
    numeric("mi", "Maintainability Index", Directionality::AimHigh),
];

const HALSTEAD_METRICS: &[MetricSpec] = &[
    numeric("h1", "Unique Operands", Directionality::AimLow),
    numeric("h2", "Unique Operators", Directionality::AimLow),
    numeric("N1", "Number of Operands", Directionality::AimLow),
    numeric("N2", "Number of Operators", Directionality::AimLow),
    numeric(
        "vocabulary",
        "Unique vocabulary (h1 + h2)",
        Directionality::AimLow,
    ),
    numeric("length", "Length of application", Directionality::AimLow),
    numeric("volume", "Code volume", Directionality::AimLow),
    numeric("difficulty", "Difficulty", Directionality::AimLow),
    numeric("effort", "Effort", Directionality::AimLow),
];

pub const OPERATORS: &[OperatorSpec] = &[
    OperatorSpec {
        name: "cyclomatic",
        description: "Cyclomatic Complexity of modules",
        metrics: CYCLOMATIC_METRICS,
    },
    OperatorSpec {
        name: "raw",
        description: "Raw Python statistics",
        metrics: RAW_METRICS,
    },
    OperatorSpec {
        name: "maintainability",
        description: "Maintainability index (lines of code and branching)",
        metrics: MAINTAINABILITY_METRICS,
    },
    OperatorSpec {
        name: "halstead",
        description: "Halstead metrics",
        metrics: HALSTEAD_METRICS,
    },
];

pub fn lookup(operator: &str, key: &str) -> Option<MetricDescriptor> {
    let operator = OPERATORS.iter().find(|candidate| candidate.name == operator)?;
    operator
        .metrics
        .iter()
        .find(|metric| metric.key == key)
        .map(|metric| descriptor(operator, metric))
}

pub fn list_metrics() -> Vec<MetricDescriptor> {
    OPERATORS
        .iter()
        .flat_map(|operator| {
            operator
                .metrics
                .iter()
                .map(move |metric| descriptor(operator, metric))
        })
        .collect()
}

fn descriptor(operator: &OperatorSpec, metric: &MetricSpec) -> MetricDescriptor {
    MetricDescriptor {
        operator_key: operator.name.to_owned(),
        key: metric.key.to_owned(),
        display_name: metric.description.to_owned(),
        kind: metric.kind,
        directionality: metric.directionality,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn lookup_returns_descriptor_for_registered_metric() {
        let metric = lookup("maintainability", "mi").expect("mi is registered");
        assert_eq!(metric.display_name, "Maintainability Index");
        assert_eq!(metric.kind, MetricKind::Numeric);
        assert_eq!(metric.directionality, Directionality::AimHigh);
        assert_eq!(metric.identifier(), "maintainability.mi");
    }

    #[test]
    fn lookup_misses_unknown_operator_or_key() {
        assert!(lookup("pylint", "score").is_none());
        assert!(lookup("raw", "bogus").is_none());
        assert!(lookup("halstead", "n1").is_none());
    }

    #[test]
    fn list_metrics_has_unique_identifiers_in_registry_order() {
        let metrics = list_metrics();
        let identifiers = metrics
            .iter()
            .map(MetricDescriptor::identifier)
            .collect::<Vec<_>>();

        assert_eq!(identifiers.first().map(String::as_str), Some("cyclomatic.complexity"));
        assert_eq!(identifiers.last().map(String::as_str), Some("halstead.effort"));
        assert_eq!(
            identifiers.iter().collect::<HashSet<_>>().len(),
            identifiers.len()
        );
    }
}
