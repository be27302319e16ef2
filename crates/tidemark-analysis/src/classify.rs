use std::cmp::Ordering;

use tidemark_core::{Directionality, Numeric};

const ANSI_GREEN: &str = "\x1b[32m";
const ANSI_RED: &str = "\x1b[31m";
const ANSI_YELLOW: &str = "\x1b[33m";
const ANSI_RESET: &str = "\x1b[0m";

/// Semantic class of a revision-over-revision change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeltaClass {
    Good,
    Bad,
    Neutral,
    /// A non-zero change on a metric that carries no quality judgment.
    Changed,
}

pub fn classify_delta(directionality: Directionality, delta: Numeric) -> DeltaClass {
    match (directionality, delta.sign()) {
        (_, Ordering::Equal) => DeltaClass::Neutral,
        (Directionality::Informational, _) => DeltaClass::Changed,
        (Directionality::AimHigh, Ordering::Greater) | (Directionality::AimLow, Ordering::Less) => {
            DeltaClass::Good
        }
        (Directionality::AimHigh, Ordering::Less) | (Directionality::AimLow, Ordering::Greater) => {
            DeltaClass::Bad
        }
    }
}

pub trait DeltaRenderer {
    fn render(&self, delta: Numeric, class: DeltaClass) -> String;
}

/// Terminal escape-code coloring.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnsiRenderer;

#[derive(Debug, Clone, Copy, Default)]
pub struct PlainRenderer;

impl DeltaRenderer for AnsiRenderer {
    fn render(&self, delta: Numeric, class: DeltaClass) -> String {
        let color = match class {
            DeltaClass::Neutral => return signed(delta),
            DeltaClass::Good => ANSI_GREEN,
            DeltaClass::Bad => ANSI_RED,
            DeltaClass::Changed => ANSI_YELLOW,
        };
        format!("{color}{}{ANSI_RESET}", signed(delta))
    }
}

impl DeltaRenderer for PlainRenderer {
    fn render(&self, delta: Numeric, _class: DeltaClass) -> String {
        signed(delta)
    }
}

fn signed(delta: Numeric) -> String {
    if delta.sign() == Ordering::Greater {
        format!("+{delta}")
    } else {
        delta.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Directionality; 3] = [
        Directionality::AimHigh,
        Directionality::AimLow,
        Directionality::Informational,
    ];

    #[test]
    fn zero_delta_is_neutral_for_every_directionality() {
        for directionality in ALL {
            assert_eq!(
                classify_delta(directionality, Numeric::Integer(0)),
                DeltaClass::Neutral
            );
            assert_eq!(
                classify_delta(directionality, Numeric::Float(0.0)),
                DeltaClass::Neutral
            );
        }
    }

    #[test]
    fn aim_high_rewards_increases() {
        assert_eq!(
            classify_delta(Directionality::AimHigh, Numeric::Integer(3)),
            DeltaClass::Good
        );
        assert_eq!(
            classify_delta(Directionality::AimHigh, Numeric::Float(-0.5)),
            DeltaClass::Bad
        );
    }

    #[test]
    fn aim_low_rewards_decreases() {
        assert_eq!(
            classify_delta(Directionality::AimLow, Numeric::Integer(2)),
            DeltaClass::Bad
        );
        assert_eq!(
            classify_delta(Directionality::AimLow, Numeric::Integer(-3)),
            DeltaClass::Good
        );
    }

    #[test]
    fn informational_changes_are_never_good_or_bad() {
        for delta in [Numeric::Integer(7), Numeric::Integer(-7), Numeric::Float(0.25)] {
            assert_eq!(
                classify_delta(Directionality::Informational, delta),
                DeltaClass::Changed
            );
        }
    }

    #[test]
    fn ansi_renderer_wraps_non_zero_deltas_and_signs_positives() {
        let renderer = AnsiRenderer;
        assert_eq!(
            renderer.render(Numeric::Integer(2), DeltaClass::Bad),
            "\x1b[31m+2\x1b[0m"
        );
        assert_eq!(
            renderer.render(Numeric::Integer(-3), DeltaClass::Good),
            "\x1b[32m-3\x1b[0m"
        );
        assert_eq!(
            renderer.render(Numeric::Integer(4), DeltaClass::Changed),
            "\x1b[33m+4\x1b[0m"
        );
        assert_eq!(renderer.render(Numeric::Integer(0), DeltaClass::Neutral), "0");
    }

    #[test]
    fn plain_renderer_emits_no_escape_codes() {
        let renderer = PlainRenderer;
        assert_eq!(renderer.render(Numeric::Integer(3), DeltaClass::Good), "+3");
        assert_eq!(renderer.render(Numeric::Float(-1.5), DeltaClass::Bad), "-1.5");
        assert_eq!(renderer.render(Numeric::Integer(0), DeltaClass::Neutral), "0");
    }
}
