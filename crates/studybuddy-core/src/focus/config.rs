use serde::{Deserialize, Serialize};

pub const DEFAULT_STUDY_MINUTES: u32 = 25;
pub const DEFAULT_BREAK_MINUTES: u32 = 5;
pub const DEFAULT_ITERATIONS: u32 = 4;

/// Durations and cycle count for one focus session.
///
/// Always normalized: `study_minutes > 0`, `iterations > 0`. A zero
/// `break_minutes` means breaks are skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub study_minutes: u32,
    pub break_minutes: u32,
    pub iterations: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            study_minutes: DEFAULT_STUDY_MINUTES,
            break_minutes: DEFAULT_BREAK_MINUTES,
            iterations: DEFAULT_ITERATIONS,
        }
    }
}

impl SessionConfig {
    /// Build a config from raw numeric input.
    ///
    /// Non-positive study falls back to 25 minutes, a negative break to 5
    /// minutes and non-positive iterations to a single cycle. Values above
    /// `u32::MAX` saturate.
    pub fn normalized(study_minutes: i64, break_minutes: i64, iterations: i64) -> Self {
        let study_minutes = if study_minutes <= 0 {
            DEFAULT_STUDY_MINUTES
        } else {
            saturate(study_minutes)
        };
        let break_minutes = if break_minutes < 0 {
            DEFAULT_BREAK_MINUTES
        } else {
            saturate(break_minutes)
        };
        let iterations = if iterations <= 0 { 1 } else { saturate(iterations) };

        Self {
            study_minutes,
            break_minutes,
            iterations,
        }
    }

    /// Build a config from optional text fields, e.g. a form or CLI flags.
    ///
    /// Missing, blank or non-numeric text takes the field default
    /// (25 / 5 / 4) before normalization.
    pub fn parse(study: Option<&str>, brk: Option<&str>, iterations: Option<&str>) -> Self {
        Self::parse_or(
            study,
            brk,
            iterations,
            (
                i64::from(DEFAULT_STUDY_MINUTES),
                i64::from(DEFAULT_BREAK_MINUTES),
                i64::from(DEFAULT_ITERATIONS),
            ),
        )
    }

    /// Like [`parse`](Self::parse), but unusable text takes the matching
    /// `(study, break, iterations)` value from `fallback`. The result is
    /// normalized either way.
    pub fn parse_or(
        study: Option<&str>,
        brk: Option<&str>,
        iterations: Option<&str>,
        fallback: (i64, i64, i64),
    ) -> Self {
        Self::normalized(
            parse_or_default(study, fallback.0),
            parse_or_default(brk, fallback.1),
            parse_or_default(iterations, fallback.2),
        )
    }

    /// Re-apply the normalization rules, e.g. to a deserialized value.
    pub fn normalize(self) -> Self {
        Self::normalized(
            i64::from(self.study_minutes),
            i64::from(self.break_minutes),
            i64::from(self.iterations),
        )
    }

    pub fn study_secs(&self) -> u64 {
        u64::from(self.study_minutes) * 60
    }

    pub fn break_secs(&self) -> u64 {
        u64::from(self.break_minutes) * 60
    }

    pub fn total_study_minutes(&self) -> u64 {
        u64::from(self.study_minutes) * u64::from(self.iterations)
    }
}

fn parse_or_default(raw: Option<&str>, default: i64) -> i64 {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse::<i64>().ok())
        .unwrap_or(default)
}

fn saturate(value: i64) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_study_falls_back_to_default() {
        let cfg = SessionConfig::normalized(0, 5, 4);
        assert_eq!(cfg, SessionConfig::normalized(25, 5, 4));
        assert_eq!(cfg.study_minutes, 25);
    }

    #[test]
    fn negative_break_falls_back_to_default() {
        let cfg = SessionConfig::normalized(25, -5, 4);
        assert_eq!(cfg.break_minutes, 5);
    }

    #[test]
    fn zero_break_is_kept() {
        let cfg = SessionConfig::normalized(25, 0, 4);
        assert_eq!(cfg.break_minutes, 0);
    }

    #[test]
    fn non_positive_iterations_become_one() {
        assert_eq!(SessionConfig::normalized(25, 5, 0).iterations, 1);
        assert_eq!(SessionConfig::normalized(25, 5, -3).iterations, 1);
    }

    #[test]
    fn parse_uses_defaults_for_missing_or_garbage() {
        let cfg = SessionConfig::parse(None, Some("  "), Some("four"));
        assert_eq!(cfg, SessionConfig::default());
    }

    #[test]
    fn parse_trims_and_normalizes() {
        let cfg = SessionConfig::parse(Some(" 50 "), Some("-1"), Some("0"));
        assert_eq!(cfg.study_minutes, 50);
        assert_eq!(cfg.break_minutes, 5);
        assert_eq!(cfg.iterations, 1);
    }

    #[test]
    fn parse_or_takes_fallback_for_garbage() {
        let cfg = SessionConfig::parse_or(Some("abc"), None, Some("2"), (1, 0, 9));
        assert_eq!(cfg.study_minutes, 1);
        assert_eq!(cfg.break_minutes, 0);
        assert_eq!(cfg.iterations, 2);
    }

    #[test]
    fn parse_or_normalizes_fallback() {
        let cfg = SessionConfig::parse_or(None, None, None, (0, -1, 0));
        assert_eq!(cfg, SessionConfig::normalized(25, 5, 1));
    }

    #[test]
    fn huge_values_saturate() {
        let cfg = SessionConfig::normalized(i64::MAX, 0, 1);
        assert_eq!(cfg.study_minutes, u32::MAX);
    }

    #[test]
    fn total_study_minutes_multiplies_cycles() {
        let cfg = SessionConfig::normalized(30, 5, 3);
        assert_eq!(cfg.total_study_minutes(), 90);
        assert_eq!(cfg.study_secs(), 1800);
        assert_eq!(cfg.break_secs(), 300);
    }
}
