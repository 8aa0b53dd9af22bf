//! Include/exclude filtering by entity name
//!
//! Patterns are glob-style (`ExpressVPN*`, `*.helper`). Exclude takes
//! precedence over include; an empty include set means everything that is
//! not excluded is eligible.

use crate::error::{Error, Result};
use glob::Pattern;

/// Compiled include/exclude name filter
#[derive(Debug, Clone, Default)]
pub struct NameFilter {
    include: Vec<Pattern>,
    exclude: Vec<Pattern>,
}

impl NameFilter {
    /// Compile a filter from raw pattern strings.
    ///
    /// An unparseable pattern is a configuration error and aborts before
    /// anything is planned.
    pub fn new(include: &[String], exclude: &[String]) -> Result<Self> {
        Ok(Self {
            include: compile(include)?,
            exclude: compile(exclude)?,
        })
    }

    /// Whether an entity name passes the filter
    pub fn matches(&self, name: &str) -> bool {
        if self.exclude.iter().any(|p| p.matches(name)) {
            return false;
        }
        if self.include.is_empty() {
            return true;
        }
        self.include.iter().any(|p| p.matches(name))
    }
}

fn compile(patterns: &[String]) -> Result<Vec<Pattern>> {
    patterns
        .iter()
        .map(|raw| {
            Pattern::new(raw).map_err(|source| Error::InvalidPattern {
                pattern: raw.clone(),
                source,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pats(raw: &[&str]) -> Vec<String> {
        raw.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn empty_filter_matches_everything() {
        let filter = NameFilter::new(&[], &[]).unwrap();
        assert!(filter.matches("anything"));
    }

    #[test]
    fn include_restricts_to_matching_names() {
        let filter = NameFilter::new(&pats(&["ExpressVPN*"]), &[]).unwrap();
        assert!(filter.matches("ExpressVPN.exe"));
        assert!(!filter.matches("chrome.exe"));
    }

    #[test]
    fn exclude_wins_over_include() {
        let filter = NameFilter::new(&pats(&["svc*"]), &pats(&["svchost*"])).unwrap();
        assert!(filter.matches("svc-app"));
        assert!(!filter.matches("svchost.exe"));
    }

    #[test]
    fn invalid_pattern_is_a_configuration_error() {
        let err = NameFilter::new(&pats(&["[unclosed"]), &[]).unwrap_err();
        assert!(matches!(err, Error::InvalidPattern { .. }));
    }
}
