use std::fmt;

use serde::{Deserialize, Serialize};

/// How a response was generated.
///
/// Ordered by name so summary tables list `normal` before `parallel`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// One serialized call with the raw prompt.
    Normal,
    /// Skeleton call followed by one concurrent expansion per point.
    Parallel,
}

impl Strategy {
    pub const ALL: &[Strategy] = &[Strategy::Normal, Strategy::Parallel];

    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Normal => "normal",
            Strategy::Parallel => "parallel",
        }
    }

    pub fn parse_str(s: &str) -> Option<Self> {
        match s {
            "normal" => Some(Strategy::Normal),
            "parallel" => Some(Strategy::Parallel),
            _ => None,
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pipeline stage of a single run, used to attribute failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    NormalCall,
    SkeletonCall,
    Parse,
    Expand,
    Merge,
    Measure,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::NormalCall => "normal_call",
            Stage::SkeletonCall => "skeleton_call",
            Stage::Parse => "parse",
            Stage::Expand => "expand",
            Stage::Merge => "merge",
            Stage::Measure => "measure",
        }
    }

    pub fn parse_str(s: &str) -> Option<Self> {
        match s {
            "normal_call" => Some(Stage::NormalCall),
            "skeleton_call" => Some(Stage::SkeletonCall),
            "parse" => Some(Stage::Parse),
            "expand" => Some(Stage::Expand),
            "merge" => Some(Stage::Merge),
            "measure" => Some(Stage::Measure),
            _ => None,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strategy_parse_str_all() {
        assert_eq!(Strategy::parse_str("normal"), Some(Strategy::Normal));
        assert_eq!(Strategy::parse_str("parallel"), Some(Strategy::Parallel));
        assert_eq!(Strategy::parse_str("PARALLEL"), None);
        assert_eq!(Strategy::parse_str(""), None);
    }

    #[test]
    fn strategy_as_str_roundtrip() {
        for s in Strategy::ALL {
            assert_eq!(Strategy::parse_str(s.as_str()), Some(*s));
            assert_eq!(format!("{s}"), s.as_str());
        }
    }

    #[test]
    fn strategy_orders_by_name() {
        assert!(Strategy::Normal < Strategy::Parallel);
        let mut all = vec![Strategy::Parallel, Strategy::Normal];
        all.sort();
        assert_eq!(all, Strategy::ALL);
    }

    #[test]
    fn strategy_serde_snake_case() {
        let json = serde_json::to_string(&Strategy::Parallel).unwrap();
        assert_eq!(json, "\"parallel\"");
        let back: Strategy = serde_json::from_str("\"normal\"").unwrap();
        assert_eq!(back, Strategy::Normal);
    }

    #[test]
    fn stage_as_str_roundtrip() {
        let all = [
            Stage::NormalCall,
            Stage::SkeletonCall,
            Stage::Parse,
            Stage::Expand,
            Stage::Merge,
            Stage::Measure,
        ];
        for s in &all {
            assert_eq!(Stage::parse_str(s.as_str()), Some(*s));
            assert_eq!(format!("{s}"), s.as_str());
        }
        assert_eq!(Stage::parse_str("compile"), None);
    }
}
