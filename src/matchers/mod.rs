use crate::traits::LineMatcher;
use anyhow::anyhow;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub mod nucleo;
pub use nucleo::NucleoMatcher;

pub mod subsequence;
pub use subsequence::SubsequenceMatcher;

/// Selects which [`LineMatcher`] a query runs with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatcherKind {
    #[default]
    Subsequence,
    Nucleo,
}

impl MatcherKind {
    pub fn build(self) -> Box<dyn LineMatcher> {
        match self {
            MatcherKind::Subsequence => Box::new(SubsequenceMatcher::new()),
            MatcherKind::Nucleo => Box::new(NucleoMatcher::new()),
        }
    }
}

impl FromStr for MatcherKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "subsequence" | "subseq" => Ok(MatcherKind::Subsequence),
            "nucleo" | "fzf" => Ok(MatcherKind::Nucleo),
            other => Err(anyhow!(
                "Unknown matcher '{}'. Use 'subsequence' or 'nucleo'.",
                other
            )),
        }
    }
}
