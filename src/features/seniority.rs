//! Seniority classification from job titles
//!
//! An ordered table of keyword patterns; the first rule that matches a
//! lower-cased title decides the rank.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

/// Seniority level derived from a job title, 1 (junior) to 7 (root tier)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeniorityRank(u8);

impl SeniorityRank {
    pub const MIN: SeniorityRank = SeniorityRank(1);
    /// Rank for titles no rule recognises
    pub const UNCLASSIFIED: SeniorityRank = SeniorityRank(2);
    /// Chief / CEO tier; never proposed candidates of its own
    pub const ROOT_TIER: SeniorityRank = SeniorityRank(7);

    /// Rank from a raw level, `None` outside 1..=7
    pub fn new(level: u8) -> Option<Self> {
        (1..=7).contains(&level).then_some(SeniorityRank(level))
    }

    pub fn level(&self) -> u8 {
        self.0
    }

    pub fn is_root_tier(&self) -> bool {
        *self >= Self::ROOT_TIER
    }

    /// Positive rank difference `other - self`, if `other` is more senior
    pub fn gap_to(&self, other: SeniorityRank) -> Option<u8> {
        other.0.checked_sub(self.0).filter(|gap| *gap > 0)
    }
}

impl fmt::Display for SeniorityRank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

struct SeniorityRule {
    pattern: Regex,
    rank: SeniorityRank,
}

// Priority order matters: "Senior Manager" is a manager, "Associate Director" a director.
static RULES: LazyLock<Vec<SeniorityRule>> = LazyLock::new(|| {
    [
        (r"\b(?:chief|ceo)\b", 7),
        (r"\b(?:vp|vice president)\b", 6),
        (r"\b(?:director|head)\b", 5),
        (r"\b(?:manager|lead)\b", 4),
        // "sr." ends in punctuation, so it only anchors on the left
        (r"\b(?:senior|principal)\b|\bsr\.", 3),
        (r"\b(?:junior|entry|associate)\b", 1),
    ]
    .into_iter()
    .map(|(pattern, level)| SeniorityRule {
        pattern: Regex::new(pattern).expect("seniority patterns are static and valid"),
        rank: SeniorityRank(level),
    })
    .collect()
});

static CHIEF_EXECUTIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:ceo|chief executive)\b").expect("chief-executive pattern is static and valid")
});

/// True for chief-executive titles, the preferred root among several root-tier titles
pub fn is_chief_executive(title: &str) -> bool {
    CHIEF_EXECUTIVE.is_match(&title.to_lowercase())
}

/// Classify a job title. Total and deterministic: an empty or unknown
/// title yields [`SeniorityRank::UNCLASSIFIED`].
pub fn seniority_rank(title: &str) -> SeniorityRank {
    let title = title.to_lowercase();
    RULES
        .iter()
        .find(|rule| rule.pattern.is_match(&title))
        .map(|rule| rule.rank)
        .unwrap_or(SeniorityRank::UNCLASSIFIED)
}
