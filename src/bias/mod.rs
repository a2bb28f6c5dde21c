// src/bias/mod.rs
//! Bias scoring engine: knowledge base, evaluator, report generator and the
//! offline interaction-table derivation.
//!
//! Everything here is pure. The knowledge base is built once (see
//! [`knowledge::KnowledgeBase`]) and then only read.

pub mod evaluate;
pub mod interactions;
pub mod knowledge;
pub mod report;

use serde::{Deserialize, Serialize};

// Re-export convenient types.
pub use crate::bias::evaluate::{evaluate_bias_impact, BiasAdjustmentOutput, BiasImpact};
pub use crate::bias::interactions::{derive_heuristics, BaseHeuristic, InteractionTable};
pub use crate::bias::knowledge::KnowledgeBase;
pub use crate::bias::report::{
    generate_bias_report, BiasDetail, BiasReport, Confidence, RecommendationStrength, Verdict,
};

/// Lower/upper bound of every adjusted score.
pub const SCORE_MIN: f64 = 0.0;
pub const SCORE_MAX: f64 = 10.0;

/// Decimal places kept in `totalScoreAdjustment`. Table influences carry at
/// most two, so this only strips summation noise.
pub const ADJUSTMENT_DECIMALS: i32 = 6;

/// Explanation used for labels the knowledge base does not know.
pub const UNKNOWN_BIAS_EXPLANATION: &str = "No specific heuristic available for this bias.";
pub const UNKNOWN_BIAS_IMPACT: &str = "No specific heuristic; impact on experience is unknown.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Moderate,
    High,
}

/// One entry of the runtime knowledge base.
///
/// `max_score_influence` is produced by [`derive_heuristics`], never written by hand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BiasKnowledgeEntry {
    pub severity: Severity,
    pub base_score_influence: f64,
    pub max_score_influence: f64,
    pub impact_on_experience: String,
    pub explanation: String,
}

/// A single input label resolved against the knowledge base.
///
/// Both [`BiasImpact`] and [`BiasDetail`] are views over this; the lookup and
/// the sum live in one place.
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedBias {
    /// Label as the caller sent it.
    pub name: String,
    pub severity: Severity,
    pub base_score_influence: f64,
    pub max_score_influence: f64,
    /// Influence actually added to the score.
    pub applied_influence: f64,
    pub impact_on_experience: String,
    pub explanation: String,
    pub known: bool,
}

impl AppliedBias {
    pub(crate) fn from_entry(name: &str, entry: &BiasKnowledgeEntry) -> Self {
        Self {
            name: name.to_string(),
            severity: entry.severity,
            base_score_influence: entry.base_score_influence,
            max_score_influence: entry.max_score_influence,
            applied_influence: entry.base_score_influence,
            impact_on_experience: entry.impact_on_experience.clone(),
            explanation: entry.explanation.clone(),
            known: true,
        }
    }

    /// Zero-influence placeholder for a label with no heuristic.
    pub(crate) fn placeholder(name: &str) -> Self {
        Self {
            name: name.to_string(),
            severity: Severity::Low,
            base_score_influence: 0.0,
            max_score_influence: 0.0,
            applied_influence: 0.0,
            impact_on_experience: UNKNOWN_BIAS_IMPACT.to_string(),
            explanation: UNKNOWN_BIAS_EXPLANATION.to_string(),
            known: false,
        }
    }
}

/// Resolved labels plus the score arithmetic shared by both report shapes.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Assessment {
    pub sentiment_score: f64,
    pub applied: Vec<AppliedBias>,
    pub total_adjustment: f64,
    pub adjusted_score: f64,
}

impl Assessment {
    pub fn compute(kb: &KnowledgeBase, sentiment_score: f64, bias_indicators: &[String]) -> Self {
        let applied: Vec<AppliedBias> = bias_indicators.iter().map(|b| kb.resolve(b)).collect();
        // Plain sum, no normalization by count.
        let total_adjustment = snap_adjustment(applied.iter().map(|a| a.applied_influence).sum());
        let adjusted_score = round1(clamp_score(sentiment_score + total_adjustment));
        Self {
            sentiment_score,
            applied,
            total_adjustment,
            adjusted_score,
        }
    }
}

/// Clamp to [0, 10].
pub fn clamp_score(x: f64) -> f64 {
    x.clamp(SCORE_MIN, SCORE_MAX)
}

/// Drop binary summation noise (`0.4 + 0.2` → `0.6`, not `0.6000000000000001`).
pub fn snap_adjustment(x: f64) -> f64 {
    let scale = 10f64.powi(ADJUSTMENT_DECIMALS);
    (x * scale).round() / scale
}

/// One decimal place, half away from zero, computed on the scaled value.
pub fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}
