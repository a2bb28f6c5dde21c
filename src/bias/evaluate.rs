//! Bias Impact Evaluator: base score + bias labels → adjusted score and breakdown.
//! No I/O, suitable for unit tests and offline evaluation.

use serde::Serialize;

use super::{AppliedBias, Assessment, KnowledgeBase, Severity};

pub const AUDIENCE_FIT_NEUTRAL: &str =
    "No strong bias detected; the score should hold for a general audience.";
pub const AUDIENCE_FIT_AFFINITY: &str =
    "Likely to resonate most with audiences that share the detected biases, such as franchise fans, genre enthusiasts.";
pub const RATIONALE_NONE: &str = "No significant biases detected; the score was left unadjusted.";

/// Per-label breakdown entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BiasImpact {
    pub name: String,
    pub severity: Severity,
    pub score_influence: f64,
    pub base_score_influence: f64,
    pub max_score_influence: f64,
    pub impact_on_experience: String,
    pub explanation: String,
}

impl From<&AppliedBias> for BiasImpact {
    fn from(a: &AppliedBias) -> Self {
        Self {
            name: a.name.clone(),
            severity: a.severity,
            score_influence: a.applied_influence,
            base_score_influence: a.base_score_influence,
            max_score_influence: a.max_score_influence,
            impact_on_experience: a.impact_on_experience.clone(),
            explanation: a.explanation.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BiasAdjustmentOutput {
    pub sentiment_score: f64,
    /// Clamped to [0, 10], one decimal.
    pub bias_adjusted_score: f64,
    /// Pre-clamp sum of applied influences.
    pub total_score_adjustment: f64,
    pub bias_impact: Vec<BiasImpact>,
    pub audience_fit: String,
    pub adjustment_rationale: String,
}

/// Adjust `sentiment_score` by the influence of every label in `bias_indicators`.
///
/// Labels are not deduplicated; each occurrence contributes and gets its own
/// entry, in input order. The input score is not validated, only the output
/// is clamped.
pub fn evaluate_bias_impact(
    kb: &KnowledgeBase,
    sentiment_score: f64,
    bias_indicators: &[String],
) -> BiasAdjustmentOutput {
    let a = Assessment::compute(kb, sentiment_score, bias_indicators);

    let (audience_fit, adjustment_rationale) = if a.applied.is_empty() {
        (AUDIENCE_FIT_NEUTRAL.to_string(), RATIONALE_NONE.to_string())
    } else {
        let names = a
            .applied
            .iter()
            .map(|b| b.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        (
            AUDIENCE_FIT_AFFINITY.to_string(),
            format!(
                "Adjusted for {} (total adjustment {:+.1}).",
                names, a.total_adjustment
            ),
        )
    };

    BiasAdjustmentOutput {
        sentiment_score: a.sentiment_score,
        bias_adjusted_score: a.adjusted_score,
        total_score_adjustment: a.total_adjustment,
        bias_impact: a.applied.iter().map(BiasImpact::from).collect(),
        audience_fit,
        adjustment_rationale,
    }
}
