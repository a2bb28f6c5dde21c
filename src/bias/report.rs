//! Bias Report Generator: the multi-layer report consumed by report viewers.
//!
//! Layers:
//! - `summary`         : adjusted score + verdict / confidence / recommendation strength
//! - `details`         : one [`BiasDetail`] per input label, in input order
//! - `culturalContext` : original vs adjusted score with a canned justification
//! - `fullReport`      : `score_analysis_engine` echo for downstream tooling
//!
//! JSON field names are a compatibility contract with existing consumers.

use serde::Serialize;
use std::collections::HashSet;

use super::knowledge::normalize_label;
use super::{AppliedBias, Assessment, KnowledgeBase, Severity};

pub const JUSTIFICATION_ADJUSTED: &str =
    "Score adjusted to account for ideological, narrative, or identity-driven bias signals.";
pub const JUSTIFICATION_UNADJUSTED: &str =
    "No ideological, narrative, or identity-driven adjustment was applied.";
pub const CALIBRATION_DISCLAIMER: &str =
    "Bias adjustments are heuristic estimates calibrated against general audience reception; \
     they are not a substitute for the reviewer's own verdict.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Verdict {
    #[serde(rename = "generally positive")]
    GenerallyPositive,
    #[serde(rename = "mixed")]
    Mixed,
    #[serde(rename = "generally negative")]
    GenerallyNegative,
}

impl Verdict {
    pub fn from_score(score: f64) -> Self {
        if score >= 7.5 {
            Verdict::GenerallyPositive
        } else if score >= 5.0 {
            Verdict::Mixed
        } else {
            Verdict::GenerallyNegative
        }
    }
}

/// Confidence in the bias read-out. Drops to `Moderate` once more than two
/// distinct labels are present, compared the way the knowledge base looks them up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Moderate,
}

impl Confidence {
    pub fn from_indicators(bias_indicators: &[String]) -> Self {
        let distinct: HashSet<String> = bias_indicators
            .iter()
            .map(|b| normalize_label(b))
            .collect();
        if distinct.len() > 2 {
            Confidence::Moderate
        } else {
            Confidence::High
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationStrength {
    Strong,
    Moderate,
    Weak,
}

impl RecommendationStrength {
    pub fn from_score(score: f64) -> Self {
        if score >= 8.0 {
            RecommendationStrength::Strong
        } else if score >= 6.0 {
            RecommendationStrength::Moderate
        } else {
            RecommendationStrength::Weak
        }
    }
}

/// Detail view of one resolved label.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BiasDetail {
    pub name: String,
    pub severity: Severity,
    pub score_impact: f64,
    pub base_score_influence: f64,
    pub max_score_influence: f64,
    pub impact_on_experience: String,
    pub description: String,
}

impl From<&AppliedBias> for BiasDetail {
    fn from(a: &AppliedBias) -> Self {
        Self {
            name: a.name.clone(),
            severity: a.severity,
            score_impact: a.applied_influence,
            base_score_influence: a.base_score_influence,
            max_score_influence: a.max_score_influence,
            impact_on_experience: a.impact_on_experience.clone(),
            description: a.explanation.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub adjusted_score: f64,
    pub verdict: Verdict,
    pub confidence: Confidence,
    pub recommendation_strength: RecommendationStrength,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bias_summary: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AudienceReaction {
    pub aligned: String,
    pub neutral: String,
    pub opposed: String,
}

impl Default for AudienceReaction {
    // Not derived from the detected biases.
    fn default() -> Self {
        Self {
            aligned: "positive".to_string(),
            neutral: "mixed".to_string(),
            opposed: "negative".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CulturalContext {
    pub original_score: f64,
    pub bias_adjusted_score: f64,
    pub justification: String,
    pub audience_reaction: AudienceReaction,
    pub bias_details: Vec<BiasDetail>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreAnalysisEngine {
    pub input_review_score: f64,
    pub ideological_biases_detected: Vec<BiasDetail>,
    pub bias_adjusted_score: f64,
    pub disclaimer: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FullReport {
    pub score_analysis_engine: ScoreAnalysisEngine,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BiasReport {
    pub summary: ReportSummary,
    pub details: Vec<BiasDetail>,
    pub cultural_context: CulturalContext,
    pub full_report: FullReport,
}

/// Build the full report for `sentiment_score` and `bias_indicators`.
/// Score arithmetic is the same as [`super::evaluate_bias_impact`].
pub fn generate_bias_report(
    kb: &KnowledgeBase,
    sentiment_score: f64,
    bias_indicators: &[String],
) -> BiasReport {
    let a = Assessment::compute(kb, sentiment_score, bias_indicators);
    let details: Vec<BiasDetail> = a.applied.iter().map(BiasDetail::from).collect();

    let summary = ReportSummary {
        adjusted_score: a.adjusted_score,
        verdict: Verdict::from_score(a.adjusted_score),
        confidence: Confidence::from_indicators(bias_indicators),
        recommendation_strength: RecommendationStrength::from_score(a.adjusted_score),
        bias_summary: bias_summary(bias_indicators),
    };

    let justification = if bias_indicators.is_empty() {
        JUSTIFICATION_UNADJUSTED
    } else {
        JUSTIFICATION_ADJUSTED
    };

    BiasReport {
        summary,
        details: details.clone(),
        cultural_context: CulturalContext {
            original_score: a.sentiment_score,
            bias_adjusted_score: a.adjusted_score,
            justification: justification.to_string(),
            audience_reaction: AudienceReaction::default(),
            bias_details: details.clone(),
        },
        full_report: FullReport {
            score_analysis_engine: ScoreAnalysisEngine {
                input_review_score: a.sentiment_score,
                ideological_biases_detected: details,
                bias_adjusted_score: a.adjusted_score,
                disclaimer: CALIBRATION_DISCLAIMER.to_string(),
            },
        },
    }
}

/// `"Includes nostalgia, franchise biases."`, or `None` for an empty list.
/// Labels are normalized first, so `" Nostalgia Bias"` reads as `nostalgia`.
pub fn bias_summary(bias_indicators: &[String]) -> Option<String> {
    if bias_indicators.is_empty() {
        return None;
    }
    let names = bias_indicators
        .iter()
        .map(|b| {
            let label = normalize_label(b);
            match label.strip_suffix(" bias") {
                Some(stem) => stem.trim_end().to_string(),
                None => label,
            }
        })
        .collect::<Vec<_>>()
        .join(", ");
    let noun = if bias_indicators.len() == 1 {
        "bias"
    } else {
        "biases"
    };
    Some(format!("Includes {} {}.", names, noun))
}
