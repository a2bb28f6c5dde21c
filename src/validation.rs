//! Request validation in front of the engine.
//!
//! The engine itself accepts any finite score and any labels; this layer
//! rejects malformed requests so the API can answer 400 before calling it.

use thiserror::Error;

use crate::config::ValidationSection;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("sentimentScore is required")]
    MissingScore,

    #[error("sentimentScore must be a finite number")]
    NonFiniteScore,

    #[error("sentimentScore {score} is outside [{min}, {max}]")]
    ScoreOutOfRange { score: f64, min: f64, max: f64 },

    #[error("biasIndicators must be a non-empty array of strings")]
    MissingIndicators,

    #[error("biasIndicators has {count} entries; at most {max} are allowed")]
    TooManyIndicators { count: usize, max: usize },

    #[error("biasIndicators[{index}] must be a non-empty string")]
    BlankIndicator { index: usize },

    #[error("invalid request body: {0}")]
    MalformedBody(String),
}

/// Check a decoded request and hand back the values the engine needs.
pub fn validate_request(
    cfg: &ValidationSection,
    sentiment_score: Option<f64>,
    bias_indicators: Option<Vec<String>>,
) -> Result<(f64, Vec<String>), ValidationError> {
    let score = sentiment_score.ok_or(ValidationError::MissingScore)?;
    if !score.is_finite() {
        return Err(ValidationError::NonFiniteScore);
    }
    if score < cfg.score_min || score > cfg.score_max {
        return Err(ValidationError::ScoreOutOfRange {
            score,
            min: cfg.score_min,
            max: cfg.score_max,
        });
    }

    let indicators = match bias_indicators {
        Some(v) if !v.is_empty() => v,
        _ => return Err(ValidationError::MissingIndicators),
    };
    if indicators.len() > cfg.max_indicators {
        return Err(ValidationError::TooManyIndicators {
            count: indicators.len(),
            max: cfg.max_indicators,
        });
    }
    if let Some(index) = indicators.iter().position(|s| s.trim().is_empty()) {
        return Err(ValidationError::BlankIndicator { index });
    }

    Ok((score, indicators))
}
