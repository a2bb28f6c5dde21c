//! Offline heuristic-table derivation.
//!
//! Input: a base table (`bias -> {severity, scoreInfluence, ...}`) and a
//! pairwise interaction table (`biasA -> biasB -> multiplier`).
//! Output: the runtime knowledge base, where every entry carries
//! `baseScoreInfluence` and `maxScoreInfluence`.
//!
//! The interaction table is symmetrized in place before derivation. Running the
//! derivation again on the same tables yields the same values.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use super::{BiasKnowledgeEntry, Severity};

/// One hand-authored row of the base table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseHeuristic {
    pub severity: Severity,
    pub score_influence: f64,
    pub impact_on_experience: String,
    pub explanation: String,
}

/// Base table keyed by bias label. BTreeMap keeps the derived output stable.
pub type BaseTable = BTreeMap<String, BaseHeuristic>;

/// `biasA -> biasB -> multiplier`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InteractionTable(pub BTreeMap<String, BTreeMap<String, f64>>);

impl InteractionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert of a single directed pair.
    pub fn with(mut self, a: &str, b: &str, multiplier: f64) -> Self {
        self.insert(a, b, multiplier);
        self
    }

    pub fn insert(&mut self, a: &str, b: &str, multiplier: f64) {
        self.0
            .entry(a.to_string())
            .or_default()
            .insert(b.to_string(), multiplier);
    }

    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        self.0.get(a).and_then(|row| row.get(b)).copied()
    }

    pub fn partners(&self, a: &str) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.0
            .get(a)
            .into_iter()
            .flat_map(|row| row.iter().map(|(b, m)| (b.as_str(), *m)))
    }

    /// Complete the table so that `(A,B) -> m` implies `(B,A) -> m`.
    /// Reverse pairs that are already defined are left alone.
    pub fn symmetrize(&mut self) {
        let mut missing = Vec::new();
        for (a, row) in &self.0 {
            for (b, &m) in row {
                if self.get(b, a).is_none() {
                    missing.push((b.clone(), a.clone(), m));
                }
            }
        }
        for (b, a, m) in missing {
            self.insert(&b, &a, m);
        }
    }

    /// Number of directed pairs.
    pub fn len(&self) -> usize {
        self.0.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Symmetrize `interactions`, then derive the knowledge base.
///
/// For every bias: start from its base influence and keep the largest
/// `base * multiplier` over partners that also exist in `base`. The comparison
/// is a strict `>`, so only amplification toward the positive end is captured;
/// a strongly negative interaction never becomes the maximum.
pub fn derive_heuristics(
    base: &BaseTable,
    interactions: &mut InteractionTable,
) -> BTreeMap<String, BiasKnowledgeEntry> {
    interactions.symmetrize();

    base.iter()
        .map(|(name, h)| {
            let mut max = h.score_influence;
            for (partner, m) in interactions.partners(name) {
                if !base.contains_key(partner) {
                    continue;
                }
                let candidate = h.score_influence * m;
                if candidate > max {
                    max = candidate;
                }
            }
            tracing::trace!(bias = %name, base = h.score_influence, max, "derived influence");
            (
                name.clone(),
                BiasKnowledgeEntry {
                    severity: h.severity,
                    base_score_influence: h.score_influence,
                    max_score_influence: max,
                    impact_on_experience: h.impact_on_experience.clone(),
                    explanation: h.explanation.clone(),
                },
            )
        })
        .collect()
}

/// Parse a base table from JSON.
pub fn parse_base_table(raw: &str) -> Result<BaseTable> {
    serde_json::from_str(raw).context("parsing base heuristic table")
}

/// Parse an interaction table from JSON.
pub fn parse_interactions(raw: &str) -> Result<InteractionTable> {
    serde_json::from_str(raw).context("parsing bias interaction table")
}

pub fn load_base_table(path: &Path) -> Result<BaseTable> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading base heuristics from {}", path.display()))?;
    parse_base_table(&raw)
}

pub fn load_interactions(path: &Path) -> Result<InteractionTable> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading bias interactions from {}", path.display()))?;
    parse_interactions(&raw)
}
