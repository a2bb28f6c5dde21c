//! # Knowledge Base
//!
//! Immutable mapping from bias label to [`BiasKnowledgeEntry`], built once at
//! startup and shared by reference.
//!
//! - Built-in tables are compiled in (`data/*.json`) and derived on first use.
//! - Tables on disk can replace them (base + interactions, or a pre-derived table).
//! - Lookup is exact after trimming and ASCII lowercasing.
//! - Unknown labels resolve to a zero-influence placeholder and never fail.

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

use super::interactions::{
    derive_heuristics, load_base_table, load_interactions, parse_base_table, parse_interactions,
    BaseTable, InteractionTable,
};
use super::{AppliedBias, BiasKnowledgeEntry};
use crate::config::HeuristicsSection;

const EMBEDDED_BASE: &str = include_str!("../../data/bias_heuristics.json");
const EMBEDDED_INTERACTIONS: &str = include_str!("../../data/bias_interactions.json");

static BUILTIN: Lazy<Arc<KnowledgeBase>> = Lazy::new(|| {
    let base = parse_base_table(EMBEDDED_BASE).expect("valid embedded bias heuristics");
    let interactions =
        parse_interactions(EMBEDDED_INTERACTIONS).expect("valid embedded bias interactions");
    Arc::new(KnowledgeBase::derive(&base, interactions))
});

#[derive(Debug, Clone, PartialEq)]
pub struct KnowledgeBase {
    entries: BTreeMap<String, BiasKnowledgeEntry>,
}

impl KnowledgeBase {
    /// Use an already derived table as-is.
    pub fn new(entries: BTreeMap<String, BiasKnowledgeEntry>) -> Self {
        let entries = entries
            .into_iter()
            .map(|(k, v)| (normalize_label(&k), v))
            .collect();
        Self { entries }
    }

    /// Run the one-shot derivation (symmetrize + max influence) and wrap the result.
    pub fn derive(base: &BaseTable, mut interactions: InteractionTable) -> Self {
        Self::new(derive_heuristics(base, &mut interactions))
    }

    /// The tables compiled into the binary.
    pub fn builtin() -> Arc<KnowledgeBase> {
        BUILTIN.clone()
    }

    /// Build according to config:
    /// 1) `derived_path` → pre-derived table, used verbatim.
    /// 2) `base_path` / `interactions_path` → derive; missing ones fall back to embedded.
    /// 3) nothing set → built-in tables.
    pub fn from_config(cfg: &HeuristicsSection) -> Result<Arc<KnowledgeBase>> {
        if let Some(p) = &cfg.derived_path {
            let kb = Self::load_derived(p)?;
            info!(path = %p.display(), entries = kb.len(), "loaded derived bias heuristics");
            return Ok(Arc::new(kb));
        }

        if cfg.base_path.is_none() && cfg.interactions_path.is_none() {
            return Ok(Self::builtin());
        }

        let base = match &cfg.base_path {
            Some(p) => load_base_table(p)?,
            None => parse_base_table(EMBEDDED_BASE)?,
        };
        let interactions = match &cfg.interactions_path {
            Some(p) => load_interactions(p)?,
            None => parse_interactions(EMBEDDED_INTERACTIONS)?,
        };
        let kb = Self::derive(&base, interactions);
        info!(entries = kb.len(), "derived bias heuristics from configured tables");
        Ok(Arc::new(kb))
    }

    /// Load the JSON written by the `derive-heuristics` tool.
    pub fn load_derived(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading derived heuristics from {}", path.display()))?;
        let entries: BTreeMap<String, BiasKnowledgeEntry> =
            serde_json::from_str(&raw).context("parsing derived heuristics")?;
        Ok(Self::new(entries))
    }

    pub fn get(&self, label: &str) -> Option<&BiasKnowledgeEntry> {
        self.entries.get(&normalize_label(label))
    }

    /// Resolve one input label. Never fails: unknown labels get a placeholder.
    pub fn resolve(&self, label: &str) -> AppliedBias {
        match self.get(label) {
            Some(entry) => AppliedBias::from_entry(label, entry),
            None => {
                debug!(bias = %label, "no heuristic for bias label; applying zero influence");
                AppliedBias::placeholder(label)
            }
        }
    }

    pub fn entries(&self) -> &BTreeMap<String, BiasKnowledgeEntry> {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Short hex digest of the table, stable across runs for the same content.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        // BTreeMap iteration is ordered, so the serialization is deterministic.
        if let Ok(bytes) = serde_json::to_vec(&self.entries) {
            hasher.update(&bytes);
        }
        let digest = hasher.finalize();
        let mut out = String::with_capacity(16);
        for b in digest.iter().take(8) {
            use std::fmt::Write as _;
            let _ = write!(&mut out, "{:02x}", b);
        }
        out
    }
}

/// Trim + ASCII lowercase. Every label comparison goes through this.
pub(crate) fn normalize_label(s: &str) -> String {
    s.trim().to_ascii_lowercase()
}
