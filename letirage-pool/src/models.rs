use std::collections::{BTreeMap, HashSet};

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub group: String,
    #[serde(default)]
    pub owner: String,
    pub weight: f64,
    #[serde(default)]
    pub metrics: BTreeMap<String, f64>,
}

impl Candidate {
    pub fn new(id: impl Into<String>, name: impl Into<String>, weight: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            group: String::new(),
            owner: String::new(),
            weight,
            metrics: BTreeMap::new(),
        }
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = group.into();
        self
    }

    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = owner.into();
        self
    }

    pub fn with_metric(mut self, key: impl Into<String>, value: f64) -> Self {
        self.metrics.insert(key.into(), value);
        self
    }

    /// Poids utilisé pour le tirage : négatif ou non fini compte pour zéro.
    pub fn effective_weight(&self) -> f64 {
        if self.weight.is_finite() && self.weight > 0.0 {
            self.weight
        } else {
            0.0
        }
    }
}

pub fn total_weight(pool: &[Candidate]) -> f64 {
    pool.iter().map(Candidate::effective_weight).sum()
}

/// Probabilité pour chaque candidat d'être tiré en premier (poids / total).
pub fn first_rank_shares(pool: &[Candidate]) -> Vec<f64> {
    // ramené au plus grand poids pour que la somme reste finie
    let max = pool.iter().map(Candidate::effective_weight).fold(0.0, f64::max);
    if max <= 0.0 {
        return vec![0.0; pool.len()];
    }
    let total: f64 = pool.iter().map(|c| c.effective_weight() / max).sum();
    pool.iter().map(|c| c.effective_weight() / max / total).collect()
}

pub fn validate_pool(pool: &[Candidate]) -> Result<()> {
    let mut seen = HashSet::with_capacity(pool.len());
    for candidate in pool {
        if candidate.id.trim().is_empty() {
            bail!("Candidat sans identifiant : '{}'", candidate.name);
        }
        if !candidate.weight.is_finite() || candidate.weight < 0.0 {
            bail!("Poids invalide pour {} : {}", candidate.id, candidate.weight);
        }
        if !seen.insert(candidate.id.as_str()) {
            bail!("Identifiant en double : {}", candidate.id);
        }
    }
    Ok(())
}
