use rand::distr::weighted::WeightedIndex;
use rand::prelude::Distribution;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use letirage_pool::models::Candidate;

/// Élément tirable au sort proportionnellement à son poids.
pub trait Weighted {
    /// Poids de sélection ; une valeur ≤ 0 rend l'élément intirable.
    fn weight(&self) -> f64;
}

impl Weighted for Candidate {
    fn weight(&self) -> f64 {
        self.effective_weight()
    }
}

pub fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_rng(&mut rand::rng()),
    }
}

/// Index tiré selon la roue pondérée : le premier dont le poids cumulé dépasse
/// strictement `r ∈ [0, total)`. Si plus aucun poids n'est positif, on retombe
/// sur le premier élément restant.
///
/// Les poids sont ramenés à `(0, 1]` par le plus grand d'entre eux : la somme
/// reste finie même pour des poids proches de `f64::MAX`.
fn pick_index<T: Weighted, R: Rng + ?Sized>(available: &[T], rng: &mut R) -> usize {
    let weights: Vec<f64> = available
        .iter()
        .map(|item| {
            let w = item.weight();
            if w.is_finite() && w > 0.0 { w } else { 0.0 }
        })
        .collect();
    let max = weights.iter().copied().fold(0.0, f64::max);
    if max <= 0.0 {
        return 0;
    }

    match WeightedIndex::<f64>::new(weights.iter().map(|w| w / max)) {
        Ok(dist) => dist.sample(rng),
        Err(_) => 0,
    }
}

/// Tirage pondéré sans remise de `k` éléments (au plus `pool.len()`).
///
/// L'ordre du résultat est le rang : chaque tirage se fait sur le reste du
/// pool, les probabilités se renormalisent donc après chaque retrait.
/// `pool` n'est pas modifié.
pub fn sample<T, R>(pool: &[T], k: usize, rng: &mut R) -> Vec<T>
where
    T: Weighted + Clone,
    R: Rng + ?Sized,
{
    let mut available: Vec<T> = pool.to_vec();
    let mut selected = Vec::with_capacity(k.min(pool.len()));

    while selected.len() < k && !available.is_empty() {
        let idx = pick_index(&available, rng);
        selected.push(available.remove(idx));
    }

    selected
}
