use serde::Serialize;

use letirage_pool::models::{first_rank_shares, Candidate};

use crate::sampler::{sample, seeded_rng, Weighted};

#[derive(Debug, Clone, Serialize)]
pub struct CandidateTally {
    pub id: String,
    pub name: String,
    pub weight: f64,
    /// Probabilité théorique d'être tiré au rang 1.
    pub expected_first: f64,
    pub first_rank: u32,
    pub any_rank: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    pub trials: usize,
    pub winner_count: usize,
    pub tallies: Vec<CandidateTally>,
}

impl SimulationReport {
    pub fn observed_first(&self, tally: &CandidateTally) -> f64 {
        if self.trials == 0 {
            return 0.0;
        }
        tally.first_rank as f64 / self.trials as f64
    }

    pub fn observed_any(&self, tally: &CandidateTally) -> f64 {
        if self.trials == 0 {
            return 0.0;
        }
        tally.any_rank as f64 / self.trials as f64
    }

    /// Plus grand écart absolu entre fréquence observée et attendue au rang 1.
    pub fn max_first_rank_deviation(&self) -> f64 {
        self.tallies
            .iter()
            .map(|t| (self.observed_first(t) - t.expected_first).abs())
            .fold(0.0, f64::max)
    }
}

#[derive(Clone, Copy)]
struct Slot {
    index: usize,
    weight: f64,
}

impl Weighted for Slot {
    fn weight(&self) -> f64 {
        self.weight
    }
}

/// Répète le tirage `trials` fois et compte les gains de chaque candidat.
/// Les candidats sont comptés par position, les identifiants en double
/// restent donc distincts.
pub fn simulate<F: FnMut(usize)>(
    pool: &[Candidate],
    winner_count: usize,
    trials: usize,
    seed: Option<u64>,
    mut on_progress: F,
) -> SimulationReport {
    let mut rng = seeded_rng(seed);
    let slots: Vec<Slot> = pool
        .iter()
        .enumerate()
        .map(|(index, c)| Slot { index, weight: c.effective_weight() })
        .collect();

    let mut first_rank = vec![0u32; pool.len()];
    let mut any_rank = vec![0u32; pool.len()];
    let step = (trials / 100).max(1);

    for trial in 0..trials {
        let winners = sample(&slots, winner_count, &mut rng);
        if let Some(first) = winners.first() {
            first_rank[first.index] += 1;
        }
        for slot in &winners {
            any_rank[slot.index] += 1;
        }
        if (trial + 1) % step == 0 || trial + 1 == trials {
            on_progress(trial + 1);
        }
    }

    let shares = first_rank_shares(pool);
    let tallies = pool
        .iter()
        .enumerate()
        .map(|(i, c)| CandidateTally {
            id: c.id.clone(),
            name: c.name.clone(),
            weight: c.weight,
            expected_first: shares[i],
            first_rank: first_rank[i],
            any_rank: any_rank[i],
        })
        .collect();

    SimulationReport { trials, winner_count, tallies }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulation_matches_weights() {
        let pool = vec![
            Candidate::new("a", "A", 1.0),
            Candidate::new("b", "B", 3.0),
            Candidate::new("c", "C", 6.0),
        ];
        let report = simulate(&pool, 1, 20_000, Some(42), |_| {});
        assert_eq!(report.trials, 20_000);
        assert!(report.max_first_rank_deviation() < 0.02, "écart: {}", report.max_first_rank_deviation());
        let total: u32 = report.tallies.iter().map(|t| t.first_rank).sum();
        assert_eq!(total, 20_000);
    }

    #[test]
    fn test_any_rank_counts_every_winner() {
        let pool = vec![
            Candidate::new("a", "A", 1.0),
            Candidate::new("b", "B", 1.0),
            Candidate::new("c", "C", 1.0),
        ];
        let report = simulate(&pool, 2, 500, Some(1), |_| {});
        let total: u32 = report.tallies.iter().map(|t| t.any_rank).sum();
        assert_eq!(total, 1_000);
    }

    #[test]
    fn test_duplicate_ids_counted_separately() {
        let pool = vec![Candidate::new("x", "X", 1.0), Candidate::new("x", "X bis", 1.0)];
        let report = simulate(&pool, 2, 100, Some(3), |_| {});
        assert_eq!(report.tallies[0].any_rank, 100);
        assert_eq!(report.tallies[1].any_rank, 100);
    }

    #[test]
    fn test_zero_weight_never_first() {
        let pool = vec![Candidate::new("z", "Zéro", 0.0), Candidate::new("o", "Un", 1.0)];
        let report = simulate(&pool, 1, 1_000, Some(9), |_| {});
        assert_eq!(report.tallies[0].first_rank, 0);
        assert_eq!(report.tallies[1].first_rank, 1_000);
    }

    #[test]
    fn test_progress_reaches_total() {
        let pool = vec![Candidate::new("a", "A", 1.0)];
        let mut last = 0;
        let mut calls = 0;
        simulate(&pool, 1, 250, Some(0), |done| {
            last = done;
            calls += 1;
        });
        assert_eq!(last, 250);
        assert!(calls <= 126);
    }
}
