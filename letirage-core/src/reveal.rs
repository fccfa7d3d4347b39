use std::time::Duration;

use letirage_pool::models::Candidate;

#[derive(Debug, Clone, PartialEq)]
pub enum RevealStep {
    Reveal { index: usize, winner: Candidate },
    /// Un intervalle s'est écoulé depuis la dernière révélation.
    Done,
}

/// Révèle les gagnants un par un, dans l'ordre du tirage (rang 1 d'abord).
///
/// Le planificateur ne possède pas de minuterie : la machine d'état arme
/// `interval()` après chaque `Reveal`, puis rappelle `advance()`. Il n'y a
/// donc jamais deux révélations en attente.
#[derive(Debug, Clone)]
pub struct RevealScheduler {
    winners: Vec<Candidate>,
    interval: Duration,
    next: usize,
}

impl RevealScheduler {
    pub fn new(winners: Vec<Candidate>, interval: Duration) -> Self {
        Self { winners, interval, next: 0 }
    }

    pub fn advance(&mut self) -> RevealStep {
        match self.winners.get(self.next) {
            Some(winner) => {
                let index = self.next;
                self.next += 1;
                RevealStep::Reveal { index, winner: winner.clone() }
            }
            None => RevealStep::Done,
        }
    }

    /// Position du gagnant affiché ; `None` avant la première révélation.
    pub fn reveal_index(&self) -> Option<usize> {
        self.next.checked_sub(1)
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}
