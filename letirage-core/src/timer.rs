//! Emplacement de minuterie unique d'une session de tirage.
//!
//! Une session ne possède jamais plus d'une minuterie en attente : armer
//! remplace la précédente, `clear` la libère. Les jetons portent la
//! génération de la session, un jeton périmé ne correspond plus à rien.

use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerToken {
    pub generation: u64,
    pub seq: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    CountdownTick,
    CycleTick,
    RevealTick,
    Settle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timer {
    pub token: TimerToken,
    pub kind: TimerKind,
    /// Échéance, en temps logique depuis la création de la machine.
    pub due: Duration,
}

#[derive(Debug, Default)]
pub struct TimerSlot {
    current: Option<Timer>,
    seq: u64,
}

impl TimerSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arm(&mut self, generation: u64, kind: TimerKind, due: Duration) -> TimerToken {
        self.seq += 1;
        let token = TimerToken { generation, seq: self.seq };
        self.current = Some(Timer { token, kind, due });
        token
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    pub fn pending(&self) -> Option<&Timer> {
        self.current.as_ref()
    }

    /// Retire la minuterie si `token` est exactement celle en attente.
    pub fn take(&mut self, token: TimerToken) -> Option<Timer> {
        match self.current {
            Some(timer) if timer.token == token => self.current.take(),
            _ => None,
        }
    }
}
