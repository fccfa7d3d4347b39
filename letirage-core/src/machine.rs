//! Machine d'état d'un tirage : compte à rebours → défilement → révélation → fin.
//!
//! Toutes les mutations de session passent par les méthodes de `DrawMachine`,
//! appelées depuis un seul fil. Le temps est logique : le pilote (horloge
//! réelle ou test) fournit `now` et déclenche les minuteries échues.

use std::fmt;
use std::time::Duration;

use anyhow::Result;
use rand::Rng;
use tracing::{debug, info, trace, warn};

use letirage_pool::models::Candidate;

use crate::config::DrawConfig;
use crate::reveal::{RevealScheduler, RevealStep};
use crate::sampler::sample;
use crate::timer::{Timer, TimerKind, TimerSlot, TimerToken};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Countdown,
    Cycling,
    Revealing,
    Complete,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Idle => write!(f, "attente"),
            Phase::Countdown => write!(f, "compte à rebours"),
            Phase::Cycling => write!(f, "défilement"),
            Phase::Revealing => write!(f, "révélation"),
            Phase::Complete => write!(f, "terminé"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DrawRequest {
    pub pool: Vec<Candidate>,
    pub winner_count: usize,
}

impl DrawRequest {
    /// Un nombre de gagnants négatif est ramené à zéro.
    pub fn new(pool: Vec<Candidate>, winner_count: i64) -> Self {
        let winner_count = usize::try_from(winner_count).unwrap_or_else(|_| {
            warn!(winner_count, "nombre de gagnants négatif, ramené à 0");
            0
        });
        Self { pool, winner_count }
    }
}

/// État visible d'un tirage, destiné uniquement à l'affichage.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub session: Option<SessionId>,
    pub phase: Phase,
    pub at: Duration,
    pub countdown_remaining: u32,
    pub displayed: Option<Candidate>,
    /// Renseigné seulement pendant la révélation.
    pub reveal_index: Option<usize>,
    pub winner_count: usize,
}

pub trait DrawObserver {
    /// Changement de phase, tic du compte à rebours, du défilement ou révélation.
    fn on_update(&mut self, _snapshot: &Snapshot) {}

    fn on_reveal(&mut self, _winner: &Candidate, _index: usize) {}

    /// Appelé une seule fois par session menée à terme, après le délai final.
    fn on_complete(&mut self, session: SessionId, winners: &[Candidate]);

    /// Session interrompue : aucun `on_complete` ne suivra pour elle.
    fn on_cancel(&mut self, _session: SessionId) {}
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawEvent {
    Update(Snapshot),
    Revealed { index: usize, winner: Candidate },
    Completed { session: SessionId, winners: Vec<Candidate> },
    Cancelled(SessionId),
}

/// Observateur qui enregistre tout ; utile en test et pour rejouer un affichage.
#[derive(Debug, Default)]
pub struct EventLog {
    pub events: Vec<DrawEvent>,
}

impl EventLog {
    pub fn updates(&self) -> impl Iterator<Item = &Snapshot> {
        self.events.iter().filter_map(|e| match e {
            DrawEvent::Update(s) => Some(s),
            _ => None,
        })
    }

    /// Suite des phases observées, sans répétition consécutive.
    pub fn phases(&self) -> Vec<Phase> {
        let mut phases: Vec<Phase> = Vec::new();
        for snapshot in self.updates() {
            if phases.last() != Some(&snapshot.phase) {
                phases.push(snapshot.phase);
            }
        }
        phases
    }

    pub fn completions(&self) -> Vec<(SessionId, &[Candidate])> {
        self.events
            .iter()
            .filter_map(|e| match e {
                DrawEvent::Completed { session, winners } => Some((*session, winners.as_slice())),
                _ => None,
            })
            .collect()
    }

    pub fn reveals(&self) -> Vec<(usize, &Candidate)> {
        self.events
            .iter()
            .filter_map(|e| match e {
                DrawEvent::Revealed { index, winner } => Some((*index, winner)),
                _ => None,
            })
            .collect()
    }
}

impl DrawObserver for EventLog {
    fn on_update(&mut self, snapshot: &Snapshot) {
        self.events.push(DrawEvent::Update(snapshot.clone()));
    }

    fn on_reveal(&mut self, winner: &Candidate, index: usize) {
        self.events.push(DrawEvent::Revealed { index, winner: winner.clone() });
    }

    fn on_complete(&mut self, session: SessionId, winners: &[Candidate]) {
        self.events.push(DrawEvent::Completed { session, winners: winners.to_vec() });
    }

    fn on_cancel(&mut self, session: SessionId) {
        self.events.push(DrawEvent::Cancelled(session));
    }
}

#[derive(Debug)]
struct DrawSession {
    id: SessionId,
    pool: Vec<Candidate>,
    winner_count: usize,
    phase: Phase,
    countdown_remaining: u32,
    cycle_cursor: usize,
    cycle_elapsed: Duration,
    displayed: Option<Candidate>,
    /// Fixé une seule fois, à la fin du défilement.
    winners: Option<Vec<Candidate>>,
    reveal: Option<RevealScheduler>,
}

pub struct DrawMachine<R, O> {
    config: DrawConfig,
    rng: R,
    observer: O,
    session: Option<DrawSession>,
    timer: TimerSlot,
    generation: u64,
    now: Duration,
}

impl<R: Rng, O: DrawObserver> DrawMachine<R, O> {
    pub fn new(config: DrawConfig, rng: R, observer: O) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            rng,
            observer,
            session: None,
            timer: TimerSlot::new(),
            generation: 0,
            now: Duration::ZERO,
        })
    }

    pub fn config(&self) -> &DrawConfig {
        &self.config
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn into_observer(self) -> O {
        self.observer
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn phase(&self) -> Phase {
        self.session.as_ref().map_or(Phase::Idle, |s| s.phase)
    }

    pub fn is_idle(&self) -> bool {
        self.session.is_none()
    }

    pub fn session_id(&self) -> Option<SessionId> {
        self.session.as_ref().map(|s| s.id)
    }

    pub fn winners(&self) -> Option<&[Candidate]> {
        self.session.as_ref().and_then(|s| s.winners.as_deref())
    }

    pub fn pending_timer(&self) -> Option<&Timer> {
        self.timer.pending()
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.pending_timer().map(|t| t.due)
    }

    pub fn snapshot(&self) -> Snapshot {
        match &self.session {
            Some(session) => Snapshot {
                session: Some(session.id),
                phase: session.phase,
                at: self.now,
                countdown_remaining: session.countdown_remaining,
                displayed: session.displayed.clone(),
                reveal_index: match session.phase {
                    Phase::Revealing => session.reveal.as_ref().and_then(|r| r.reveal_index()),
                    _ => None,
                },
                winner_count: session.winner_count,
            },
            None => Snapshot {
                session: None,
                phase: Phase::Idle,
                at: self.now,
                countdown_remaining: 0,
                displayed: None,
                reveal_index: None,
                winner_count: 0,
            },
        }
    }

    /// Lance une session. Un pool vide est ignoré sans rien changer ; sinon la
    /// session active éventuelle est annulée avant d'allouer la nouvelle.
    pub fn start_draw(&mut self, now: Duration, request: DrawRequest) -> Option<SessionId> {
        if request.pool.is_empty() {
            debug!("pool vide, tirage ignoré");
            return None;
        }

        self.cancel_draw();
        self.now = self.now.max(now);
        self.generation += 1;
        let id = SessionId(self.generation);

        info!(
            session = %id,
            pool = request.pool.len(),
            winners = request.winner_count,
            "tirage lancé"
        );

        self.session = Some(DrawSession {
            id,
            pool: request.pool,
            winner_count: request.winner_count,
            phase: Phase::Countdown,
            countdown_remaining: self.config.countdown_secs,
            cycle_cursor: 0,
            cycle_elapsed: Duration::ZERO,
            displayed: None,
            winners: None,
            reveal: None,
        });
        self.arm(TimerKind::CountdownTick, self.config.countdown_tick());
        self.notify();
        Some(id)
    }

    /// Interrompt la session active sans notifier de gagnants.
    pub fn cancel_draw(&mut self) -> bool {
        let Some(session) = self.session.take() else {
            return false;
        };
        self.timer.clear();
        info!(session = %session.id, phase = %session.phase, "tirage annulé");
        self.observer.on_cancel(session.id);
        self.notify();
        true
    }

    /// Exécute la minuterie `token`. Renvoie `false` si elle est périmée.
    pub fn fire(&mut self, token: TimerToken) -> bool {
        if token.generation != self.generation || self.session.is_none() {
            trace!(?token, "minuterie d'une session close ignorée");
            return false;
        }
        let Some(timer) = self.timer.take(token) else {
            trace!(?token, "minuterie remplacée ignorée");
            return false;
        };
        self.now = self.now.max(timer.due);

        match timer.kind {
            TimerKind::CountdownTick => self.on_countdown_tick(),
            TimerKind::CycleTick => self.on_cycle_tick(),
            TimerKind::RevealTick => self.reveal_next(),
            TimerKind::Settle => self.on_settle(),
        }
        true
    }

    /// Déclenche, dans l'ordre, toutes les minuteries échues à `now`.
    pub fn advance_to(&mut self, now: Duration) -> usize {
        let mut fired = 0;
        while let Some(timer) = self.timer.pending().copied() {
            if timer.due > now {
                break;
            }
            if self.fire(timer.token) {
                fired += 1;
            }
        }
        self.now = self.now.max(now);
        fired
    }

    /// Mène la session active à son terme en temps logique. Renvoie l'instant final.
    pub fn run_until_idle(&mut self) -> Duration {
        while let Some(timer) = self.timer.pending().copied() {
            self.fire(timer.token);
        }
        self.now
    }

    fn arm(&mut self, kind: TimerKind, delay: Duration) {
        let due = self.now + delay;
        self.timer.arm(self.generation, kind, due);
    }

    fn notify(&mut self) {
        let snapshot = self.snapshot();
        self.observer.on_update(&snapshot);
    }

    fn on_countdown_tick(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        session.countdown_remaining = session.countdown_remaining.saturating_sub(1);
        trace!(session = %session.id, remaining = session.countdown_remaining, "compte à rebours");

        if session.countdown_remaining == 0 {
            self.notify();
            self.enter_cycling();
        } else {
            self.arm(TimerKind::CountdownTick, self.config.countdown_tick());
            self.notify();
        }
    }

    fn enter_cycling(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        session.phase = Phase::Cycling;
        session.cycle_elapsed = Duration::ZERO;
        session.displayed = session.pool.first().cloned();
        session.cycle_cursor = 1 % session.pool.len();
        debug!(session = %session.id, "défilement");

        self.arm(TimerKind::CycleTick, self.config.cycle_tick());
        self.notify();
    }

    fn on_cycle_tick(&mut self) {
        let tick = self.config.cycle_tick();
        let total = self.config.cycle_total();
        let Some(session) = self.session.as_mut() else {
            return;
        };
        session.cycle_elapsed += tick;

        if session.cycle_elapsed >= total {
            self.finish_cycling();
            return;
        }

        // purement visuel, sans effet sur le tirage
        session.displayed = session.pool.get(session.cycle_cursor).cloned();
        session.cycle_cursor = (session.cycle_cursor + 1) % session.pool.len();

        self.arm(TimerKind::CycleTick, tick);
        self.notify();
    }

    fn finish_cycling(&mut self) {
        self.timer.clear();
        let interval = self.config.reveal_interval();
        let Some(session) = self.session.as_mut() else {
            return;
        };

        debug_assert!(session.winners.is_none());
        let winners = sample(&session.pool, session.winner_count, &mut self.rng);
        let ids: Vec<&str> = winners.iter().map(|c| c.id.as_str()).collect();
        info!(session = %session.id, winners = ?ids, "gagnants tirés");
        session.winners = Some(winners.clone());

        if winners.is_empty() {
            self.enter_complete();
            return;
        }

        session.phase = Phase::Revealing;
        session.reveal = Some(RevealScheduler::new(winners, interval));
        self.reveal_next();
    }

    fn reveal_next(&mut self) {
        let (step, interval) = match self.session.as_mut().and_then(|s| s.reveal.as_mut()) {
            Some(scheduler) => (scheduler.advance(), scheduler.interval()),
            None => return,
        };

        match step {
            RevealStep::Reveal { index, winner } => {
                if let Some(session) = self.session.as_mut() {
                    session.displayed = Some(winner.clone());
                    debug!(session = %session.id, index, winner = %winner.id, "révélation");
                }
                self.arm(TimerKind::RevealTick, interval);
                self.observer.on_reveal(&winner, index);
                self.notify();
            }
            RevealStep::Done => self.enter_complete(),
        }
    }

    fn enter_complete(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        session.phase = Phase::Complete;
        debug!(session = %session.id, "tous les gagnants sont révélés");

        self.arm(TimerKind::Settle, self.config.settle());
        self.notify();
    }

    fn on_settle(&mut self) {
        let Some(session) = self.session.take() else {
            return;
        };
        self.timer.clear();
        let winners = session.winners.unwrap_or_default();
        info!(session = %session.id, winners = winners.len(), "tirage terminé");

        self.observer.on_complete(session.id, &winners);
        self.notify();
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn abc() -> Vec<Candidate> {
        vec![
            Candidate::new("a", "A", 1.0),
            Candidate::new("b", "B", 1.0),
            Candidate::new("c", "C", 1.0),
        ]
    }

    fn machine(seed: u64) -> DrawMachine<StdRng, EventLog> {
        DrawMachine::new(DrawConfig::default(), StdRng::seed_from_u64(seed), EventLog::default()).unwrap()
    }

    fn secs(s: u64) -> Duration {
        Duration::from_secs(s)
    }

    #[test]
    fn test_full_run_two_winners() {
        let mut m = machine(42);
        let id = m.start_draw(Duration::ZERO, DrawRequest::new(abc(), 2)).unwrap();
        assert_eq!(m.phase(), Phase::Countdown);

        let end = m.run_until_idle();
        assert_eq!(end, secs(16));
        assert!(m.is_idle());

        let log = m.observer();
        assert_eq!(
            log.phases(),
            vec![Phase::Countdown, Phase::Cycling, Phase::Revealing, Phase::Complete, Phase::Idle]
        );

        let countdown: Vec<(u32, Duration)> = log
            .updates()
            .filter(|s| s.phase == Phase::Countdown)
            .map(|s| (s.countdown_remaining, s.at))
            .collect();
        assert_eq!(countdown, vec![(3, secs(0)), (2, secs(1)), (1, secs(2)), (0, secs(3))]);

        let first_at = |phase: Phase| log.updates().find(|s| s.phase == phase).map(|s| s.at);
        assert_eq!(first_at(Phase::Cycling), Some(secs(3)));
        assert_eq!(first_at(Phase::Revealing), Some(secs(8)));
        assert_eq!(first_at(Phase::Complete), Some(secs(14)));

        let reveal_indices: Vec<(usize, Duration)> = log
            .updates()
            .filter_map(|s| s.reveal_index.map(|i| (i, s.at)))
            .collect();
        assert_eq!(reveal_indices, vec![(0, secs(8)), (1, secs(11))]);

        let completions = log.completions();
        assert_eq!(completions.len(), 1);
        let (session, winners) = completions[0];
        assert_eq!(session, id);
        assert_eq!(winners.len(), 2);
        assert_ne!(winners[0].id, winners[1].id);
        assert!(winners.iter().all(|w| ["a", "b", "c"].contains(&w.id.as_str())));

        let revealed: Vec<&str> = log.reveals().iter().map(|(_, w)| w.id.as_str()).collect();
        let announced: Vec<&str> = winners.iter().map(|w| w.id.as_str()).collect();
        assert_eq!(revealed, announced);
        assert_eq!(log.updates().last().map(|s| s.at), Some(secs(16)));
    }

    #[test]
    fn test_reveal_times_follow_configured_interval() {
        let config = DrawConfig { reveal_interval_ms: 1500, ..DrawConfig::default() };
        let mut m = DrawMachine::new(config.clone(), StdRng::seed_from_u64(7), EventLog::default()).unwrap();
        m.start_draw(Duration::ZERO, DrawRequest::new(abc(), 3));
        let end = m.run_until_idle();

        let log = m.observer();
        let reveal_indices: Vec<(usize, Duration)> = log
            .updates()
            .filter_map(|s| s.reveal_index.map(|i| (i, s.at)))
            .collect();
        let ms = Duration::from_millis;
        assert_eq!(reveal_indices, vec![(0, ms(8000)), (1, ms(9500)), (2, ms(11_000))]);
        assert_eq!(
            log.updates().find(|s| s.phase == Phase::Complete).map(|s| s.at),
            Some(ms(12_500))
        );
        assert_eq!(end, config.expected_duration(3));
    }

    #[test]
    fn test_expected_duration_matches_run() {
        let config = DrawConfig::default();
        for k in [0i64, 1, 3, 10] {
            let mut m = machine(1);
            m.start_draw(Duration::ZERO, DrawRequest::new(abc(), k));
            let end = m.run_until_idle();
            assert_eq!(end, config.expected_duration((k as usize).min(3)));
        }
    }

    #[test]
    fn test_zero_winners_skips_revealing() {
        let mut m = machine(3);
        m.start_draw(Duration::ZERO, DrawRequest::new(abc(), 0));
        let end = m.run_until_idle();

        let log = m.observer();
        assert_eq!(log.phases(), vec![Phase::Countdown, Phase::Cycling, Phase::Complete, Phase::Idle]);
        assert!(log.reveals().is_empty());
        let completions = log.completions();
        assert_eq!(completions.len(), 1);
        assert!(completions[0].1.is_empty());
        assert_eq!(end, secs(10));
    }

    #[test]
    fn test_negative_winner_count_is_zero() {
        let request = DrawRequest::new(abc(), -4);
        assert_eq!(request.winner_count, 0);

        let mut m = machine(3);
        m.start_draw(Duration::ZERO, request);
        m.run_until_idle();
        assert!(!m.observer().phases().contains(&Phase::Revealing));
        assert!(m.observer().completions()[0].1.is_empty());
    }

    #[test]
    fn test_empty_pool_is_noop() {
        let mut m = machine(0);
        assert_eq!(m.start_draw(Duration::ZERO, DrawRequest::new(Vec::new(), 2)), None);
        assert!(m.is_idle());
        assert!(m.next_deadline().is_none());
        assert!(m.observer().events.is_empty());
    }

    #[test]
    fn test_empty_pool_does_not_cancel_active_session() {
        let mut m = machine(0);
        let id = m.start_draw(Duration::ZERO, DrawRequest::new(abc(), 1)).unwrap();
        m.advance_to(secs(1));
        assert_eq!(m.start_draw(secs(1), DrawRequest::new(Vec::new(), 1)), None);
        assert_eq!(m.session_id(), Some(id));
        assert_eq!(m.phase(), Phase::Countdown);
    }

    #[test]
    fn test_cancel_mid_cycling_then_restart() {
        let mut m = machine(9);
        let first = m.start_draw(Duration::ZERO, DrawRequest::new(abc(), 2)).unwrap();
        m.advance_to(secs(5));
        assert_eq!(m.phase(), Phase::Cycling);
        let stale = m.pending_timer().map(|t| t.token).unwrap();

        assert!(m.cancel_draw());
        assert!(m.is_idle());
        assert!(m.next_deadline().is_none());
        assert!(!m.fire(stale));
        assert!(!m.cancel_draw());

        let pool = vec![Candidate::new("x", "X", 1.0), Candidate::new("y", "Y", 2.0)];
        let second = m.start_draw(secs(5), DrawRequest::new(pool, 2)).unwrap();
        assert_ne!(first, second);
        assert!(!m.fire(stale));

        let end = m.run_until_idle();
        assert_eq!(end, secs(5) + DrawConfig::default().expected_duration(2));

        let log = m.observer();
        assert!(log.events.contains(&DrawEvent::Cancelled(first)));
        let completions = log.completions();
        assert_eq!(completions.len(), 1);
        assert_eq!(completions[0].0, second);
        let ids: HashSet<&str> = completions[0].1.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, HashSet::from(["x", "y"]));
    }

    #[test]
    fn test_new_draw_supersedes_revealing_session() {
        let mut m = machine(5);
        let first = m.start_draw(Duration::ZERO, DrawRequest::new(abc(), 3)).unwrap();
        m.advance_to(secs(9));
        assert_eq!(m.phase(), Phase::Revealing);
        let first_winners = m.winners().map(|w| w.to_vec()).unwrap();
        assert_eq!(first_winners.len(), 3);

        let second = m.start_draw(secs(9), DrawRequest::new(abc(), 1)).unwrap();
        assert_eq!(m.phase(), Phase::Countdown);
        assert!(m.winners().is_none());
        m.run_until_idle();

        let log = m.observer();
        assert!(log.events.contains(&DrawEvent::Cancelled(first)));
        let completions = log.completions();
        assert_eq!(completions.len(), 1);
        assert_eq!(completions[0].0, second);
        assert_eq!(completions[0].1.len(), 1);
    }

    #[test]
    fn test_cycling_is_round_robin() {
        let mut m = machine(2);
        m.start_draw(Duration::ZERO, DrawRequest::new(abc(), 1));
        m.advance_to(secs(3) + Duration::from_millis(150));

        let shown: Vec<&str> = m
            .observer()
            .updates()
            .filter(|s| s.phase == Phase::Cycling)
            .filter_map(|s| s.displayed.as_ref().map(|c| c.id.as_str()))
            .collect();
        assert_eq!(shown, vec!["a", "b", "c", "a"]);
    }

    #[test]
    fn test_single_pending_timer_throughout() {
        let mut m = machine(8);
        m.start_draw(Duration::ZERO, DrawRequest::new(abc(), 3));
        let mut last_due = Duration::ZERO;
        while let Some(timer) = m.pending_timer().copied() {
            assert!(timer.due >= last_due);
            last_due = timer.due;
            assert!(m.fire(timer.token));
            if let Some(next) = m.pending_timer() {
                assert_ne!(next.token, timer.token);
            }
        }
        assert!(m.is_idle());
    }

    #[test]
    fn test_winners_fixed_once_and_reveal_index_forward() {
        let mut m = machine(4);
        m.start_draw(Duration::ZERO, DrawRequest::new(abc(), 3));
        m.advance_to(secs(8));
        let winners = m.winners().map(|w| w.to_vec()).unwrap();

        let mut indices = Vec::new();
        while !m.is_idle() {
            assert_eq!(m.winners().map(|w| w.to_vec()), Some(winners.clone()));
            if let Some(i) = m.snapshot().reveal_index {
                if indices.last() != Some(&i) {
                    indices.push(i);
                }
                assert!(i < winners.len());
            }
            let timer = m.pending_timer().copied().unwrap();
            m.fire(timer.token);
        }
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn test_more_winners_than_pool() {
        let mut m = machine(6);
        m.start_draw(Duration::ZERO, DrawRequest::new(abc(), 10));
        m.run_until_idle();
        let log = m.observer();
        assert_eq!(log.reveals().len(), 3);
        assert_eq!(log.completions()[0].1.len(), 3);
    }

    #[test]
    fn test_machine_reusable_after_completion() {
        let mut m = machine(10);
        m.start_draw(Duration::ZERO, DrawRequest::new(abc(), 1));
        let end = m.run_until_idle();
        let stale = TimerToken { generation: 1, seq: 1 };
        assert!(!m.fire(stale));

        m.start_draw(end, DrawRequest::new(abc(), 1));
        m.run_until_idle();
        assert_eq!(m.observer().completions().len(), 2);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = DrawConfig { cycle_tick_ms: 0, ..DrawConfig::default() };
        assert!(DrawMachine::new(config, StdRng::seed_from_u64(0), EventLog::default()).is_err());
    }
}
