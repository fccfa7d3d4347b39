//! Pilote en temps réel : un seul fil attend la prochaine échéance ou une
//! commande, puis fait avancer la machine. Les autres fils ne font
//! qu'envoyer des `DriverCommand`.

use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError};
use rand::Rng;
use tracing::debug;

use crate::machine::{DrawMachine, DrawObserver, DrawRequest};

#[derive(Debug)]
pub enum DriverCommand {
    Start(DrawRequest),
    Cancel,
    Shutdown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverExit {
    /// Le prédicat fourni par l'appelant est satisfait.
    Finished,
    Shutdown,
    /// Plus aucun émetteur de commandes et aucune session en cours.
    Disconnected,
}

pub struct RealTimeDriver {
    commands: Receiver<DriverCommand>,
    origin: Instant,
}

impl RealTimeDriver {
    pub fn new(commands: Receiver<DriverCommand>) -> Self {
        Self { commands, origin: Instant::now() }
    }

    pub fn elapsed(&self) -> Duration {
        self.origin.elapsed()
    }

    pub fn run<R, O, F>(&self, machine: &mut DrawMachine<R, O>, mut until: F) -> DriverExit
    where
        R: Rng,
        O: DrawObserver,
        F: FnMut(&DrawMachine<R, O>) -> bool,
    {
        let mut disconnected = false;
        loop {
            machine.advance_to(self.elapsed());
            if until(&*machine) {
                return DriverExit::Finished;
            }

            let deadline = machine.next_deadline();
            if disconnected {
                if machine.is_idle() {
                    return DriverExit::Disconnected;
                }
                if let Some(due) = deadline {
                    std::thread::sleep(due.saturating_sub(self.elapsed()));
                }
                continue;
            }

            let received = match deadline {
                Some(due) => self.commands.recv_timeout(due.saturating_sub(self.elapsed())),
                None => self.commands.recv().map_err(|_| RecvTimeoutError::Disconnected),
            };

            match received {
                Ok(DriverCommand::Start(request)) => {
                    if let Some(previous) = machine.session_id().filter(|_| !request.pool.is_empty()) {
                        debug!(session = %previous, phase = %machine.phase(), "session remplacée");
                    }
                    machine.start_draw(self.elapsed(), request);
                }
                Ok(DriverCommand::Cancel) => {
                    debug!(
                        phase = %machine.phase(),
                        drawn = machine.winners().is_some(),
                        "annulation demandée"
                    );
                    machine.cancel_draw();
                }
                Ok(DriverCommand::Shutdown) => {
                    machine.cancel_draw();
                    debug!(at = ?machine.now(), "arrêt du pilote");
                    return DriverExit::Shutdown;
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => {
                    debug!("canal de commandes fermé");
                    disconnected = true;
                }
            }
        }
    }
}
