use std::io;
use std::thread;
use std::time::Duration;

use crossbeam_channel::Sender;
use indicatif::{ProgressBar, ProgressStyle};

use letirage_core::driver::DriverCommand;
use letirage_core::machine::{DrawObserver, DrawRequest, Phase, SessionId, Snapshot};
use letirage_pool::models::Candidate;

use crate::display::format_metrics;

#[derive(Debug, PartialEq)]
pub enum LiveCommand {
    Cancel,
    Restart,
    Quit,
}

pub fn parse_command(input: &str) -> Option<LiveCommand> {
    match input.trim().to_lowercase().as_str() {
        "a" | "annuler" | "cancel" => Some(LiveCommand::Cancel),
        "r" | "relancer" | "restart" => Some(LiveCommand::Restart),
        "q" | "quitter" | "quit" | "exit" => Some(LiveCommand::Quit),
        _ => None,
    }
}

/// Lit l'entrée standard sur un fil dédié et transmet les commandes au pilote.
pub fn spawn_input(tx: Sender<DriverCommand>, request: DrawRequest) {
    thread::spawn(move || {
        let stdin = io::stdin();
        let mut line = String::new();
        loop {
            line.clear();
            match stdin.read_line(&mut line) {
                Ok(0) | Err(_) => break, // EOF
                Ok(_) => {}
            }
            if line.trim().is_empty() {
                continue;
            }
            let command = match parse_command(&line) {
                Some(LiveCommand::Cancel) => DriverCommand::Cancel,
                Some(LiveCommand::Restart) => DriverCommand::Start(request.clone()),
                Some(LiveCommand::Quit) => DriverCommand::Shutdown,
                None => {
                    println!("Commande inconnue : '{}'. (a = annuler, r = relancer, q = quitter)", line.trim());
                    continue;
                }
            };
            let quit = matches!(command, DriverCommand::Shutdown);
            if tx.send(command).is_err() || quit {
                break;
            }
        }
    });
}

/// Affichage terminal d'un tirage. En mode instantané, le défilement se
/// résume à une ligne.
pub struct TerminalObserver {
    live: bool,
    expected_winners: usize,
    phase: Phase,
    last_countdown: Option<u32>,
    spinner: Option<ProgressBar>,
    winners: Option<Vec<Candidate>>,
}

impl TerminalObserver {
    pub fn new(live: bool, expected_winners: usize) -> Self {
        Self {
            live,
            expected_winners,
            phase: Phase::Idle,
            last_countdown: None,
            spinner: None,
            winners: None,
        }
    }

    pub fn winners(&self) -> Option<&[Candidate]> {
        self.winners.as_deref()
    }

    fn clear_spinner(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }

    fn show_cycling(&mut self, displayed: Option<&Candidate>) {
        if !self.live {
            if self.phase != Phase::Cycling {
                println!("✨ Défilement des noms...");
            }
            return;
        }

        let spinner = self.spinner.get_or_insert_with(|| {
            let pb = ProgressBar::new_spinner();
            if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.magenta} {msg}") {
                pb.set_style(style);
            }
            pb.enable_steady_tick(Duration::from_millis(80));
            pb
        });
        if let Some(candidate) = displayed {
            if candidate.group.is_empty() {
                spinner.set_message(candidate.name.clone());
            } else {
                spinner.set_message(format!("{} · {}", candidate.name, candidate.group));
            }
        }
    }
}

fn progress_dots(revealed: usize, total: usize) -> String {
    (0..total)
        .map(|i| if i < revealed { '●' } else { '○' })
        .collect()
}

impl DrawObserver for TerminalObserver {
    fn on_update(&mut self, snapshot: &Snapshot) {
        match snapshot.phase {
            Phase::Countdown => {
                if self.phase != Phase::Countdown {
                    self.last_countdown = None;
                    println!("\n🎰 Préparez-vous !");
                }
                if self.last_countdown != Some(snapshot.countdown_remaining) {
                    self.last_countdown = Some(snapshot.countdown_remaining);
                    match snapshot.countdown_remaining {
                        0 => println!("  C'est parti !"),
                        n => println!("  {n}..."),
                    }
                }
            }
            Phase::Cycling => self.show_cycling(snapshot.displayed.as_ref()),
            Phase::Revealing => self.clear_spinner(),
            Phase::Complete => {
                self.clear_spinner();
                if self.phase != Phase::Complete {
                    println!("\n🎉 Tous les gagnants sont tirés !");
                }
            }
            Phase::Idle => self.clear_spinner(),
        }
        self.phase = snapshot.phase;
    }

    fn on_reveal(&mut self, winner: &Candidate, index: usize) {
        self.clear_spinner();
        println!();
        println!("🏆 GAGNANT #{} 🏆  {}", index + 1, winner.name);
        if !winner.group.is_empty() {
            println!("   {}", winner.group);
        }
        if !winner.owner.is_empty() {
            println!("   Responsable : {}", winner.owner);
        }
        let metrics = format_metrics(winner);
        if metrics.is_empty() {
            println!("   {} tickets", winner.weight);
        } else {
            println!("   {} tickets · {}", winner.weight, metrics);
        }
        println!(
            "   {}  gagnant {} sur {}",
            progress_dots(index + 1, self.expected_winners),
            index + 1,
            self.expected_winners
        );
    }

    fn on_complete(&mut self, _session: SessionId, winners: &[Candidate]) {
        self.clear_spinner();
        self.winners = Some(winners.to_vec());
    }

    fn on_cancel(&mut self, session: SessionId) {
        self.clear_spinner();
        println!("\nTirage {session} annulé.");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_command() {
        assert_eq!(parse_command("a"), Some(LiveCommand::Cancel));
        assert_eq!(parse_command("annuler"), Some(LiveCommand::Cancel));
        assert_eq!(parse_command("r"), Some(LiveCommand::Restart));
        assert_eq!(parse_command("relancer"), Some(LiveCommand::Restart));
        assert_eq!(parse_command("q"), Some(LiveCommand::Quit));
        assert_eq!(parse_command("exit"), Some(LiveCommand::Quit));
    }

    #[test]
    fn test_parse_command_case_and_spaces() {
        assert_eq!(parse_command("  ANNULER \n"), Some(LiveCommand::Cancel));
        assert_eq!(parse_command("Quitter"), Some(LiveCommand::Quit));
    }

    #[test]
    fn test_parse_command_unknown() {
        assert_eq!(parse_command("foo"), None);
        assert_eq!(parse_command(""), None);
    }

    #[test]
    fn test_progress_dots() {
        assert_eq!(progress_dots(1, 3), "●○○");
        assert_eq!(progress_dots(3, 3), "●●●");
        assert_eq!(progress_dots(0, 0), "");
    }

    #[test]
    fn test_observer_keeps_winners_on_complete() {
        let mut observer = TerminalObserver::new(false, 1);
        assert!(observer.winners().is_none());
        observer.on_complete(SessionId(1), &[Candidate::new("a", "A", 1.0)]);
        assert_eq!(observer.winners().map(|w| w.len()), Some(1));
    }
}
