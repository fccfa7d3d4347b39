mod display;
mod live;
mod telemetry;

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use letirage_core::config::{load_config, save_config, DrawConfig};
use letirage_core::driver::{DriverCommand, DriverExit, RealTimeDriver};
use letirage_core::machine::{DrawMachine, DrawRequest};
use letirage_core::sampler::seeded_rng;
use letirage_core::stats::simulate;
use letirage_pool::import::load_pool;
use letirage_pool::models::{validate_pool, Candidate};

use crate::display::{display_import_summary, display_pool, display_simulation, display_winners};
use crate::live::TerminalObserver;

#[derive(Parser)]
#[command(name = "letirage", about = "Tirage au sort pondéré, révélé en direct")]
struct Cli {
    /// Verbosité des journaux (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Lancer un tirage (a = annuler, r = relancer, q = quitter)
    Draw {
        /// Fichier des candidats (CSV `;` ou JSON)
        #[arg(short, long)]
        pool: PathBuf,

        /// Nombre de gagnants
        #[arg(short, long, default_value = "1", allow_negative_numbers = true)]
        winners: i64,

        /// Seed pour la reproductibilité
        #[arg(long)]
        seed: Option<u64>,

        /// Fichier de cadences (défaut : 3 s, 5 s de défilement, 3 s par gagnant)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Dérouler le tirage sans attendre les délais
        #[arg(long)]
        instant: bool,
    },

    /// Simuler de nombreux tirages et comparer aux probabilités attendues
    Simulate {
        #[arg(short, long)]
        pool: PathBuf,

        #[arg(short, long, default_value = "1", allow_negative_numbers = true)]
        winners: i64,

        /// Nombre de tirages simulés
        #[arg(short, long, default_value = "10000")]
        trials: usize,

        #[arg(long)]
        seed: Option<u64>,
    },

    /// Afficher les candidats et leur chance d'être tiré en premier
    Pool {
        #[arg(short, long)]
        pool: PathBuf,
    },

    /// Écrire le fichier de cadences par défaut
    Config {
        #[arg(short, long, default_value = "letirage.json")]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    telemetry::init(cli.verbose);

    match cli.command {
        Command::Draw { pool, winners, seed, config, instant } => {
            cmd_draw(&pool, winners, seed, config.as_deref(), instant)
        }
        Command::Simulate { pool, winners, trials, seed } => cmd_simulate(&pool, winners, trials, seed),
        Command::Pool { pool } => cmd_pool(&pool),
        Command::Config { output } => cmd_config(&output),
    }
}

fn load_candidates(path: &Path) -> Result<Vec<Candidate>> {
    let import = load_pool(path)?;
    info!(
        path = %path.display(),
        candidates = import.candidates.len(),
        errors = import.errors,
        "pool chargé"
    );
    if import.errors > 0 {
        display_import_summary(&import);
    }
    validate_pool(&import.candidates)
        .with_context(|| format!("Pool invalide dans {:?}", path))?;
    Ok(import.candidates)
}

fn cmd_draw(
    pool_path: &Path,
    winners: i64,
    seed: Option<u64>,
    config_path: Option<&Path>,
    instant: bool,
) -> Result<()> {
    let pool = load_candidates(pool_path)?;
    if pool.is_empty() {
        println!("Pool vide : aucun tirage lancé.");
        return Ok(());
    }

    let config = match config_path {
        Some(path) => load_config(path)?,
        None => DrawConfig::default(),
    };
    debug!(?config, "cadences du tirage");
    let request = DrawRequest::new(pool, winners);
    let expected = request.winner_count.min(request.pool.len());

    let observer = TerminalObserver::new(!instant, expected);
    let mut machine = DrawMachine::new(config, seeded_rng(seed), observer)?;

    println!(
        "Tirage de {} gagnant(s) parmi {} candidats (durée prévue : {} s)",
        expected,
        request.pool.len(),
        machine.config().expected_duration(expected).as_secs()
    );

    if instant {
        machine.start_draw(Duration::ZERO, request);
        machine.run_until_idle();
    } else {
        println!("(a + Entrée : annuler · r : relancer · q : quitter)");
        let (tx, rx) = crossbeam_channel::unbounded();
        tx.send(DriverCommand::Start(request.clone()))
            .context("Impossible de lancer le tirage")?;
        live::spawn_input(tx, request);

        let driver = RealTimeDriver::new(rx);
        let exit = driver.run(&mut machine, |m| m.observer().winners().is_some());
        if exit == DriverExit::Shutdown {
            println!("Tirage interrompu.");
        }
    }

    let observer = machine.into_observer();
    match observer.winners() {
        Some(winners) => display_winners(winners),
        None => println!("Aucun gagnant annoncé."),
    }
    Ok(())
}

fn cmd_simulate(pool_path: &Path, winners: i64, trials: usize, seed: Option<u64>) -> Result<()> {
    let pool = load_candidates(pool_path)?;
    if pool.is_empty() {
        println!("Pool vide : rien à simuler.");
        return Ok(());
    }
    let winner_count = usize::try_from(winners).unwrap_or(0);

    let pb = ProgressBar::new(trials as u64);
    pb.set_style(ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .context("Modèle de barre de progression invalide")?
        .progress_chars("=> "));
    pb.set_message("tirages simulés");

    let report = simulate(&pool, winner_count, trials, seed, |done| pb.set_position(done as u64));
    pb.finish_with_message("Simulation terminée");

    display_simulation(&report);
    Ok(())
}

fn cmd_pool(pool_path: &Path) -> Result<()> {
    let pool = load_candidates(pool_path)?;
    if pool.is_empty() {
        println!("Aucun candidat.");
        return Ok(());
    }
    display_pool(&pool);
    Ok(())
}

fn cmd_config(output: &Path) -> Result<()> {
    save_config(&DrawConfig::default(), output)?;
    println!("Cadences par défaut écrites dans : {}", output.display());
    Ok(())
}
