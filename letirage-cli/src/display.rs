use comfy_table::{Table, ContentArrangement, presets::UTF8_FULL, Cell, Color};

use letirage_core::stats::SimulationReport;
use letirage_pool::import::PoolImport;
use letirage_pool::models::{first_rank_shares, total_weight, Candidate};

pub fn format_metrics(candidate: &Candidate) -> String {
    candidate
        .metrics
        .iter()
        .map(|(k, v)| format!("{}: {}", k.to_uppercase(), v))
        .collect::<Vec<_>>()
        .join(" · ")
}

pub fn display_import_summary(result: &PoolImport) {
    println!("Import du pool :");
    println!("  Total lignes lues : {}", result.total_records);
    println!("  Candidats         : {}", result.candidates.len());
    if result.errors > 0 {
        println!("  Lignes ignorées   : {}", result.errors);
    }
}

pub fn display_pool(pool: &[Candidate]) {
    let shares = first_rank_shares(pool);

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Id", "Nom", "Groupe", "Responsable", "Poids", "Chance (rang 1)", "Métriques"]);

    for (candidate, share) in pool.iter().zip(&shares) {
        let color = if candidate.effective_weight() > 0.0 { Color::White } else { Color::DarkGrey };
        table.add_row(vec![
            Cell::new(&candidate.id),
            Cell::new(&candidate.name).fg(color),
            Cell::new(&candidate.group),
            Cell::new(&candidate.owner),
            Cell::new(format!("{}", candidate.weight)),
            Cell::new(format!("{:.2} %", share * 100.0)),
            Cell::new(format_metrics(candidate)),
        ]);
    }
    println!("{table}");
    println!("Total des tickets : {}", total_weight(pool));
}

pub fn display_winners(winners: &[Candidate]) {
    if winners.is_empty() {
        println!("Aucun gagnant (nombre de gagnants nul).");
        return;
    }

    println!("\n🏆 Gagnants\n");

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Rang", "Nom", "Groupe", "Responsable", "Tickets", "Métriques"]);

    for (i, winner) in winners.iter().enumerate() {
        let color = if i == 0 { Color::Yellow } else { Color::White };
        table.add_row(vec![
            Cell::new(format!("#{}", i + 1)).fg(color),
            Cell::new(&winner.name).fg(color),
            Cell::new(&winner.group),
            Cell::new(&winner.owner),
            Cell::new(format!("{}", winner.weight)),
            Cell::new(format_metrics(winner)),
        ]);
    }
    println!("{table}");
}

pub fn display_simulation(report: &SimulationReport) {
    println!(
        "\n🎲 {} tirages simulés, {} gagnant(s) par tirage\n",
        report.trials, report.winner_count
    );

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Id", "Nom", "Poids", "Attendu (rang 1)", "Observé (rang 1)", "Observé (gagnant)"]);

    for tally in &report.tallies {
        let observed = report.observed_first(tally);
        let deviation = (observed - tally.expected_first).abs();
        let color = if deviation > 0.02 { Color::Red } else { Color::Green };
        table.add_row(vec![
            Cell::new(&tally.id),
            Cell::new(&tally.name),
            Cell::new(format!("{}", tally.weight)),
            Cell::new(format!("{:.2} %", tally.expected_first * 100.0)),
            Cell::new(format!("{:.2} %", observed * 100.0)).fg(color),
            Cell::new(format!("{:.2} %", report.observed_any(tally) * 100.0)),
        ]);
    }
    println!("{table}");
    println!("Écart maximal au rang 1 : {:.2} points", report.max_first_rank_deviation() * 100.0);
}
