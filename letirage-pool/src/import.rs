use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, bail};
use tracing::warn;

use crate::models::Candidate;

/// Colonnes fixes en tête de fichier : id;nom;groupe;responsable;poids
const FIXED_COLUMNS: usize = 5;

/// Nombre au format français : virgule décimale, espaces de milliers
/// (insécables comprises) tolérées (`1 250,5`). Une cellule vide vaut zéro.
pub fn parse_french_decimal(raw: &str) -> Result<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    if cleaned.is_empty() {
        return Ok(0.0);
    }
    cleaned
        .parse::<f64>()
        .with_context(|| format!("Valeur numérique illisible : '{}'", raw.trim()))
}

fn parse_record(record: &csv::StringRecord, headers: &csv::StringRecord) -> Result<Candidate> {
    let column = |idx: usize| headers.get(idx).map(str::trim).unwrap_or("?");
    let cell = |idx: usize| record.get(idx).map(str::trim).unwrap_or("");
    let required = |idx: usize| -> Result<String> {
        match record.get(idx).map(str::trim) {
            Some(value) if !value.is_empty() => Ok(value.to_string()),
            _ => bail!("Colonne '{}' vide ou absente", column(idx)),
        }
    };

    let id = required(0)?;
    let name = required(1)?;

    let raw_weight = required(4)?;
    let weight = parse_french_decimal(&raw_weight)
        .with_context(|| format!("Poids de {} illisible", id))?;
    if weight < 0.0 || !weight.is_finite() {
        bail!("Poids de {} invalide : '{}'", id, raw_weight);
    }

    let mut metrics = BTreeMap::new();
    for idx in FIXED_COLUMNS..headers.len() {
        let raw = cell(idx);
        if raw.is_empty() {
            continue;
        }
        let value = parse_french_decimal(raw)
            .with_context(|| format!("Métrique '{}' de {} illisible", column(idx), id))?;
        metrics.insert(column(idx).to_string(), value);
    }

    Ok(Candidate {
        id,
        name,
        group: cell(2).to_string(),
        owner: cell(3).to_string(),
        weight,
        metrics,
    })
}

#[derive(Debug)]
pub struct PoolImport {
    pub candidates: Vec<Candidate>,
    pub total_records: u32,
    pub errors: u32,
}

pub fn parse_pool_csv<R: Read>(input: R) -> Result<PoolImport> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .flexible(true)
        .from_reader(input);

    let headers = reader.headers().context("En-tête CSV illisible")?.clone();
    if headers.len() < FIXED_COLUMNS {
        bail!(
            "En-tête incomplet : {} colonnes, attendu au moins id;nom;groupe;responsable;poids",
            headers.len()
        );
    }
    let mut result = PoolImport {
        candidates: Vec::new(),
        total_records: 0,
        errors: 0,
    };

    for record_result in reader.records() {
        result.total_records += 1;
        match record_result {
            Ok(record) => match parse_record(&record, &headers) {
                Ok(candidate) => result.candidates.push(candidate),
                Err(e) => {
                    warn!(line = result.total_records, "Ligne ignorée: {e:#}");
                    result.errors += 1;
                }
            },
            Err(e) => {
                warn!(line = result.total_records, "Erreur lecture ligne: {e}");
                result.errors += 1;
            }
        }
    }

    Ok(result)
}

pub fn load_pool(path: &Path) -> Result<PoolImport> {
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));

    if is_json {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Impossible d'ouvrir {:?}", path))?;
        let candidates: Vec<Candidate> = serde_json::from_str(&json)
            .with_context(|| format!("JSON invalide dans {:?}", path))?;
        let total_records = candidates.len() as u32;
        return Ok(PoolImport { candidates, total_records, errors: 0 });
    }

    let file = std::fs::File::open(path)
        .with_context(|| format!("Impossible d'ouvrir {:?}", path))?;
    parse_pool_csv(file)
}
