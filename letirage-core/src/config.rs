use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

/// Cadences du tirage. Toutes les durées sont en millisecondes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawConfig {
    pub countdown_secs: u32,
    pub countdown_tick_ms: u64,
    pub cycle_tick_ms: u64,
    pub cycle_total_ms: u64,
    pub reveal_interval_ms: u64,
    pub settle_ms: u64,
}

impl Default for DrawConfig {
    fn default() -> Self {
        Self {
            countdown_secs: 3,
            countdown_tick_ms: 1000,
            cycle_tick_ms: 50,
            cycle_total_ms: 5000,
            reveal_interval_ms: 3000,
            settle_ms: 2000,
        }
    }
}

impl DrawConfig {
    pub fn validate(&self) -> Result<()> {
        if self.countdown_secs == 0 {
            bail!("Le compte à rebours doit durer au moins 1 seconde");
        }
        if self.countdown_tick_ms == 0 {
            bail!("countdown_tick_ms doit être > 0");
        }
        if self.cycle_tick_ms == 0 {
            bail!("cycle_tick_ms doit être > 0");
        }
        if self.reveal_interval_ms == 0 {
            bail!("reveal_interval_ms doit être > 0");
        }
        Ok(())
    }

    pub fn countdown_tick(&self) -> Duration {
        Duration::from_millis(self.countdown_tick_ms)
    }

    pub fn cycle_tick(&self) -> Duration {
        Duration::from_millis(self.cycle_tick_ms)
    }

    pub fn cycle_total(&self) -> Duration {
        Duration::from_millis(self.cycle_total_ms)
    }

    pub fn reveal_interval(&self) -> Duration {
        Duration::from_millis(self.reveal_interval_ms)
    }

    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }

    /// Durée totale d'un tirage de `winners` gagnants, du lancement à la notification finale.
    pub fn expected_duration(&self, winners: usize) -> Duration {
        let countdown = self.countdown_tick() * self.countdown_secs;
        let ticks = self.cycle_total_ms.div_ceil(self.cycle_tick_ms).max(1);
        let cycling = Duration::from_millis(ticks * self.cycle_tick_ms);
        let reveal = self.reveal_interval() * winners as u32;
        countdown + cycling + reveal + self.settle()
    }
}

pub fn save_config(config: &DrawConfig, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(config)?;
    std::fs::write(path, json).with_context(|| format!("Impossible d'écrire {:?}", path))?;
    Ok(())
}

pub fn load_config(path: &Path) -> Result<DrawConfig> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire {:?}", path))?;
    let config: DrawConfig = serde_json::from_str(&json)
        .with_context(|| format!("Configuration invalide dans {:?}", path))?;
    config.validate()?;
    Ok(config)
}
