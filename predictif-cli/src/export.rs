use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use predictif_core::models::ScoreEntry;

pub const MAIN_FILE: &str = "scores_numeros.csv";
pub const SPECIAL_FILE: &str = "scores_special.csv";

/// Shortest decimal form, keeping a trailing `.0` on whole values.
pub fn format_score(score: f64) -> String {
    if score.is_finite() && score.fract() == 0.0 {
        format!("{:.1}", score)
    } else {
        format!("{}", score)
    }
}

pub fn write_scores<W: Write>(writer: W, entries: &[ScoreEntry]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["Numéro", "Score"])?;
    for entry in entries {
        wtr.write_record([entry.number.to_string(), format_score(entry.score)])?;
    }
    wtr.flush().context("Échec de l'écriture CSV")?;
    Ok(())
}

pub fn export_scores(dir: &Path, main: &[ScoreEntry], special: &[ScoreEntry]) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Impossible de créer le répertoire {:?}", dir))?;

    let mut written = Vec::with_capacity(2);
    for (name, entries) in [(MAIN_FILE, main), (SPECIAL_FILE, special)] {
        let path = dir.join(name);
        let file = std::fs::File::create(&path)
            .with_context(|| format!("Impossible de créer {:?}", path))?;
        write_scores(file, entries)?;
        log::info!("{} scores exportés vers {:?}", entries.len(), path);
        written.push(path);
    }
    Ok(written)
}
