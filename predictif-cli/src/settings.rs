use std::path::Path;

use anyhow::{Context, Result, bail};

use predictif_core::models::ScoreParams;

const ACCESS_CODE: &str = "fdj2025";

pub const RECENT_RANGE: (usize, usize) = (20, 500);

pub fn check_access(password: Option<&str>) -> Result<()> {
    if password != Some(ACCESS_CODE) {
        bail!("Veuillez entrer le mot de passe pour accéder.");
    }
    Ok(())
}

/// Values given on the command line; each one overrides the config file.
#[derive(Debug, Clone, Copy, Default)]
pub struct Overrides {
    pub alpha: Option<f64>,
    pub beta: Option<f64>,
    pub gamma: Option<f64>,
    pub recent: Option<usize>,
}

pub fn load_params(path: Option<&Path>) -> Result<ScoreParams> {
    let Some(path) = path else {
        return Ok(ScoreParams::default());
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire {:?}", path))?;
    let params: ScoreParams = serde_json::from_str(&json)
        .with_context(|| format!("Configuration invalide dans {:?}", path))?;
    log::info!("Paramètres chargés depuis {:?}", path);
    Ok(params)
}

pub fn apply_overrides(mut params: ScoreParams, overrides: Overrides) -> ScoreParams {
    if let Some(alpha) = overrides.alpha {
        params.alpha = alpha;
    }
    if let Some(beta) = overrides.beta {
        params.beta = beta;
    }
    if let Some(gamma) = overrides.gamma {
        params.gamma = gamma;
    }
    if let Some(recent) = overrides.recent {
        params.recent_n = recent;
    }
    params
}

pub fn validate(params: &ScoreParams) -> Result<()> {
    for (name, weight) in [("alpha", params.alpha), ("beta", params.beta), ("gamma", params.gamma)] {
        if !(0.0..=1.0).contains(&weight) {
            bail!("Pondération {} = {} hors limites (0-1)", name, weight);
        }
    }
    let (min, max) = RECENT_RANGE;
    if params.recent_n < min || params.recent_n > max {
        bail!("Nombre de tirages récents {} hors limites ({}-{})", params.recent_n, min, max);
    }
    Ok(())
}

/// Rescales the three weights so they sum to 1. The scorer applies weights
/// as given, so this has to happen before scoring. All-zero weights stay zero.
pub fn normalize_weights(mut params: ScoreParams) -> ScoreParams {
    let total = params.alpha + params.beta + params.gamma;
    if total != 1.0 && total > 0.0 {
        log::info!("Pondérations renormalisées (somme = {:.2})", total);
        params.alpha /= total;
        params.beta /= total;
        params.gamma /= total;
    }
    params
}

pub fn resolve(config: Option<&Path>, overrides: Overrides) -> Result<ScoreParams> {
    let params = apply_overrides(load_params(config)?, overrides);
    validate(&params)?;
    Ok(normalize_weights(params))
}
