mod display;
mod export;
mod settings;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};

use predictif_core::models::{Game, Group, ScoreParams};
use predictif_core::scoring::score;
use predictif_core::table::load_table;
use crate::display::{display_export_summary, display_header, display_prediction};
use crate::settings::{Overrides, check_access};

#[derive(Parser)]
#[command(name = "predictif", about = "Tableau de bord prédictif EuroMillions & Loto FDJ")]
struct Cli {
    /// Mot de passe d'accès
    #[arg(long, global = true, env = "PREDICTIF_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Calculer les scores prédictifs à partir d'un historique CSV
    Predict {
        /// Jeu analysé
        #[arg(short, long, default_value = "euro")]
        game: Game,

        /// Chemin vers le fichier CSV des tirages (du plus ancien au plus récent)
        #[arg(short, long)]
        file: PathBuf,

        /// Séparateur de champs du CSV
        #[arg(short, long, default_value = ",")]
        delimiter: char,

        /// Fréquence globale (α)
        #[arg(short, long)]
        alpha: Option<f64>,

        /// Fréquence récente (β)
        #[arg(short, long)]
        beta: Option<f64>,

        /// Corrélations (γ)
        #[arg(long)]
        gamma: Option<f64>,

        /// Nombre de tirages récents à analyser
        #[arg(short, long)]
        recent: Option<usize>,

        /// Fichier JSON de paramètres
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Répertoire d'export des scores en CSV
        #[arg(short, long)]
        export: Option<PathBuf>,
    },

    /// Afficher les paramètres par défaut au format JSON
    Config,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    check_access(cli.password.as_deref())?;

    match cli.command {
        Command::Predict {
            game,
            file,
            delimiter,
            alpha,
            beta,
            gamma,
            recent,
            config,
            export,
        } => {
            let overrides = Overrides { alpha, beta, gamma, recent };
            cmd_predict(game, &file, delimiter, overrides, config, export)
        }
        Command::Config => {
            let json = serde_json::to_string_pretty(&ScoreParams::default())?;
            println!("{json}");
            Ok(())
        }
    }
}

fn cmd_predict(
    game: Game,
    file: &Path,
    delimiter: char,
    overrides: Overrides,
    config: Option<PathBuf>,
    export_dir: Option<PathBuf>,
) -> Result<()> {
    if !delimiter.is_ascii() {
        bail!("Séparateur invalide : '{}'", delimiter);
    }
    let params = settings::resolve(config.as_deref(), overrides)?;

    let table = load_table(file, game, delimiter as u8)
        .with_context(|| format!("Chargement du fichier {} {:?}", game, file))?;
    if table.is_empty() {
        log::warn!("Aucun tirage dans {:?}", file);
    }

    display_header(game, table.len(), &params);

    let mut scored = Vec::with_capacity(2);
    for group in [Group::Main, Group::Special] {
        let entries = score(&table, game.columns(group), game.max_number(group), &params)?;
        display_prediction(game, group, &entries);
        scored.push(entries);
    }

    if let Some(dir) = export_dir {
        let written = export::export_scores(&dir, &scored[0], &scored[1])?;
        display_export_summary(&written);
    }

    Ok(())
}
