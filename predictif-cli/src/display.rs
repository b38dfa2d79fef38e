use std::path::PathBuf;

use comfy_table::{Table, ContentArrangement, presets::UTF8_FULL, Cell, Color};

use predictif_core::models::{Game, Group, ScoreEntry, ScoreParams};

pub fn top_numbers(entries: &[ScoreEntry], count: usize) -> Vec<i64> {
    entries.iter().take(count).map(|e| e.number).collect()
}

pub fn display_header(game: Game, draws: usize, params: &ScoreParams) {
    println!("\n🎯 Analyse {} ({} tirages)\n", game, draws);
    println!(
        "Pondérations : fréquence globale α={:.2}, fréquence récente β={:.2}, corrélations γ={:.2}",
        params.alpha, params.beta, params.gamma
    );
    println!("Tirages récents analysés : {}", params.recent_n.min(draws));
}

pub fn display_prediction(game: Game, group: Group, entries: &[ScoreEntry]) {
    let picks = top_numbers(entries, game.pick_count(group));
    let title = match group {
        Group::Main => "🔢 Prédiction des numéros",
        Group::Special => match game {
            Game::Euro => "⭐ Prédiction des étoiles",
            Game::Loto => "⭐ Prédiction du numéro Chance",
        },
    };

    println!("\n{title}\n");
    println!("{} à jouer : {:?}", game.group_label(group), picks);
    display_score_table(entries, game.pick_count(group));
}

fn display_score_table(entries: &[ScoreEntry], highlighted: usize) {
    if entries.is_empty() {
        println!("Aucun score à afficher.");
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Numéro", "Score", ""]);

    for (rank, entry) in entries.iter().enumerate() {
        let color = if rank < highlighted { Color::Green } else { Color::White };
        let bar = "█".repeat((entry.score.max(0.0) * 30.0).round() as usize);
        table.add_row(vec![
            Cell::new(format!("{:2}", entry.number)).fg(color),
            Cell::new(format!("{:.4}", entry.score)),
            Cell::new(bar).fg(color),
        ]);
    }
    println!("{table}");
}

pub fn display_export_summary(paths: &[PathBuf]) {
    println!("\n📤 Scores exportés :");
    for path in paths {
        println!("  {}", path.display());
    }
}
