use serde::{Deserialize, Serialize};

use crate::error::TableError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Game {
    Euro,
    Loto,
}

/// Main numbers and special numbers (stars or Chance) are scored separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Group {
    Main,
    Special,
}

impl Game {
    pub fn columns(&self, group: Group) -> &'static [&'static str] {
        match (self, group) {
            (_, Group::Main) => &["N1", "N2", "N3", "N4", "N5"],
            (Game::Euro, Group::Special) => &["E1", "E2"],
            (Game::Loto, Group::Special) => &["Chance"],
        }
    }

    pub fn max_number(&self, group: Group) -> i64 {
        match (self, group) {
            (Game::Euro, Group::Main) => 50,
            (Game::Euro, Group::Special) => 12,
            (Game::Loto, Group::Main) => 49,
            (Game::Loto, Group::Special) => 10,
        }
    }

    pub fn pick_count(&self, group: Group) -> usize {
        match (self, group) {
            (_, Group::Main) => 5,
            (Game::Euro, Group::Special) => 2,
            (Game::Loto, Group::Special) => 1,
        }
    }

    pub fn group_label(&self, group: Group) -> &'static str {
        match (self, group) {
            (_, Group::Main) => "Numéros",
            (Game::Euro, Group::Special) => "Étoiles",
            (Game::Loto, Group::Special) => "Numéro Chance",
        }
    }

    pub fn required_columns(&self) -> impl Iterator<Item = &'static str> {
        self.columns(Group::Main)
            .iter()
            .chain(self.columns(Group::Special))
            .copied()
    }
}

impl std::fmt::Display for Game {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Game::Euro => write!(f, "EuroMillions"),
            Game::Loto => write!(f, "Loto FDJ"),
        }
    }
}

/// Historical draws, oldest first. Values are kept as read: nothing checks
/// that they fall inside the game's number range.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawTable {
    columns: Vec<String>,
    rows: Vec<Vec<i64>>,
}

impl DrawTable {
    pub fn new<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> Self {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    #[cfg(test)]
    pub fn from_rows<S: Into<String>>(
        columns: impl IntoIterator<Item = S>,
        rows: Vec<Vec<i64>>,
    ) -> Result<Self, TableError> {
        let mut table = Self::new(columns);
        for row in rows {
            table.push_row(row)?;
        }
        Ok(table)
    }

    pub fn push_row(&mut self, row: Vec<i64>) -> Result<(), TableError> {
        if row.len() != self.columns.len() {
            return Err(TableError::RowWidth {
                expected: self.columns.len(),
                found: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    #[cfg(test)]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Result<usize, TableError> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| TableError::MissingColumn(name.to_string()))
    }

    /// Projects every row onto `columns`, in the order given.
    pub fn select(&self, columns: &[&str]) -> Result<Vec<Vec<i64>>, TableError> {
        let indices = columns
            .iter()
            .map(|name| self.column_index(name))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(self
            .rows
            .iter()
            .map(|row| indices.iter().map(|&i| row[i]).collect())
            .collect())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreEntry {
    pub number: i64,
    pub score: f64,
}

/// Blend parameters of the scorer. The weights are applied as given: making
/// them sum to 1 is the caller's job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreParams {
    pub recent_n: usize,
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
}

impl Default for ScoreParams {
    fn default() -> Self {
        Self {
            recent_n: 100,
            alpha: 0.4,
            beta: 0.4,
            gamma: 0.2,
        }
    }
}
