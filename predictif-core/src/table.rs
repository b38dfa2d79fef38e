use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::TableError;
use crate::models::{DrawTable, Game};

/// Reads a draw history in file order (oldest draw first).
///
/// Only the game's number columns are kept; any other column is ignored and
/// a missing one is reported before any row is read.
pub fn read_table<R: Read>(reader: R, game: Game, delimiter: u8) -> Result<DrawTable, TableError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    let required: Vec<&str> = game.required_columns().collect();
    let indices = required
        .iter()
        .map(|&name| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| TableError::MissingColumn(name.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut table = DrawTable::new(required.iter().copied());

    for record in reader.records() {
        let record = record?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        let row = required
            .iter()
            .zip(&indices)
            .map(|(&column, &idx)| {
                let raw = record.get(idx).unwrap_or("");
                raw.parse::<i64>().map_err(|_| TableError::InvalidValue {
                    line,
                    column: column.to_string(),
                    value: raw.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        table.push_row(row)?;
    }

    Ok(table)
}

pub fn load_table(path: &Path, game: Game, delimiter: u8) -> Result<DrawTable, TableError> {
    let file = File::open(path).map_err(|source| TableError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let table = read_table(file, game, delimiter)?;
    log::info!("{} tirages {} chargés depuis {:?}", table.len(), game, path);
    Ok(table)
}
