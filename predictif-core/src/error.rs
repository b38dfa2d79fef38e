use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("Colonne obligatoire manquante : {0}")]
    MissingColumn(String),

    #[error("Valeur invalide '{value}' (ligne {line}, colonne {column})")]
    InvalidValue {
        line: u64,
        column: String,
        value: String,
    },

    #[error("Tirage de {found} valeurs pour {expected} colonnes")]
    RowWidth { expected: usize, found: usize },

    #[error("Impossible d'ouvrir {path:?} : {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Csv(#[from] csv::Error),
}
