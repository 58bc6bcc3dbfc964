//! Fehlertypen fuer das Wire-Protokoll

use thiserror::Error;

/// Fehler beim Parsen von Protokollzeilen
#[derive(Debug, Error)]
pub enum ProtokollFehler {
    #[error("Leere Handshake-Zeile")]
    LeererName,

    #[error("Anzeigename zu lang: {laenge} Zeichen (Maximum: {maximum})")]
    NameZuLang { laenge: usize, maximum: usize },

    #[error("Ungueltige ID: {0}")]
    UngueltigeId(String),

    #[error("Handshake ist kein gueltiges JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type ProtokollResult<T> = Result<T, ProtokollFehler>;
