//! Fehlertypen fuer das Relay

use thiserror::Error;
use tresen_auth::AuthError;
use tresen_protocol::ProtokollFehler;

/// Fehlertyp fuer das Relay
#[derive(Debug, Error)]
pub enum RelayError {
    /// IO-Fehler (TCP, TLS, Socket)
    #[error("IO-Fehler: {0}")]
    Io(#[from] std::io::Error),

    /// Ungueltiger Handshake
    #[error("Protokollfehler: {0}")]
    Protokoll(#[from] ProtokollFehler),

    #[error("Authentifizierungsfehler: {0}")]
    Auth(#[from] AuthError),

    /// Vom Client vorgegebene ID ist bereits registriert
    #[error("ID bereits vergeben: {0}")]
    IdBelegt(String),

    /// Session-Limit erreicht oder kein freie ID mehr
    #[error("Server ist voll")]
    ServerVoll,

    /// Der Relay-Task laeuft nicht mehr
    #[error("Relay beendet")]
    RelayBeendet,
}

/// Result-Typ fuer das Relay
pub type RelayResult<T> = Result<T, RelayError>;
