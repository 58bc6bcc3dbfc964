//! Fehlertypen fuer Admin-Credential und Bans

use thiserror::Error;

/// Alle moeglichen Fehler in tresen-auth
#[derive(Debug, Error)]
pub enum AuthError {
    // --- Passwort ---
    #[error("Passwort-Hashing fehlgeschlagen: {0}")]
    PasswortHashing(String),

    #[error("Ungueltiges Admin-Credential: {0}")]
    UngueltigesCredential(String),

    // --- Bans ---
    #[error("Session-ID gebannt: {0}")]
    Gebannt(String),
}

/// Result-Alias fuer tresen-auth
pub type AuthResult<T> = Result<T, AuthError>;
