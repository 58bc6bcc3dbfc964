//! Fehlertypen fuer das Kryptografie-Subsystem

use thiserror::Error;

/// Fehler im Kryptografie-Subsystem
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("Verschluesselung fehlgeschlagen: {0}")]
    Verschluesselung(String),

    #[error("Entschluesselung fehlgeschlagen: {0}")]
    Entschluesselung(String),

    #[error("Ungueltige Nonce-Laenge: erwartet {erwartet}, erhalten {erhalten}")]
    UngueltigeNonce { erwartet: usize, erhalten: usize },

    #[error("Ungueltige Schluessel-Laenge: erwartet {erwartet}, erhalten {erhalten}")]
    UngueltigeSchluesselLaenge { erwartet: usize, erhalten: usize },

    #[error("Ungueltige Auth-Tag-Laenge: erwartet {erwartet}, erhalten {erhalten}")]
    UngueltigerTag { erwartet: usize, erhalten: usize },

    #[error("TLS-Fehler: {0}")]
    Tls(String),

    #[error("Base64-Dekodierung fehlgeschlagen: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("IO-Fehler: {0}")]
    Io(#[from] std::io::Error),
}

pub type CryptoResult<T> = Result<T, CryptoError>;
