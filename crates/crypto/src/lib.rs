//! # tresen-crypto
//!
//! Verschluesselung fuer Tresen.
//!
//! ## Module
//! - `tls` - TLS-Transport (Server-Acceptor, Client-Connector ohne Zertifikatspruefung)
//! - `envelope` - Verschluesselte Privatnachrichten (Client <-> Client, AES-256-GCM)
//! - `types` - Schluesseltypen
//! - `error` - Fehlertypen

pub mod envelope;
pub mod error;
pub mod tls;
pub mod types;

// Bequeme Re-Exporte
pub use error::{CryptoError, CryptoResult};
pub use types::{PmSchluessel, SecretBytes};

pub use envelope::{
    entschluesseln_oder_platzhalter, pm_entschluesseln, pm_verschluesseln, SchluesselCache,
    PLATZHALTER,
};

pub use tls::{tls_acceptor_aus_dateien, tls_acceptor_aus_pem, unsicherer_connector};
