//! tresen-auth – Admin-Authentifizierung und Bans
//!
//! Dieses Crate implementiert:
//! - Das prozessweite Admin-Credential (SHA-256-Digest oder Argon2id-PHC)
//! - Die Ban-Liste (monoton wachsende Menge gesperrter Session-IDs)

pub mod ban_service;
pub mod error;
pub mod password;

// Bequeme Re-Exporte
pub use ban_service::BanListe;
pub use error::{AuthError, AuthResult};
pub use password::{passwort_hashen, AdminCredential};
