//! tresen-core – Gemeinsame Typen
//!
//! Identifikationstypen und Rollen, die von Protokoll, Relay und Client
//! gemeinsam genutzt werden.

pub mod types;

// Re-Exporte fuer bequemen Zugriff
pub use types::{Rolle, SessionId, VerbindungId};
