//! Gemeinsame Identifikationstypen fuer Tresen
//!
//! Newtype-Pattern, damit Session-IDs (sichtbar im Chat) und
//! Verbindungs-IDs (intern) nicht verwechselt werden koennen.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Sichtbare Session-ID, z.B. `AB12`
///
/// Adressiert eine Session fuer `/pm` und `/ban`. Eindeutig nur unter den
/// aktuell registrierten Sessions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SessionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Interne ID einer TCP/TLS-Verbindung
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VerbindungId(pub Uuid);

impl VerbindungId {
    /// Erstellt eine neue zufaellige VerbindungId
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for VerbindungId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for VerbindungId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "conn:{}", self.0)
    }
}

/// Rolle einer Session im Raum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rolle {
    #[default]
    Mitglied,
    Admin,
}

impl Rolle {
    pub fn ist_admin(&self) -> bool {
        matches!(self, Rolle::Admin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbindung_id_eindeutig() {
        let a = VerbindungId::new();
        let b = VerbindungId::new();
        assert_ne!(a, b, "Zwei neue VerbindungIds muessen verschieden sein");
    }

    #[test]
    fn session_id_ist_transparent_serialisiert() {
        let id = SessionId::from("AB12");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"AB12\"");
        let zurueck: SessionId = serde_json::from_str("\"XY99\"").unwrap();
        assert_eq!(zurueck.as_str(), "XY99");
    }

    #[test]
    fn rolle_standard_ist_mitglied() {
        assert_eq!(Rolle::default(), Rolle::Mitglied);
        assert!(!Rolle::Mitglied.ist_admin());
        assert!(Rolle::Admin.ist_admin());
    }
}
