//! Session-Registry
//!
//! Geordnet nach Beitritt, damit `/users` und Broadcasts eine stabile
//! Reihenfolge haben. Pro Verbindung hoechstens eine Session, IDs sind unter
//! den registrierten Sessions eindeutig.

use tresen_core::{SessionId, VerbindungId};

use crate::session::Session;

#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: Vec<Session>,
}

impl SessionRegistry {
    pub fn neu() -> Self {
        Self::default()
    }

    /// Fuegt eine Session hinten an
    ///
    /// Der Aufrufer stellt sicher, dass ID und Verbindung noch frei sind.
    pub fn einfuegen(&mut self, session: Session) {
        debug_assert!(!self.id_belegt(&session.id));
        debug_assert!(self.nach_verbindung(&session.verbindung()).is_none());
        self.sessions.push(session);
    }

    /// Entfernt die Session einer Verbindung
    pub fn entfernen(&mut self, verbindung: &VerbindungId) -> Option<Session> {
        let pos = self
            .sessions
            .iter()
            .position(|s| s.verbindung() == *verbindung)?;
        Some(self.sessions.remove(pos))
    }

    /// Entfernt eine Session nach ID
    pub fn entfernen_nach_id(&mut self, id: &SessionId) -> Option<Session> {
        let pos = self.sessions.iter().position(|s| s.id == *id)?;
        Some(self.sessions.remove(pos))
    }

    pub fn nach_verbindung(&self, verbindung: &VerbindungId) -> Option<&Session> {
        self.sessions.iter().find(|s| s.verbindung() == *verbindung)
    }

    pub fn nach_verbindung_mut(&mut self, verbindung: &VerbindungId) -> Option<&mut Session> {
        self.sessions
            .iter_mut()
            .find(|s| s.verbindung() == *verbindung)
    }

    pub fn nach_id(&self, id: &SessionId) -> Option<&Session> {
        self.sessions.iter().find(|s| s.id == *id)
    }

    pub fn id_belegt(&self, id: &SessionId) -> bool {
        self.nach_id(id).is_some()
    }

    pub fn anzahl(&self) -> usize {
        self.sessions.len()
    }

    pub fn ist_leer(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Alle Sessions in Beitrittsreihenfolge
    pub fn iter(&self) -> impl Iterator<Item = &Session> {
        self.sessions.iter()
    }

    /// Sendet eine Zeile an alle Sessions
    pub fn an_alle(&self, zeile: &str) {
        for session in &self.sessions {
            session.senden(zeile);
        }
    }

    /// Sendet eine Zeile an alle Sessions ausser der angegebenen Verbindung
    pub fn an_alle_ausser(&self, ausser: &VerbindungId, zeile: &str) {
        for session in self.sessions.iter().filter(|s| s.verbindung() != *ausser) {
            session.senden(zeile);
        }
    }
}
