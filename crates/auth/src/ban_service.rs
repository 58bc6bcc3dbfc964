//! Ban-Liste fuer Tresen
//!
//! Menge gesperrter Session-IDs. Waechst nur: es gibt kein Unban, und Bans
//! leben so lange wie der Server-Prozess.

use std::collections::HashSet;

use tresen_core::SessionId;

use crate::error::{AuthError, AuthResult};

/// Ban-Liste – gesperrte Session-IDs
#[derive(Debug, Default)]
pub struct BanListe {
    gebannt: HashSet<SessionId>,
}

impl BanListe {
    /// Erstellt eine leere Ban-Liste
    pub fn neu() -> Self {
        Self::default()
    }

    /// Bannt eine Session-ID
    ///
    /// Gibt `false` zurueck wenn die ID bereits gebannt war.
    pub fn bannen(&mut self, id: SessionId) -> bool {
        let neu = self.gebannt.insert(id.clone());
        if neu {
            tracing::info!(id = %id, anzahl = self.gebannt.len(), "Session-ID gebannt");
        }
        neu
    }

    /// Prueft ob eine ID gebannt ist
    pub fn ist_gebannt(&self, id: &SessionId) -> bool {
        self.gebannt.contains(id)
    }

    /// Prueft und gibt einen AuthError zurueck wenn gebannt
    ///
    /// Nuetzlich beim Handshake um Bans direkt als Fehler zu behandeln.
    pub fn ban_pruefen(&self, id: &SessionId) -> AuthResult<()> {
        if self.ist_gebannt(id) {
            Err(AuthError::Gebannt(id.to_string()))
        } else {
            Ok(())
        }
    }

    /// Anzahl gebannter IDs
    pub fn anzahl(&self) -> usize {
        self.gebannt.len()
    }
}
