//! Schluessel-Cache auf Empfaengerseite
//!
//! Beim ersten Umschlag eines Absenders wird dessen `key` gemerkt. Alle
//! weiteren Umschlaege derselben Absender-ID werden mit dem gemerkten
//! Schluessel entschluesselt, auch wenn sie einen anderen `key` mitbringen.

use std::collections::HashMap;

use tresen_core::SessionId;
use tresen_protocol::PmEnvelope;

use super::decrypt::{entschluesseln_oder_platzhalter, PLATZHALTER};
use crate::types::PmSchluessel;

/// Schluessel bekannter Absender, nach Session-ID
#[derive(Debug, Default)]
pub struct SchluesselCache {
    schluessel: HashMap<SessionId, PmSchluessel>,
}

impl SchluesselCache {
    pub fn neu() -> Self {
        Self::default()
    }

    /// Entschluesselt einen eingehenden Umschlag
    ///
    /// Unlesbare Schluessel oder Payloads ergeben den Platzhalter.
    pub fn entschluesseln(&mut self, umschlag: &PmEnvelope) -> String {
        if !self.schluessel.contains_key(&umschlag.from) {
            match PmSchluessel::aus_base64(&umschlag.key) {
                Ok(s) => {
                    tracing::debug!(von = %umschlag.from, "Schluessel des Absenders gemerkt");
                    self.schluessel.insert(umschlag.from.clone(), s);
                }
                Err(e) => {
                    tracing::debug!(von = %umschlag.from, fehler = %e, "Ungueltiger Absender-Schluessel");
                    return PLATZHALTER.to_string();
                }
            }
        }

        match self.schluessel.get(&umschlag.from) {
            Some(s) => entschluesseln_oder_platzhalter(umschlag, s),
            None => PLATZHALTER.to_string(),
        }
    }

    pub fn kennt(&self, id: &SessionId) -> bool {
        self.schluessel.contains_key(id)
    }

    pub fn anzahl(&self) -> usize {
        self.schluessel.len()
    }
}
