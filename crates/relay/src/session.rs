//! Session und Admin-Zustandsmaschine
//!
//! ```text
//! Mitglied --/admin--> WartetAufPasswort --richtig--> Admin
//!    ^                        |
//!    +-------- falsch --------+
//! ```
//!
//! Die naechste Zeile nach `/admin` ist immer der Passwortversuch. Admin
//! bleibt man bis zum Ende der Session.

use tresen_auth::AdminCredential;
use tresen_core::{Rolle, SessionId, VerbindungId};

use crate::broadcast::ClientSender;

/// Admin-Zustand einer Session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AdminZustand {
    #[default]
    Mitglied,
    WartetAufPasswort,
    Admin,
}

impl AdminZustand {
    pub fn rolle(&self) -> Rolle {
        match self {
            Self::Admin => Rolle::Admin,
            Self::Mitglied | Self::WartetAufPasswort => Rolle::Mitglied,
        }
    }

    pub fn wartet_auf_passwort(&self) -> bool {
        *self == Self::WartetAufPasswort
    }

    /// `/admin`: wechselt in den Passwort-Wartezustand
    ///
    /// Gibt `false` zurueck wenn die Session schon Admin ist.
    pub fn admin_anfordern(&mut self) -> bool {
        if *self == Self::Admin {
            return false;
        }
        *self = Self::WartetAufPasswort;
        true
    }

    /// Wertet einen Passwortversuch aus
    ///
    /// Der Wartezustand endet in jedem Fall.
    pub fn passwort_pruefen(&mut self, versuch: &str, credential: &AdminCredential) -> bool {
        debug_assert!(self.wartet_auf_passwort());
        if credential.pruefen(versuch) {
            *self = Self::Admin;
            true
        } else {
            *self = Self::Mitglied;
            false
        }
    }
}

/// Eine registrierte Chat-Session
#[derive(Debug)]
pub struct Session {
    pub id: SessionId,
    pub anzeigename: String,
    pub zustand: AdminZustand,
    pub sender: ClientSender,
}

impl Session {
    pub fn neu(id: SessionId, anzeigename: String, sender: ClientSender) -> Self {
        Self {
            id,
            anzeigename,
            zustand: AdminZustand::Mitglied,
            sender,
        }
    }

    pub fn verbindung(&self) -> VerbindungId {
        self.sender.verbindung
    }

    pub fn rolle(&self) -> Rolle {
        self.zustand.rolle()
    }

    pub fn ist_admin(&self) -> bool {
        self.rolle().ist_admin()
    }

    /// Reiht eine Zeile in die Send-Queue ein
    pub fn senden(&self, zeile: impl Into<String>) -> bool {
        self.sender.senden(zeile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn richtiges_passwort_macht_admin() {
        let cred = AdminCredential::aus_passwort("geheim");
        let mut z = AdminZustand::default();
        assert_eq!(z.rolle(), Rolle::Mitglied);

        assert!(z.admin_anfordern());
        assert!(z.wartet_auf_passwort());
        assert!(z.passwort_pruefen("geheim", &cred));
        assert_eq!(z, AdminZustand::Admin);
        assert_eq!(z.rolle(), Rolle::Admin);
    }

    #[test]
    fn falsches_passwort_setzt_zurueck() {
        let cred = AdminCredential::aus_passwort("geheim");
        let mut z = AdminZustand::default();
        z.admin_anfordern();
        assert!(!z.passwort_pruefen("raten", &cred));
        assert_eq!(z, AdminZustand::Mitglied);
        assert!(!z.wartet_auf_passwort());
    }

    #[test]
    fn admin_kann_nicht_erneut_anfordern() {
        let mut z = AdminZustand::Admin;
        assert!(!z.admin_anfordern());
        assert_eq!(z, AdminZustand::Admin);
    }

    #[test]
    fn wartend_ist_noch_kein_admin() {
        assert_eq!(AdminZustand::WartetAufPasswort.rolle(), Rolle::Mitglied);
    }
}
