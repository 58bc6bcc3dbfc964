//! Chat-Dispatcher – Handshake und Befehle
//!
//! Der `ChatDispatcher` haelt den gesamten geteilten Zustand (Registry,
//! Ban-Liste, Verbindungen ohne Handshake) und wird ausschliesslich vom
//! Relay-Task benutzt. Alle Methoden sind synchron.
//!
//! ## Reihenfolge pro Zeile einer registrierten Session
//! 1. `__PONG__` wird verworfen
//! 2. Wartet die Session auf ein Passwort, ist die Zeile der Versuch
//! 3. Leere Zeilen werden ignoriert
//! 4. PM-Umschlag wird an `to` weitergeleitet, der Absender bekommt eine Quittung
//! 5. `/...` ist ein Befehl
//! 6. Alles andere geht als `<NAME> text` an alle anderen

use std::collections::HashMap;

use tresen_auth::BanListe;
use tresen_core::{SessionId, VerbindungId};
use tresen_protocol::handshake::parse_handshake;
use tresen_protocol::{zeilen, PmEnvelope, PmQuittung};

use crate::broadcast::ClientSender;
use crate::commands::{parse_befehl, Befehl};
use crate::error::{RelayError, RelayResult};
use crate::ident::id_generieren;
use crate::registry::SessionRegistry;
use crate::relay::RelayConfig;
use crate::session::Session;

pub struct ChatDispatcher {
    config: RelayConfig,
    registry: SessionRegistry,
    bans: BanListe,
    /// Verbindungen die noch keinen Handshake gesendet haben
    wartend: HashMap<VerbindungId, ClientSender>,
}

impl ChatDispatcher {
    pub fn neu(config: RelayConfig) -> Self {
        Self {
            config,
            registry: SessionRegistry::neu(),
            bans: BanListe::neu(),
            wartend: HashMap::new(),
        }
    }

    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    pub fn bans(&self) -> &BanListe {
        &self.bans
    }

    /// Neue Verbindung, Handshake steht noch aus
    pub fn verbunden(&mut self, sender: ClientSender) {
        tracing::debug!(verbindung = %sender.verbindung, "Verbindung wartet auf Handshake");
        self.wartend.insert(sender.verbindung, sender);
    }

    /// Verbindung wurde vom Transport geschlossen
    pub fn getrennt(&mut self, verbindung: VerbindungId) {
        if self.wartend.remove(&verbindung).is_some() {
            tracing::debug!(verbindung = %verbindung, "Verbindung ohne Handshake getrennt");
            return;
        }
        // Gebannte oder per /exit beendete Sessions sind hier schon weg
        if let Some(session) = self.registry.entfernen(&verbindung) {
            self.verlassen_ankuendigen(&session);
        }
    }

    /// Verarbeitet eine empfangene Zeile
    pub fn zeile(&mut self, verbindung: VerbindungId, zeile: &str) {
        let zeile = zeile.trim();
        if zeile == zeilen::PONG {
            tracing::trace!(verbindung = %verbindung, "Keepalive-Antwort");
            return;
        }

        if self.registry.nach_verbindung(&verbindung).is_some() {
            self.nachricht(verbindung, zeile);
        } else if self.wartend.contains_key(&verbindung) {
            if !zeile.is_empty() {
                self.handshake(verbindung, zeile);
            }
        } else {
            tracing::trace!(verbindung = %verbindung, "Zeile von entfernter Verbindung verworfen");
        }
    }

    // -----------------------------------------------------------------------
    // Handshake
    // -----------------------------------------------------------------------

    fn handshake(&mut self, verbindung: VerbindungId, zeile: &str) {
        let Some(sender) = self.wartend.remove(&verbindung) else {
            return;
        };

        match self.session_anlegen(zeile) {
            Ok((id, name)) => {
                self.registry.an_alle(&zeilen::beigetreten(&id, &name));
                sender.senden(zeilen::willkommen(&name, &id));
                tracing::info!(verbindung = %verbindung, id = %id, name = %name, "Session beigetreten");
                self.registry.einfuegen(Session::neu(id, name, sender));
            }
            Err(e) => {
                match &e {
                    RelayError::Auth(_) => {
                        sender.senden(zeilen::GEBANNT_ABGELEHNT);
                    }
                    RelayError::IdBelegt(_) => {
                        sender.senden(zeilen::ID_BELEGT);
                    }
                    RelayError::ServerVoll => {
                        sender.senden(zeilen::SERVER_VOLL);
                    }
                    _ => {}
                }
                tracing::warn!(verbindung = %verbindung, fehler = %e, "Handshake abgelehnt");
                // sender wird gedroppt, die Verbindung schliesst
            }
        }
    }

    /// Prueft den Handshake und vergibt die ID
    fn session_anlegen(&self, zeile: &str) -> RelayResult<(SessionId, String)> {
        let anfrage = parse_handshake(zeile, self.config.handshake_modus)?;

        let gewuenscht = anfrage.id.map(SessionId::new);
        if let Some(id) = &gewuenscht {
            self.bans.ban_pruefen(id)?;
        }

        if self.registry.anzahl() >= self.config.max_clients {
            return Err(RelayError::ServerVoll);
        }

        let id = match gewuenscht {
            Some(id) => {
                if self.registry.id_belegt(&id) {
                    return Err(RelayError::IdBelegt(id.to_string()));
                }
                id
            }
            None => id_generieren(&mut rand::thread_rng(), |id| {
                self.registry.id_belegt(id) || self.bans.ist_gebannt(id)
            })
            .ok_or(RelayError::ServerVoll)?,
        };

        Ok((id, anfrage.name))
    }

    // -----------------------------------------------------------------------
    // Nachrichten registrierter Sessions
    // -----------------------------------------------------------------------

    fn nachricht(&mut self, verbindung: VerbindungId, zeile: &str) {
        let credential = &self.config.admin;
        let Some(session) = self.registry.nach_verbindung_mut(&verbindung) else {
            return;
        };

        if session.zustand.wartet_auf_passwort() {
            if session.zustand.passwort_pruefen(zeile, credential) {
                tracing::info!(id = %session.id, "Session ist jetzt Admin");
                session.senden(zeilen::JETZT_ADMIN);
            } else {
                tracing::warn!(id = %session.id, "Falsches Admin-Passwort");
                session.senden(zeilen::FALSCHES_PASSWORT);
            }
            return;
        }

        if zeile.is_empty() {
            return;
        }

        if self.config.pm_weiterleiten {
            if let Some(umschlag) = PmEnvelope::aus_zeile(zeile) {
                self.umschlag_weiterleiten(verbindung, &umschlag, zeile);
                return;
            }
        }

        if zeile.starts_with(zeilen::BEFEHLS_PRAEFIX) {
            self.befehl(verbindung, zeile);
            return;
        }

        if let Some(session) = self.registry.nach_verbindung(&verbindung) {
            let chat = zeilen::chat(&session.anzeigename, zeile);
            self.registry.an_alle_ausser(&verbindung, &chat);
        }
    }

    fn umschlag_weiterleiten(&self, verbindung: VerbindungId, umschlag: &PmEnvelope, zeile: &str) {
        let Some(absender) = self.registry.nach_verbindung(&verbindung) else {
            return;
        };
        if umschlag.from != absender.id {
            tracing::warn!(id = %absender.id, from = %umschlag.from, "Umschlag mit fremdem Absender");
            absender.senden(zeilen::ABSENDER_FALSCH);
            return;
        }
        match self.registry.nach_id(&umschlag.to) {
            Some(ziel) => {
                if !ziel.senden(zeile) {
                    return;
                }
                tracing::debug!(von = %absender.id, an = %ziel.id, "PM-Umschlag weitergeleitet");
                match PmQuittung::fuer(umschlag, &ziel.anzeigename).zu_zeile() {
                    Ok(quittung) => {
                        absender.senden(quittung);
                    }
                    Err(e) => tracing::warn!(fehler = %e, "Quittung nicht serialisierbar"),
                }
            }
            None => {
                absender.senden(zeilen::ID_NICHT_GEFUNDEN);
            }
        }
    }

    // -----------------------------------------------------------------------
    // Befehle
    // -----------------------------------------------------------------------

    fn befehl(&mut self, verbindung: VerbindungId, zeile: &str) {
        let befehl = parse_befehl(zeile);
        tracing::debug!(verbindung = %verbindung, befehl = ?befehl, "Befehl");

        match befehl {
            Befehl::Hilfe => {
                if let Some(s) = self.registry.nach_verbindung(&verbindung) {
                    for hilfe in zeilen::HILFE {
                        s.senden(*hilfe);
                    }
                }
            }
            Befehl::Ping => self.antworten(verbindung, zeilen::NOCH_VERBUNDEN),
            Befehl::Nutzer => self.nutzer_auflisten(verbindung),
            Befehl::Pm { ziel, text } => self.privatnachricht(verbindung, ziel, text),
            Befehl::Admin => self.admin_anfordern(verbindung),
            Befehl::Ban { ziel } => self.bannen(verbindung, ziel),
            Befehl::Verlassen => self.verlassen(verbindung),
            Befehl::Nutzung(text) => self.antworten(verbindung, text),
            Befehl::Unbekannt => self.antworten(verbindung, zeilen::UNBEKANNTER_BEFEHL),
        }
    }

    fn antworten(&self, verbindung: VerbindungId, zeile: &str) {
        if let Some(s) = self.registry.nach_verbindung(&verbindung) {
            s.senden(zeile);
        }
    }

    fn nutzer_auflisten(&self, verbindung: VerbindungId) {
        let Some(anfragend) = self.registry.nach_verbindung(&verbindung) else {
            return;
        };
        anfragend.senden(zeilen::nutzerliste_kopf(self.registry.anzahl()));
        for s in self.registry.iter() {
            anfragend.senden(zeilen::nutzerliste_eintrag(&s.id, &s.anzeigename, s.rolle()));
        }
    }

    fn privatnachricht(&self, verbindung: VerbindungId, ziel: &str, text: &str) {
        let Some(absender) = self.registry.nach_verbindung(&verbindung) else {
            return;
        };
        match self.registry.nach_id(&SessionId::from(ziel)) {
            Some(empfaenger) => {
                empfaenger.senden(zeilen::pm_von(&absender.anzeigename, text));
                absender.senden(zeilen::pm_an(&empfaenger.anzeigename, text));
            }
            None => {
                absender.senden(zeilen::ID_NICHT_GEFUNDEN);
            }
        }
    }

    fn admin_anfordern(&mut self, verbindung: VerbindungId) {
        let Some(session) = self.registry.nach_verbindung_mut(&verbindung) else {
            return;
        };
        if session.zustand.admin_anfordern() {
            session.senden(zeilen::PASSWORT_ABFRAGE);
        } else {
            session.senden(zeilen::BEREITS_ADMIN);
        }
    }

    fn bannen(&mut self, verbindung: VerbindungId, ziel: &str) {
        let Some(admin) = self.registry.nach_verbindung(&verbindung) else {
            return;
        };
        if !admin.ist_admin() {
            tracing::warn!(id = %admin.id, ziel, "Ban ohne Admin-Rechte");
            admin.senden(zeilen::ZUGRIFF_VERWEIGERT);
            return;
        }

        let ziel_id = SessionId::from(ziel);
        match self.registry.nach_id(&ziel_id) {
            None => {
                admin.senden(zeilen::ID_NICHT_GEFUNDEN);
                return;
            }
            Some(z) if z.ist_admin() => {
                admin.senden(zeilen::ADMIN_NICHT_BANNBAR);
                return;
            }
            Some(_) => {}
        }

        let admin_id = admin.id.clone();
        self.bans.bannen(ziel_id.clone());
        if let Some(gebannt) = self.registry.entfernen_nach_id(&ziel_id) {
            gebannt.senden(zeilen::DU_WURDEST_GEBANNT);
            tracing::info!(id = %gebannt.id, name = %gebannt.anzeigename, von = %admin_id, "Session gebannt");
            self.registry.an_alle(&zeilen::wurde_gebannt(&gebannt.anzeigename));
            // gebannt wird gedroppt, die Verbindung schliesst nach der letzten Zeile
        }
    }

    fn verlassen(&mut self, verbindung: VerbindungId) {
        if let Some(session) = self.registry.entfernen(&verbindung) {
            session.senden(zeilen::VERLASSEN);
            self.verlassen_ankuendigen(&session);
        }
    }

    fn verlassen_ankuendigen(&self, session: &Session) {
        tracing::info!(id = %session.id, name = %session.anzeigename, "Session verlassen");
        self.registry
            .an_alle(&zeilen::hat_verlassen(&session.id, &session.anzeigename));
    }
}
