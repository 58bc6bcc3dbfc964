//! Protokoll-Logik des Clients
//!
//! Reine Zustandsmaschine ohne IO: bekommt Zeilen vom Server und Eingaben
//! des Nutzers, liefert was gesendet bzw. angezeigt werden soll.

use std::collections::VecDeque;

use anyhow::Result;
use tresen_core::SessionId;
use tresen_crypto::{pm_verschluesseln, PmSchluessel, SchluesselCache};
use tresen_protocol::wire::DEFAULT_MAX_ZEILENLAENGE;
use tresen_protocol::{zeilen, HandshakeAnfrage, PmEnvelope, PmQuittung};

use crate::config::ClientConfig;

/// Lokale Meldung wenn eine Eingabe nicht ueber die Leitung passt
pub const NACHRICHT_ZU_LANG: &str = "Message too long";

/// Verschickte PMs die noch auf ihre Quittung warten
const MAX_OFFENE_PMS: usize = 32;

/// Reaktion auf eine Zeile vom Server
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Eingehend {
    /// Zeile direkt an den Server zurueck (Keepalive)
    Antworten(&'static str),
    /// Zeile dem Nutzer anzeigen
    Anzeigen(String),
}

/// Was mit einer Eingabe des Nutzers passiert
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ausgehend {
    /// Zeile an den Server
    Senden(String),
    /// Nur lokal anzeigen, nichts wird gesendet
    Lokal(&'static str),
}

pub struct ClientSitzung {
    name: String,
    wunsch_id: Option<String>,
    eigene_id: Option<SessionId>,
    klartext_pm: bool,
    schluessel: PmSchluessel,
    cache: SchluesselCache,
    /// (`iv`, Klartext) in Sendereihenfolge
    offene_pms: VecDeque<(String, String)>,
    zeilenlimit: usize,
}

impl ClientSitzung {
    pub fn neu(config: &ClientConfig) -> Self {
        Self {
            name: config.name.clone(),
            wunsch_id: config.id.clone(),
            eigene_id: config.id.as_deref().map(SessionId::from),
            klartext_pm: config.klartext_pm,
            schluessel: PmSchluessel::generieren(),
            cache: SchluesselCache::neu(),
            offene_pms: VecDeque::new(),
            zeilenlimit: DEFAULT_MAX_ZEILENLAENGE,
        }
    }

    pub fn eigene_id(&self) -> Option<&SessionId> {
        self.eigene_id.as_ref()
    }

    /// Erste Zeile an den Server: `{name, id?, key}`
    pub fn handshake_zeile(&self) -> Result<String> {
        let anfrage = HandshakeAnfrage {
            name: self.name.clone(),
            id: self.wunsch_id.clone(),
            key: Some(self.schluessel.als_base64()),
        };
        Ok(anfrage.als_zeile()?)
    }

    /// Verarbeitet eine Zeile vom Server
    pub fn eingehend(&mut self, zeile: &str) -> Option<Eingehend> {
        let zeile = zeile.trim();
        if zeile.is_empty() {
            return None;
        }
        if zeile == zeilen::PING {
            return Some(Eingehend::Antworten(zeilen::PONG));
        }
        if zeilen::ist_keepalive(zeile) {
            return None;
        }

        if let Some(umschlag) = PmEnvelope::aus_zeile(zeile) {
            let text = self.cache.entschluesseln(&umschlag);
            return Some(Eingehend::Anzeigen(zeilen::pm_von(&umschlag.sender_name, &text)));
        }

        if let Some(quittung) = PmQuittung::aus_zeile(zeile) {
            return self.quittung(&quittung);
        }

        if self.eigene_id.is_none() {
            if let Some(id) = id_aus_willkommen(zeile) {
                tracing::debug!(id = %id, "Eigene ID erhalten");
                self.eigene_id = Some(id);
            }
        }

        Some(Eingehend::Anzeigen(zeile.to_string()))
    }

    /// Uebersetzt eine Eingabe in die Zeile an den Server
    ///
    /// Verschluesselte PMs werden erst mit der Quittung des Servers als
    /// `[PRIVATE] To NAME: text` angezeigt.
    pub fn ausgehend(&mut self, eingabe: &str) -> Result<Ausgehend> {
        let eingabe = eingabe.trim();
        let von = self.eigene_id.clone().filter(|_| !self.klartext_pm);
        if let (Some(von), Some((ziel, text))) = (von, pm_argumente(eingabe)) {
            let an = SessionId::from(ziel);
            let umschlag = pm_verschluesseln(text, &self.schluessel, &von, &an, &self.name)?;
            let zeile = umschlag.zu_zeile()?;
            if zeile.len() > self.zeilenlimit {
                return Ok(Ausgehend::Lokal(NACHRICHT_ZU_LANG));
            }
            if self.offene_pms.len() == MAX_OFFENE_PMS {
                self.offene_pms.pop_front();
            }
            self.offene_pms.push_back((umschlag.payload.iv, text.to_string()));
            return Ok(Ausgehend::Senden(zeile));
        }
        if eingabe.len() > self.zeilenlimit {
            return Ok(Ausgehend::Lokal(NACHRICHT_ZU_LANG));
        }
        Ok(Ausgehend::Senden(eingabe.to_string()))
    }

    fn quittung(&mut self, quittung: &PmQuittung) -> Option<Eingehend> {
        let pos = self.offene_pms.iter().position(|(iv, _)| *iv == quittung.iv);
        let Some((_, text)) = pos.and_then(|pos| self.offene_pms.remove(pos)) else {
            tracing::debug!(an = %quittung.to, "Quittung ohne offene PM");
            return None;
        };
        Some(Eingehend::Anzeigen(zeilen::pm_an(&quittung.to_name, &text)))
    }
}

/// `/pm <id> <text>` zerlegen, `None` wenn es keine vollstaendige PM ist
fn pm_argumente(eingabe: &str) -> Option<(&str, &str)> {
    let (befehl, rest) = eingabe.split_once(char::is_whitespace)?;
    if !befehl.eq_ignore_ascii_case("/pm") {
        return None;
    }
    let (ziel, text) = rest.trim_start().split_once(char::is_whitespace)?;
    let text = text.trim_start();
    (!ziel.is_empty() && !text.is_empty()).then_some((ziel, text))
}

/// Liest die ID aus `Welcome NAME! Your ID is [ID]`
fn id_aus_willkommen(zeile: &str) -> Option<SessionId> {
    if !zeile.starts_with("Welcome ") {
        return None;
    }
    let (_, rest) = zeile.rsplit_once("Your ID is [")?;
    let id = rest.strip_suffix(']')?;
    (!id.is_empty()).then(|| SessionId::from(id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tresen_crypto::PLATZHALTER;
    use tresen_protocol::handshake::{parse_handshake, HandshakeModus};

    fn config(name: &str, id: Option<&str>) -> ClientConfig {
        ClientConfig {
            host: "localhost".into(),
            port: 1599,
            name: name.into(),
            id: id.map(str::to_string),
            klartext_pm: false,
        }
    }

    #[test]
    fn handshake_ist_json_mit_key() {
        let sitzung = ClientSitzung::neu(&config("Alice", Some("AL01")));
        let zeile = sitzung.handshake_zeile().unwrap();
        let anfrage = parse_handshake(&zeile, HandshakeModus::Json).unwrap();
        assert_eq!(anfrage.name, "Alice");
        assert_eq!(anfrage.id.as_deref(), Some("AL01"));
        assert!(PmSchluessel::aus_base64(anfrage.key.as_deref().unwrap()).is_ok());
    }

    #[test]
    fn ping_wird_mit_pong_beantwortet() {
        let mut sitzung = ClientSitzung::neu(&config("Alice", None));
        assert_eq!(sitzung.eingehend("__PING__"), Some(Eingehend::Antworten("__PONG__")));
        assert_eq!(sitzung.eingehend("__PONG__"), None);
        assert_eq!(sitzung.eingehend("   "), None);
    }

    #[test]
    fn eigene_id_aus_willkommen() {
        let mut sitzung = ClientSitzung::neu(&config("Alice", None));
        assert!(sitzung.eigene_id().is_none());
        sitzung.eingehend("Welcome Alice! Your ID is [QX07]");
        assert_eq!(sitzung.eigene_id().unwrap().as_str(), "QX07");
    }

    fn gesendet(ausgehend: Ausgehend) -> String {
        match ausgehend {
            Ausgehend::Senden(zeile) => zeile,
            Ausgehend::Lokal(text) => panic!("nichts gesendet: {text}"),
        }
    }

    /// Quittung wie sie der Server nach der Zustellung schickt
    fn quittung_fuer(zeile: &str, empfaenger: &str) -> String {
        let umschlag = PmEnvelope::aus_zeile(zeile).unwrap();
        PmQuittung::fuer(&umschlag, empfaenger).zu_zeile().unwrap()
    }

    #[test]
    fn pm_ohne_eigene_id_geht_im_klartext() {
        let mut sitzung = ClientSitzung::neu(&config("Alice", None));
        let zeile = gesendet(sitzung.ausgehend("/pm BO02 hallo").unwrap());
        assert_eq!(zeile, "/pm BO02 hallo");
    }

    #[test]
    fn klartext_modus_verschluesselt_nicht() {
        let mut cfg = config("Alice", Some("AL01"));
        cfg.klartext_pm = true;
        let mut sitzung = ClientSitzung::neu(&cfg);
        let zeile = gesendet(sitzung.ausgehend("/pm BO02 hallo").unwrap());
        assert_eq!(zeile, "/pm BO02 hallo");
    }

    #[test]
    fn verschluesselte_pm_zwischen_zwei_clients() {
        let mut alice = ClientSitzung::neu(&config("Alice", Some("AL01")));
        let mut bob = ClientSitzung::neu(&config("Bob", Some("BO02")));

        let zeile = gesendet(alice.ausgehend("/pm BO02 treffen  um 8").unwrap());
        assert!(!zeile.contains("treffen"));

        let umschlag = PmEnvelope::aus_zeile(&zeile).unwrap();
        assert_eq!(umschlag.from.as_str(), "AL01");
        assert_eq!(umschlag.to.as_str(), "BO02");

        assert_eq!(
            bob.eingehend(&zeile),
            Some(Eingehend::Anzeigen("[PRIVATE] From Alice: treffen  um 8".into()))
        );
    }

    #[test]
    fn bestaetigung_erst_mit_quittung() {
        let mut alice = ClientSitzung::neu(&config("Alice", Some("AL01")));

        let erste = gesendet(alice.ausgehend("/pm BO02 eins").unwrap());
        let zweite = gesendet(alice.ausgehend("/pm BO02 zwei").unwrap());

        // Ohne Quittung zeigt "User ID not found" keine Bestaetigung an
        assert_eq!(
            alice.eingehend("User ID not found"),
            Some(Eingehend::Anzeigen("User ID not found".into()))
        );

        assert_eq!(
            alice.eingehend(&quittung_fuer(&zweite, "Bob")),
            Some(Eingehend::Anzeigen("[PRIVATE] To Bob: zwei".into()))
        );
        assert_eq!(
            alice.eingehend(&quittung_fuer(&erste, "Bob")),
            Some(Eingehend::Anzeigen("[PRIVATE] To Bob: eins".into()))
        );
        // Doppelte Quittung wird verworfen
        assert_eq!(alice.eingehend(&quittung_fuer(&erste, "Bob")), None);
    }

    #[test]
    fn offene_pms_sind_begrenzt() {
        let mut alice = ClientSitzung::neu(&config("Alice", Some("AL01")));
        let erste = gesendet(alice.ausgehend("/pm BO02 alt").unwrap());
        for i in 0..MAX_OFFENE_PMS {
            alice.ausgehend(&format!("/pm BO02 nr {i}")).unwrap();
        }
        assert_eq!(alice.offene_pms.len(), MAX_OFFENE_PMS);
        assert_eq!(alice.eingehend(&quittung_fuer(&erste, "Bob")), None);
    }

    #[test]
    fn zu_lange_pm_wird_lokal_abgewiesen() {
        let mut alice = ClientSitzung::neu(&config("Alice", Some("AL01")));
        let eingabe = format!("/pm BO02 {}", "x".repeat(6000));
        assert_eq!(
            alice.ausgehend(&eingabe).unwrap(),
            Ausgehend::Lokal(NACHRICHT_ZU_LANG)
        );
        assert!(alice.offene_pms.is_empty());

        let chat = "y".repeat(DEFAULT_MAX_ZEILENLAENGE + 1);
        assert_eq!(alice.ausgehend(&chat).unwrap(), Ausgehend::Lokal(NACHRICHT_ZU_LANG));

        let grenze = "y".repeat(DEFAULT_MAX_ZEILENLAENGE);
        assert_eq!(gesendet(alice.ausgehend(&grenze).unwrap()), grenze);
    }

    #[test]
    fn fremder_schluessel_nach_erstkontakt_ergibt_platzhalter() {
        let mut alice = ClientSitzung::neu(&config("Alice", Some("AL01")));
        let mut falsche_alice = ClientSitzung::neu(&config("Alice", Some("AL01")));
        let mut bob = ClientSitzung::neu(&config("Bob", Some("BO02")));

        let echt = gesendet(alice.ausgehend("/pm BO02 eins").unwrap());
        bob.eingehend(&echt);

        let falsch = gesendet(falsche_alice.ausgehend("/pm BO02 zwei").unwrap());
        assert_eq!(
            bob.eingehend(&falsch),
            Some(Eingehend::Anzeigen(format!("[PRIVATE] From Alice: {PLATZHALTER}")))
        );
    }

    #[test]
    fn normale_zeilen_bleiben_unveraendert() {
        let mut sitzung = ClientSitzung::neu(&config("Alice", Some("AL01")));
        assert_eq!(
            sitzung.eingehend("<Bob> hi\r"),
            Some(Eingehend::Anzeigen("<Bob> hi".into()))
        );
        let zeile = gesendet(sitzung.ausgehend("  /users ").unwrap());
        assert_eq!(zeile, "/users");
    }

    #[test]
    fn pm_argumente_zerlegen() {
        assert_eq!(pm_argumente("/pm AB12 hallo du"), Some(("AB12", "hallo du")));
        assert_eq!(pm_argumente("/PM AB12 x"), Some(("AB12", "x")));
        assert_eq!(pm_argumente("/pm AB12"), None);
        assert_eq!(pm_argumente("/pmx AB12 x"), None);
        assert_eq!(pm_argumente("hallo"), None);
    }
}
