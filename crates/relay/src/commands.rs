//! Befehls-Parser
//!
//! Eine Zeile mit `/` am Anfang wird in genau einen [`Befehl`] uebersetzt.
//! Der Befehlsname wird ohne Beachtung der Gross-/Kleinschreibung verglichen,
//! Argumente bleiben wie sie sind.

use tresen_protocol::zeilen;

/// Alle Befehle die das Relay kennt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Befehl<'a> {
    Hilfe,
    Ping,
    Nutzer,
    /// `/pm <id> <text>`, Text mit erhaltenen Leerzeichen
    Pm { ziel: &'a str, text: &'a str },
    Admin,
    /// `/ban <id>`
    Ban { ziel: &'a str },
    /// `/exit` oder `/quit`
    Verlassen,
    /// Bekannter Befehl mit falschen Argumenten, enthaelt den Nutzungstext
    Nutzung(&'static str),
    Unbekannt,
}

/// Trennt das erste Token vom Rest (Rest ohne fuehrende Leerzeichen)
fn erstes_token(text: &str) -> (&str, &str) {
    match text.split_once(char::is_whitespace) {
        Some((kopf, rest)) => (kopf, rest.trim_start()),
        None => (text, ""),
    }
}

/// Parst eine Befehlszeile (getrimmt, beginnend mit `/`)
pub fn parse_befehl(zeile: &str) -> Befehl<'_> {
    let Some(ohne_praefix) = zeile.strip_prefix(zeilen::BEFEHLS_PRAEFIX) else {
        return Befehl::Unbekannt;
    };
    let (name, rest) = erstes_token(ohne_praefix);

    match name.to_ascii_lowercase().as_str() {
        "help" => Befehl::Hilfe,
        "ping" => Befehl::Ping,
        "users" => Befehl::Nutzer,
        "pm" => {
            let (ziel, text) = erstes_token(rest);
            if ziel.is_empty() || text.is_empty() {
                Befehl::Nutzung(zeilen::PM_NUTZUNG)
            } else {
                Befehl::Pm { ziel, text }
            }
        }
        "admin" => Befehl::Admin,
        "ban" => {
            let (ziel, _) = erstes_token(rest);
            if ziel.is_empty() {
                Befehl::Nutzung(zeilen::BAN_NUTZUNG)
            } else {
                Befehl::Ban { ziel }
            }
        }
        "exit" | "quit" => Befehl::Verlassen,
        _ => Befehl::Unbekannt,
    }
}
