//! Reservierte Tokens und Antworttexte des Chat-Protokolls
//!
//! Die Texte sind Teil des Wire-Formats: Clients zeigen sie unveraendert an,
//! Tests und Skripte matchen darauf. Aenderungen hier sind Protokollaenderungen.

use tresen_core::{Rolle, SessionId};

/// Keepalive-Probe (Server -> Client)
pub const PING: &str = "__PING__";

/// Keepalive-Antwort (Client -> Server), wird vom Server verworfen
pub const PONG: &str = "__PONG__";

/// Praefix aller Befehle
pub const BEFEHLS_PRAEFIX: char = '/';

/// Prueft ob eine Zeile ein Keepalive-Token ist (wird nie angezeigt)
pub fn ist_keepalive(zeile: &str) -> bool {
    zeile == PING || zeile == PONG
}

/// Hilfetext fuer `/help`, eine Zeile pro Eintrag
pub const HILFE: &[&str] = &[
    "Commands:",
    "/help           - Show this help message",
    "/users          - List online users",
    "/pm <ID> <msg>  - Send private message",
    "/admin          - Become admin (password required)",
    "/ban <ID>       - Ban user by ID (admin only)",
    "/ping           - Check connection",
    "/exit | /quit   - Leave the chat",
];

// --- Feste Antworten ---

pub const NOCH_VERBUNDEN: &str = "Still connected";
pub const PM_NUTZUNG: &str = "Usage: /pm <ID> <message>";
pub const BAN_NUTZUNG: &str = "Usage: /ban <ID>";
pub const ID_NICHT_GEFUNDEN: &str = "User ID not found";
pub const BEREITS_ADMIN: &str = "You are already admin";
pub const PASSWORT_ABFRAGE: &str = "Enter admin password:";
pub const JETZT_ADMIN: &str = "You are now admin";
pub const FALSCHES_PASSWORT: &str = "Wrong admin password";
pub const ZUGRIFF_VERWEIGERT: &str = "Permission denied";
pub const ADMIN_NICHT_BANNBAR: &str = "Cannot ban admin";
pub const DU_WURDEST_GEBANNT: &str = "You have been banned by admin";
pub const GEBANNT_ABGELEHNT: &str = "You are banned from this server";
pub const ID_BELEGT: &str = "ID already in use";
pub const SERVER_VOLL: &str = "Server is full";
pub const VERLASSEN: &str = "You have left the chat";
pub const UNBEKANNTER_BEFEHL: &str = "Unknown command. Try /help";
pub const ABSENDER_FALSCH: &str = "Envelope sender mismatch";

// --- Zusammengesetzte Antworten ---

/// Private Begruessung nach erfolgreichem Handshake
pub fn willkommen(name: &str, id: &SessionId) -> String {
    format!("Welcome {name}! Your ID is [{id}]")
}

/// Ankuendigung an alle anderen beim Beitritt
pub fn beigetreten(id: &SessionId, name: &str) -> String {
    format!("<announce> [{id}] {name} joined the chat")
}

/// Ankuendigung an alle beim Verlassen
pub fn hat_verlassen(id: &SessionId, name: &str) -> String {
    format!("<announce> [{id}] {name} left the chat")
}

/// Ankuendigung an alle nach einem Ban
pub fn wurde_gebannt(name: &str) -> String {
    format!("<announce> User {name} was banned by admin")
}

/// Oeffentliche Chatzeile
pub fn chat(name: &str, text: &str) -> String {
    format!("<{name}> {text}")
}

/// Privatnachricht beim Empfaenger
pub fn pm_von(absender: &str, text: &str) -> String {
    format!("[PRIVATE] From {absender}: {text}")
}

/// Zustellbestaetigung beim Absender
pub fn pm_an(empfaenger: &str, text: &str) -> String {
    format!("[PRIVATE] To {empfaenger}: {text}")
}

/// Kopfzeile der `/users`-Antwort
pub fn nutzerliste_kopf(anzahl: usize) -> String {
    format!("Online users ({anzahl}):")
}

/// Eine Zeile der `/users`-Antwort
pub fn nutzerliste_eintrag(id: &SessionId, name: &str, rolle: Rolle) -> String {
    let suffix = if rolle.ist_admin() { " (admin)" } else { "" };
    format!("- [{id}] {name}{suffix}")
}
