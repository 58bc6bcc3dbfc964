//! Privatnachrichten-Umschlag
//!
//! Eine verschluesselte Privatnachricht reist als eine JSON-Zeile:
//!
//! ```text
//! {"type":"pm","from":"AB12","to":"CD34","senderName":"Alice","key":"<b64>",
//!  "payload":{"iv":"<b64>","authTag":"<b64>","ciphertext":"<b64>"}}
//! ```
//!
//! Der Server liest nur `from` und `to` und leitet die Zeile unveraendert
//! weiter. Ver- und Entschluesselung passiert ausschliesslich im Client.
//!
//! Nach erfolgreicher Zustellung bekommt der Absender eine Quittung, ueber
//! `iv` der passenden Nachricht zugeordnet:
//!
//! ```text
//! {"type":"pm_ack","to":"CD34","toName":"Bob","iv":"<b64>"}
//! ```

use serde::{Deserialize, Serialize};
use tresen_core::SessionId;

/// Wert des `type`-Felds eines Umschlags
pub const PM_TYP: &str = "pm";

/// Wert des `type`-Felds einer Zustellquittung
pub const PM_QUITTUNG_TYP: &str = "pm_ack";

/// Verschluesselter Inhalt (alle Felder base64)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PmPayload {
    /// 12 Bytes Nonce
    pub iv: String,
    /// 16 Bytes GCM-Auth-Tag
    pub auth_tag: String,
    pub ciphertext: String,
}

/// Privatnachrichten-Umschlag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PmEnvelope {
    #[serde(rename = "type")]
    pub typ: String,
    pub from: SessionId,
    pub to: SessionId,
    pub sender_name: String,
    /// Schluesselmaterial des Absenders (base64)
    pub key: String,
    pub payload: PmPayload,
}

impl PmEnvelope {
    /// Versucht eine Zeile als Umschlag zu lesen
    ///
    /// Gibt `None` zurueck fuer alles was kein Umschlag ist, auch fuer
    /// JSON-Objekte mit anderem `type`.
    pub fn aus_zeile(zeile: &str) -> Option<Self> {
        let zeile = zeile.trim();
        if !zeile.starts_with('{') {
            return None;
        }
        serde_json::from_str::<Self>(zeile)
            .ok()
            .filter(|e| e.typ == PM_TYP)
    }

    /// Serialisiert den Umschlag als eine Zeile (ohne Newline)
    pub fn zu_zeile(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Zustellquittung fuer einen weitergeleiteten Umschlag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PmQuittung {
    #[serde(rename = "type")]
    pub typ: String,
    pub to: SessionId,
    pub to_name: String,
    /// `payload.iv` des zugestellten Umschlags
    pub iv: String,
}

impl PmQuittung {
    /// Quittung fuer `umschlag`, zugestellt an `empfaenger_name`
    pub fn fuer(umschlag: &PmEnvelope, empfaenger_name: &str) -> Self {
        Self {
            typ: PM_QUITTUNG_TYP.into(),
            to: umschlag.to.clone(),
            to_name: empfaenger_name.to_string(),
            iv: umschlag.payload.iv.clone(),
        }
    }

    pub fn aus_zeile(zeile: &str) -> Option<Self> {
        let zeile = zeile.trim();
        if !zeile.starts_with('{') {
            return None;
        }
        serde_json::from_str::<Self>(zeile)
            .ok()
            .filter(|q| q.typ == PM_QUITTUNG_TYP)
    }

    pub fn zu_zeile(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
