//! Handshake – die erste Zeile einer Verbindung
//!
//! Zwei Formen werden akzeptiert:
//! - ein nackter Anzeigename: `Alice`
//! - ein JSON-Objekt: `{"name":"Alice","id":"AB12","key":"..."}`
//!
//! `userId` wird als Alias fuer `id` akzeptiert (aeltere Clients senden es so).

use serde::{Deserialize, Serialize};

use crate::error::{ProtokollFehler, ProtokollResult};

/// Maximale Laenge eines Anzeigenamens in Zeichen
pub const MAX_NAME_LAENGE: usize = 64;

/// Maximale Laenge einer vom Client vorgegebenen ID
pub const MAX_ID_LAENGE: usize = 16;

/// Welche Handshake-Form der Server erwartet
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandshakeModus {
    /// JSON wenn die Zeile mit `{` beginnt, sonst nackter Name
    #[default]
    Auto,
    /// Die ganze Zeile ist der Name
    Name,
    /// JSON ist Pflicht
    Json,
}

/// Geparster Handshake
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandshakeAnfrage {
    pub name: String,
    #[serde(default, alias = "userId", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Symmetrisches Schluesselmaterial des Clients (base64)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

impl HandshakeAnfrage {
    /// Serialisiert den Handshake als JSON-Zeile (ohne Newline)
    pub fn als_zeile(&self) -> ProtokollResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Prueft ob eine vom Client vorgegebene ID wohlgeformt ist
///
/// 1–16 Zeichen, nur ASCII-Buchstaben, Ziffern, `-` und `_`.
pub fn id_gueltig(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= MAX_ID_LAENGE
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Parst die erste Zeile einer Verbindung
pub fn parse_handshake(zeile: &str, modus: HandshakeModus) -> ProtokollResult<HandshakeAnfrage> {
    let zeile = zeile.trim();

    let json = match modus {
        HandshakeModus::Json => true,
        HandshakeModus::Name => false,
        HandshakeModus::Auto => zeile.starts_with('{'),
    };

    let mut anfrage = if json {
        serde_json::from_str::<HandshakeAnfrage>(zeile)?
    } else {
        HandshakeAnfrage {
            name: zeile.to_string(),
            id: None,
            key: None,
        }
    };

    anfrage.name = anfrage.name.trim().to_string();
    if anfrage.name.is_empty() {
        return Err(ProtokollFehler::LeererName);
    }
    let laenge = anfrage.name.chars().count();
    if laenge > MAX_NAME_LAENGE {
        return Err(ProtokollFehler::NameZuLang {
            laenge,
            maximum: MAX_NAME_LAENGE,
        });
    }

    // Leere ID zaehlt als "keine ID"
    anfrage.id = anfrage.id.filter(|id| !id.is_empty());
    if let Some(id) = &anfrage.id {
        if !id_gueltig(id) {
            return Err(ProtokollFehler::UngueltigeId(id.clone()));
        }
    }

    Ok(anfrage)
}
