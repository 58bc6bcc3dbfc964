//! Privatnachricht entschluesseln

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Key, Nonce,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use tresen_protocol::PmEnvelope;

use super::{NONCE_LAENGE, TAG_LAENGE};
use crate::error::{CryptoError, CryptoResult};
use crate::types::PmSchluessel;

/// Anzeigetext wenn eine Nachricht nicht entschluesselt werden kann
pub const PLATZHALTER: &str = "[unable to decrypt message]";

/// Entschluesselt den Payload eines Umschlags
pub fn pm_entschluesseln(umschlag: &PmEnvelope, schluessel: &PmSchluessel) -> CryptoResult<String> {
    let nonce = STANDARD.decode(&umschlag.payload.iv)?;
    if nonce.len() != NONCE_LAENGE {
        return Err(CryptoError::UngueltigeNonce {
            erwartet: NONCE_LAENGE,
            erhalten: nonce.len(),
        });
    }
    let tag = STANDARD.decode(&umschlag.payload.auth_tag)?;
    if tag.len() != TAG_LAENGE {
        return Err(CryptoError::UngueltigerTag {
            erwartet: TAG_LAENGE,
            erhalten: tag.len(),
        });
    }

    let mut daten = STANDARD.decode(&umschlag.payload.ciphertext)?;
    daten.extend_from_slice(&tag);

    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(schluessel.as_bytes()));
    let klartext = cipher
        .decrypt(Nonce::from_slice(&nonce), daten.as_slice())
        .map_err(|e| CryptoError::Entschluesselung(e.to_string()))?;

    String::from_utf8(klartext).map_err(|e| CryptoError::Entschluesselung(e.to_string()))
}

/// Wie [`pm_entschluesseln`], liefert bei jedem Fehler aber [`PLATZHALTER`]
pub fn entschluesseln_oder_platzhalter(umschlag: &PmEnvelope, schluessel: &PmSchluessel) -> String {
    match pm_entschluesseln(umschlag, schluessel) {
        Ok(text) => text,
        Err(e) => {
            tracing::debug!(von = %umschlag.from, fehler = %e, "Privatnachricht nicht lesbar");
            PLATZHALTER.to_string()
        }
    }
}
