//! Privatnachricht verschluesseln

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Key, Nonce,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use rand::rngs::OsRng;
use rand::RngCore;
use tresen_core::SessionId;
use tresen_protocol::envelope::PM_TYP;
use tresen_protocol::{PmEnvelope, PmPayload};

use super::{NONCE_LAENGE, TAG_LAENGE};
use crate::error::{CryptoError, CryptoResult};
use crate::types::PmSchluessel;

/// Verschluesselt `klartext` und baut den Umschlag fuer `an`
///
/// Der Auth-Tag wird vom Ciphertext abgetrennt und separat als `authTag`
/// uebertragen.
pub fn pm_verschluesseln(
    klartext: &str,
    schluessel: &PmSchluessel,
    von: &SessionId,
    an: &SessionId,
    absender_name: &str,
) -> CryptoResult<PmEnvelope> {
    let mut nonce = [0u8; NONCE_LAENGE];
    OsRng.fill_bytes(&mut nonce);

    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(schluessel.as_bytes()));
    let mut ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce), klartext.as_bytes())
        .map_err(|e| CryptoError::Verschluesselung(e.to_string()))?;

    // aes-gcm haengt den Tag an, das Wire-Format fuehrt ihn getrennt
    let tag = ciphertext.split_off(ciphertext.len() - TAG_LAENGE);

    Ok(PmEnvelope {
        typ: PM_TYP.to_string(),
        from: von.clone(),
        to: an.clone(),
        sender_name: absender_name.to_string(),
        key: schluessel.als_base64(),
        payload: PmPayload {
            iv: STANDARD.encode(nonce),
            auth_tag: STANDARD.encode(tag),
            ciphertext: STANDARD.encode(ciphertext),
        },
    })
}
