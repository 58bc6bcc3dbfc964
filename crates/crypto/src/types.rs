//! Schluesseltypen fuer das Kryptografie-Subsystem

use base64::{engine::general_purpose::STANDARD, Engine};
use rand::rngs::OsRng;
use rand::RngCore;

use crate::error::{CryptoError, CryptoResult};

/// Laenge eines PM-Schluessels in Bytes (AES-256)
pub const PM_SCHLUESSEL_LAENGE: usize = 32;

/// Sicherer Schluessel-Container (wird beim Drop genullt)
#[derive(Clone)]
pub struct SecretBytes(pub Vec<u8>);

impl Drop for SecretBytes {
    fn drop(&mut self) {
        self.0.iter_mut().for_each(|b| *b = 0);
    }
}

impl std::fmt::Debug for SecretBytes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SecretBytes([REDACTED] {} bytes)", self.0.len())
    }
}

impl SecretBytes {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Symmetrischer Schluessel fuer Privatnachrichten
///
/// Jeder Client erzeugt beim Start genau einen und schickt ihn mit jedem
/// Umschlag mit.
#[derive(Debug, Clone)]
pub struct PmSchluessel(SecretBytes);

impl PmSchluessel {
    /// Erzeugt einen neuen zufaelligen Schluessel
    pub fn generieren() -> Self {
        let mut bytes = vec![0u8; PM_SCHLUESSEL_LAENGE];
        OsRng.fill_bytes(&mut bytes);
        Self(SecretBytes::new(bytes))
    }

    pub fn aus_bytes(bytes: Vec<u8>) -> CryptoResult<Self> {
        if bytes.len() != PM_SCHLUESSEL_LAENGE {
            return Err(CryptoError::UngueltigeSchluesselLaenge {
                erwartet: PM_SCHLUESSEL_LAENGE,
                erhalten: bytes.len(),
            });
        }
        Ok(Self(SecretBytes::new(bytes)))
    }

    /// Liest einen base64-kodierten Schluessel (Feld `key` im Umschlag)
    pub fn aus_base64(text: &str) -> CryptoResult<Self> {
        Self::aus_bytes(STANDARD.decode(text.trim())?)
    }

    pub fn als_base64(&self) -> String {
        STANDARD.encode(self.0.as_bytes())
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generierte_schluessel_sind_verschieden() {
        let a = PmSchluessel::generieren();
        let b = PmSchluessel::generieren();
        assert_eq!(a.as_bytes().len(), PM_SCHLUESSEL_LAENGE);
        assert_ne!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn base64_hin_und_zurueck() {
        let schluessel = PmSchluessel::generieren();
        let text = schluessel.als_base64();
        let gelesen = PmSchluessel::aus_base64(&text).unwrap();
        assert_eq!(gelesen.as_bytes(), schluessel.as_bytes());
    }

    #[test]
    fn falsche_laenge_wird_abgelehnt() {
        let kurz = STANDARD.encode([1u8; 16]);
        assert!(matches!(
            PmSchluessel::aus_base64(&kurz),
            Err(CryptoError::UngueltigeSchluesselLaenge { erwartet: 32, erhalten: 16 })
        ));
        assert!(matches!(
            PmSchluessel::aus_base64("kein base64!"),
            Err(CryptoError::Base64(_))
        ));
    }

    #[test]
    fn debug_zeigt_keine_bytes() {
        let text = format!("{:?}", PmSchluessel::generieren());
        assert!(text.contains("REDACTED"));
    }
}
