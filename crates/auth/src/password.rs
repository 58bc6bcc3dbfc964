//! Admin-Credential
//!
//! Ein einziges, prozessweites Geheimnis, gegen das `/admin`-Versuche
//! geprueft werden. Zwei Formen werden in der Konfiguration akzeptiert:
//! - 64 Hex-Zeichen: SHA-256-Digest des Passworts
//! - `$argon2id$...`: PHC-String (z.B. erzeugt mit [`passwort_hashen`])

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use sha2::{Digest, Sha256};

use crate::error::{AuthError, AuthResult};

/// Passwort dessen Digest ohne Konfiguration gilt
pub const STANDARD_ADMIN_PASSWORT: &str = "admin123";

/// Gespeichertes Admin-Credential
#[derive(Clone, PartialEq, Eq)]
pub enum AdminCredential {
    /// SHA-256-Digest als Hex (kleingeschrieben)
    Sha256(String),
    /// Argon2id-PHC-String
    Argon2(String),
}

impl std::fmt::Debug for AdminCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sha256(_) => f.write_str("AdminCredential::Sha256([REDACTED])"),
            Self::Argon2(_) => f.write_str("AdminCredential::Argon2([REDACTED])"),
        }
    }
}

impl Default for AdminCredential {
    fn default() -> Self {
        Self::aus_passwort(STANDARD_ADMIN_PASSWORT)
    }
}

/// SHA-256 eines Strings als Hex
fn sha256_hex(eingabe: &str) -> String {
    Sha256::digest(eingabe.as_bytes())
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

impl AdminCredential {
    /// Erstellt ein SHA-256-Credential aus einem Klartext-Passwort
    pub fn aus_passwort(passwort: &str) -> Self {
        Self::Sha256(sha256_hex(passwort))
    }

    /// Liest ein Credential aus dem Konfigurationswert
    pub fn aus_konfig(wert: &str) -> AuthResult<Self> {
        let wert = wert.trim();
        if wert.starts_with("$argon2") {
            PasswordHash::new(wert)
                .map_err(|e| AuthError::UngueltigesCredential(format!("Argon2-PHC: {e}")))?;
            return Ok(Self::Argon2(wert.to_string()));
        }
        if wert.len() == 64 && wert.chars().all(|c| c.is_ascii_hexdigit()) {
            return Ok(Self::Sha256(wert.to_ascii_lowercase()));
        }
        Err(AuthError::UngueltigesCredential(
            "erwartet 64 Hex-Zeichen (SHA-256) oder einen $argon2id$-PHC-String".into(),
        ))
    }

    /// Prueft ob es sich um das eingebaute Standard-Passwort handelt
    pub fn ist_standard(&self) -> bool {
        *self == Self::default()
    }

    /// Prueft einen Passwortversuch
    ///
    /// Fehler beim Verifizieren gelten als falsches Passwort.
    pub fn pruefen(&self, versuch: &str) -> bool {
        match self {
            Self::Sha256(digest) => sha256_hex(versuch) == *digest,
            Self::Argon2(phc) => match passwort_verifizieren(versuch, phc) {
                Ok(korrekt) => korrekt,
                Err(e) => {
                    tracing::error!(fehler = %e, "Argon2-Verifikation fehlgeschlagen");
                    false
                }
            },
        }
    }
}

/// Hasht ein Passwort mit Argon2id und einem zufaelligen Salt
///
/// Gibt den PHC-String zurueck, der direkt als `admin.passwort_hash`
/// konfiguriert werden kann.
pub fn passwort_hashen(passwort: &str) -> AuthResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(passwort.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::PasswortHashing(e.to_string()))
}

fn passwort_verifizieren(passwort: &str, hash: &str) -> AuthResult<bool> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| AuthError::PasswortHashing(format!("Ungueltiges Hash-Format: {e}")))?;

    match Argon2::default().verify_password(passwort.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(AuthError::PasswortHashing(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_credential_akzeptiert_admin123() {
        let cred = AdminCredential::default();
        assert!(cred.pruefen("admin123"));
        assert!(!cred.pruefen("admin1234"));
        assert!(cred.ist_standard());
    }

    #[test]
    fn sha256_digest_aus_konfig() {
        let cred = AdminCredential::aus_konfig(
            "  CBE1E4E1A1E6C2C9F8E8BFC9DB0EB3F49F7C6C0B5C5A1D2F2E6F1A6A8C9B0F1E  ",
        )
        .unwrap();
        assert!(matches!(
            cred,
            AdminCredential::Sha256(ref d) if !d.chars().any(|c| c.is_ascii_uppercase())
        ));

        let echt = AdminCredential::aus_konfig(&sha256_hex("geheim")).unwrap();
        assert!(echt.pruefen("geheim"));
        assert!(!echt.pruefen("Geheim"));
        assert!(!echt.ist_standard());
    }

    #[test]
    fn argon2_credential() {
        let phc = passwort_hashen("sicheres_passwort_123!").expect("Hashing fehlgeschlagen");
        assert!(phc.starts_with("$argon2id$"));

        let cred = AdminCredential::aus_konfig(&phc).unwrap();
        assert!(cred.pruefen("sicheres_passwort_123!"));
        assert!(!cred.pruefen("falsches_passwort"));
    }

    #[test]
    fn ungueltiger_konfigwert_gibt_fehler() {
        assert!(AdminCredential::aus_konfig("admin123").is_err());
        assert!(AdminCredential::aus_konfig(&"z".repeat(64)).is_err());
    }

    #[test]
    fn debug_zeigt_kein_geheimnis() {
        let text = format!("{:?}", AdminCredential::default());
        assert!(text.contains("REDACTED"));
        assert!(!text.contains(&sha256_hex("admin123")));
    }
}
