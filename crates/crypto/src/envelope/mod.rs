//! Verschluesselte Privatnachrichten (Client <-> Client)
//!
//! Der Server leitet Umschlaege blind weiter und entschluesselt nie.
//!
//! ## Ablauf
//! 1. Jeder Client erzeugt beim Start einen `PmSchluessel`
//! 2. `/pm` wird mit AES-256-GCM und frischer 96-Bit-Nonce verschluesselt
//! 3. Der Umschlag traegt den Schluessel des Absenders im Feld `key`
//! 4. Der Empfaenger merkt sich den Schluessel beim ersten Kontakt (`SchluesselCache`)
//!
//! Der Schluessel reist im Klartext-JSON mit. Wer die Verbindung zum Relay
//! mitlesen kann, kann also auch entschluesseln.

pub mod decrypt;
pub mod encrypt;
pub mod key_cache;

pub use decrypt::{entschluesseln_oder_platzhalter, pm_entschluesseln, PLATZHALTER};
pub use encrypt::pm_verschluesseln;
pub use key_cache::SchluesselCache;

/// Nonce-Laenge fuer AES-GCM in Bytes
pub const NONCE_LAENGE: usize = 12;

/// Laenge des GCM-Auth-Tags in Bytes
pub const TAG_LAENGE: usize = 16;
