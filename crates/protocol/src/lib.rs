//! tresen-protocol – Wire-Protokoll-Definitionen
//!
//! Alles was zwischen Client und Server ueber die Leitung geht:
//! - `wire`: Zeilen-Framing (`ZeilenCodec`) ueber einem Byte-Stream
//! - `zeilen`: Reservierte Tokens und die Texte der Server-Antworten
//! - `handshake`: Erste Zeile einer Verbindung (Name, optionale ID/Schluessel)
//! - `envelope`: Verschluesselter Privatnachrichten-Umschlag (JSON, eine Zeile)

pub mod envelope;
pub mod error;
pub mod handshake;
pub mod wire;
pub mod zeilen;

pub use envelope::{PmEnvelope, PmPayload, PmQuittung};
pub use error::{ProtokollFehler, ProtokollResult};
pub use handshake::{HandshakeAnfrage, HandshakeModus};
pub use wire::ZeilenCodec;
