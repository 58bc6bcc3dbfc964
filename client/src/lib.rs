//! tresen-client – Terminal-Client fuer den Tresen-Chat
//!
//! - `config` – Verbindungsdaten aus Umgebung und stdin
//! - `sitzung` – Protokoll-Logik ohne IO (Keepalive, PM-Umschlaege)
//! - `verbindung` – TLS-Verbindung und Ein-/Ausgabe-Schleife

pub mod config;
pub mod sitzung;
pub mod verbindung;

pub use config::ClientConfig;
pub use sitzung::{Ausgehend, ClientSitzung, Eingehend};
pub use verbindung::{chat_starten, Ende};
