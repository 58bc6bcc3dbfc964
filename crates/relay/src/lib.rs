//! tresen-relay – TLS-Chat-Relay
//!
//! Nimmt TLS-Verbindungen an, registriert Sessions per Handshake und
//! verteilt Chatzeilen, Privatnachrichten und Ankuendigungen.
//!
//! ## Architektur
//!
//! ```text
//! TLS Listener (ChatServer)
//!     |
//!     v
//! verbindung_behandeln (pro Verbindung ein Task)
//!     |  ZeilenCodec, Send-Queue, Keepalive
//!     |
//!     v  RelayEreignis (mpsc)
//! Relay (ein Task)
//!     |
//!     v
//! ChatDispatcher
//!     +-- Handshake      (Name/JSON, ID-Vergabe, Ban-Pruefung)
//!     +-- Befehle        (/help /ping /users /pm /admin /ban /exit)
//!     +-- PM-Umschlaege  (Weiterleitung nach `to`)
//!     +-- Chat           (an alle ausser Absender)
//!
//! SessionRegistry – registrierte Sessions in Beitrittsreihenfolge
//! BanListe        – gebannte IDs (tresen-auth)
//! ```

pub mod broadcast;
pub mod commands;
pub mod connection;
pub mod dispatcher;
pub mod error;
pub mod ident;
pub mod registry;
pub mod relay;
pub mod session;
pub mod tcp;

// Bequeme Re-Exporte
pub use broadcast::ClientSender;
pub use connection::{verbindung_behandeln, VerbindungsKonfig};
pub use dispatcher::ChatDispatcher;
pub use error::{RelayError, RelayResult};
pub use registry::SessionRegistry;
pub use relay::{relay_starten, Relay, RelayConfig, RelayEreignis, RelayHandle};
pub use tcp::ChatServer;
