//! TLS-Transport
//!
//! Server: statisch bereitgestelltes Zertifikat + Schluessel (PEM).
//! Client: prueft das Server-Zertifikat nicht (selbstsignierte Zertifikate
//! sind der Normalfall).

pub mod client;
pub mod server;

pub use client::unsicherer_connector;
pub use server::{tls_acceptor_aus_dateien, tls_acceptor_aus_pem};

use std::sync::Arc;

/// Krypto-Provider fuer alle TLS-Configs (ring, unabhaengig vom Prozess-Default)
pub(crate) fn provider() -> Arc<rustls::crypto::CryptoProvider> {
    Arc::new(rustls::crypto::ring::default_provider())
}
