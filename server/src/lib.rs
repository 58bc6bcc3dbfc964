//! tresen-server – Bibliotheks-Root
//!
//! Deklariert alle Server-Module und stellt den oeffentlichen Einstiegspunkt
//! fuer Integrationstests bereit.

pub mod cli;
pub mod config;

use anyhow::{Context, Result};
use config::ServerConfig;
use tokio::net::TcpListener;
use tresen_relay::{relay_starten, ChatServer};

/// Haelt den laufenden Server-Zustand zusammen
pub struct Server {
    pub config: ServerConfig,
}

impl Server {
    /// Erstellt einen neuen Server aus der gegebenen Konfiguration
    pub fn neu(config: ServerConfig) -> Self {
        Self { config }
    }

    /// Startet den Chat-Server und laeuft bis zum Shutdown-Signal
    ///
    /// Reihenfolge:
    /// 1. TLS-Material laden
    /// 2. Relay-Task starten
    /// 3. TLS-Listener binden, Startzeile ausgeben
    /// 4. Auf Ctrl-C warten
    pub async fn starten(self) -> Result<()> {
        let (zertifikat, schluessel) = self.config.tls_pfade()?;
        let acceptor = tresen_crypto::tls_acceptor_aus_dateien(&zertifikat, &schluessel)
            .with_context(|| {
                format!(
                    "TLS-Material nicht ladbar ({}, {})",
                    zertifikat.display(),
                    schluessel.display()
                )
            })?;

        let (relay, relay_task) = relay_starten(self.config.relay_config()?);

        let adresse = self.config.bind_adresse();
        let listener = TcpListener::bind(&adresse)
            .await
            .with_context(|| format!("Bind auf {adresse} fehlgeschlagen"))?;
        let port = listener.local_addr()?.port();

        tracing::info!(
            adresse = %adresse,
            max_clients = self.config.server.max_clients,
            handshake_modus = ?self.config.server.handshake_modus,
            "Server startet"
        );
        println!("Secure chat server running on port {port}");

        let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
        let chat_server = ChatServer::neu(acceptor, relay, self.config.verbindungs_konfig());
        let server_task = tokio::spawn(chat_server.starten(listener, shutdown_rx));

        tokio::signal::ctrl_c().await?;
        tracing::info!("Shutdown-Signal empfangen, Server wird beendet");
        let _ = shutdown_tx.send(true);

        server_task.await??;
        // Verbindungs-Tasks halten noch Relay-Handles, daher nicht auf den Relay-Task warten
        relay_task.abort();

        Ok(())
    }
}
