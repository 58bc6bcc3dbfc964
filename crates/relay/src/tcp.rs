//! TLS-Listener – akzeptiert Verbindungen
//!
//! Der `ChatServer` nimmt TCP-Verbindungen an und startet fuer jede einen
//! eigenen tokio-Task: erst TLS-Handshake, dann `verbindung_behandeln`.
//! Accept- und TLS-Fehler werden geloggt, der Server laeuft weiter.

use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio_rustls::TlsAcceptor;

use crate::connection::{verbindung_behandeln, VerbindungsKonfig};
use crate::relay::RelayHandle;

/// TLS-Chat-Server
pub struct ChatServer {
    acceptor: TlsAcceptor,
    relay: RelayHandle,
    konfig: Arc<VerbindungsKonfig>,
}

impl ChatServer {
    pub fn neu(acceptor: TlsAcceptor, relay: RelayHandle, konfig: VerbindungsKonfig) -> Self {
        Self {
            acceptor,
            relay,
            konfig: Arc::new(konfig),
        }
    }

    /// Akzeptiert Verbindungen auf `listener`
    ///
    /// Laeuft bis `shutdown_rx` ein `true`-Signal empfaengt.
    pub async fn starten(
        self,
        listener: TcpListener,
        mut shutdown_rx: watch::Receiver<bool>,
    ) -> std::io::Result<()> {
        let lokale_addr = listener.local_addr()?;
        tracing::info!(adresse = %lokale_addr, "TLS-Chat-Server gestartet");

        loop {
            tokio::select! {
                // Neue eingehende Verbindung
                result = listener.accept() => {
                    match result {
                        Ok((stream, peer_addr)) => {
                            tracing::debug!(peer = %peer_addr, "TCP-Verbindung akzeptiert");

                            let acceptor = self.acceptor.clone();
                            let relay = self.relay.clone();
                            let konfig = Arc::clone(&self.konfig);

                            tokio::spawn(async move {
                                match acceptor.accept(stream).await {
                                    Ok(tls_stream) => {
                                        if let Err(e) =
                                            verbindung_behandeln(tls_stream, peer_addr, relay, &konfig).await
                                        {
                                            tracing::warn!(peer = %peer_addr, fehler = %e, "Verbindung abgebrochen");
                                        }
                                    }
                                    Err(e) => {
                                        tracing::warn!(peer = %peer_addr, fehler = %e, "TLS-Handshake fehlgeschlagen");
                                    }
                                }
                            });
                        }
                        Err(e) => {
                            tracing::error!(fehler = %e, "TCP-Accept-Fehler");
                            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
                        }
                    }
                }

                // Shutdown-Signal
                Ok(()) = shutdown_rx.changed() => {
                    if *shutdown_rx.borrow() {
                        tracing::info!("Chat-Server: Shutdown-Signal empfangen");
                        break;
                    }
                }
            }
        }

        tracing::info!("TLS-Chat-Server gestoppt");
        Ok(())
    }
}
