//! Verbindungs-Task – eine TLS-Verbindung von Anfang bis Ende
//!
//! Liest Zeilen via `ZeilenCodec` und reicht sie ans Relay weiter, schreibt
//! die Send-Queue der Verbindung zurueck und schickt periodisch `__PING__`.
//!
//! ## Keepalive
//! - Server sendet alle `keepalive` einen `__PING__`
//! - Ob ein `__PONG__` zurueckkommt wird nicht geprueft; halboffene
//!   Verbindungen fallen erst auf wenn ein Schreiben scheitert
//!
//! ## Ende der Verbindung
//! - Client schliesst, Lese- oder Schreibfehler, zu lange Zeile
//! - Das Relay droppt die Send-Queue (Ban, `/exit`, abgelehnter Handshake).
//!   Bereits eingereihte Zeilen werden vorher noch geschrieben.

use std::net::SocketAddr;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::time::MissedTickBehavior;
use tokio_util::codec::{FramedRead, FramedWrite};
use tresen_core::VerbindungId;
use tresen_protocol::wire::DEFAULT_MAX_ZEILENLAENGE;
use tresen_protocol::{zeilen, ZeilenCodec};

use crate::broadcast::{sende_queue, SEND_QUEUE_GROESSE};
use crate::error::RelayResult;
use crate::relay::RelayHandle;

/// Standard-Intervall fuer `__PING__`
pub const STANDARD_KEEPALIVE: Duration = Duration::from_secs(30);

/// Einstellungen pro Verbindung
#[derive(Debug, Clone)]
pub struct VerbindungsKonfig {
    /// Maximale Laenge einer eingehenden Zeile in Bytes
    pub zeilenlimit_bytes: usize,
    pub send_queue_groesse: usize,
    pub keepalive: Duration,
}

impl Default for VerbindungsKonfig {
    fn default() -> Self {
        Self {
            zeilenlimit_bytes: DEFAULT_MAX_ZEILENLAENGE,
            send_queue_groesse: SEND_QUEUE_GROESSE,
            keepalive: STANDARD_KEEPALIVE,
        }
    }
}

/// Behandelt eine (bereits TLS-gesicherte) Verbindung bis zu ihrem Ende
///
/// Meldet die Verbindung beim Relay an und am Ende in jedem Fall wieder ab.
pub async fn verbindung_behandeln<S>(
    stream: S,
    peer_addr: SocketAddr,
    relay: RelayHandle,
    konfig: &VerbindungsKonfig,
) -> RelayResult<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let verbindung = VerbindungId::new();
    let (sender, mut sende_rx) = sende_queue(verbindung, konfig.send_queue_groesse);
    relay.verbunden(sender).await?;

    tracing::info!(peer = %peer_addr, verbindung = %verbindung, "Neue Verbindung");

    let (lesen, schreiben) = tokio::io::split(stream);
    let mut eingang = FramedRead::new(
        lesen,
        ZeilenCodec::with_max_laenge(konfig.zeilenlimit_bytes),
    );
    let mut ausgang = FramedWrite::new(schreiben, ZeilenCodec::new());

    let start = tokio::time::Instant::now() + konfig.keepalive;
    let mut keepalive = tokio::time::interval_at(start, konfig.keepalive);
    keepalive.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let ergebnis = loop {
        tokio::select! {
            // Eingehende Zeile vom Client
            zeile = eingang.next() => {
                match zeile {
                    Some(Ok(zeile)) => {
                        tracing::trace!(peer = %peer_addr, laenge = zeile.len(), "Zeile empfangen");
                        if let Err(e) = relay.zeile(verbindung, zeile).await {
                            break Err(e);
                        }
                    }
                    Some(Err(e)) => {
                        tracing::warn!(peer = %peer_addr, fehler = %e, "Lesefehler");
                        break Ok(());
                    }
                    None => {
                        tracing::info!(peer = %peer_addr, "Verbindung vom Client getrennt");
                        break Ok(());
                    }
                }
            }

            // Ausgehende Zeile aus der Send-Queue
            ausgehend = sende_rx.recv() => {
                match ausgehend {
                    Some(zeile) => {
                        if let Err(e) = ausgang.send(zeile).await {
                            tracing::warn!(peer = %peer_addr, fehler = %e, "Senden fehlgeschlagen");
                            break Ok(());
                        }
                    }
                    None => {
                        tracing::debug!(peer = %peer_addr, "Relay hat die Verbindung geschlossen");
                        break Ok(());
                    }
                }
            }

            // Keepalive-Ping
            _ = keepalive.tick() => {
                tracing::trace!(peer = %peer_addr, "Keepalive-Ping");
                if let Err(e) = ausgang.send(zeilen::PING).await {
                    tracing::warn!(peer = %peer_addr, fehler = %e, "Ping-Senden fehlgeschlagen");
                    break Ok(());
                }
            }
        }
    };

    // TLS close_notify senden, Fehler sind hier egal
    let _ = SinkExt::<&str>::close(&mut ausgang).await;
    let _ = relay.getrennt(verbindung).await;

    tracing::info!(peer = %peer_addr, verbindung = %verbindung, "Verbindungs-Task beendet");
    ergebnis
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relay::{relay_starten, RelayConfig};
    use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

    fn peer() -> SocketAddr {
        "127.0.0.1:40000".parse().unwrap()
    }

    #[tokio::test]
    async fn handshake_und_exit_ueber_duplex() {
        let (relay, _task) = relay_starten(RelayConfig::default());
        let (server_seite, client_seite) = tokio::io::duplex(4096);

        let task = tokio::spawn(async move {
            verbindung_behandeln(server_seite, peer(), relay, &VerbindungsKonfig::default()).await
        });

        let (lesen, mut schreiben) = tokio::io::split(client_seite);
        let mut zeilen = BufReader::new(lesen).lines();

        schreiben.write_all(b"__PONG__\nAlice\r\n").await.unwrap();
        let willkommen = zeilen.next_line().await.unwrap().unwrap();
        assert!(willkommen.starts_with("Welcome Alice! Your ID is ["));

        schreiben.write_all(b"/exit\n").await.unwrap();
        assert_eq!(
            zeilen.next_line().await.unwrap().as_deref(),
            Some("You have left the chat")
        );
        assert_eq!(zeilen.next_line().await.unwrap(), None);
        assert!(task.await.unwrap().is_ok());
    }

    #[tokio::test]
    async fn keepalive_sendet_ping() {
        let (relay, _task) = relay_starten(RelayConfig::default());
        let (server_seite, client_seite) = tokio::io::duplex(4096);
        let konfig = VerbindungsKonfig {
            keepalive: Duration::from_millis(20),
            ..VerbindungsKonfig::default()
        };

        tokio::spawn(async move {
            let _ = verbindung_behandeln(server_seite, peer(), relay, &konfig).await;
        });

        let mut zeilen = BufReader::new(client_seite).lines();
        let zeile = tokio::time::timeout(Duration::from_secs(2), zeilen.next_line())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(zeile.as_deref(), Some("__PING__"));
    }

    #[tokio::test]
    async fn zeile_am_limit_wird_mit_praefix_verteilt() {
        let (relay, _task) = relay_starten(RelayConfig::default());

        let mut clients = Vec::new();
        for handshake in [r#"{"name":"Alice","id":"AL01"}"#, r#"{"name":"Bob","id":"BO02"}"#] {
            let (server_seite, client_seite) = tokio::io::duplex(64 * 1024);
            let relay = relay.clone();
            tokio::spawn(async move {
                let konfig = VerbindungsKonfig::default();
                let _ = verbindung_behandeln(server_seite, peer(), relay, &konfig).await;
            });
            let (lesen, mut schreiben) = tokio::io::split(client_seite);
            let mut zeilen = BufReader::new(lesen).lines();
            schreiben
                .write_all(format!("{handshake}\n").as_bytes())
                .await
                .unwrap();
            let willkommen = zeilen.next_line().await.unwrap().unwrap();
            assert!(willkommen.starts_with("Welcome"));
            clients.push((zeilen, schreiben));
        }
        let (mut bob_zeilen, _bob_schreiben) = clients.pop().unwrap();
        let (mut alice_zeilen, mut alice_schreiben) = clients.pop().unwrap();
        assert_eq!(
            alice_zeilen.next_line().await.unwrap().as_deref(),
            Some("<announce> [BO02] Bob joined the chat")
        );

        let text = "x".repeat(DEFAULT_MAX_ZEILENLAENGE - 2);
        alice_schreiben
            .write_all(format!("{text}\n").as_bytes())
            .await
            .unwrap();

        let empfangen = bob_zeilen.next_line().await.unwrap().unwrap();
        assert_eq!(empfangen, format!("<Alice> {text}"));
        assert!(empfangen.len() > DEFAULT_MAX_ZEILENLAENGE);

        // Bob ist noch da
        alice_schreiben.write_all(b"/users\n").await.unwrap();
        assert_eq!(
            alice_zeilen.next_line().await.unwrap().as_deref(),
            Some("Online users (2):")
        );
    }

    #[tokio::test]
    async fn zu_lange_zeile_beendet_verbindung() {
        let (relay, _task) = relay_starten(RelayConfig::default());
        let (server_seite, client_seite) = tokio::io::duplex(4096);
        let konfig = VerbindungsKonfig {
            zeilenlimit_bytes: 16,
            ..VerbindungsKonfig::default()
        };

        let task = tokio::spawn(async move {
            verbindung_behandeln(server_seite, peer(), relay, &konfig).await
        });

        let (lesen, mut schreiben) = tokio::io::split(client_seite);
        schreiben
            .write_all(format!("{}\n", "x".repeat(64)).as_bytes())
            .await
            .unwrap();

        let mut zeilen = BufReader::new(lesen).lines();
        assert_eq!(zeilen.next_line().await.unwrap(), None);
        assert!(task.await.unwrap().is_ok());
    }
}
