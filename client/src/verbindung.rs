//! TLS-Verbindung zum Server und die Ein-/Ausgabe-Schleife

use anyhow::{Context, Result};
use futures_util::{SinkExt, StreamExt};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio_rustls::rustls::pki_types::ServerName;
use tokio_util::codec::{FramedRead, FramedWrite};
use tresen_crypto::unsicherer_connector;
use tresen_protocol::wire::EMPFANG_MAX_ZEILENLAENGE;
use tresen_protocol::ZeilenCodec;

use crate::config::ClientConfig;
use crate::sitzung::{Ausgehend, ClientSitzung, Eingehend};

/// Wie eine Chat-Sitzung endete
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ende {
    /// Server hat die Verbindung geschlossen
    Getrennt,
    /// Eingabe (stdin) ist zu Ende
    EingabeBeendet,
}

/// Verbindet sich mit dem Server und chattet ueber `eingabe` und stdout
///
/// `eingabe` ist derselbe Reader der schon fuer die Abfrage der
/// Verbindungsdaten benutzt wurde, damit keine gepufferten Zeilen verloren gehen.
pub async fn chat_starten<E>(config: ClientConfig, eingabe: E) -> Result<Ende>
where
    E: AsyncBufRead + Unpin,
{
    let connector = unsicherer_connector()?;
    let adresse = format!("{}:{}", config.host, config.port);

    let tcp = TcpStream::connect(&adresse)
        .await
        .with_context(|| format!("Verbindung zu {adresse} fehlgeschlagen"))?;
    let server_name = ServerName::try_from(config.host.clone())
        .with_context(|| format!("Ungueltiger Hostname: {}", config.host))?;
    let tls = connector
        .connect(server_name, tcp)
        .await
        .context("TLS-Handshake fehlgeschlagen")?;

    tracing::info!(server = %adresse, "TLS-Verbindung aufgebaut");

    let sitzung = ClientSitzung::neu(&config);
    chat_schleife(tls, eingabe, tokio::io::stdout(), sitzung).await
}

/// Kern der Client-Schleife, unabhaengig von TLS und Terminal
pub async fn chat_schleife<S, E, A>(
    stream: S,
    eingabe: E,
    mut ausgabe: A,
    mut sitzung: ClientSitzung,
) -> Result<Ende>
where
    S: AsyncRead + AsyncWrite + Unpin,
    E: AsyncBufRead + Unpin,
    A: AsyncWrite + Unpin,
{
    let (lesen, schreiben) = tokio::io::split(stream);
    let mut vom_server = FramedRead::new(
        lesen,
        ZeilenCodec::with_max_laenge(EMPFANG_MAX_ZEILENLAENGE),
    );
    let mut zum_server = FramedWrite::new(schreiben, ZeilenCodec::new());
    let mut eingabe = eingabe.lines();

    anzeigen(&mut ausgabe, "Connected to server").await?;
    zum_server.send(sitzung.handshake_zeile()?).await?;

    loop {
        tokio::select! {
            zeile = vom_server.next() => {
                let Some(zeile) = zeile else {
                    anzeigen(&mut ausgabe, "Disconnected").await?;
                    return Ok(Ende::Getrennt);
                };
                let zeile = zeile.context("Verbindungsfehler")?;
                match sitzung.eingehend(&zeile) {
                    Some(Eingehend::Antworten(antwort)) => zum_server.send(antwort).await?,
                    Some(Eingehend::Anzeigen(text)) => anzeigen(&mut ausgabe, &text).await?,
                    None => {}
                }
            }

            zeile = eingabe.next_line() => {
                let Some(zeile) = zeile? else {
                    tracing::debug!("Eingabe beendet, schliesse Verbindung");
                    SinkExt::<&str>::close(&mut zum_server).await?;
                    return Ok(Ende::EingabeBeendet);
                };
                if zeile.trim().is_empty() {
                    continue;
                }
                match sitzung.ausgehend(&zeile)? {
                    Ausgehend::Senden(raus) => zum_server.send(raus).await?,
                    Ausgehend::Lokal(text) => anzeigen(&mut ausgabe, text).await?,
                }
            }
        }
    }
}

async fn anzeigen<A: AsyncWrite + Unpin>(ausgabe: &mut A, text: &str) -> Result<()> {
    ausgabe.write_all(text.as_bytes()).await?;
    ausgabe.write_all(b"\n").await?;
    ausgabe.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{duplex, BufReader};
    use tresen_protocol::handshake::{parse_handshake, HandshakeModus};
    use tresen_protocol::wire::DEFAULT_MAX_ZEILENLAENGE;

    fn sitzung() -> ClientSitzung {
        ClientSitzung::neu(&ClientConfig {
            host: "localhost".into(),
            port: 1599,
            name: "Alice".into(),
            id: None,
            klartext_pm: false,
        })
    }

    #[tokio::test]
    async fn handshake_pong_und_anzeige() {
        let (client, server) = duplex(4096);
        let (eingabe_client, mut eingabe_nutzer) = duplex(1024);
        let (ausgabe_client, ausgabe_leser) = duplex(4096);

        let task = tokio::spawn(chat_schleife(
            client,
            BufReader::new(eingabe_client),
            ausgabe_client,
            sitzung(),
        ));

        let (lesen, schreiben) = tokio::io::split(server);
        let mut vom_client = FramedRead::new(lesen, ZeilenCodec::new());
        let mut zum_client = FramedWrite::new(schreiben, ZeilenCodec::new());
        let mut angezeigt = BufReader::new(ausgabe_leser).lines();

        let handshake = vom_client.next().await.unwrap().unwrap();
        let anfrage = parse_handshake(&handshake, HandshakeModus::Json).unwrap();
        assert_eq!(anfrage.name, "Alice");
        assert!(anfrage.key.is_some());

        zum_client.send("Welcome Alice! Your ID is [AL01]").await.unwrap();
        zum_client.send("__PING__").await.unwrap();
        assert_eq!(vom_client.next().await.unwrap().unwrap(), "__PONG__");

        assert_eq!(angezeigt.next_line().await.unwrap().unwrap(), "Connected to server");
        assert_eq!(
            angezeigt.next_line().await.unwrap().unwrap(),
            "Welcome Alice! Your ID is [AL01]"
        );

        eingabe_nutzer.write_all(b"hallo zusammen\n").await.unwrap();
        assert_eq!(vom_client.next().await.unwrap().unwrap(), "hallo zusammen");

        // Zu lange Eingabe bleibt lokal, die Sitzung laeuft weiter
        let lang = "z".repeat(DEFAULT_MAX_ZEILENLAENGE + 10);
        eingabe_nutzer.write_all(format!("{lang}\n").as_bytes()).await.unwrap();
        assert_eq!(angezeigt.next_line().await.unwrap().unwrap(), "Message too long");

        // Server-Zeilen duerfen laenger sein als das Eingangslimit
        let breit = format!("<Bob> {}", "x".repeat(DEFAULT_MAX_ZEILENLAENGE));
        zum_client.send(breit.as_str()).await.unwrap();
        assert_eq!(angezeigt.next_line().await.unwrap().unwrap(), breit);

        drop(zum_client);
        drop(vom_client);
        assert_eq!(angezeigt.next_line().await.unwrap().unwrap(), "Disconnected");
        assert_eq!(task.await.unwrap().unwrap(), Ende::Getrennt);
    }

    #[tokio::test]
    async fn ende_der_eingabe_beendet_sitzung() {
        let (client, _server) = duplex(4096);
        let ausgabe = Vec::new();
        let ende = chat_schleife(client, &b""[..], ausgabe, sitzung()).await.unwrap();
        assert_eq!(ende, Ende::EingabeBeendet);
    }
}
