//! Verschluesselte Privatnachricht durch einen echten Relay ueber TLS

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::io::{ReadHalf, WriteHalf};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::watch;
use tokio_rustls::client::TlsStream;
use tokio_rustls::rustls::pki_types::ServerName;
use tokio_util::codec::{FramedRead, FramedWrite};
use tresen_client::{Ausgehend, ClientConfig, ClientSitzung, Eingehend};
use tresen_protocol::{PmEnvelope, ZeilenCodec};
use tresen_relay::{relay_starten, ChatServer, RelayConfig, VerbindungsKonfig};

async fn server_starten() -> (u16, watch::Sender<bool>) {
    let cert = rcgen::generate_simple_self_signed(vec!["localhost".to_string()]).unwrap();
    let acceptor =
        tresen_crypto::tls_acceptor_aus_pem(&cert.cert.pem(), &cert.key_pair.serialize_pem())
            .unwrap();

    let (relay, _task) = relay_starten(RelayConfig::default());
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(
        ChatServer::neu(acceptor, relay, VerbindungsKonfig::default())
            .starten(listener, shutdown_rx),
    );
    (port, shutdown_tx)
}

struct Teilnehmer {
    sitzung: ClientSitzung,
    lesen: FramedRead<ReadHalf<TlsStream<TcpStream>>, ZeilenCodec>,
    schreiben: FramedWrite<WriteHalf<TlsStream<TcpStream>>, ZeilenCodec>,
}

impl Teilnehmer {
    async fn beitreten(port: u16, name: &str, id: &str) -> Self {
        let config = ClientConfig {
            host: "localhost".into(),
            port,
            name: name.into(),
            id: Some(id.into()),
            klartext_pm: false,
        };
        let connector = tresen_crypto::unsicherer_connector().unwrap();
        let tcp = TcpStream::connect(("127.0.0.1", port)).await.unwrap();
        let tls = connector
            .connect(ServerName::try_from("localhost").unwrap(), tcp)
            .await
            .unwrap();
        let (r, w) = tokio::io::split(tls);
        let mut t = Self {
            sitzung: ClientSitzung::neu(&config),
            lesen: FramedRead::new(r, ZeilenCodec::new()),
            schreiben: FramedWrite::new(w, ZeilenCodec::new()),
        };
        let handshake = t.sitzung.handshake_zeile().unwrap();
        t.schreiben.send(handshake).await.unwrap();
        t
    }

    /// Naechste anzuzeigende Zeile, Keepalive wird beantwortet
    async fn anzeige(&mut self) -> String {
        loop {
            let zeile = tokio::time::timeout(Duration::from_secs(5), self.lesen.next())
                .await
                .expect("Timeout beim Lesen")
                .expect("Verbindung geschlossen")
                .unwrap();
            match self.sitzung.eingehend(&zeile) {
                Some(Eingehend::Anzeigen(text)) => return text,
                Some(Eingehend::Antworten(antwort)) => self.schreiben.send(antwort).await.unwrap(),
                None => {}
            }
        }
    }

    async fn tippen(&mut self, eingabe: &str) {
        match self.sitzung.ausgehend(eingabe).unwrap() {
            Ausgehend::Senden(zeile) => self.schreiben.send(zeile).await.unwrap(),
            Ausgehend::Lokal(text) => panic!("nicht gesendet: {text}"),
        }
    }
}

#[tokio::test]
async fn pm_wird_als_umschlag_zugestellt_und_entschluesselt() {
    let (port, _shutdown) = server_starten().await;

    let mut alice = Teilnehmer::beitreten(port, "Alice", "AL01").await;
    assert_eq!(alice.anzeige().await, "Welcome Alice! Your ID is [AL01]");
    let mut bob = Teilnehmer::beitreten(port, "Bob", "BO02").await;
    assert_eq!(bob.anzeige().await, "Welcome Bob! Your ID is [BO02]");
    assert_eq!(alice.anzeige().await, "<announce> [BO02] Bob joined the chat");

    alice.tippen("/pm BO02 geheimes Treffen").await;
    assert_eq!(bob.anzeige().await, "[PRIVATE] From Alice: geheimes Treffen");
    assert_eq!(alice.anzeige().await, "[PRIVATE] To Bob: geheimes Treffen");

    // Unbekanntes Ziel: keine Bestaetigung, nur die Ablehnung
    alice.tippen("/pm ZZ99 hallo").await;
    assert_eq!(alice.anzeige().await, "User ID not found");
    alice.tippen("/ping").await;
    assert_eq!(alice.anzeige().await, "Still connected");
}

#[tokio::test]
async fn server_sieht_keinen_klartext() {
    let (port, _shutdown) = server_starten().await;

    let mut alice = Teilnehmer::beitreten(port, "Alice", "AL01").await;
    let Ausgehend::Senden(zeile) = alice.sitzung.ausgehend("/pm BO02 streng geheim").unwrap() else {
        panic!("PM wurde nicht gesendet");
    };
    let umschlag = PmEnvelope::aus_zeile(&zeile).unwrap();
    assert!(!zeile.contains("streng geheim"));
    assert_eq!(umschlag.sender_name, "Alice");
    assert_eq!(umschlag.from.as_str(), "AL01");
}
