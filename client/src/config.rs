//! Client-Konfiguration
//!
//! Umgebungsvariablen:
//! - `CHAT_SERVER_HOST`, `CHAT_SERVER_PORT`, `CHAT_USER_NAME` – fehlende Werte werden abgefragt
//! - `CHAT_USER_ID` – optionale Wunsch-ID
//! - `CHAT_PLAIN_PM=1` – `/pm` unverschluesselt ueber den Server schicken

use anyhow::{Context, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

/// Standard-Host wenn bei der Abfrage nichts eingegeben wird
pub const STANDARD_HOST: &str = "localhost";

/// Standard-Port des Servers
pub const STANDARD_PORT: u16 = 1599;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub host: String,
    pub port: u16,
    pub name: String,
    pub id: Option<String>,
    pub klartext_pm: bool,
}

/// Rohe Werte aus der Umgebung, noch ohne Abfrage
#[derive(Debug, Clone, Default)]
pub struct UmgebungsWerte {
    pub host: Option<String>,
    pub port: Option<String>,
    pub name: Option<String>,
    pub id: Option<String>,
    pub klartext_pm: bool,
}

impl UmgebungsWerte {
    /// Liest die Werte ueber `lesen` (in `main`: `std::env::var`)
    pub fn aus<F>(lesen: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let nicht_leer = |name: &str| lesen(name).filter(|w| !w.trim().is_empty());
        Self {
            host: nicht_leer("CHAT_SERVER_HOST"),
            port: nicht_leer("CHAT_SERVER_PORT"),
            name: nicht_leer("CHAT_USER_NAME"),
            id: nicht_leer("CHAT_USER_ID"),
            klartext_pm: lesen("CHAT_PLAIN_PM").as_deref() == Some("1"),
        }
    }

    pub fn aus_prozess() -> Self {
        Self::aus(|name| std::env::var(name).ok())
    }
}

/// Fragt eine Zeile ab, leere Eingabe ergibt `standard`
async fn abfragen<R, W>(
    eingabe: &mut R,
    ausgabe: &mut W,
    frage: &str,
    standard: &str,
) -> Result<String>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    ausgabe.write_all(frage.as_bytes()).await?;
    ausgabe.flush().await?;
    let mut zeile = String::new();
    if eingabe.read_line(&mut zeile).await? == 0 {
        anyhow::bail!("Eingabe beendet");
    }
    let zeile = zeile.trim();
    Ok(if zeile.is_empty() { standard } else { zeile }.to_string())
}

fn port_parsen(text: &str) -> Result<u16> {
    text.trim()
        .parse()
        .with_context(|| format!("Ungueltiger Port '{text}'"))
}

impl ClientConfig {
    /// Vervollstaendigt die Umgebungswerte per Abfrage
    pub async fn vervollstaendigen<R, W>(
        werte: UmgebungsWerte,
        eingabe: &mut R,
        ausgabe: &mut W,
    ) -> Result<Self>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let host = match werte.host {
            Some(h) => h,
            None => {
                abfragen(eingabe, ausgabe, "Server host [localhost]: ", STANDARD_HOST).await?
            }
        };
        let port = match werte.port {
            Some(p) => port_parsen(&p)?,
            None => {
                let standard = STANDARD_PORT.to_string();
                let eingegeben =
                    abfragen(eingabe, ausgabe, "Server port [1599]: ", &standard).await?;
                port_parsen(&eingegeben)?
            }
        };
        let name = match werte.name {
            Some(n) => n,
            None => loop {
                let n = abfragen(eingabe, ausgabe, "Your name: ", "").await?;
                if !n.is_empty() {
                    break n;
                }
            },
        };

        Ok(Self {
            host: host.trim().to_string(),
            port,
            name: name.trim().to_string(),
            id: werte.id.map(|id| id.trim().to_string()),
            klartext_pm: werte.klartext_pm,
        })
    }
}
