//! Tresen Server – Einstiegspunkt
//!
//! `tresen-server [PORT]` oder `tresen-server hash-password`
//!
//! Laedt die Konfiguration, initialisiert das Logging und startet den Server.

use std::io::BufRead;

use anyhow::{Context, Result};
use tresen_auth::passwort_hashen;
use tresen_observability::{logging_initialisieren, LogAusgabe};
use tresen_server::cli::{aufruf_parsen, Aufruf};
use tresen_server::{config::ServerConfig, Server};

#[tokio::main]
async fn main() -> Result<()> {
    let port = match aufruf_parsen(std::env::args().skip(1))? {
        Aufruf::PasswortHashen => return passwort_hash_ausgeben(),
        Aufruf::Starten { port } => port,
    };

    // Konfigurationsdatei-Pfad aus Umgebungsvariable oder Standard
    let config_pfad = std::env::var("TRESEN_CONFIG").unwrap_or_else(|_| "tresen.toml".into());

    let geladen = ServerConfig::laden(&config_pfad)?;
    let datei_gefunden = geladen.is_some();
    let mut config = geladen.unwrap_or_default();

    // Port als erstes Argument hat Vorrang
    if let Some(port) = port {
        config.netzwerk.port = port;
    }
    config.validieren()?;

    logging_initialisieren(&config.logging.level, &config.logging.format, LogAusgabe::Stdout);

    if !datei_gefunden {
        tracing::warn!(
            pfad = %config_pfad,
            "Konfigurationsdatei nicht gefunden, verwende Standardwerte"
        );
    }

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        config = %config_pfad,
        "Tresen Server wird initialisiert"
    );

    let server = Server::neu(config);
    server.starten().await?;

    Ok(())
}

/// Liest ein Passwort von stdin und gibt den PHC-String fuer `admin.passwort_hash` aus
fn passwort_hash_ausgeben() -> Result<()> {
    let mut passwort = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut passwort)
        .context("Passwort nicht lesbar")?;
    let passwort = passwort.trim_end_matches(['\r', '\n']);
    if passwort.is_empty() {
        anyhow::bail!("Leeres Passwort");
    }
    println!("{}", passwort_hashen(passwort)?);
    Ok(())
}
