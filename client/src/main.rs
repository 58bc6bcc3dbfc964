//! Tresen Client – Einstiegspunkt
//!
//! Exit-Code 0 wenn die Verbindung sauber endet, 1 bei Transportfehlern.

use tokio::io::BufReader;
use tresen_client::config::UmgebungsWerte;
use tresen_client::{chat_starten, ClientConfig};
use tresen_observability::{logging_initialisieren, LogAusgabe};

#[tokio::main]
async fn main() {
    logging_initialisieren("warn", "text", LogAusgabe::Stderr);

    let werte = UmgebungsWerte::aus_prozess();
    let mut stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = tokio::io::stdout();

    let config = match ClientConfig::vervollstaendigen(werte, &mut stdin, &mut stdout).await {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {e:#}");
            std::process::exit(1);
        }
    };
    match chat_starten(config, stdin).await {
        Ok(ende) => {
            tracing::debug!(?ende, "Sitzung beendet");
            std::process::exit(0);
        }
        Err(e) => {
            eprintln!("Connection error: {e:#}");
            std::process::exit(1);
        }
    }
}
