//! Relay-Task
//!
//! Ein einzelner Task besitzt den `ChatDispatcher`. Verbindungs-Tasks
//! schicken ihm `RelayEreignis`se ueber einen mpsc-Kanal, Antworten gehen
//! ueber die Send-Queue der jeweiligen Verbindung zurueck. Dadurch braucht
//! die Registry keine Locks.

use tokio::sync::mpsc;
use tresen_auth::AdminCredential;
use tresen_core::VerbindungId;
use tresen_protocol::HandshakeModus;

use crate::broadcast::ClientSender;
use crate::dispatcher::ChatDispatcher;
use crate::error::{RelayError, RelayResult};

/// Groesse des Ereignis-Kanals zum Relay
const EREIGNIS_QUEUE_GROESSE: usize = 1024;

/// Standard-Limit gleichzeitiger Sessions
pub const STANDARD_MAX_CLIENTS: usize = 256;

/// Konfiguration des Relays
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Maximale Anzahl registrierter Sessions
    pub max_clients: usize,
    pub handshake_modus: HandshakeModus,
    /// PM-Umschlaege an `to` weiterleiten statt als Chat zu behandeln
    pub pm_weiterleiten: bool,
    pub admin: AdminCredential,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            max_clients: STANDARD_MAX_CLIENTS,
            handshake_modus: HandshakeModus::Auto,
            pm_weiterleiten: true,
            admin: AdminCredential::default(),
        }
    }
}

/// Ereignisse von den Verbindungs-Tasks
#[derive(Debug)]
pub enum RelayEreignis {
    /// Neue Verbindung mit ihrer Send-Queue
    Verbunden { sender: ClientSender },
    /// Eine vollstaendige Zeile (ohne Newline)
    Zeile {
        verbindung: VerbindungId,
        zeile: String,
    },
    /// Transport wurde geschlossen
    Getrennt { verbindung: VerbindungId },
}

/// Handle zum Relay (billig klonbar)
#[derive(Debug, Clone)]
pub struct RelayHandle {
    tx: mpsc::Sender<RelayEreignis>,
}

impl RelayHandle {
    async fn senden(&self, ereignis: RelayEreignis) -> RelayResult<()> {
        self.tx
            .send(ereignis)
            .await
            .map_err(|_| RelayError::RelayBeendet)
    }

    pub async fn verbunden(&self, sender: ClientSender) -> RelayResult<()> {
        self.senden(RelayEreignis::Verbunden { sender }).await
    }

    pub async fn zeile(&self, verbindung: VerbindungId, zeile: String) -> RelayResult<()> {
        self.senden(RelayEreignis::Zeile { verbindung, zeile }).await
    }

    pub async fn getrennt(&self, verbindung: VerbindungId) -> RelayResult<()> {
        self.senden(RelayEreignis::Getrennt { verbindung }).await
    }
}

/// Der Relay-Task
pub struct Relay {
    dispatcher: ChatDispatcher,
    rx: mpsc::Receiver<RelayEreignis>,
}

impl Relay {
    /// Erstellt das Relay und das zugehoerige Handle
    pub fn neu(config: RelayConfig) -> (Self, RelayHandle) {
        let (tx, rx) = mpsc::channel(EREIGNIS_QUEUE_GROESSE);
        if config.admin.ist_standard() {
            tracing::warn!(
                "Admin-Passwort ist der eingebaute Standard, bitte admin.passwort_hash setzen"
            );
        }
        let relay = Self {
            dispatcher: ChatDispatcher::neu(config),
            rx,
        };
        (relay, RelayHandle { tx })
    }

    /// Verarbeitet Ereignisse bis alle Handles gedroppt sind
    pub async fn laufen(mut self) {
        tracing::debug!("Relay gestartet");
        while let Some(ereignis) = self.rx.recv().await {
            match ereignis {
                RelayEreignis::Verbunden { sender } => self.dispatcher.verbunden(sender),
                RelayEreignis::Zeile { verbindung, zeile } => {
                    self.dispatcher.zeile(verbindung, &zeile)
                }
                RelayEreignis::Getrennt { verbindung } => self.dispatcher.getrennt(verbindung),
            }
        }
        tracing::debug!("Relay beendet");
    }
}

/// Startet das Relay als eigenen Task
pub fn relay_starten(config: RelayConfig) -> (RelayHandle, tokio::task::JoinHandle<()>) {
    let (relay, handle) = Relay::neu(config);
    (handle, tokio::spawn(relay.laufen()))
}
