//! Send-Queues der Verbindungen
//!
//! Jede Verbindung hat eine begrenzte Queue ausgehender Zeilen. Das Relay
//! haelt das einzige Sender-Ende: wird der `ClientSender` gedroppt, leert der
//! Verbindungs-Task die Queue und schliesst danach die Verbindung.

use tokio::sync::mpsc;
use tresen_core::VerbindungId;

/// Standardgroesse der Send-Queue pro Verbindung
pub const SEND_QUEUE_GROESSE: usize = 256;

/// Handle auf die Send-Queue einer Verbindung
#[derive(Debug)]
pub struct ClientSender {
    pub verbindung: VerbindungId,
    tx: mpsc::Sender<String>,
}

/// Erstellt eine Send-Queue fuer eine neue Verbindung
pub fn sende_queue(
    verbindung: VerbindungId,
    groesse: usize,
) -> (ClientSender, mpsc::Receiver<String>) {
    let (tx, rx) = mpsc::channel(groesse.max(1));
    (ClientSender { verbindung, tx }, rx)
}

impl ClientSender {
    /// Reiht eine Zeile nicht-blockierend ein
    ///
    /// Gibt `false` zurueck wenn die Queue voll oder geschlossen ist. Eine
    /// volle Queue verwirft die Zeile.
    pub fn senden(&self, zeile: impl Into<String>) -> bool {
        match self.tx.try_send(zeile.into()) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                tracing::warn!(verbindung = %self.verbindung, "Send-Queue voll, Zeile verworfen");
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                tracing::debug!(verbindung = %self.verbindung, "Send-Queue geschlossen (Client getrennt)");
                false
            }
        }
    }
}
