//! Server-Konfiguration
//!
//! Wird beim Start aus einer TOML-Datei geladen. Alle Felder haben
//! sinnvolle Standardwerte, sodass der Server ohne Konfigurationsdatei
//! lauffaehig ist.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tresen_auth::AdminCredential;
use tresen_observability::logging::{log_format_gueltig, log_level_gueltig};
use tresen_protocol::HandshakeModus;
use tresen_relay::{RelayConfig, VerbindungsKonfig};

/// Standard-Port des Chat-Servers
pub const STANDARD_PORT: u16 = 1599;

/// Dateinamen des TLS-Materials neben der ausfuehrbaren Datei
const STANDARD_ZERTIFIKAT: &str = "server.crt";
const STANDARD_SCHLUESSEL: &str = "server.key";

/// Vollstaendige Server-Konfiguration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Allgemeine Server-Einstellungen
    pub server: ServerEinstellungen,
    /// Netzwerk-Einstellungen
    pub netzwerk: NetzwerkEinstellungen,
    /// Admin-Zugang
    pub admin: AdminEinstellungen,
    /// Logging-Einstellungen
    pub logging: LoggingEinstellungen,
}

/// Allgemeine Server-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerEinstellungen {
    /// Maximale Anzahl gleichzeitiger Sessions
    pub max_clients: usize,
    /// Form der ersten Zeile: "auto", "name" oder "json"
    pub handshake_modus: HandshakeModus,
    /// PM-Umschlaege weiterleiten (sonst gelten sie als Chat)
    pub verschluesselte_pm: bool,
}

impl Default for ServerEinstellungen {
    fn default() -> Self {
        Self {
            max_clients: tresen_relay::relay::STANDARD_MAX_CLIENTS,
            handshake_modus: HandshakeModus::Auto,
            verschluesselte_pm: true,
        }
    }
}

/// Netzwerk-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetzwerkEinstellungen {
    /// Bind-Adresse fuer den TLS-Listener
    pub bind_adresse: String,
    /// Port fuer den TLS-Listener (Kommandozeile hat Vorrang)
    pub port: u16,
    /// TLS-Zertifikat-Pfad (leer = `server.crt` neben der ausfuehrbaren Datei)
    pub tls_zertifikat: Option<String>,
    /// TLS-Schluessel-Pfad (leer = `server.key` neben der ausfuehrbaren Datei)
    pub tls_schluessel: Option<String>,
    /// Maximale Laenge einer eingehenden Zeile
    pub zeilenlimit_bytes: usize,
    /// Ausgehende Zeilen pro Verbindung bevor verworfen wird
    pub send_queue_groesse: usize,
    /// Intervall fuer `__PING__` in Sekunden
    pub keepalive_sek: u64,
}

impl Default for NetzwerkEinstellungen {
    fn default() -> Self {
        let verbindung = VerbindungsKonfig::default();
        Self {
            bind_adresse: "0.0.0.0".into(),
            port: STANDARD_PORT,
            tls_zertifikat: None,
            tls_schluessel: None,
            zeilenlimit_bytes: verbindung.zeilenlimit_bytes,
            send_queue_groesse: verbindung.send_queue_groesse,
            keepalive_sek: verbindung.keepalive.as_secs(),
        }
    }
}

/// Admin-Zugang
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminEinstellungen {
    /// SHA-256-Hex oder Argon2id-PHC-String (leer = eingebautes Standard-Passwort)
    pub passwort_hash: Option<String>,
}

/// Logging-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingEinstellungen {
    /// Log-Level: "trace", "debug", "info", "warn", "error"
    pub level: String,
    /// Format: "json" oder "text"
    pub format: String,
}

impl Default for LoggingEinstellungen {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "text".into(),
        }
    }
}

impl ServerConfig {
    /// Laedt die Konfiguration aus einer TOML-Datei.
    /// Gibt `None` zurueck wenn die Datei nicht existiert.
    pub fn laden(pfad: &str) -> anyhow::Result<Option<Self>> {
        match std::fs::read_to_string(pfad) {
            Ok(inhalt) => {
                let config: Self = toml::from_str(&inhalt)
                    .map_err(|e| anyhow::anyhow!("Konfigurationsfehler in '{pfad}': {e}"))?;
                Ok(Some(config))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(anyhow::anyhow!(
                "Konfigurationsdatei '{pfad}' nicht lesbar: {e}"
            )),
        }
    }

    /// Prueft Werte die sich nicht per Typ ausdruecken lassen
    pub fn validieren(&self) -> anyhow::Result<()> {
        if self.server.max_clients == 0 {
            anyhow::bail!("server.max_clients muss groesser als 0 sein");
        }
        if self.netzwerk.zeilenlimit_bytes == 0 || self.netzwerk.send_queue_groesse == 0 {
            anyhow::bail!(
                "netzwerk.zeilenlimit_bytes und netzwerk.send_queue_groesse muessen groesser als 0 sein"
            );
        }
        if self.netzwerk.keepalive_sek == 0 {
            anyhow::bail!("netzwerk.keepalive_sek muss groesser als 0 sein");
        }
        if !log_level_gueltig(&self.logging.level) {
            anyhow::bail!("Unbekannter Log-Level '{}'", self.logging.level);
        }
        if !log_format_gueltig(&self.logging.format) {
            anyhow::bail!("Unbekanntes Log-Format '{}'", self.logging.format);
        }
        Ok(())
    }

    /// Gibt die vollstaendige Bind-Adresse fuer den Listener zurueck
    pub fn bind_adresse(&self) -> String {
        format!("{}:{}", self.netzwerk.bind_adresse, self.netzwerk.port)
    }

    /// Pfade zu Zertifikat und Schluessel
    ///
    /// Ohne Konfiguration liegen beide neben der ausfuehrbaren Datei.
    pub fn tls_pfade(&self) -> anyhow::Result<(PathBuf, PathBuf)> {
        let exe_verzeichnis = || -> anyhow::Result<PathBuf> {
            let exe = std::env::current_exe()?;
            Ok(exe
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from(".")))
        };

        let zertifikat = match &self.netzwerk.tls_zertifikat {
            Some(p) => PathBuf::from(p),
            None => exe_verzeichnis()?.join(STANDARD_ZERTIFIKAT),
        };
        let schluessel = match &self.netzwerk.tls_schluessel {
            Some(p) => PathBuf::from(p),
            None => exe_verzeichnis()?.join(STANDARD_SCHLUESSEL),
        };
        Ok((zertifikat, schluessel))
    }

    /// Baut die Relay-Konfiguration
    pub fn relay_config(&self) -> anyhow::Result<RelayConfig> {
        let admin = match &self.admin.passwort_hash {
            Some(wert) => AdminCredential::aus_konfig(wert)
                .map_err(|e| anyhow::anyhow!("admin.passwort_hash: {e}"))?,
            None => AdminCredential::default(),
        };
        Ok(RelayConfig {
            max_clients: self.server.max_clients,
            handshake_modus: self.server.handshake_modus,
            pm_weiterleiten: self.server.verschluesselte_pm,
            admin,
        })
    }

    /// Baut die Einstellungen pro Verbindung
    pub fn verbindungs_konfig(&self) -> VerbindungsKonfig {
        VerbindungsKonfig {
            zeilenlimit_bytes: self.netzwerk.zeilenlimit_bytes,
            send_queue_groesse: self.netzwerk.send_queue_groesse,
            keepalive: Duration::from_secs(self.netzwerk.keepalive_sek),
        }
    }
}
