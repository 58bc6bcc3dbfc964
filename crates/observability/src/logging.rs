//! Structured Logging Setup via tracing-subscriber
//!
//! Konfigurierbar per Umgebungsvariable:
//! - `TRESEN_LOG_LEVEL`: Log-Level oder EnvFilter-Direktiven, ueberschreibt die Konfiguration
//! - `TRESEN_LOG_FORMAT`: Format (text/json), ueberschreibt die Konfiguration

use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{fmt, EnvFilter};

/// Umgebungsvariable fuer den Log-Level
pub const ENV_LOG_LEVEL: &str = "TRESEN_LOG_LEVEL";

/// Umgebungsvariable fuer das Log-Format
pub const ENV_LOG_FORMAT: &str = "TRESEN_LOG_FORMAT";

/// Wohin Logs geschrieben werden
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogAusgabe {
    #[default]
    Stdout,
    /// Fuer den Client: stdout bleibt dem Chat vorbehalten
    Stderr,
}

/// Initialisiert das Logging-System.
///
/// Liest `TRESEN_LOG_LEVEL` und `TRESEN_LOG_FORMAT` aus der Umgebung,
/// sonst gelten `level` und `format`. Ein zweiter Aufruf hat keine Wirkung.
pub fn logging_initialisieren(level: &str, format: &str, ausgabe: LogAusgabe) {
    let filter = EnvFilter::try_from_env(ENV_LOG_LEVEL)
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let format_env = std::env::var(ENV_LOG_FORMAT).unwrap_or_else(|_| format.to_string());

    let writer = match ausgabe {
        LogAusgabe::Stdout => BoxMakeWriter::new(std::io::stdout),
        LogAusgabe::Stderr => BoxMakeWriter::new(std::io::stderr),
    };

    let ergebnis = match format_env.as_str() {
        "json" => fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(writer)
            .with_target(true)
            .with_thread_ids(true)
            .with_current_span(true)
            .try_init(),
        _ => fmt()
            .with_env_filter(filter)
            .with_writer(writer)
            .with_target(true)
            .try_init(),
    };

    if ergebnis.is_err() {
        tracing::debug!("Logging war bereits initialisiert");
    }
}

/// Validiert ob ein Log-Level-String gueltig ist.
pub fn log_level_gueltig(level: &str) -> bool {
    matches!(level, "trace" | "debug" | "info" | "warn" | "error")
}

/// Validiert ob ein Log-Format-String gueltig ist.
pub fn log_format_gueltig(format: &str) -> bool {
    matches!(format, "text" | "json")
}
