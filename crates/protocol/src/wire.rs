//! Wire-Format fuer TLS-Verbindungen
//!
//! Zeilenbasiertes Protokoll: UTF-8-Text, jede Nachricht endet mit `\n`.
//!
//! ```text
//! Welcome Alice! Your ID is [AB12]\n
//! <announce> [CD34] Bob joined the chat\n
//! ```
//!
//! Teilweise gelesene Zeilen bleiben im Buffer bis zum naechsten Read.
//! Die maximale Zeilenlaenge ist konfigurierbar (Standard: 8 KiB), damit
//! ein Client ohne Newline den Speicher nicht unbegrenzt fuellen kann.
//! Das Limit gilt nur beim Lesen: der Server setzt Praefixe wie `<NAME> `
//! vor Zeilen die bereits am Limit sind.

use bytes::{BufMut, BytesMut};
use std::io;
use tokio_util::codec::{Decoder, Encoder};

// ---------------------------------------------------------------------------
// Konstanten
// ---------------------------------------------------------------------------

/// Standard-maximale Zeilenlaenge in Bytes (ohne Newline)
pub const DEFAULT_MAX_ZEILENLAENGE: usize = 8 * 1024;

/// Limit fuer Zeilen die ein Client vom Server liest
///
/// Deckt das Eingangslimit des Servers plus Praefix (`[PRIVATE] From NAME: `)
/// ab, solange `zeilenlimit_bytes` auf dem Server nicht hoeher gesetzt ist.
pub const EMPFANG_MAX_ZEILENLAENGE: usize = 64 * 1024;

// ---------------------------------------------------------------------------
// ZeilenCodec
// ---------------------------------------------------------------------------

/// tokio-util Codec fuer newline-terminierte Textzeilen
///
/// Implementiert `Decoder` (liefert `String` ohne Zeilenende) und
/// `Encoder` (haengt `\n` an) fuer die Nutzung mit `FramedRead`/`FramedWrite`.
#[derive(Debug, Clone)]
pub struct ZeilenCodec {
    /// Maximale erlaubte Zeilenlaenge in Bytes
    max_zeilenlaenge: usize,
    /// Ab diesem Index wurde im Buffer noch nicht nach `\n` gesucht
    naechster_index: usize,
}

impl ZeilenCodec {
    /// Erstellt einen neuen `ZeilenCodec` mit Standard-Limit
    pub fn new() -> Self {
        Self::with_max_laenge(DEFAULT_MAX_ZEILENLAENGE)
    }

    /// Erstellt einen `ZeilenCodec` mit benutzerdefinierter maximaler Zeilenlaenge
    pub fn with_max_laenge(max_zeilenlaenge: usize) -> Self {
        Self {
            max_zeilenlaenge,
            naechster_index: 0,
        }
    }

    /// Gibt die konfigurierte maximale Zeilenlaenge zurueck
    pub fn max_zeilenlaenge(&self) -> usize {
        self.max_zeilenlaenge
    }

    fn zu_lang(&self, laenge: usize) -> io::Error {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!(
                "Zeile zu lang: {} Bytes (Maximum: {} Bytes)",
                laenge, self.max_zeilenlaenge
            ),
        )
    }
}

impl Default for ZeilenCodec {
    fn default() -> Self {
        Self::new()
    }
}

/// Wandelt rohe Zeilenbytes in einen String ohne `\n` bzw. `\r\n`
fn zeile_aus_bytes(mut bytes: &[u8]) -> String {
    if let [rest @ .., b'\n'] = bytes {
        bytes = rest;
    }
    if let [rest @ .., b'\r'] = bytes {
        bytes = rest;
    }
    String::from_utf8_lossy(bytes).into_owned()
}

// ---------------------------------------------------------------------------
// Decoder-Implementierung
// ---------------------------------------------------------------------------

impl Decoder for ZeilenCodec {
    type Item = String;
    type Error = io::Error;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        // Nur den noch nicht durchsuchten Teil scannen
        let start = self.naechster_index.min(src.len());
        let newline = src[start..].iter().position(|b| *b == b'\n');

        match newline {
            Some(offset) => {
                let ende = start + offset;
                self.naechster_index = 0;
                if ende > self.max_zeilenlaenge {
                    return Err(self.zu_lang(ende));
                }
                let zeile = src.split_to(ende + 1);
                Ok(Some(zeile_aus_bytes(&zeile)))
            }
            None => {
                if src.len() > self.max_zeilenlaenge {
                    return Err(self.zu_lang(src.len()));
                }
                self.naechster_index = src.len();
                Ok(None)
            }
        }
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if let Some(zeile) = self.decode(src)? {
            return Ok(Some(zeile));
        }
        // Unterminierter Rest beim Verbindungsende gilt als letzte Zeile
        self.naechster_index = 0;
        if src.is_empty() {
            Ok(None)
        } else {
            let rest = src.split_to(src.len());
            Ok(Some(zeile_aus_bytes(&rest)))
        }
    }
}

// ---------------------------------------------------------------------------
// Encoder-Implementierung
// ---------------------------------------------------------------------------

impl<T: AsRef<str>> Encoder<T> for ZeilenCodec {
    type Error = io::Error;

    fn encode(&mut self, item: T, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let zeile = item.as_ref();
        dst.reserve(zeile.len() + 1);
        dst.put_slice(zeile.as_bytes());
        dst.put_u8(b'\n');
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
