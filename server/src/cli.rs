//! Kommandozeile des Servers
//!
//! ```text
//! tresen-server [PORT]           Server starten
//! tresen-server hash-password    Passwort von stdin lesen, Argon2id-PHC ausgeben
//! ```

use anyhow::{Context, Result};

/// Was der Prozess tun soll
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Aufruf {
    /// Server starten, optional mit Port aus der Kommandozeile
    Starten { port: Option<u16> },
    /// Wert fuer `admin.passwort_hash` erzeugen
    PasswortHashen,
}

/// Parst die Argumente ohne den Programmnamen
pub fn aufruf_parsen<I>(args: I) -> Result<Aufruf>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    let aufruf = match args.next().as_deref() {
        None => Aufruf::Starten { port: None },
        Some("hash-password") => Aufruf::PasswortHashen,
        Some(arg) => Aufruf::Starten {
            port: Some(
                arg.parse()
                    .with_context(|| format!("Ungueltiger Port '{arg}'"))?,
            ),
        },
    };
    if let Some(rest) = args.next() {
        anyhow::bail!("Unerwartetes Argument '{rest}'");
    }
    Ok(aufruf)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsen(args: &[&str]) -> Result<Aufruf> {
        aufruf_parsen(args.iter().map(|a| a.to_string()))
    }

    #[test]
    fn ohne_argumente_starten() {
        assert_eq!(parsen(&[]).unwrap(), Aufruf::Starten { port: None });
    }

    #[test]
    fn port_als_argument() {
        assert_eq!(parsen(&["4000"]).unwrap(), Aufruf::Starten { port: Some(4000) });
        assert!(parsen(&["abc"]).is_err());
        assert!(parsen(&["70000"]).is_err());
    }

    #[test]
    fn hash_password() {
        assert_eq!(parsen(&["hash-password"]).unwrap(), Aufruf::PasswortHashen);
        assert!(parsen(&["hash-password", "x"]).is_err());
    }
}
