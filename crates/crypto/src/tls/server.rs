//! TLS-Server (Acceptor ueber TCP)

use std::path::Path;
use std::sync::Arc;

use rustls::pki_types::{CertificateDer, PrivateKeyDer};
use rustls::ServerConfig;
use rustls_pemfile::{certs, private_key};
use tokio_rustls::TlsAcceptor;

use crate::error::{CryptoError, CryptoResult};

/// Erstellt einen Acceptor aus PEM-Strings
pub fn tls_acceptor_aus_pem(zertifikat_pem: &str, schluessel_pem: &str) -> CryptoResult<TlsAcceptor> {
    let cert_chain = parse_certificates(zertifikat_pem)?;
    if cert_chain.is_empty() {
        return Err(CryptoError::Tls("Kein Zertifikat gefunden".to_string()));
    }
    let private_key = parse_private_key(schluessel_pem)?;

    let tls_config = ServerConfig::builder_with_provider(super::provider())
        .with_safe_default_protocol_versions()
        .map_err(|e| CryptoError::Tls(e.to_string()))?
        .with_no_client_auth()
        .with_single_cert(cert_chain, private_key)
        .map_err(|e| CryptoError::Tls(e.to_string()))?;

    Ok(TlsAcceptor::from(Arc::new(tls_config)))
}

/// Erstellt einen Acceptor aus Zertifikat- und Schluesseldatei
pub fn tls_acceptor_aus_dateien(zertifikat: &Path, schluessel: &Path) -> CryptoResult<TlsAcceptor> {
    let zertifikat_pem = std::fs::read_to_string(zertifikat)?;
    let schluessel_pem = std::fs::read_to_string(schluessel)?;
    tracing::debug!(
        zertifikat = %zertifikat.display(),
        schluessel = %schluessel.display(),
        "TLS-Material geladen"
    );
    tls_acceptor_aus_pem(&zertifikat_pem, &schluessel_pem)
}

fn parse_certificates(pem: &str) -> CryptoResult<Vec<CertificateDer<'static>>> {
    let mut cursor = std::io::Cursor::new(pem.as_bytes());
    certs(&mut cursor)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| CryptoError::Tls(format!("Zertifikat-Parsing fehlgeschlagen: {}", e)))
}

fn parse_private_key(pem: &str) -> CryptoResult<PrivateKeyDer<'static>> {
    let mut cursor = std::io::Cursor::new(pem.as_bytes());
    private_key(&mut cursor)
        .map_err(|e| CryptoError::Tls(format!("Schluessel-Parsing fehlgeschlagen: {}", e)))?
        .ok_or_else(|| CryptoError::Tls("Kein privater Schluessel gefunden".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acceptor_aus_selbstsigniertem_zertifikat() {
        let cert = rcgen::generate_simple_self_signed(vec!["localhost".to_string()]).unwrap();
        let acceptor = tls_acceptor_aus_pem(&cert.cert.pem(), &cert.key_pair.serialize_pem());
        assert!(acceptor.is_ok());
    }

    #[test]
    fn ungueltiges_pem_schlaegt_fehl() {
        assert!(matches!(
            tls_acceptor_aus_pem("ungueltig", "ungueltig"),
            Err(CryptoError::Tls(_))
        ));
    }

    #[test]
    fn fehlender_schluessel_schlaegt_fehl() {
        let cert = rcgen::generate_simple_self_signed(vec!["localhost".to_string()]).unwrap();
        assert!(tls_acceptor_aus_pem(&cert.cert.pem(), "").is_err());
    }

    #[test]
    fn fehlende_datei_ist_io_fehler() {
        let e = tls_acceptor_aus_dateien(
            Path::new("/nicht/vorhanden/server.crt"),
            Path::new("/nicht/vorhanden/server.key"),
        );
        assert!(matches!(e, Err(CryptoError::Io(_))));
    }
}
