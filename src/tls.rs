//! TLS certificate retrieval.
//!
//! Connects to an HTTPS endpoint, performs a verified handshake, issues a
//! minimal GET request, and extracts the facts the certificate validator
//! needs: subject/issuer names, common names, SAN DNS entries, and the
//! validity window.
//!
//! Uses `tokio-rustls` for the async TLS connection and `x509-parser` for
//! certificate parsing.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use rustls::pki_types::ServerName;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio_rustls::rustls::{ClientConfig, RootCertStore};
use tokio_rustls::TlsConnector;
use x509_parser::extensions::{GeneralName, ParsedExtension};
use x509_parser::prelude::X509Certificate;

use crate::config::constants::{
    DEFAULT_USER_AGENT, HTTPS_PORT, TCP_CONNECT_TIMEOUT_SECS, TLS_HANDSHAKE_TIMEOUT_SECS,
};
use crate::models::CertificateFacts;

/// Failures while retrieving or parsing a peer certificate.
///
/// Connection and handshake failures are transient (retried by the
/// certificate check); the remaining variants are terminal.
#[derive(Debug, Error)]
pub enum TlsError {
    /// The hostname is not a valid TLS server name.
    #[error("invalid server name {0}")]
    InvalidName(String),
    /// TCP connect did not complete within the timeout.
    #[error("connection to {host}:{port} timed out")]
    ConnectTimeout {
        /// Target host.
        host: String,
        /// Target port.
        port: u16,
    },
    /// TCP connect failed outright.
    #[error("failed to connect to {host}:{port}: {source}")]
    Connect {
        /// Target host.
        host: String,
        /// Target port.
        port: u16,
        /// Underlying socket error.
        #[source]
        source: std::io::Error,
    },
    /// TLS handshake did not complete within the timeout.
    #[error("TLS handshake with {0} timed out")]
    HandshakeTimeout(String),
    /// TLS handshake failed (bad certificate chain, protocol error, reset).
    #[error("TLS handshake with {host} failed: {source}")]
    Handshake {
        /// Target host.
        host: String,
        /// Underlying handshake error.
        #[source]
        source: std::io::Error,
    },
    /// The peer presented no certificate.
    #[error("no peer certificate presented by {0}")]
    NoCertificate(String),
    /// The peer certificate could not be parsed.
    #[error("failed to parse certificate from {0}")]
    Parse(String),
}

impl TlsError {
    /// True for failures worth retrying: timeouts, refused connections, and
    /// handshake errors.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            TlsError::ConnectTimeout { .. }
                | TlsError::Connect { .. }
                | TlsError::HandshakeTimeout(_)
                | TlsError::Handshake { .. }
        )
    }
}

/// Transience predicate for the certificate path: retries timeouts,
/// connection failures, and TLS handshake failures.
pub fn is_transient_tls_error(error: &anyhow::Error) -> bool {
    for cause in error.chain() {
        if let Some(tls_err) = cause.downcast_ref::<TlsError>() {
            return tls_err.is_transient();
        }
    }
    false
}

/// Performs a verified TLS handshake with `host` and extracts certificate
/// facts from the presented leaf certificate.
pub async fn fetch_certificate_facts(host: &str) -> Result<CertificateFacts, TlsError> {
    log::debug!("Fetching TLS certificate for {host}");

    let mut root_store = RootCertStore::empty();
    root_store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());

    let config = ClientConfig::builder()
        .with_root_certificates(root_store)
        .with_no_client_auth();

    let server_name = ServerName::try_from(host.to_string())
        .map_err(|_| TlsError::InvalidName(host.to_string()))?;

    let sock = match tokio::time::timeout(
        Duration::from_secs(TCP_CONNECT_TIMEOUT_SECS),
        TcpStream::connect((host, HTTPS_PORT)),
    )
    .await
    {
        Ok(Ok(sock)) => sock,
        Ok(Err(source)) => {
            return Err(TlsError::Connect {
                host: host.to_string(),
                port: HTTPS_PORT,
                source,
            })
        }
        Err(_) => {
            return Err(TlsError::ConnectTimeout {
                host: host.to_string(),
                port: HTTPS_PORT,
            })
        }
    };

    let connector = TlsConnector::from(Arc::new(config));
    let mut tls_stream = match tokio::time::timeout(
        Duration::from_secs(TLS_HANDSHAKE_TIMEOUT_SECS),
        connector.connect(server_name, sock),
    )
    .await
    {
        Ok(Ok(stream)) => stream,
        Ok(Err(source)) => {
            return Err(TlsError::Handshake {
                host: host.to_string(),
                source,
            })
        }
        Err(_) => return Err(TlsError::HandshakeTimeout(host.to_string())),
    };

    // A minimal request keeps middleboxes happy; the body is never read.
    let request = probe_request(host);
    if let Err(source) = tls_stream.write_all(request.as_bytes()).await {
        return Err(TlsError::Handshake {
            host: host.to_string(),
            source,
        });
    }

    let certs = tls_stream
        .get_ref()
        .1
        .peer_certificates()
        .ok_or_else(|| TlsError::NoCertificate(host.to_string()))?;
    let leaf = certs
        .first()
        .ok_or_else(|| TlsError::NoCertificate(host.to_string()))?;

    let (_, cert) = x509_parser::parse_x509_certificate(leaf.as_ref())
        .map_err(|_| TlsError::Parse(host.to_string()))?;

    let facts = extract_facts(&cert);
    log::debug!(
        "Certificate for {host}: subject={}, {} SAN(s)",
        facts.subject,
        facts.subject_alt_names.len()
    );
    Ok(facts)
}

/// Builds the HTTP/1.1 request sent after the handshake. Identifies itself
/// with the same User-Agent as every other outbound request.
fn probe_request(host: &str) -> String {
    format!(
        "GET / HTTP/1.1\r\n\
         Host: {host}\r\n\
         User-Agent: {DEFAULT_USER_AGENT}\r\n\
         Connection: close\r\n\
         Accept-Encoding: identity\r\n\
         \r\n",
    )
}

/// Builds [`CertificateFacts`] from a parsed X.509 certificate.
fn extract_facts(cert: &X509Certificate<'_>) -> CertificateFacts {
    let subject = cert.tbs_certificate.subject.to_string();
    let issuer = cert.tbs_certificate.issuer.to_string();

    let subject_common_names = cert
        .subject()
        .iter_common_name()
        .filter_map(|attr| attr.as_str().ok())
        .map(str::to_string)
        .collect();

    let subject_alt_names = extract_sans(cert);

    let validity = &cert.tbs_certificate.validity;
    let not_before = DateTime::<Utc>::from_timestamp(validity.not_before.timestamp(), 0);
    let not_after = DateTime::<Utc>::from_timestamp(validity.not_after.timestamp(), 0);

    CertificateFacts {
        subject,
        issuer,
        subject_common_names,
        subject_alt_names,
        not_before,
        not_after,
    }
}

/// Extracts DNS names from the Subject Alternative Name extension.
fn extract_sans(cert: &X509Certificate<'_>) -> Vec<String> {
    let mut sans = Vec::new();
    for ext in cert.extensions() {
        if let ParsedExtension::SubjectAlternativeName(san) = ext.parsed_extension() {
            for name in &san.general_names {
                if let GeneralName::DNSName(dns) = name {
                    sans.push(dns.to_string());
                }
            }
        }
    }
    sans
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_request_identifies_itself() {
        let request = probe_request("example.com");
        assert!(request.starts_with("GET / HTTP/1.1\r\n"));
        assert!(request.contains("Host: example.com\r\n"));
        assert!(request.contains("User-Agent: phish_scan/"));
        assert!(request.ends_with("\r\n\r\n"));
    }

    #[test]
    fn test_transient_classification() {
        assert!(TlsError::ConnectTimeout {
            host: "a".into(),
            port: 443
        }
        .is_transient());
        assert!(TlsError::HandshakeTimeout("a".into()).is_transient());
        assert!(!TlsError::NoCertificate("a".into()).is_transient());
        assert!(!TlsError::InvalidName("a".into()).is_transient());
        assert!(!TlsError::Parse("a".into()).is_transient());
    }

    #[test]
    fn test_predicate_matches_wrapped_tls_errors() {
        let err = anyhow::Error::from(TlsError::HandshakeTimeout("example.com".into()))
            .context("certificate fetch failed");
        assert!(is_transient_tls_error(&err));

        let err = anyhow::Error::from(TlsError::NoCertificate("example.com".into()));
        assert!(!is_transient_tls_error(&err));

        assert!(!is_transient_tls_error(&anyhow::anyhow!("unrelated")));
    }
}
