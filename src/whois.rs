//! WHOIS registry lookups.
//!
//! The domain-age check consumes registration data through the
//! [`WhoisProvider`] trait; the live implementation wraps the
//! `whois-service` client. Registries return creation dates in a grab bag of
//! textual formats, so parsing tries a list of known formats before giving
//! up (a missing date is a signal, not an error).

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use whois_service::WhoisClient;

/// Registration facts the domain-age check consumes.
#[derive(Debug, Clone, Default)]
pub struct DomainRegistration {
    /// When the domain was first registered, if determinable.
    pub creation_date: Option<DateTime<Utc>>,
    /// Free-text registrant name, if disclosed.
    pub registrant_name: Option<String>,
}

/// Source of domain registration data.
#[async_trait]
pub trait WhoisProvider: Send + Sync {
    /// Looks up registration data for a registrable domain (eTLD+1).
    async fn lookup(&self, domain: &str) -> Result<DomainRegistration>;
}

/// Live provider backed by WHOIS/RDAP via the `whois-service` crate.
#[derive(Debug, Default)]
pub struct LiveWhoisProvider;

#[async_trait]
impl WhoisProvider for LiveWhoisProvider {
    async fn lookup(&self, domain: &str) -> Result<DomainRegistration> {
        // The client is lightweight; create one per lookup.
        let client = WhoisClient::new()
            .await
            .map_err(|e| anyhow::anyhow!("failed to create WHOIS client: {e}"))?;
        let response = client
            .lookup(domain)
            .await
            .map_err(|e| anyhow::anyhow!("WHOIS lookup for {domain} failed: {e}"))?;

        let parsed = match &response.parsed_data {
            Some(parsed) => parsed,
            None => return Ok(DomainRegistration::default()),
        };

        Ok(DomainRegistration {
            creation_date: parsed.creation_date.as_deref().and_then(parse_date_string),
            registrant_name: parsed.registrant_name.clone(),
        })
    }
}

/// Attempts to parse a WHOIS date string in the formats registries commonly
/// use.
pub(crate) fn parse_date_string(date_str: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(date_str) {
        return Some(dt.with_timezone(&Utc));
    }

    let datetime_formats = ["%Y-%m-%dT%H:%M:%S%.fZ", "%Y-%m-%dT%H:%M:%SZ", "%Y-%m-%d %H:%M:%S"];
    for format in &datetime_formats {
        if let Ok(naive) = chrono::NaiveDateTime::parse_from_str(date_str, format) {
            return Some(naive.and_utc());
        }
    }

    let date_formats = ["%Y-%m-%d", "%d-%b-%Y", "%d/%m/%Y"];
    for format in &date_formats {
        if let Ok(date) = chrono::NaiveDate::parse_from_str(date_str, format) {
            return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn test_parses_rfc3339() {
        let dt = parse_date_string("2024-03-15T10:30:00Z").unwrap();
        assert_eq!((dt.year(), dt.month(), dt.day()), (2024, 3, 15));
    }

    #[test]
    fn test_parses_plain_date() {
        let dt = parse_date_string("1997-09-15").unwrap();
        assert_eq!((dt.year(), dt.month(), dt.day()), (1997, 9, 15));
    }

    #[test]
    fn test_parses_registrar_style_date() {
        let dt = parse_date_string("15-Mar-2024").unwrap();
        assert_eq!((dt.year(), dt.month(), dt.day()), (2024, 3, 15));
    }

    #[test]
    fn test_unknown_format_yields_none() {
        assert!(parse_date_string("next tuesday").is_none());
        assert!(parse_date_string("").is_none());
    }
}
