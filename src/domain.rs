//! Registrable-domain extraction.
//!
//! WHOIS operates on registrable domains (eTLD+1), not full hostnames.
//! `tldextract` applies the Public Suffix List so multi-part suffixes like
//! `.co.uk` are handled correctly.

use anyhow::{Context, Result};
use tldextract::TldExtractor;

/// Extracts the registrable domain (e.g. `example.co.uk`) from a hostname.
///
/// # Errors
///
/// Returns an error for IP addresses and hostnames without a recognizable
/// domain/suffix pair; neither has a registrable domain to look up.
pub fn extract_registrable_domain(extractor: &TldExtractor, hostname: &str) -> Result<String> {
    if hostname.parse::<std::net::Ipv4Addr>().is_ok()
        || hostname.parse::<std::net::Ipv6Addr>().is_ok()
    {
        anyhow::bail!("IP addresses do not have registrable domains: {hostname}");
    }

    let extracted = extractor
        .extract(hostname)
        .with_context(|| format!("failed to extract domain from {hostname}"))?;

    match (extracted.domain, extracted.suffix) {
        (Some(domain), Some(suffix)) => Ok(format!("{domain}.{suffix}")),
        _ => anyhow::bail!("no registrable domain in {hostname}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tldextract::TldOption;

    fn extractor() -> TldExtractor {
        TldExtractor::new(TldOption::default())
    }

    #[test]
    fn test_strips_subdomains() {
        let domain = extract_registrable_domain(&extractor(), "login.accounts.example.com").unwrap();
        assert_eq!(domain, "example.com");
    }

    #[test]
    fn test_handles_multi_part_suffix() {
        let domain = extract_registrable_domain(&extractor(), "shop.example.co.uk").unwrap();
        assert_eq!(domain, "example.co.uk");
    }

    #[test]
    fn test_rejects_ip_addresses() {
        assert!(extract_registrable_domain(&extractor(), "192.168.1.1").is_err());
        assert!(extract_registrable_domain(&extractor(), "::1").is_err());
    }
}
