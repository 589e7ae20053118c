//! Process-wide constants: network limits, retry defaults, and score impacts.

/// Default User-Agent header sent on all outbound requests.
pub const DEFAULT_USER_AGENT: &str =
    concat!("phish_scan/", env!("CARGO_PKG_VERSION"), " (URL risk analyzer)");

/// Maximum redirect hops followed before giving up on a chain.
pub const MAX_REDIRECT_HOPS: usize = 10;

/// Per-request timeout for HTTP probes, in seconds.
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// TCP connect timeout for direct TLS probes, in seconds.
pub const TCP_CONNECT_TIMEOUT_SECS: u64 = 10;

/// TLS handshake timeout, in seconds.
pub const TLS_HANDSHAKE_TIMEOUT_SECS: u64 = 10;

/// Port used for TLS certificate probes.
pub const HTTPS_PORT: u16 = 443;

/// Maximum attempts for operations retried on transient network failures.
pub const RETRY_MAX_ATTEMPTS: usize = 3;

/// Fixed wait between retry attempts, in seconds.
pub const RETRY_WAIT_SECS: u64 = 2;

/// Default location of the bundled brand list.
pub const DEFAULT_BRANDS_FILE: &str = "data/brands.json";

/// A domain registered fewer than this many days ago is considered very young.
pub const DOMAIN_VERY_YOUNG_DAYS: i64 = 90;

/// A domain registered fewer than this many days ago is considered recent.
pub const DOMAIN_RECENT_DAYS: i64 = 365;

/// Registrant-name substrings that indicate a privacy/proxy registration.
pub const PRIVACY_KEYWORDS: [&str; 4] = ["privacy", "redacted", "private", "guard"];

/// Score impact values contributed by individual findings.
pub mod impact {
    /// No contribution.
    pub const ZERO: i64 = 0;
    /// Minor signal.
    pub const LOW: i64 = 15;
    /// Moderate signal.
    pub const MEDIUM: i64 = 30;
    /// Strong signal.
    pub const HIGH: i64 = 60;
    /// Near-certain signal.
    pub const CRITICAL: i64 = 90;

    /// The URL redirected at least once.
    pub const REDIRECTED: i64 = 10;
    /// No hostname could be extracted from the URL.
    pub const NO_HOSTNAME: i64 = 15;

    /// Certificate names do not cover the hostname.
    pub const SSL_HOSTNAME_MISMATCH: i64 = 50;
    /// Certificate issuer and subject are identical.
    pub const SSL_SELF_SIGNED: i64 = 40;
    /// Certificate validity window has ended.
    pub const SSL_EXPIRED: i64 = 40;
    /// The URL does not use HTTPS at all.
    pub const SSL_NO_HTTPS: i64 = 30;
    /// Certificate validity window has not started yet.
    pub const SSL_NOT_YET_VALID: i64 = 15;
    /// No certificate could be retrieved or its fields were unparseable.
    pub const SSL_FETCH_FAILED: i64 = 15;
}
