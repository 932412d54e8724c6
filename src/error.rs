// Error types for each stage of an upload. Every variant here is fatal for
// the invocation: the binary reports it and exits non-zero. Problems the
// service reports back (bad status codes, failed bundles) are not errors,
// they end up in the report text instead.

use std::path::PathBuf;
use thiserror::Error;

/// Problems with the process configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("RUBBERBAND_URL is not set; cannot determine the upload endpoint")]
    MissingBaseUrl,

    #[error("invalid upload endpoint '{endpoint}': {source}")]
    InvalidEndpoint {
        endpoint: String,
        #[source]
        source: url::ParseError,
    },

    #[error("failed to read configuration from the environment: {0}")]
    Env(#[from] envy::Error),
}

/// Failures while turning the local user into an email address.
#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("unable to determine the local username: {0}")]
    UnknownUser(#[source] std::io::Error),

    #[error("failed to connect to LDAP server {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: ldap3::LdapError,
    },

    #[error("failed to bind to LDAP server: {0}")]
    Bind(#[source] ldap3::LdapError),

    #[error("failed to query LDAP {base}: {source}")]
    Search {
        base: String,
        #[source]
        source: ldap3::LdapError,
    },

    #[error("LDAP query for uid '{username}' returned {count} instead of 1 result")]
    EntryCount { username: String, count: usize },

    #[error("LDAP entry for uid '{username}' has no mail attribute")]
    MissingMail { username: String },
}

/// The request body could not be assembled.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("failed to open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode the upload body: {0}")]
    Encode(#[source] reqwest::Error),
}

/// The request never produced a response.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("request to {url} failed: {source}")]
    Send {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to read response from {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}
