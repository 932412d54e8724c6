// Identity resolution: decides which email address is forwarded to the
// service as the uploader. Either a fixed placeholder, or the `mail`
// attribute of the local user's directory entry.

use crate::config::Config;
use crate::error::IdentityError;
use ldap3::{ldap_escape, LdapConn, Scope, SearchEntry};
use log::{debug, info};

/// Identity sent when directory lookup is disabled.
pub const PLACEHOLDER_IDENTITY: &str = "ghost";

/// A directory that can be searched by uid.
#[cfg_attr(test, mockall::automock)]
pub trait Directory {
    /// Returns the `mail` values of every entry whose uid equals `username`,
    /// one inner list per matched entry.
    fn mail_entries(&self, username: &str) -> Result<Vec<Vec<String>>, IdentityError>;
}

/// Anonymous LDAP lookup under a fixed search base. A connection is opened
/// and closed for each query.
pub struct LdapDirectory {
    url: String,
    base: String,
}

impl LdapDirectory {
    pub fn new(url: impl Into<String>, base: impl Into<String>) -> Self {
        LdapDirectory {
            url: url.into(),
            base: base.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.ldap_url.clone(), config.ldap_base.clone())
    }
}

impl Directory for LdapDirectory {
    fn mail_entries(&self, username: &str) -> Result<Vec<Vec<String>>, IdentityError> {
        debug!("Connecting to {}", self.url);
        let mut ldap = LdapConn::new(&self.url).map_err(|source| IdentityError::Connect {
            url: self.url.clone(),
            source,
        })?;

        ldap.simple_bind("", "")
            .and_then(|res| res.success())
            .map_err(IdentityError::Bind)?;

        let filter = format!("(uid={})", ldap_escape(username));
        debug!("Searching {} for {}", self.base, filter);
        let searched = ldap
            .search(&self.base, Scope::Subtree, &filter, vec!["mail"])
            .and_then(|res| res.success());
        // Close the connection whatever the search outcome.
        let _ = ldap.unbind();

        let (entries, _) = searched.map_err(|source| IdentityError::Search {
            base: self.base.clone(),
            source,
        })?;

        Ok(entries
            .into_iter()
            .map(|entry| {
                SearchEntry::construct(entry)
                    .attrs
                    .remove("mail")
                    .unwrap_or_default()
            })
            .collect())
    }
}

/// Resolve the identity for this invocation.
pub fn resolve_identity(
    config: &Config,
    directory: &dyn Directory,
) -> Result<String, IdentityError> {
    if !config.use_ldap {
        debug!("Directory lookup disabled, using placeholder identity");
        return Ok(PLACEHOLDER_IDENTITY.to_string());
    }
    let username = current_username()?;
    let email = lookup_email(directory, &username)?;
    info!("Resolved {} to {}", username, email);
    Ok(email)
}

/// Look `username` up in the directory. Exactly one entry with a non-empty
/// mail value is accepted; the value is returned lower-cased.
pub fn lookup_email(directory: &dyn Directory, username: &str) -> Result<String, IdentityError> {
    let mut entries = directory.mail_entries(username)?;
    if entries.len() != 1 {
        debug!("LDAP query results: {:?}", entries);
        return Err(IdentityError::EntryCount {
            username: username.to_string(),
            count: entries.len(),
        });
    }

    let mail = entries.remove(0).into_iter().next().unwrap_or_default();
    if mail.is_empty() {
        return Err(IdentityError::MissingMail {
            username: username.to_string(),
        });
    }
    Ok(mail.to_lowercase())
}

/// Name of the user owning this process.
pub fn current_username() -> Result<String, IdentityError> {
    whoami::fallible::username().map_err(IdentityError::UnknownUser)
}
