//! Connection target parsing
//!
//! Accepts the usual document-database URI shape:
//!
//! ```text
//! scheme://[user:password@]host[:port][,host[:port]...][/database][?options]
//! ```
//!
//! The store refuses to start unless the URI names a database.

use std::fmt;

use docvault_core::{Error, Result};

/// A parsed connection URI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionUri {
    raw: String,
    scheme: String,
    hosts: Vec<String>,
    database: Option<String>,
    has_credentials: bool,
}

impl ConnectionUri {
    /// Parse a connection URI
    ///
    /// # Errors
    ///
    /// `Configuration` if the scheme or host list is missing or malformed.
    pub fn parse(raw: &str) -> Result<Self> {
        let (scheme, rest) = raw
            .split_once("://")
            .ok_or_else(|| Error::configuration(format!("uri '{}' has no scheme", raw)))?;
        if scheme.is_empty() {
            return Err(Error::configuration("uri scheme is empty"));
        }

        let without_options = rest.split_once('?').map_or(rest, |(head, _)| head);
        let (authority, path) = match without_options.split_once('/') {
            Some((authority, path)) => (authority, Some(path)),
            None => (without_options, None),
        };

        let (has_credentials, host_list) = match authority.rsplit_once('@') {
            Some((_, hosts)) => (true, hosts),
            None => (false, authority),
        };
        let hosts: Vec<String> = host_list.split(',').map(str::to_string).collect();
        if hosts.iter().any(String::is_empty) {
            return Err(Error::configuration("uri host list is empty or malformed"));
        }

        let database = match path {
            Some(name) if name.contains('/') => {
                return Err(Error::configuration(format!(
                    "invalid database name '{}'",
                    name
                )))
            }
            Some("") | None => None,
            Some(name) => Some(name.to_string()),
        };

        Ok(Self {
            raw: raw.to_string(),
            scheme: scheme.to_string(),
            hosts,
            database,
            has_credentials,
        })
    }

    /// The original text, credentials included (hand this to drivers only)
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Scheme (`mongodb`, `memory`, ...)
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Hosts in declaration order
    pub fn hosts(&self) -> &[String] {
        &self.hosts
    }

    /// Database named in the path, if any
    pub fn database(&self) -> Option<&str> {
        self.database.as_deref()
    }

    /// Database named in the path
    ///
    /// # Errors
    ///
    /// `Configuration` if the URI does not name one.
    pub fn require_database(&self) -> Result<&str> {
        self.database()
            .ok_or_else(|| Error::configuration("uri must contain a database name"))
    }
}

/// Displays the URI without credentials, safe for logs
impl fmt::Display for ConnectionUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://", self.scheme)?;
        if self.has_credentials {
            f.write_str("***@")?;
        }
        f.write_str(&self.hosts.join(","))?;
        if let Some(db) = &self.database {
            write!(f, "/{}", db)?;
        }
        Ok(())
    }
}
