//! `at://` record URIs.

use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

const SCHEME: &str = "at://";

/// A record address of the form `at://<authority>/<collection>/<rkey>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AtUri {
    /// DID or handle of the repository.
    pub authority: String,
    /// NSID of the record collection.
    pub collection: String,
    /// Record key.
    pub rkey: String,
}

impl AtUri {
    /// Creates a new record URI.
    pub fn new(
        authority: impl Into<String>,
        collection: impl Into<String>,
        rkey: impl Into<String>,
    ) -> Self {
        Self {
            authority: authority.into(),
            collection: collection.into(),
            rkey: rkey.into(),
        }
    }
}

impl FromStr for AtUri {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || {
            Error::invalid_input()
                .with_message("Invalid record URI")
                .with_context(format!("expected at://<authority>/<collection>/<rkey>, got '{s}'"))
        };

        let rest = s.strip_prefix(SCHEME).ok_or_else(invalid)?;
        let mut parts = rest.split('/');
        let (Some(authority), Some(collection), Some(rkey), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid());
        };

        if authority.is_empty() || collection.is_empty() || rkey.is_empty() {
            return Err(invalid());
        }

        Ok(Self::new(authority, collection, rkey))
    }
}

impl fmt::Display for AtUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{SCHEME}{}/{}/{}", self.authority, self.collection, self.rkey)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_record_uri() {
        let uri: AtUri = "at://did:plc:abc123/network.cosmik.collection/3kxyz"
            .parse()
            .unwrap();

        assert_eq!(uri.authority, "did:plc:abc123");
        assert_eq!(uri.collection, "network.cosmik.collection");
        assert_eq!(uri.rkey, "3kxyz");
        assert_eq!(
            uri.to_string(),
            "at://did:plc:abc123/network.cosmik.collection/3kxyz"
        );
    }

    #[test]
    fn reject_malformed_uris() {
        assert!("reading".parse::<AtUri>().is_err());
        assert!("https://example.com/a/b".parse::<AtUri>().is_err());
        assert!("at://did:plc:abc123/network.cosmik.collection".parse::<AtUri>().is_err());
        assert!("at://did:plc:abc123//3kxyz".parse::<AtUri>().is_err());
        assert!("at://a/b/c/d".parse::<AtUri>().is_err());
    }
}
