use std::fmt;
use std::str::FromStr;

use crate::storage::StorageError;

pub const SCHEME: &str = "s3://";

/// A parsed `s3://bucket/key` object reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locator {
    pub bucket: String,
    /// Everything after the first `/` following the bucket; may contain further `/`.
    pub key: String,
}

impl Locator {
    pub fn parse(raw: &str) -> Result<Self, StorageError> {
        let rest = raw.strip_prefix(SCHEME).ok_or_else(|| {
            StorageError::InvalidLocator(format!("'{raw}' must start with {SCHEME}"))
        })?;

        let (bucket, key) = rest.split_once('/').ok_or_else(|| {
            StorageError::InvalidLocator(format!("'{raw}' must have the form {SCHEME}bucket/key"))
        })?;

        if bucket.is_empty() || key.is_empty() {
            return Err(StorageError::InvalidLocator(format!(
                "'{raw}' has an empty bucket or key"
            )));
        }

        Ok(Locator {
            bucket: bucket.to_string(),
            key: key.to_string(),
        })
    }
}

impl FromStr for Locator {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Locator::parse(s)
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{SCHEME}{}/{}", self.bucket, self.key)
    }
}
