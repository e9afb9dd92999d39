use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// Storage adapter tag
///
/// Identifies whether the backing store is local disk or a remote service.
/// Anything other than `Local` is treated as remote by the optimizer
/// coordinator, including tags this crate does not know about.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AdapterType {
    Local,
    S3,
    Other(String),
}

impl AdapterType {
    pub fn is_local(&self) -> bool {
        matches!(self, AdapterType::Local)
    }
}

impl FromStr for AdapterType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim().to_lowercase();
        match tag.as_str() {
            "" => Err(anyhow::anyhow!("Storage adapter type must not be empty")),
            "local" => Ok(AdapterType::Local),
            "s3" => Ok(AdapterType::S3),
            _ => Ok(AdapterType::Other(tag)),
        }
    }
}

impl Display for AdapterType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            AdapterType::Local => write!(f, "local"),
            AdapterType::S3 => write!(f, "s3"),
            AdapterType::Other(tag) => write!(f, "{}", tag),
        }
    }
}
