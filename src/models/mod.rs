use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub mod analysis;
pub mod product;

// Re-exports for convenience
pub use analysis::*;
pub use product::*;

/// Closed set of supported store fronts.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum StoreId {
    Walmart,
    Liverpool,
    Chedraui,
}

impl StoreId {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreId::Walmart => "walmart",
            StoreId::Liverpool => "liverpool",
            StoreId::Chedraui => "chedraui",
        }
    }
}

impl fmt::Display for StoreId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StoreId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "walmart" => Ok(StoreId::Walmart),
            "liverpool" => Ok(StoreId::Liverpool),
            "chedraui" => Ok(StoreId::Chedraui),
            other => Err(format!(
                "unknown store identifier '{}' (expected walmart, liverpool or chedraui)",
                other
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_id_serialization() {
        assert_eq!(serde_json::to_string(&StoreId::Walmart).unwrap(), "\"walmart\"");
        assert_eq!(serde_json::to_string(&StoreId::Liverpool).unwrap(), "\"liverpool\"");
        assert_eq!(serde_json::to_string(&StoreId::Chedraui).unwrap(), "\"chedraui\"");
    }

    #[test]
    fn test_store_id_from_str() {
        assert_eq!("walmart".parse::<StoreId>().unwrap(), StoreId::Walmart);
        assert_eq!(" Liverpool ".parse::<StoreId>().unwrap(), StoreId::Liverpool);
        assert_eq!("CHEDRAUI".parse::<StoreId>().unwrap(), StoreId::Chedraui);
    }

    #[test]
    fn test_store_id_from_str_unknown() {
        let err = "amazon".parse::<StoreId>().unwrap_err();
        assert!(err.contains("unknown store identifier 'amazon'"));
    }

    #[test]
    fn test_store_id_display_matches_serde_name() {
        for store in [StoreId::Walmart, StoreId::Liverpool, StoreId::Chedraui] {
            let serialized = serde_json::to_string(&store).unwrap();
            assert_eq!(serialized, format!("\"{}\"", store));
        }
    }
}
