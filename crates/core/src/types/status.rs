//! Status enums for marketplace entities.

use serde::{Deserialize, Serialize};

/// Listing status of a product.
///
/// Serialized in lowercase, matching the backend (`available`, `sold`,
/// `cancelled`). The same strings appear in the status-change path
/// `PATCH /products/{id}/{status}` and in the `status` query filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    /// Listed and for sale.
    #[default]
    Available,
    /// Marked as sold by the seller.
    Sold,
    /// Listing deactivated by the seller.
    Cancelled,
}

impl ProductStatus {
    /// All statuses, in the order they are offered in filters.
    pub const ALL: [Self; 3] = [Self::Available, Self::Sold, Self::Cancelled];

    /// Wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Sold => "sold",
            Self::Cancelled => "cancelled",
        }
    }

    /// Human-readable label for product cards.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Available => "For sale",
            Self::Sold => "Sold",
            Self::Cancelled => "Deactivated",
        }
    }
}

impl std::fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ProductStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "available" => Ok(Self::Available),
            "sold" => Ok(Self::Sold),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(format!("invalid product status: {other}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_through_str() {
        for status in ProductStatus::ALL {
            assert_eq!(status.as_str().parse::<ProductStatus>().unwrap(), status);
        }
    }

    #[test]
    fn test_rejects_unknown() {
        assert!("archived".parse::<ProductStatus>().is_err());
        assert!("Sold".parse::<ProductStatus>().is_err());
    }

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(
            serde_json::to_string(&ProductStatus::Cancelled).unwrap(),
            "\"cancelled\""
        );
        let status: ProductStatus = serde_json::from_str("\"sold\"").unwrap();
        assert_eq!(status, ProductStatus::Sold);
    }
}
