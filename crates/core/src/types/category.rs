//! Product category enumeration.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Error parsing a [`Category`] from its slug.
#[derive(thiserror::Error, Debug, Clone)]
#[error("unknown category: {0}")]
pub struct CategoryError(pub String);

/// The fixed set of jewelry categories.
///
/// Every product belongs to exactly one category. The catalog page always
/// shows the buckets in this declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    Necklace,
    Earring,
    Bangle,
    Bracelet,
}

impl Category {
    /// All categories, in display order.
    pub const ALL: [Self; 4] = [Self::Necklace, Self::Earring, Self::Bangle, Self::Bracelet];

    /// Stable slug used in storage and forms.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Necklace => "necklace",
            Self::Earring => "earring",
            Self::Bangle => "bangle",
            Self::Bracelet => "bracelet",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Necklace => "Necklaces",
            Self::Earring => "Earrings",
            Self::Bangle => "Bangles",
            Self::Bracelet => "Bracelets",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = CategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "necklace" => Ok(Self::Necklace),
            "earring" => Ok(Self::Earring),
            "bangle" => Ok(Self::Bangle),
            "bracelet" => Ok(Self::Bracelet),
            other => Err(CategoryError(other.to_owned())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_roundtrip() {
        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>().unwrap(), category);
        }
    }

    #[test]
    fn test_unknown_slug() {
        assert!("ring".parse::<Category>().is_err());
    }

    #[test]
    fn test_display_order_is_fixed() {
        let slugs: Vec<&str> = Category::ALL.iter().map(Category::as_str).collect();
        assert_eq!(slugs, ["necklace", "earring", "bangle", "bracelet"]);
    }

    #[test]
    fn test_serde_uses_slug() {
        let json = serde_json::to_string(&Category::Bangle).unwrap();
        assert_eq!(json, "\"bangle\"");
    }
}
