use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

use crate::error::AppError;

pub mod cart;
pub mod credential;
pub mod session;

pub use cart::{Amount, CartItem, OrderConfirmation};
pub use credential::Credential;
pub use session::SessionState;

/// Storefront category; the identifier doubles as the tab name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Concerts,
    Ootd,
    Cravings,
    Travel,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Concerts,
        Category::Ootd,
        Category::Cravings,
        Category::Travel,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Category::Concerts => "concerts",
            Category::Ootd => "ootd",
            Category::Cravings => "cravings",
            Category::Travel => "travel",
        }
    }

    /// Membership check only, no normalisation beyond exact ids
    pub fn from_id(id: &str) -> Option<Category> {
        Category::ALL.into_iter().find(|c| c.id() == id)
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl FromStr for Category {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::from_id(s)
            .ok_or_else(|| AppError::InvalidInput(format!("Unknown category: {}", s)))
    }
}

// ============================================================================
// Recommendation records
// ============================================================================

/// Fields every category shares. All of them may be missing in model output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommonFields {
    #[serde(default)]
    pub reason: Option<String>,
    /// Currency-prefixed, e.g. "₱1,500"
    #[serde(default)]
    pub price: Option<String>,
    #[serde(default)]
    pub delivery: Option<String>,
    /// Numeric string, nominally 4.0-5.0
    #[serde(default)]
    pub rating: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConcertPick {
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default)]
    pub venue: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(flatten)]
    pub common: CommonFields,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutfitPick {
    #[serde(default)]
    pub product: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(flatten)]
    pub common: CommonFields,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CravingPick {
    #[serde(default)]
    pub restaurant: Option<String>,
    #[serde(default)]
    pub dish: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(flatten)]
    pub common: CommonFields,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TripPick {
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub package: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(flatten)]
    pub common: CommonFields,
}

/// One suggestion, shaped by the category it was requested for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Recommendation {
    Concert(ConcertPick),
    Outfit(OutfitPick),
    Craving(CravingPick),
    Trip(TripPick),
}

impl Recommendation {
    pub fn category(&self) -> Category {
        match self {
            Recommendation::Concert(_) => Category::Concerts,
            Recommendation::Outfit(_) => Category::Ootd,
            Recommendation::Craving(_) => Category::Cravings,
            Recommendation::Trip(_) => Category::Travel,
        }
    }

    pub fn common(&self) -> &CommonFields {
        match self {
            Recommendation::Concert(pick) => &pick.common,
            Recommendation::Outfit(pick) => &pick.common,
            Recommendation::Craving(pick) => &pick.common,
            Recommendation::Trip(pick) => &pick.common,
        }
    }

    pub fn price(&self) -> Option<&str> {
        self.common().price.as_deref()
    }

    /// Rating as a number, if the model sent something numeric
    pub fn rating_value(&self) -> Option<f32> {
        self.common()
            .rating
            .as_deref()
            .and_then(|r| r.trim().parse::<f32>().ok())
    }

    /// Single display line, e.g. "Boracay - Island Hopper"
    pub fn headline(&self) -> String {
        let (primary, secondary) = match self {
            Recommendation::Concert(p) => (&p.artist, &p.venue),
            Recommendation::Outfit(p) => (&p.product, &p.brand),
            Recommendation::Craving(p) => (&p.dish, &p.restaurant),
            Recommendation::Trip(p) => (&p.destination, &p.package),
        };

        match (primary.as_deref(), secondary.as_deref()) {
            (Some(a), Some(b)) if !a.is_empty() && !b.is_empty() => format!("{} - {}", a, b),
            (Some(a), _) if !a.is_empty() => a.to_string(),
            (_, Some(b)) if !b.is_empty() => b.to_string(),
            _ => "Untitled pick".to_string(),
        }
    }
}

/// Result of one successful analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationSet {
    pub category: Category,
    pub recommendations: Vec<Recommendation>,
    pub mood_analysis: Option<String>,
}

impl RecommendationSet {
    pub fn len(&self) -> usize {
        self.recommendations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recommendations.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Recommendation> {
        self.recommendations.get(index)
    }
}
