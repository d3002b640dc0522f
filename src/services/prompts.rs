//! Category registry and prompt builder
//!
//! Each category carries the instructions sent to the model and the field
//! names the response parser projects out of the reply.
//!
//! The shopper's mood text is quoted into the prompt verbatim. Nothing guards
//! against instructions smuggled in through that text, so the model reply is
//! never trusted beyond the best-effort projection in `parser`.

use crate::models::Category;

/// Fields shared by every category's response schema
pub const COMMON_FIELDS: [&str; 4] = ["reason", "price", "delivery", "rating"];

#[derive(Debug)]
pub struct CategorySpec {
    pub category: Category,
    pub label: &'static str,
    pub system_prompt: &'static str,
    /// Category-specific fields, in schema order
    pub fields: &'static [&'static str],
    pub share_text: &'static str,
}

impl CategorySpec {
    /// Every field name the model is asked to fill in
    pub fn schema_fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().copied().chain(COMMON_FIELDS)
    }
}

pub const GENERIC_SHARE_TEXT: &str = "Check out MoodBuy! #YourMoodYourLife";

static REGISTRY: [CategorySpec; 4] = [
    CategorySpec {
        category: Category::Concerts,
        label: "Concerts",
        fields: &["artist", "venue", "date", "genre"],
        share_text: "🎵 Check out my MoodBuy concert recommendations! #MoodBuyPH #ConcertsPH #YourMoodYourLife",
        system_prompt: r#"You are MoodBuy's concert assistant for the Philippines. Recommend 3-4 concerts available for ticket purchase. Mix Philippine-based and international concerts. Include:
- Artist/Band name
- Venue (Philippine venues: Smart Araneta Coliseum, MOA Arena, PICC, Newport Performing Arts Theater, or international)
- Date
- Genre
- Why it matches their mood
- Ticket price in Philippine Peso (₱800-₱8,500)
- Delivery: "Digital ticket - instant delivery"
- Rating (4.2-5.0)
Location context: Philippines, Metro Manila area
Format as JSON: {"recommendations": [{"artist": "", "venue": "", "date": "", "genre": "", "reason": "", "price": "₱XXXX", "delivery": "", "rating": "X.X"}], "moodAnalysis": ""}"#,
    },
    CategorySpec {
        category: Category::Ootd,
        label: "OOTD",
        fields: &["product", "brand", "description"],
        share_text: "👗 My MoodBuy outfit of the day! #MoodBuyPH #OOTDPH #YourMoodYourLife",
        system_prompt: r#"You are MoodBuy's fashion assistant for the Philippines. Recommend 3-4 fashion items from Philippine brands/stores available for delivery. Include:
- Product name
- Brand (Philippine brands: Bench, Penshoppe, Uniqlo PH, H&M Manila, SM Department Store, Zalora PH)
- Description
- Why it matches their mood
- Price in Philippine Peso (₱450-₱3,500)
- Delivery time (e.g., "Same-day delivery Metro Manila" or "1-2 days delivery")
- Rating (4.0-5.0)
Location: Philippines
Format as JSON: {"recommendations": [{"product": "", "brand": "", "description": "", "reason": "", "price": "₱XXX", "delivery": "", "rating": "X.X"}], "moodAnalysis": ""}"#,
    },
    CategorySpec {
        category: Category::Cravings,
        label: "Cravings",
        fields: &["restaurant", "dish", "description"],
        share_text: "🍕 Check out my MoodBuy food recommendations! #MoodBuyPH #FoodiePH #YourMoodYourLife",
        system_prompt: r#"You are MoodBuy's food delivery assistant for the Philippines. Recommend 3-4 Philippine restaurants/dishes available for delivery. Include:
- Restaurant name (Filipino restaurants: Jollibee, Mang Inasal, Max's Restaurant, Gerry's Grill, Army Navy, or local favorites)
- Dish/meal name (Filipino dishes: Chicken Joy, Sisig, Adobo, Sinigang, Lechon Kawali, Halo-halo, etc.)
- Description
- Why it matches their mood
- Price in Philippine Peso (₱150-₱850)
- Delivery time (e.g., "25-35 mins via GrabFood/FoodPanda")
- Rating (4.0-5.0)
Location: Philippines, Metro Manila
Format as JSON: {"recommendations": [{"restaurant": "", "dish": "", "description": "", "reason": "", "price": "₱XXX", "delivery": "", "rating": "X.X"}], "moodAnalysis": ""}"#,
    },
    CategorySpec {
        category: Category::Travel,
        label: "Travel",
        fields: &["destination", "package", "description"],
        share_text: "✈️ My MoodBuy travel inspiration! #MoodBuyPH #TravelPH #YourMoodYourLife",
        system_prompt: r#"You are MoodBuy's travel assistant for Filipinos. Recommend 3-4 travel packages mixing Philippine destinations and international options. Include:
- Destination (Philippine: Boracay, Palawan, Siargao, Baguio, Cebu, Batanes OR International: Japan, Korea, Thailand, Singapore, etc.)
- Package name
- Description
- Why it matches their mood
- Price in Philippine Peso (₱8,500-₱85,000)
- Booking: "Instant confirmation"
- Rating (4.3-5.0)
Context: Traveler from Philippines
Format as JSON: {"recommendations": [{"destination": "", "package": "", "description": "", "reason": "", "price": "₱XXXXX", "delivery": "", "rating": "X.X"}], "moodAnalysis": ""}"#,
    },
];

pub fn spec(category: Category) -> &'static CategorySpec {
    let index = match category {
        Category::Concerts => 0,
        Category::Ootd => 1,
        Category::Cravings => 2,
        Category::Travel => 3,
    };
    &REGISTRY[index]
}

/// Looks a category up by identifier; anything outside the fixed set is `None`
pub fn lookup(id: &str) -> Option<&'static CategorySpec> {
    Category::from_id(id).map(spec)
}

/// Instructions for an identifier, empty for unknown ids (including "home")
pub fn system_prompt(id: &str) -> &'static str {
    lookup(id).map(|spec| spec.system_prompt).unwrap_or("")
}

/// Share message for a tab identifier
pub fn share_text(id: &str) -> &'static str {
    lookup(id)
        .map(|spec| spec.share_text)
        .unwrap_or(GENERIC_SHARE_TEXT)
}

/// Composes the single user message sent to the model.
///
/// `mood` is expected to be non-empty; it is not trimmed or escaped.
pub fn build(category: Category, mood: &str) -> String {
    format!(
        "{}\n\nUser mood/input: \"{}\"",
        spec(category).system_prompt,
        mood
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_covers_every_category_once() {
        for category in Category::ALL {
            let matches = REGISTRY.iter().filter(|s| s.category == category).count();
            assert_eq!(matches, 1, "{} should have exactly one entry", category);
            assert_eq!(spec(category).category, category);
        }
    }

    #[test]
    fn test_build_quotes_mood_and_lists_fields() {
        for category in Category::ALL {
            let prompt = build(category, "x");
            assert!(prompt.contains("\"x\""));
            for field in spec(category).schema_fields() {
                assert!(
                    prompt.contains(&format!("\"{}\"", field)),
                    "{} prompt is missing field {}",
                    category,
                    field
                );
            }
        }
    }

    #[test]
    fn test_build_keeps_mood_verbatim() {
        let mood = "  pagod na \"ako\"  ";
        let prompt = build(Category::Cravings, mood);
        assert!(prompt.ends_with(&format!("User mood/input: \"{}\"", mood)));
        assert!(prompt.starts_with(spec(Category::Cravings).system_prompt));
    }

    #[test]
    fn test_unknown_id_yields_empty_template() {
        assert_eq!(system_prompt("home"), "");
        assert_eq!(system_prompt("gadgets"), "");
        assert!(lookup("gadgets").is_none());
        assert_eq!(system_prompt("travel"), spec(Category::Travel).system_prompt);
    }

    #[test]
    fn test_share_text() {
        assert!(share_text("ootd").contains("#OOTDPH"));
        assert_eq!(share_text("home"), GENERIC_SHARE_TEXT);
    }
}
