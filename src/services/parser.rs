//! Response parser
//!
//! The model wraps its JSON in prose. We take everything from the first `{`
//! to the last `}`, decode it, and project each entry of `recommendations`
//! into the category's record. Missing or oddly-typed fields become `None`;
//! only the absence of a decodable object is an error.

use serde_json::{Map, Value};

use crate::{
    error::{AppError, AppResult},
    models::{
        Category, CommonFields, ConcertPick, CravingPick, OutfitPick, Recommendation,
        RecommendationSet, TripPick,
    },
};

/// Greedy span from the first `{` to the last `}`
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

pub fn parse(raw: &str, category: Category) -> AppResult<RecommendationSet> {
    let json = extract_json_object(raw).ok_or_else(|| {
        AppError::MalformedResponse("No JSON object found in model output".to_string())
    })?;

    let value: Value = serde_json::from_str(json).map_err(|e| {
        tracing::debug!(error = %e, "Model output JSON failed to decode");
        AppError::MalformedResponse(format!("Failed to decode model JSON: {}", e))
    })?;

    // a balanced {...} span can only decode to an object
    let object = value.as_object().ok_or_else(|| {
        AppError::MalformedResponse("Model output is not a JSON object".to_string())
    })?;

    let entries = object
        .get("recommendations")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    let recommendations: Vec<Recommendation> = entries
        .iter()
        .filter_map(|entry| match entry.as_object() {
            Some(fields) => Some(project(fields, category)),
            None => {
                tracing::warn!(category = %category, "Skipping non-object recommendation entry");
                None
            }
        })
        .collect();

    if !(3..=4).contains(&recommendations.len()) {
        tracing::debug!(
            category = %category,
            count = recommendations.len(),
            "Model returned an unexpected number of recommendations"
        );
    }

    Ok(RecommendationSet {
        category,
        recommendations,
        mood_analysis: text(object, "moodAnalysis"),
    })
}

fn project(fields: &Map<String, Value>, category: Category) -> Recommendation {
    let common = CommonFields {
        reason: text(fields, "reason"),
        price: text(fields, "price").or_else(|| text(fields, "budget")),
        delivery: text(fields, "delivery"),
        rating: text(fields, "rating"),
    };

    match category {
        Category::Concerts => Recommendation::Concert(ConcertPick {
            artist: text(fields, "artist"),
            venue: text(fields, "venue"),
            date: text(fields, "date"),
            genre: text(fields, "genre"),
            common,
        }),
        Category::Ootd => Recommendation::Outfit(OutfitPick {
            product: text(fields, "product"),
            brand: text(fields, "brand"),
            description: text(fields, "description"),
            common,
        }),
        Category::Cravings => Recommendation::Craving(CravingPick {
            restaurant: text(fields, "restaurant"),
            dish: text(fields, "dish"),
            description: text(fields, "description"),
            common,
        }),
        Category::Travel => Recommendation::Trip(TripPick {
            destination: text(fields, "destination"),
            package: text(fields, "package"),
            description: text(fields, "description"),
            common,
        }),
    }
}

/// Scalar field as text; numbers and booleans are stringified, the rest is `None`
fn text(fields: &Map<String, Value>, key: &str) -> Option<String> {
    match fields.get(key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
