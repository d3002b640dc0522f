use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::iter::Sum;
use std::ops::Add;
use uuid::Uuid;

use super::{Category, Recommendation};

/// Peso amount stored as whole centavos
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount(i64);

impl Amount {
    pub const ZERO: Amount = Amount(0);

    pub fn from_centavos(centavos: i64) -> Self {
        Self(centavos)
    }

    pub fn centavos(&self) -> i64 {
        self.0
    }

    pub fn as_pesos(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Pulls the first number out of a display price.
    ///
    /// Currency symbols and words are skipped. A comma only counts as a
    /// thousands separator when exactly three digits follow it, and only one
    /// decimal point is accepted, so "₱1,500.50" is 1500.50 and a range like
    /// "₱800-₱8,500" yields 800. A bare leading point reads as a fraction
    /// ("₱.99" is 0.99). Anything without a digit is zero.
    pub fn parse_price(text: &str) -> Amount {
        let chars: Vec<char> = text.chars().collect();
        let Some(start) = chars.iter().position(|c| c.is_ascii_digit()) else {
            return Amount::ZERO;
        };

        let mut number = String::new();
        let mut seen_decimal = false;
        if start > 0 && chars[start - 1] == '.' {
            number.push_str("0.");
            seen_decimal = true;
        }
        let mut i = start;

        while i < chars.len() {
            let c = chars[i];
            if c.is_ascii_digit() {
                number.push(c);
            } else if c == ',' && !seen_decimal && is_thousands_group(&chars, i + 1) {
                // separator, digits follow
            } else if c == '.' && !seen_decimal && chars.get(i + 1).is_some_and(char::is_ascii_digit)
            {
                seen_decimal = true;
                number.push('.');
            } else {
                break;
            }
            i += 1;
        }

        number
            .parse::<f64>()
            .map(|pesos| Amount((pesos * 100.0).round() as i64))
            .unwrap_or(Amount::ZERO)
    }
}

fn is_thousands_group(chars: &[char], at: usize) -> bool {
    (0..3).all(|k| chars.get(at + k).is_some_and(char::is_ascii_digit))
        && !chars.get(at + 3).is_some_and(char::is_ascii_digit)
}

impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Amount) -> Amount {
        Amount(self.0.saturating_add(rhs.0))
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Amount>>(iter: I) -> Amount {
        iter.fold(Amount::ZERO, Add::add)
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "₱{}.{:02}", self.0 / 100, (self.0 % 100).abs())
    }
}

/// A recommendation the shopper chose to buy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: Uuid,
    pub category: Category,
    pub item: Recommendation,
    pub added_at: DateTime<Utc>,
}

impl CartItem {
    pub fn new(item: Recommendation, category: Category) -> Self {
        Self {
            id: Uuid::new_v4(),
            category,
            item,
            added_at: Utc::now(),
        }
    }

    /// Parsed price, zero when the pick carries none
    pub fn amount(&self) -> Amount {
        self.item
            .price()
            .map(Amount::parse_price)
            .unwrap_or(Amount::ZERO)
    }
}

/// Receipt returned by a successful checkout
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderConfirmation {
    pub total: Amount,
    pub destination: String,
    pub item_count: usize,
    pub placed_at: DateTime<Utc>,
}

impl OrderConfirmation {
    pub fn message(&self) -> String {
        format!(
            "Order placed! 🎉\nTotal: {}\nDelivering to: {}\n\nSalamat for using MoodBuy! 💜",
            self.total, self.destination
        )
    }
}
