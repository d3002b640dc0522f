use serde::{Deserialize, Serialize};

pub const DEFAULT_ADDRESS: &str = "Metro Manila, Philippines";

/// Points earned per successful analysis
pub const ANALYSIS_REWARD: u64 = 10;

/// Shopper progress and delivery details
///
/// `streak` counts successful analyses. The storefront labels it in days,
/// but nothing here tracks calendar days and it never resets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub score: u64,
    pub streak: u64,
    pub address: String,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            score: 0,
            streak: 0,
            address: DEFAULT_ADDRESS.to_string(),
        }
    }
}

impl SessionState {
    /// Credits one successful analysis
    pub fn record_success(&mut self) {
        self.score = self.score.saturating_add(ANALYSIS_REWARD);
        self.streak = self.streak.saturating_add(1);
    }

    pub fn has_address(&self) -> bool {
        !self.address.trim().is_empty()
    }
}
