use std::fmt::Display;

use crate::models::Category;

/// Identifies one analysis request; later requests get larger numbers
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestSeq(pub u64);

impl Display for RequestSeq {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Monotonic source of [`RequestSeq`] values
#[derive(Debug, Default)]
pub struct SequenceCounter {
    last: u64,
}

impl SequenceCounter {
    pub fn issue(&mut self) -> RequestSeq {
        self.last += 1;
        RequestSeq(self.last)
    }
}

/// Span wrapping everything done for one analysis
pub fn analysis_span(seq: RequestSeq, category: Category) -> tracing::Span {
    tracing::info_span!("analysis", seq = %seq, category = %category)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_is_monotonic() {
        let mut counter = SequenceCounter::default();
        let first = counter.issue();
        let second = counter.issue();
        assert_eq!(first, RequestSeq(1));
        assert!(second > first);
    }

    #[test]
    fn test_display() {
        assert_eq!(RequestSeq(7).to_string(), "#7");
    }
}
