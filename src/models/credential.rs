use std::fmt;

/// API key for the recommendation service
///
/// Only ever leaves the process as a request header. `Debug` is redacted and
/// there is deliberately no `Display`.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Surrounding whitespace is dropped, it is never part of a key
    pub fn new(secret: impl Into<String>) -> Self {
        let secret = secret.into();
        Self(secret.trim().to_string())
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_is_redacted() {
        let credential = Credential::new("sk-ant-secret");
        let debug = format!("{:?}", credential);
        assert!(!debug.contains("sk-ant-secret"));
        assert_eq!(debug, "Credential(***)");
    }

    #[test]
    fn test_surrounding_whitespace_is_trimmed() {
        assert_eq!(Credential::new("  sk-ant-secret\n").expose(), "sk-ant-secret");
        assert!(Credential::new(" \t ").is_blank());
    }

    #[test]
    fn test_blank_detection() {
        assert!(Credential::new("   ").is_blank());
        assert!(!Credential::new("sk-ant").is_blank());
    }
}
