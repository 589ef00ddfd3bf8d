use crate::domain::errors::ValidationError;

/// A validated object key (path) in the storage system
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectKey(String);

impl ObjectKey {
    pub const MAX_LEN: usize = 1024;

    pub fn new(value: String) -> Result<Self, ValidationError> {
        if value.is_empty() {
            return Err(ValidationError::ObjectKeyEmpty);
        }
        if value.len() > Self::MAX_LEN {
            return Err(ValidationError::ObjectKeyLength {
                actual: value.len(),
            });
        }
        if value.contains('\0') {
            return Err(ValidationError::ObjectKeyCharacter('\0'));
        }
        if value.starts_with('/') || value.contains("//") {
            return Err(ValidationError::ObjectKeySlashes);
        }

        Ok(Self(value))
    }

    /// Get the key as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this key falls under a listing prefix.
    ///
    /// Prefix matching is broader than equality: "logs" matches both "logs"
    /// and "logs-old".
    pub fn has_prefix(&self, prefix: &str) -> bool {
        self.0.starts_with(prefix)
    }
}

impl std::fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_nested_paths() {
        assert!(ObjectKey::new("file.txt".to_string()).is_ok());
        assert!(ObjectKey::new("folder/file.txt".to_string()).is_ok());
        assert!(ObjectKey::new("deep/folder/structure/file.txt".to_string()).is_ok());
    }

    #[test]
    fn test_rejects_malformed_keys() {
        assert!(ObjectKey::new("".to_string()).is_err());
        assert!(ObjectKey::new("/leading-slash".to_string()).is_err());
        assert!(ObjectKey::new("double//slash".to_string()).is_err());
        assert!(ObjectKey::new("null\0byte".to_string()).is_err());
        assert!(ObjectKey::new("x".repeat(1025)).is_err());
    }

    #[test]
    fn test_prefix_is_not_exact_match() {
        let sibling = ObjectKey::new("logs-old".to_string()).unwrap();
        assert!(sibling.has_prefix("logs"));
        assert_ne!(sibling.as_str(), "logs");
    }
}
