use crate::domain::errors::ValidationError;

/// A unique identifier for an object version.
///
/// Unversioned stores report the literal id "null"; that is a valid value
/// here and is carried through deletes unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VersionId(String);

impl VersionId {
    pub const MAX_LEN: usize = 1024;

    pub fn new(value: String) -> Result<Self, ValidationError> {
        if value.is_empty() {
            return Err(ValidationError::VersionIdEmpty);
        }
        if value.len() > Self::MAX_LEN {
            return Err(ValidationError::VersionIdLength {
                actual: value.len(),
            });
        }

        let bad = value
            .chars()
            .find(|c| !c.is_alphanumeric() && !matches!(c, '-' | '_' | '.'));
        match bad {
            Some(c) => Err(ValidationError::VersionIdCharacter(c)),
            None => Ok(Self(value)),
        }
    }

    /// Generate a new unique version ID
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Get the version ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for VersionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
