/// Validation errors for domain value objects
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    // BucketName
    BucketNameLength { actual: usize },
    BucketNameBoundary,
    BucketNameCharacter(char),
    BucketNameDoubleHyphen,
    BucketNameIpForm,

    // ObjectKey
    ObjectKeyEmpty,
    ObjectKeyLength { actual: usize },
    ObjectKeyCharacter(char),
    ObjectKeySlashes,

    // VersionId
    VersionIdEmpty,
    VersionIdLength { actual: usize },
    VersionIdCharacter(char),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::BucketNameLength { actual } => {
                write!(
                    f,
                    "Bucket name must be between 3 and 63 characters (got {})",
                    actual
                )
            }
            ValidationError::BucketNameBoundary => {
                write!(
                    f,
                    "Bucket name must begin and end with a lowercase letter or digit"
                )
            }
            ValidationError::BucketNameCharacter(c) => {
                write!(
                    f,
                    "Bucket name contains '{}'; only lowercase letters, digits, and hyphens are allowed",
                    c
                )
            }
            ValidationError::BucketNameDoubleHyphen => {
                write!(f, "Bucket name cannot contain '--'")
            }
            ValidationError::BucketNameIpForm => {
                write!(f, "Bucket name cannot take the form of an IP address")
            }

            ValidationError::ObjectKeyEmpty => write!(f, "Object key cannot be empty"),
            ValidationError::ObjectKeyLength { actual } => {
                write!(f, "Object key exceeds 1024 bytes (got {})", actual)
            }
            ValidationError::ObjectKeyCharacter(c) => {
                write!(f, "Object key contains forbidden character {:?}", c)
            }
            ValidationError::ObjectKeySlashes => {
                write!(f, "Object key cannot begin with '/' or contain '//'")
            }

            ValidationError::VersionIdEmpty => write!(f, "Version id cannot be empty"),
            ValidationError::VersionIdLength { actual } => {
                write!(f, "Version id exceeds 1024 characters (got {})", actual)
            }
            ValidationError::VersionIdCharacter(c) => {
                write!(
                    f,
                    "Version id contains '{}'; expected alphanumerics, '-', '_', or '.'",
                    c
                )
            }
        }
    }
}

impl std::error::Error for ValidationError {}
