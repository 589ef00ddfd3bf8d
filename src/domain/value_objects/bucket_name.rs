use crate::domain::errors::ValidationError;

/// A validated bucket name.
///
/// Follows the store's DNS-compatible rules: 3-63 characters drawn from
/// lowercase letters, digits, and non-consecutive hyphens, with alphanumeric
/// boundaries and no IPv4 shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BucketName(String);

impl BucketName {
    pub const MIN_LEN: usize = 3;
    pub const MAX_LEN: usize = 63;

    pub fn new(value: String) -> Result<Self, ValidationError> {
        if value.len() < Self::MIN_LEN || value.len() > Self::MAX_LEN {
            return Err(ValidationError::BucketNameLength {
                actual: value.len(),
            });
        }

        if Self::ip_shaped(&value) {
            return Err(ValidationError::BucketNameIpForm);
        }

        let bytes = value.as_bytes();
        let boundary = |b: u8| b.is_ascii_lowercase() || b.is_ascii_digit();
        if !boundary(bytes[0]) || !boundary(bytes[bytes.len() - 1]) {
            return Err(ValidationError::BucketNameBoundary);
        }

        for (i, &b) in bytes.iter().enumerate() {
            match b {
                b'a'..=b'z' | b'0'..=b'9' => {}
                b'-' => {
                    if bytes.get(i + 1) == Some(&b'-') {
                        return Err(ValidationError::BucketNameDoubleHyphen);
                    }
                }
                other => return Err(ValidationError::BucketNameCharacter(other as char)),
            }
        }

        Ok(Self(value))
    }

    /// Get the bucket name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    // Four dot-separated octets, e.g. "192.168.1.1"
    fn ip_shaped(s: &str) -> bool {
        let mut parts = 0;
        for part in s.split('.') {
            if part.parse::<u8>().is_err() {
                return false;
            }
            parts += 1;
        }
        parts == 4
    }
}

impl std::fmt::Display for BucketName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_dns_compatible_names() {
        assert!(BucketName::new("my-bucket".to_string()).is_ok());
        assert!(BucketName::new("bucket123".to_string()).is_ok());
        assert!(BucketName::new("123bucket".to_string()).is_ok());
    }

    #[test]
    fn test_rejects_bad_lengths() {
        assert!(BucketName::new("ab".to_string()).is_err());
        assert!(BucketName::new("a".repeat(64)).is_err());
    }

    #[test]
    fn test_rejects_bad_boundaries_and_characters() {
        assert!(BucketName::new("-bucket".to_string()).is_err());
        assert!(BucketName::new("bucket-".to_string()).is_err());
        assert!(BucketName::new("Bucket".to_string()).is_err());
        assert!(BucketName::new("my_bucket".to_string()).is_err());
        assert!(BucketName::new("my--bucket".to_string()).is_err());
    }

    #[test]
    fn test_rejects_ip_shaped_names() {
        assert_eq!(
            BucketName::new("192.168.1.1".to_string()),
            Err(ValidationError::BucketNameIpForm)
        );
        // Dotted but not an IP still fails on the character rule
        assert_eq!(
            BucketName::new("my.bucket".to_string()),
            Err(ValidationError::BucketNameCharacter('.'))
        );
    }
}
