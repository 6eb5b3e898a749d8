//! Configurable limits for bounded decoding.

/// Limits enforced while decoding object-update blocks.
///
/// These bound the variable-length fields of a block so a malformed or
/// hostile block cannot force unbounded allocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeLimits {
    /// Maximum size of a texture entry in bytes.
    pub max_texture_entry_bytes: usize,

    /// Maximum number of name-value lines per object.
    pub max_name_values: usize,

    /// Maximum size of floating text or media URL fields.
    pub max_text_bytes: usize,

    /// Maximum number of extra parameter entries.
    pub max_extra_params: usize,
}

impl Default for DecodeLimits {
    fn default() -> Self {
        Self {
            // 32 faces with every section overridden stays well below this
            max_texture_entry_bytes: 4 * 1024,
            max_name_values: 64,
            max_text_bytes: 1024,
            max_extra_params: 16,
        }
    }
}

impl DecodeLimits {
    /// Creates limits suitable for testing with smaller values.
    #[must_use]
    pub const fn for_testing() -> Self {
        Self {
            max_texture_entry_bytes: 1024,
            max_name_values: 8,
            max_text_bytes: 64,
            max_extra_params: 4,
        }
    }

    /// Creates limits with no restrictions (use with caution).
    #[must_use]
    pub const fn unlimited() -> Self {
        Self {
            max_texture_entry_bytes: usize::MAX,
            max_name_values: usize::MAX,
            max_text_bytes: usize::MAX,
            max_extra_params: usize::MAX,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn testing_limits_smaller() {
        let test_limits = DecodeLimits::for_testing();
        let default_limits = DecodeLimits::default();

        assert!(test_limits.max_texture_entry_bytes < default_limits.max_texture_entry_bytes);
        assert!(test_limits.max_name_values < default_limits.max_name_values);
        assert!(test_limits.max_text_bytes < default_limits.max_text_bytes);
    }

    #[test]
    fn unlimited_limits() {
        let limits = DecodeLimits::unlimited();
        assert_eq!(limits.max_texture_entry_bytes, usize::MAX);
        assert_eq!(limits.max_name_values, usize::MAX);
    }

    #[test]
    fn limits_const_constructible() {
        const LIMITS: DecodeLimits = DecodeLimits::for_testing();
        assert_eq!(LIMITS.max_name_values, 8);
    }
}
