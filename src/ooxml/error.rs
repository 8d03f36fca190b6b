/// Error types for presentation authoring and animation scheduling.
use thiserror::Error;

/// Result type for OOXML operations.
pub type Result<T> = std::result::Result<T, OoxmlError>;

/// Error types for OOXML operations.
///
/// Every variant describes an authoring or configuration defect. Nothing here is
/// transient, so callers should surface the error instead of retrying.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OoxmlError {
    /// Malformed option string (unterminated quote, `::`, a value with no key)
    #[error("option syntax error at `{fragment}`: {reason}")]
    ConfigSyntax { fragment: String, reason: &'static str },

    /// Option key not understood by the target and not claimed by its fallback hook
    #[error("unknown option: {0}")]
    UnknownOption(String),

    /// Recognised option key with a value that cannot be used
    #[error("invalid value `{value}` for option `{key}`")]
    InvalidValue { key: String, value: String },

    /// Effect name not present in the effect registry
    #[error("unknown effect kind: {0}")]
    UnknownEffectKind(String),

    /// Trigger outside {onClick, afterPrev, withPrev}, or an unschedulable trigger sequence
    #[error("invalid trigger: {0}")]
    InvalidTrigger(String),

    /// Animation or motion requested for a shape the slide does not own
    #[error("shape {0} is not attached to this slide")]
    NotAttached(u32),

    /// Configuration file could not be loaded
    #[error("configuration error: {0}")]
    Config(String),

    /// Markup could not be written
    #[error("XML error: {0}")]
    Xml(String),
}

impl OoxmlError {
    pub(crate) fn syntax(fragment: &str, reason: &'static str) -> Self {
        OoxmlError::ConfigSyntax {
            fragment: fragment.to_string(),
            reason,
        }
    }

    pub(crate) fn invalid_value(key: &str, value: &str) -> Self {
        OoxmlError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        }
    }
}

impl From<std::fmt::Error> for OoxmlError {
    fn from(err: std::fmt::Error) -> Self {
        OoxmlError::Xml(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_offending_input() {
        assert_eq!(
            OoxmlError::UnknownOption("bogus".into()).to_string(),
            "unknown option: bogus"
        );
        assert!(
            OoxmlError::syntax("a::b", "consecutive colons")
                .to_string()
                .contains("`a::b`")
        );
        assert_eq!(
            OoxmlError::NotAttached(7).to_string(),
            "shape 7 is not attached to this slide"
        );
    }
}
