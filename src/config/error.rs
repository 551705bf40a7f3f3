//! Configuration errors.

use thiserror::Error;

/// Errors raised while loading or validating configuration.
///
/// All of these are fatal at construction time; nothing in the crate retries.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The YAML did not parse, a required field was missing, or a category
    /// name was unknown
    #[error("Parse error: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// Fan sensor angles are reversed
    #[error("{section}: angle_min ({min}) must not exceed angle_max ({max})")]
    ReversedAngles {
        /// Section name
        section: &'static str,
        /// Configured minimum angle
        min: f32,
        /// Configured maximum angle
        max: f32,
    },

    /// A numeric parameter is outside its valid range
    #[error("{section}.{field} = {value}: {reason}")]
    InvalidValue {
        /// Section name
        section: &'static str,
        /// Field name
        field: &'static str,
        /// Offending value
        value: f32,
        /// What the value must satisfy
        reason: &'static str,
    },

    /// The selected behavior reads a section that is not configured
    #[error("{section} section is required by the {required_by} behavior")]
    MissingSection {
        /// Missing section name
        section: &'static str,
        /// Behavior kind that reads it
        required_by: &'static str,
    },

    /// A category mask that must name at least one category is empty
    #[error("{section}.{field}: mask must name at least one category")]
    EmptyMask {
        /// Section name
        section: &'static str,
        /// Field name
        field: &'static str,
    },
}

impl ConfigError {
    /// Short error code for logging.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Io(_) => "IO",
            Self::Parse(_) => "PARSE",
            Self::ReversedAngles { .. } => "REVERSED_ANGLES",
            Self::InvalidValue { .. } => "INVALID_VALUE",
            Self::EmptyMask { .. } => "EMPTY_MASK",
            Self::MissingSection { .. } => "MISSING_SECTION",
        }
    }
}

/// Reject non-finite values.
pub(crate) fn require_finite(
    section: &'static str,
    field: &'static str,
    value: f32,
) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            section,
            field,
            value,
            reason: "must be finite",
        })
    }
}

/// Reject negative or non-finite values.
pub(crate) fn require_non_negative(
    section: &'static str,
    field: &'static str,
    value: f32,
) -> Result<(), ConfigError> {
    require_finite(section, field, value)?;
    if value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            section,
            field,
            value,
            reason: "must not be negative",
        })
    }
}

/// Reject zero, negative or non-finite values.
pub(crate) fn require_positive(
    section: &'static str,
    field: &'static str,
    value: f32,
) -> Result<(), ConfigError> {
    require_finite(section, field, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            section,
            field,
            value,
            reason: "must be positive",
        })
    }
}

/// Reject probabilities outside [0, 1].
pub(crate) fn require_probability(
    section: &'static str,
    field: &'static str,
    value: f32,
) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            section,
            field,
            value,
            reason: "must be a probability in [0, 1]",
        })
    }
}
