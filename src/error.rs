//! Field-specific error types.
//!
//! The animation itself has no recoverable error states; these errors come from
//! the edges: reading and validating `assets/field.toml`, and rejecting a
//! degenerate surface extent.  Callers log them and fall back to defaults.

use std::fmt;

/// Top-level error enum for the starfield crate.
#[derive(Debug)]
pub enum FieldError {
    /// The config file exists but could not be read.
    ConfigRead {
        path: String,
        source: std::io::Error,
    },

    /// The config file is not valid TOML or has mistyped keys.
    ConfigParse {
        path: String,
        source: toml::de::Error,
    },

    /// A tuning constant is outside its safe operating range.
    UnsafeConstant {
        /// Name of the constant (for logging).
        name: &'static str,
        /// The value that was rejected.
        value: f32,
        /// Human-readable description of the safe range.
        safe_range: &'static str,
    },

    /// A `[min, max]` pair has `min > max`.
    InvertedRange {
        name: &'static str,
        min: f32,
        max: f32,
    },

    /// A drawing surface with a zero, negative or non-finite side.
    InvalidExtent { width: f32, height: f32 },
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldError::ConfigRead { path, source } => {
                write!(f, "failed to read {}: {}", path, source)
            }
            FieldError::ConfigParse { path, source } => {
                write!(f, "failed to parse {}: {}", path, source)
            }
            FieldError::UnsafeConstant {
                name,
                value,
                safe_range,
            } => write!(
                f,
                "constant '{}' = {} is outside safe range {}",
                name, value, safe_range
            ),
            FieldError::InvertedRange { name, min, max } => {
                write!(f, "range '{}' is inverted: min {} > max {}", name, min, max)
            }
            FieldError::InvalidExtent { width, height } => {
                write!(f, "surface extent {}×{} is not drawable", width, height)
            }
        }
    }
}

impl std::error::Error for FieldError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FieldError::ConfigRead { source, .. } => Some(source),
            FieldError::ConfigParse { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience alias: a `Result` using `FieldError` as the error type.
pub type FieldResult<T> = Result<T, FieldError>;

// ── Validation helpers ────────────────────────────────────────────────────────

/// Returns an error unless `value` is finite and strictly positive.
pub fn validate_positive(name: &'static str, value: f32) -> FieldResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(FieldError::UnsafeConstant {
            name,
            value,
            safe_range: "(0.0, ∞)",
        })
    }
}

/// Returns an error unless `value` lies in the closed unit interval.
pub fn validate_unit(name: &'static str, value: f32) -> FieldResult<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(FieldError::UnsafeConstant {
            name,
            value,
            safe_range: "[0.0, 1.0]",
        })
    }
}

/// Returns an error if `min > max` or either bound is not finite.
pub fn validate_range(name: &'static str, min: f32, max: f32) -> FieldResult<()> {
    if !min.is_finite() || !max.is_finite() || min > max {
        Err(FieldError::InvertedRange { name, min, max })
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_rejects_zero_and_nan() {
        assert!(validate_positive("x", 0.0).is_err());
        assert!(validate_positive("x", f32::NAN).is_err());
        assert!(validate_positive("x", 0.5).is_ok());
    }

    #[test]
    fn unit_accepts_bounds() {
        assert!(validate_unit("easing", 0.0).is_ok());
        assert!(validate_unit("easing", 1.0).is_ok());
        assert!(validate_unit("easing", 1.01).is_err());
    }

    #[test]
    fn inverted_range_message_names_the_range() {
        let err = validate_range("spark_outer_radius", 150.0, 50.0).unwrap_err();
        assert!(err.to_string().contains("spark_outer_radius"));
    }
}
