//! Validation helpers for configuration values

pub use crate::error::ValidationError;
use std::path::Path;

/// A config section that can check and merge itself
pub trait ConfigSection: Default {
    /// Returns every problem found; `Ok` means valid
    fn validate(&self) -> Result<(), Vec<ValidationError>>;

    /// Merges another section into this one. Values from `other` win.
    fn merge(&mut self, other: Self);

    /// Name of the TOML table this section lives in
    fn section_name(&self) -> &'static str;
}

/// Field checks shared by the config sections
pub struct Validator;

impl Validator {
    /// Checks that a value lies in `min..=max`
    pub fn in_range<T>(value: T, min: T, max: T, field: &str) -> Result<(), ValidationError>
    where
        T: PartialOrd + std::fmt::Display + Copy,
    {
        if (min..=max).contains(&value) {
            return Ok(());
        }
        Err(ValidationError::with_value(
            field,
            format!("must be between {} and {}", min, max),
            value,
        ))
    }

    pub fn not_empty(value: &str, field: &str) -> Result<(), ValidationError> {
        match value.trim() {
            "" => Err(ValidationError::new(field, "must not be empty")),
            _ => Ok(()),
        }
    }

    /// Checks that a path has at least one non-whitespace character
    pub fn path_not_empty(path: &Path, field: &str) -> Result<(), ValidationError> {
        Self::not_empty(&path.to_string_lossy(), field)
    }

    pub fn one_of<T>(value: &T, allowed: &[T], field: &str) -> Result<(), ValidationError>
    where
        T: PartialEq + std::fmt::Display,
    {
        if allowed.iter().any(|candidate| candidate == value) {
            return Ok(());
        }
        let choices: Vec<String> = allowed.iter().map(ToString::to_string).collect();
        Err(ValidationError::with_value(
            field,
            format!("must be one of: {}", choices.join(", ")),
            value,
        ))
    }

    /// Gathers the failures from several checks
    pub fn collect_errors<I>(results: I) -> Result<(), Vec<ValidationError>>
    where
        I: IntoIterator<Item = Result<(), ValidationError>>,
    {
        let errors: Vec<ValidationError> = results.into_iter().filter_map(Result::err).collect();
        match errors.is_empty() {
            true => Ok(()),
            false => Err(errors),
        }
    }
}
