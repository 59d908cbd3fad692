//! Semantic validation of loaded settings.

use crate::settings::Settings;
use mp_archive::PATH_PLACEHOLDER;
use thiserror::Error;

/// Validation result type.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Configuration validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Missing required field: {0}")]
    MissingField(String),
}

impl ValidationError {
    fn invalid(field: &str, message: impl Into<String>) -> Self {
        ValidationError::InvalidValue {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Validate settings semantically.
pub fn validate_settings(settings: &Settings) -> ValidationResult<()> {
    validate_template("markers.start", &settings.markers.start)?;
    validate_template("markers.end", &settings.markers.end)?;

    if settings.markers.start == settings.markers.end {
        return Err(ValidationError::invalid(
            "markers.end",
            "start and end templates must differ",
        ));
    }

    // Let the archive crate have the final say on anything left.
    settings
        .markers
        .marker_set()
        .map_err(|e| ValidationError::invalid("markers", e.to_string()))?;

    if settings.split.archive.as_os_str().is_empty() {
        return Err(ValidationError::MissingField("split.archive".to_string()));
    }
    if settings.split.output_dir.as_os_str().is_empty() {
        return Err(ValidationError::MissingField("split.output_dir".to_string()));
    }
    if settings.pack.output.as_os_str().is_empty() {
        return Err(ValidationError::MissingField("pack.output".to_string()));
    }

    for (index, entry) in settings.pack.include.iter().enumerate() {
        if entry.trim().is_empty() {
            return Err(ValidationError::invalid(
                &format!("pack.include[{index}]"),
                "empty path",
            ));
        }
    }

    Ok(())
}

fn validate_template(field: &str, template: &str) -> ValidationResult<()> {
    match template.matches(PATH_PLACEHOLDER).count() {
        0 => Err(ValidationError::invalid(
            field,
            format!("missing {PATH_PLACEHOLDER} placeholder"),
        )),
        1 => {
            let literal = template.replace(PATH_PLACEHOLDER, "");
            if literal.trim().is_empty() {
                Err(ValidationError::invalid(
                    field,
                    "template needs literal text around the path",
                ))
            } else {
                Ok(())
            }
        }
        n => Err(ValidationError::invalid(
            field,
            format!("{PATH_PLACEHOLDER} appears {n} times, expected once"),
        )),
    }
}
