use regex::Regex;

use crate::shared::errors::AppError;

pub struct Validator;

impl Validator {
    pub fn validate_movie_title(title: &str) -> Result<(), AppError> {
        if title.trim().is_empty() {
            return Err(AppError::ValidationError(
                "Title cannot be empty".to_string(),
            ));
        }
        if title.len() > 255 {
            return Err(AppError::ValidationError(
                "Title too long (max 255 characters)".to_string(),
            ));
        }
        Ok(())
    }

    pub fn validate_character_name(name: &str) -> Result<(), AppError> {
        if name.trim().is_empty() {
            return Err(AppError::ValidationError(
                "Character name cannot be empty".to_string(),
            ));
        }
        if name.len() > 255 {
            return Err(AppError::ValidationError(
                "Character name too long (max 255 characters)".to_string(),
            ));
        }
        Ok(())
    }

    pub fn validate_reference_name(kind: &str, name: &str, max_len: usize) -> Result<(), AppError> {
        if name.trim().is_empty() {
            return Err(AppError::ValidationError(format!(
                "{} name cannot be empty",
                kind
            )));
        }
        if name.len() > max_len {
            return Err(AppError::ValidationError(format!(
                "{} name too long (max {} characters)",
                kind, max_len
            )));
        }
        Ok(())
    }

    /// Uploaded poster/picture extensions: short lowercase alphanumeric ("jpg", "png", "webp")
    pub fn validate_asset_extension(extension: &str) -> Result<(), AppError> {
        let re = Regex::new(r"^[a-z0-9]{1,8}$").unwrap();
        if !re.is_match(extension) {
            return Err(AppError::ValidationError(format!(
                "Invalid asset file extension '{}'",
                extension
            )));
        }
        Ok(())
    }
}
