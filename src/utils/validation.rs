use validator::Validate;

use crate::errors::AppError;

pub const MAX_DESCRIPTION_CHARS: usize = 400;

pub fn validate_payload<T: Validate>(payload: &T) -> Result<(), AppError> {
    payload.validate().map_err(AppError::from)
}

/// Accepts a file name usable as the last segment of an object key.
pub fn check_file_name(file_name: &str) -> Result<String, AppError> {
    let name = file_name.trim();
    if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
        return Err(AppError::bad_request_with(
            format!("Please check the File name. Invalid file name {:?}", file_name),
            "Please provide file name in alphanumeric format",
        ));
    }
    Ok(name.to_string())
}

pub fn check_description(description: &str) -> Result<(), AppError> {
    if description.is_empty() {
        return Err(AppError::bad_request_with(
            "File description is empty. Cannot update empty file description",
            "Expected non empty file description",
        ));
    }
    if description.chars().count() > MAX_DESCRIPTION_CHARS {
        return Err(AppError::bad_request_with(
            "File description is too lengthy. Cannot update file description",
            format!(
                "File description should be less than {} characters",
                MAX_DESCRIPTION_CHARS
            ),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_names_with_separators_are_rejected() {
        assert!(check_file_name("../etc/passwd").is_err());
        assert!(check_file_name("a\\b").is_err());
        assert!(check_file_name("   ").is_err());
        assert!(check_file_name("..").is_err());
        assert_eq!(check_file_name(" notes v2.txt ").unwrap(), "notes v2.txt");
    }

    #[test]
    fn inner_dots_are_allowed() {
        assert_eq!(check_file_name("a..b.txt").unwrap(), "a..b.txt");
        assert_eq!(check_file_name(".env").unwrap(), ".env");
        assert!(check_file_name(" . ").is_err());
        assert!(check_file_name("a/../b").is_err());
    }

    #[test]
    fn description_bounds() {
        assert!(check_description("").is_err());
        assert!(check_description(&"x".repeat(MAX_DESCRIPTION_CHARS)).is_ok());
        assert!(check_description(&"x".repeat(MAX_DESCRIPTION_CHARS + 1)).is_err());
    }
}
