use crate::utils::error::{Result, ToolError};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(ToolError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(ToolError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

/// A single directory or file name: a path without separators or `..`.
pub fn validate_path_component(field_name: &str, name: &str) -> Result<()> {
    validate_path(field_name, name)?;

    if name.contains('/') || name.contains('\\') {
        return Err(ToolError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: name.to_string(),
            reason: "Must be a single name, not a path".to_string(),
        });
    }

    if name == "." || name == ".." {
        return Err(ToolError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: name.to_string(),
            reason: "Relative directory markers are not allowed".to_string(),
        });
    }

    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(ToolError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

pub fn validate_one_of(field_name: &str, value: &str, allowed: &[&str]) -> Result<()> {
    if !allowed.contains(&value) {
        return Err(ToolError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Valid values: {}", allowed.join(", ")),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_path() {
        assert!(validate_path("batch.root_dir", "PR-DIV").is_ok());
        assert!(validate_path("batch.root_dir", "").is_err());
        assert!(validate_path("batch.root_dir", "bad\0path").is_err());
    }

    #[test]
    fn test_validate_path_component() {
        assert!(validate_path_component("batch.marker_dir", "TAK").is_ok());
        assert!(validate_path_component("batch.marker_dir", "a/TAK").is_err());
        assert!(validate_path_component("batch.marker_dir", "..").is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("render.module_size", 10u32, 1, 100).is_ok());
        assert!(validate_range("render.module_size", 0u32, 1, 100).is_err());
        assert!(validate_range("render.quiet_zone", 101u32, 0, 100).is_err());
    }

    #[test]
    fn test_validate_one_of() {
        assert!(validate_one_of("log_format", "json", &["compact", "json"]).is_ok());
        assert!(validate_one_of("log_format", "xml", &["compact", "json"]).is_err());
    }
}
