//! Input validation utilities
//!
//! Validation functions for command-line parameters, file paths, and SAM tags with
//! consistent error messages. All functions return structured [`CadabraError`]s.

use crate::errors::{CadabraError, Result};
use noodles::sam::alignment::record::data::field::Tag;
use std::path::Path;

/// Validate that a file exists
///
/// # Errors
/// Returns an error if the file does not exist
///
/// # Example
/// ```
/// use cadabra_lib::validation::validate_file_exists;
///
/// let result = validate_file_exists("/nonexistent/file.bam", "Tumor BAM");
/// assert!(result.is_err());
/// ```
pub fn validate_file_exists<P: AsRef<Path>>(path: P, description: &str) -> Result<()> {
    let path_ref = path.as_ref();
    if !path_ref.exists() {
        return Err(CadabraError::InvalidFileFormat {
            file_type: description.to_string(),
            path: path_ref.display().to_string(),
            reason: "File does not exist".to_string(),
        });
    }
    Ok(())
}

/// Validate that multiple files exist, failing on the first missing one.
///
/// # Errors
/// Returns an error for the first file that doesn't exist
pub fn validate_files_exist<P: AsRef<Path>>(files: &[(P, &str)]) -> Result<()> {
    for (path, desc) in files {
        validate_file_exists(path, desc)?;
    }
    Ok(())
}

/// Convert a two-character string to a SAM tag.
///
/// # Errors
/// Returns an error if the tag is not exactly 2 ASCII alphanumeric characters
///
/// # Example
/// ```
/// use cadabra_lib::validation::string_to_tag;
/// use noodles::sam::alignment::record::data::field::Tag;
///
/// let tag = string_to_tag("YA", "contig tag").unwrap();
/// assert_eq!(tag, Tag::new(b'Y', b'A'));
/// assert!(string_to_tag("YAX", "contig tag").is_err());
/// ```
pub fn string_to_tag(tag: &str, name: &str) -> Result<Tag> {
    let bytes = tag.as_bytes();
    if bytes.len() != 2 {
        return Err(CadabraError::InvalidParameter {
            parameter: name.to_string(),
            reason: format!("Tag must be exactly 2 characters, got: '{tag}'"),
        });
    }
    if !bytes[0].is_ascii_alphabetic() || !bytes[1].is_ascii_alphanumeric() {
        return Err(CadabraError::InvalidParameter {
            parameter: name.to_string(),
            reason: format!("Tag must match [A-Za-z][A-Za-z0-9], got: '{tag}'"),
        });
    }
    Ok(Tag::new(bytes[0], bytes[1]))
}

/// Validate that a count-like parameter is at least `min`.
///
/// # Errors
/// Returns an error if `value < min`
pub fn validate_at_least(value: usize, min: usize, name: &str) -> Result<()> {
    if value < min {
        return Err(CadabraError::InvalidParameter {
            parameter: name.to_string(),
            reason: format!("must be >= {min}, got {value}"),
        });
    }
    Ok(())
}
