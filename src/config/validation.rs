use super::schema::Config;
use crate::scoring::validate_end_size;

/// Validate configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if let Err(e) = validate_end_size(config.end_size) {
        errors.push(format!("end_size: {}", e));
    }

    if let Some(size) = config.pad_end_size {
        if let Err(e) = validate_end_size(size) {
            errors.push(format!("pad_end_size: {}", e));
        }
    }

    for (field, path) in [
        ("rounds_file", &config.rounds_file),
        ("classifications_file", &config.classifications_file),
    ] {
        if let Some(path) = path {
            if !path.is_file() {
                errors.push(format!("{}: no such file '{}'", field, path.display()));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
