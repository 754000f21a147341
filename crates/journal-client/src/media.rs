//! Pre-upload checks for chart images.

use journal_core::defaults::MAX_IMAGE_BYTES;
use journal_core::{Error, Result};

/// Accept only image MIME types no larger than 4 MiB.
pub fn validate_image(content_type: &str, size: u64) -> Result<()> {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    if !essence.starts_with("image/") || essence.len() == "image/".len() {
        return Err(Error::InvalidInput("Please select an image file".to_string()));
    }
    if size > MAX_IMAGE_BYTES {
        return Err(Error::InvalidInput(
            "File size must be less than 4MB".to_string(),
        ));
    }
    Ok(())
}

/// Human-readable byte count, e.g. `1.5 MB`.
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    let rounded = (value * 100.0).round() / 100.0;
    format!("{} {}", rounded, UNITS[unit])
}
