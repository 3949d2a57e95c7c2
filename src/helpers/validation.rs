use rust_decimal::Decimal;
use validator::ValidationError;

/// File extensions accepted for product photos.
pub const PHOTO_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "gif", "webp", "bmp"];

/// A blank value means "no photo" and is accepted.
pub fn validate_photo(photo: &str) -> Result<(), ValidationError> {
    if photo.trim().is_empty() {
        return Ok(());
    }
    let allowed = photo
        .rsplit_once('.')
        .map(|(stem, ext)| {
            !stem.is_empty() && PHOTO_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str())
        })
        .unwrap_or(false);

    if allowed {
        Ok(())
    } else {
        Err(ValidationError::new("photo_extension"))
    }
}

pub fn validate_amount(amount: &Decimal) -> Result<(), ValidationError> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(ValidationError::new("negative_amount"));
    }
    Ok(())
}

pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_photo_extensions() {
        assert!(validate_photo("camera.jpg").is_ok());
        assert!(validate_photo("IMG_0042.JPEG").is_ok());
        assert!(validate_photo("scan.final.webp").is_ok());
        assert!(validate_photo("notes.txt").is_err());
        assert!(validate_photo("photo").is_err());
        assert!(validate_photo(".png").is_err());
    }

    #[test]
    fn test_blank_photo_means_none() {
        assert!(validate_photo("").is_ok());
        assert!(validate_photo("  ").is_ok());
    }

    #[test]
    fn test_amounts() {
        assert!(validate_amount(&Decimal::new(1250, 2)).is_ok());
        assert!(validate_amount(&Decimal::ZERO).is_ok());
        assert!(validate_amount(&Decimal::new(-1, 2)).is_err());
    }

    #[test]
    fn test_blank_values() {
        assert!(validate_not_blank("Omsk").is_ok());
        assert!(validate_not_blank("   ").is_err());
    }
}
