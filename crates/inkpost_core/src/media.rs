use std::fmt;

pub type MediaId = u64;

pub const MAX_IMAGE_BYTES: u64 = 5 * 1024 * 1024;
pub const MAX_VIDEO_BYTES: u64 = 10 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// Tag used inside placeholder tokens, e.g. `IMAGE` in `[IMAGE: cat.png]`.
    pub fn token_tag(self) -> &'static str {
        match self {
            MediaKind::Image => "IMAGE",
            MediaKind::Video => "VIDEO",
        }
    }

    pub fn mime_prefix(self) -> &'static str {
        match self {
            MediaKind::Image => "image/",
            MediaKind::Video => "video/",
        }
    }

    pub fn max_bytes(self) -> u64 {
        match self {
            MediaKind::Image => MAX_IMAGE_BYTES,
            MediaKind::Video => MAX_VIDEO_BYTES,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MediaKind::Image => "Image",
            MediaKind::Video => "Video",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaKind::Image => write!(f, "image"),
            MediaKind::Video => write!(f, "video"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    #[error("Please select {} {kind} file", article(.kind))]
    WrongType { kind: MediaKind, mime: String },
    #[error("File size should be less than {}MB", .max_bytes / (1024 * 1024))]
    TooLarge {
        kind: MediaKind,
        max_bytes: u64,
        actual: u64,
    },
}

fn article(kind: &MediaKind) -> &'static str {
    match kind {
        MediaKind::Image => "an",
        MediaKind::Video => "a",
    }
}

/// Checks a candidate file against the type prefix and size ceiling for `kind`.
pub fn validate_selection(kind: MediaKind, mime: &str, size: u64) -> Result<(), SelectionError> {
    let mime = mime.trim();
    let matches_prefix = mime
        .get(..kind.mime_prefix().len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(kind.mime_prefix()));
    if !matches_prefix {
        return Err(SelectionError::WrongType {
            kind,
            mime: mime.to_string(),
        });
    }

    let max_bytes = kind.max_bytes();
    if size > max_bytes {
        return Err(SelectionError::TooLarge {
            kind,
            max_bytes,
            actual: size,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_within_ceiling_is_accepted() {
        assert_eq!(
            validate_selection(MediaKind::Image, "image/png", 2 * 1024 * 1024),
            Ok(())
        );
        assert_eq!(
            validate_selection(MediaKind::Image, "IMAGE/JPEG", MAX_IMAGE_BYTES),
            Ok(())
        );
    }

    #[test]
    fn video_mime_rejected_for_image_slot() {
        let err = validate_selection(MediaKind::Image, "video/mp4", 10).unwrap_err();
        assert!(matches!(err, SelectionError::WrongType { kind: MediaKind::Image, .. }));
        assert_eq!(err.to_string(), "Please select an image file");
    }

    #[test]
    fn ceilings_differ_per_kind() {
        let six_mb = 6 * 1024 * 1024;
        let err = validate_selection(MediaKind::Image, "image/png", six_mb).unwrap_err();
        assert_eq!(err.to_string(), "File size should be less than 5MB");
        assert_eq!(validate_selection(MediaKind::Video, "video/mp4", six_mb), Ok(()));
        assert!(validate_selection(MediaKind::Video, "video/mp4", MAX_VIDEO_BYTES + 1).is_err());
    }

    #[test]
    fn short_mime_does_not_panic() {
        assert!(validate_selection(MediaKind::Video, "vid", 1).is_err());
        assert!(validate_selection(MediaKind::Image, "", 1).is_err());
    }
}
