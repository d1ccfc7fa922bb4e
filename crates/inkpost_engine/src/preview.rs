use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::MediaFile;

/// Inline `data:` URL so a selected file can be shown before it is uploaded.
pub fn preview_data_url(file: &MediaFile) -> String {
    format!("data:{};base64,{}", file.mime, STANDARD.encode(&file.bytes))
}

#[cfg(test)]
mod tests {
    use super::preview_data_url;
    use crate::MediaFile;

    #[test]
    fn encodes_mime_and_payload() {
        let file = MediaFile::new("a.png", "image/png", b"hi".to_vec());
        assert_eq!(preview_data_url(&file), "data:image/png;base64,aGk=");
    }
}
