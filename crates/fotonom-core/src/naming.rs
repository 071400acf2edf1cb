//! Final file name construction.

/// Build the deterministic final name: `{location}_{scene}_{NNN}.{extension}`.
///
/// The sequence is zero-padded to three digits; larger values keep all their
/// digits.
pub fn build_name(location: &str, scene: &str, sequence: u32, extension: &str) -> String {
    format!("{location}_{scene}_{sequence:03}.{extension}")
}

/// Lower-cased extension of `file_name`, defaulting to `"jpg"` when there is
/// none.
pub fn extension_of(file_name: &str) -> String {
    file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .filter(|ext| !ext.is_empty())
        .unwrap_or_else(|| "jpg".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_name_format() {
        assert_eq!(build_name("Strand", "sonnig", 7, "jpg"), "Strand_sonnig_007.jpg");
    }

    #[test]
    fn test_build_name_padding() {
        assert_eq!(build_name("Park", "hell", 42, "png"), "Park_hell_042.png");
        assert_eq!(build_name("Park", "hell", 123, "png"), "Park_hell_123.png");
        assert_eq!(build_name("Park", "hell", 1000, "png"), "Park_hell_1000.png");
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("foto.JPG"), "jpg");
        assert_eq!(extension_of("urlaub.strand.HEIC"), "heic");
        assert_eq!(extension_of("ohne_endung"), "jpg");
        assert_eq!(extension_of("endet_mit_punkt."), "jpg");
    }
}
