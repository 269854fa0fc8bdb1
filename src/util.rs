/// Characters that are not allowed in filenames on any platform we care about.
const FORBIDDEN: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Maximum length (in characters) for a user- or tool-supplied filename.
const MAX_FILENAME_CHARS: usize = 100;

/// Strip filesystem-illegal characters and cap the length. Pure and idempotent.
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .filter(|c| !FORBIDDEN.contains(c))
        .take(MAX_FILENAME_CHARS)
        .collect()
}

/// Content type for a downloaded file, keyed by the extension yt-dlp produced.
pub fn content_type_for_extension(ext: &str) -> &'static str {
    match ext {
        "mp3" => "audio/mpeg",
        "m4a" => "audio/mp4",
        "aac" => "audio/aac",
        "ogg" => "audio/ogg",
        "wav" => "audio/wav",
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "mkv" => "video/x-matroska",
        "avi" => "video/x-msvideo",
        "mov" => "video/quicktime",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_removes_forbidden_characters() {
        let out = sanitize_filename(r#"a<b>c:d"e/f\g|h?i*j"#);
        assert_eq!(out, "abcdefghij");
        for c in FORBIDDEN {
            assert!(!out.contains(*c));
        }
    }

    #[test]
    fn sanitize_truncates_to_100_chars() {
        let long = "x".repeat(300);
        assert_eq!(sanitize_filename(&long).chars().count(), 100);
    }

    #[test]
    fn sanitize_is_idempotent() {
        let once = sanitize_filename(r#"canción: ¿cuál?/parte*2"#);
        assert_eq!(sanitize_filename(&once), once);
    }

    #[test]
    fn sanitize_empty_yields_empty() {
        assert_eq!(sanitize_filename(""), "");
        assert_eq!(sanitize_filename("???*"), "");
    }

    #[test]
    fn sanitize_keeps_unicode() {
        assert_eq!(sanitize_filename("música de prueba"), "música de prueba");
    }

    #[test]
    fn content_types_cover_known_extensions() {
        assert_eq!(content_type_for_extension("mp3"), "audio/mpeg");
        assert_eq!(content_type_for_extension("mp4"), "video/mp4");
        assert_eq!(content_type_for_extension("xyz"), "application/octet-stream");
    }
}
