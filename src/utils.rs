use crate::error::{MirrorError, Result};
use regex::Regex;
use std::sync::LazyLock;

/// Separator used inside slugs
pub const SEPARATOR: &str = "_";

// Anything that is not an ASCII letter, a Cyrillic letter or a digit
static NON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Zа-яА-ЯёЁ0-9]+").expect("static regex"));

/// Convert a free-text navigation label to a directory-safe slug.
///
/// The label is lower-cased, runs of non-word characters collapse to `_`,
/// and the second token is dropped: course labels carry their number there
/// ("Lesson 1: Intro" becomes `lesson_intro`). A label with fewer than two
/// tokens has nothing to drop and is rejected.
pub fn sanitize_label(text: &str) -> Result<String> {
    let lowered = text.to_lowercase();
    let collapsed = NON_WORD.replace_all(&lowered, SEPARATOR);
    let tokens: Vec<&str> = collapsed
        .split(SEPARATOR)
        .filter(|token| !token.is_empty())
        .collect();

    if tokens.len() < 2 {
        return Err(MirrorError::MalformedLabel {
            label: text.to_string(),
        });
    }

    let kept: Vec<&str> = tokens
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != 1)
        .map(|(_, token)| *token)
        .collect();
    Ok(kept.join(SEPARATOR))
}

/// Turn a section's display text into its directory name.
///
/// Section names are kept as shown on the site; only path separators are
/// replaced so the directory stays inside its title.
pub fn section_dir_name(text: &str) -> Result<String> {
    let name = text.trim().replace(['/', '\\'], SEPARATOR);
    if name.is_empty() || name == "." || name == ".." {
        return Err(MirrorError::MalformedLabel {
            label: text.to_string(),
        });
    }
    Ok(name)
}

/// Local file name for an image: the last two path segments of its URL
/// joined by `_`. Different URLs can map to the same name.
pub fn image_filename(src: &str) -> String {
    let segments: Vec<&str> = src.split('/').collect();
    let start = segments.len().saturating_sub(2);
    segments[start..].join(SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_drops_number_token() {
        assert_eq!(
            sanitize_label("Lesson 1: Intro to Go").unwrap(),
            "lesson_intro_to_go"
        );
        assert_eq!(sanitize_label("Lesson 1").unwrap(), "lesson");
    }

    #[test]
    fn test_sanitize_cyrillic() {
        assert_eq!(sanitize_label("Одна Глава").unwrap(), "одна");
        assert_eq!(
            sanitize_label("Урок 2. Одна Глава").unwrap(),
            "урок_одна_глава"
        );
        assert_eq!(sanitize_label("Ёжик 5 — Ёлка").unwrap(), "ёжик_ёлка");
    }

    #[test]
    fn test_sanitize_collapses_separators() {
        assert_eq!(
            sanitize_label("  Part 3 ::  Types,   Traits & Generics!  ").unwrap(),
            "part_types_traits_generics"
        );
    }

    #[test]
    fn test_sanitize_rejects_single_token() {
        assert!(matches!(
            sanitize_label("X"),
            Err(MirrorError::MalformedLabel { .. })
        ));
        assert!(matches!(
            sanitize_label("   "),
            Err(MirrorError::MalformedLabel { .. })
        ));
        assert!(matches!(
            sanitize_label("!!!"),
            Err(MirrorError::MalformedLabel { .. })
        ));
    }

    #[test]
    fn test_sanitize_is_deterministic() {
        let label = "Module 7: Async Rust";
        assert_eq!(sanitize_label(label).unwrap(), sanitize_label(label).unwrap());
    }

    #[test]
    fn test_resanitize_with_two_or_more_tokens() {
        let once = sanitize_label("Lesson 1: Intro to Go").unwrap();
        // Running it again applies the fixed drop once more
        assert_eq!(sanitize_label(&once).unwrap(), "lesson_to_go");
    }

    #[test]
    fn test_resanitize_single_token_output_faults() {
        let once = sanitize_label("Lesson 1").unwrap();
        assert_eq!(once, "lesson");
        assert!(matches!(
            sanitize_label(&once),
            Err(MirrorError::MalformedLabel { .. })
        ));
    }

    #[test]
    fn test_section_dir_name() {
        assert_eq!(section_dir_name("  Getting started ").unwrap(), "Getting started");
        assert_eq!(section_dir_name("In/Out").unwrap(), "In_Out");
        assert!(section_dir_name("   ").is_err());
        assert!(section_dir_name("..").is_err());
    }

    #[test]
    fn test_image_filename() {
        assert_eq!(
            image_filename("https://cdn.example.com/media/abc123/figure.png"),
            "abc123_figure.png"
        );
        assert_eq!(image_filename("figure.png"), "figure.png");
        assert_eq!(image_filename("img/figure.png"), "img_figure.png");
    }
}
