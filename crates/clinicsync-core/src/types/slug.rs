//! URL-safe identifiers derived from display names.
//!
//! Slugs are only used to build links between pages. They are not keys:
//! two clinics may share a slug, and the id travels alongside it.

/// Derive a slug from a display name.
///
/// Lower-cases the input, drops every character outside `a-z`, `0-9` and
/// space, joins whitespace-separated words with a single hyphen and trims
/// hyphens from both ends.
pub fn slugify(name: &str) -> String {
    let kept: String = name
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace())
        .collect();

    kept.split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .trim_matches('-')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_punctuation_dropped() {
        assert_eq!(slugify("Elite Dermatology!"), "elite-dermatology");
    }

    #[test]
    fn test_whitespace_collapsed_and_trimmed() {
        assert_eq!(slugify("  A   B  "), "a-b");
    }

    #[test]
    fn test_empty() {
        assert_eq!(slugify(""), "");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_existing_hyphens_are_dropped() {
        // Hyphens are outside the kept set, so they vanish rather than split words.
        assert_eq!(slugify("Skin-Care Co."), "skincare-co");
    }

    #[test]
    fn test_digits_and_non_ascii() {
        assert_eq!(slugify("Clinic 24 Zürich"), "clinic-24-zrich");
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(slugify("Glow Clinic"), slugify("Glow Clinic"));
    }
}
