//! Fields computed from what the editor typed: slug, reading time and the
//! sources list. All functions are pure.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use crate::WORDS_PER_MINUTE;
use crate::domain::Slug;

static NOT_SLUG_SYMBOLS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9\s-]").expect("slug symbols regex must be valid"));
static WHITESPACE_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace regex must be valid"));
static HYPHEN_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-+").expect("hyphen regex must be valid"));

/// Builds a URL-safe slug out of a title.
///
/// Characters outside `[a-z0-9]`, whitespace and `-` are dropped after
/// lowercasing, so accented letters disappear instead of being transliterated.
pub fn generate_slug(title: &str) -> Slug {
    let lowercase = title.to_lowercase();
    let stripped = NOT_SLUG_SYMBOLS.replace_all(&lowercase, "");
    let hyphenated = WHITESPACE_RUNS.replace_all(&stripped, "-");
    let collapsed = HYPHEN_RUNS.replace_all(&hyphenated, "-");
    Slug::new(collapsed.trim_matches('-'))
}

/// Estimated reading time in whole minutes, never less than one.
pub fn calculate_reading_time(content: &str) -> u32 {
    let words = content.split_whitespace().count();
    words.div_ceil(WORDS_PER_MINUTE).max(1) as u32
}

/// One source per line; blank lines are dropped and order is kept.
pub fn parse_sources(text: &str) -> Vec<String> {
    text.split('\n')
        .map(str::trim)
        .filter(|source| !source.is_empty())
        .map(str::to_owned)
        .collect()
}

pub fn stringify_sources(sources: &[String]) -> String {
    sources.join("\n")
}

/// True when `candidate` is a well-formed absolute URL. Only used as a hint.
pub fn validate_url(candidate: &str) -> bool {
    Url::parse(candidate.trim()).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(count: usize) -> String {
        vec!["yokai"; count].join(" ")
    }

    #[test]
    fn slug_drops_diacritics_and_punctuation() {
        let slug = generate_slug("Kitsune: Deväťchvostá Líška!");
        assert_eq!(slug.as_ref(), "kitsune-devchvost-lka");
    }

    #[test]
    fn slug_collapses_separators() {
        assert_eq!(generate_slug("  Kappa -- river   imp  ").as_ref(), "kappa-river-imp");
        assert_eq!(generate_slug("--Tengu--").as_ref(), "tengu");
        assert_eq!(generate_slug("Oni\t\n2").as_ref(), "oni-2");
    }

    #[test]
    fn slug_only_contains_safe_symbols() {
        for title in ["Ōkami & Inugami", "  ", "!!!", "Yuki-onna (雪女)", "a - - b"] {
            let slug = generate_slug(title);
            let value = slug.as_ref();
            assert!(value.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
            assert!(!value.contains("--"), "{value}");
            assert!(!value.starts_with('-') && !value.ends_with('-'), "{value}");
        }
    }

    #[test]
    fn reading_time_has_a_floor_of_one_minute() {
        assert_eq!(calculate_reading_time(""), 1);
        assert_eq!(calculate_reading_time("   \n\t "), 1);
        assert_eq!(calculate_reading_time(&words(200)), 1);
        assert_eq!(calculate_reading_time(&words(201)), 2);
        assert_eq!(calculate_reading_time(&words(400)), 2);
    }

    #[test]
    fn sources_are_trimmed_and_ordered() {
        let parsed = parse_sources("  https://b.example \n\n https://a.example\r\n   \n");
        assert_eq!(parsed, vec!["https://b.example", "https://a.example"]);
    }

    #[test]
    fn sources_survive_a_round_trip() {
        let text = "one\n\n  two  \nthree\n";
        let parsed = parse_sources(text);
        assert_eq!(parse_sources(&stringify_sources(&parsed)), parsed);

        let list = vec!["Toriyama Sekien".to_string(), "https://yokai.com".to_string()];
        assert_eq!(parse_sources(&stringify_sources(&list)), list);
    }

    #[test]
    fn url_hint_requires_absolute_urls() {
        assert!(validate_url("https://example.com/image.jpg"));
        assert!(validate_url(" http://localhost:5000 "));
        assert!(!validate_url("example.com/image.jpg"));
        assert!(!validate_url("/images/kappa.png"));
        assert!(!validate_url(""));
    }
}
