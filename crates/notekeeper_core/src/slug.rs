//! Slug policy: derivation from titles and the collision message.
//!
//! # Responsibility
//! - Turn arbitrary titles (Cyrillic included) into URL-safe slugs.
//! - Pick between a submitted slug and a derived one.
//!
//! # Invariants
//! - `slugify` is deterministic and only emits `[a-z0-9_-]`.
//! - Uniqueness is not checked here; the `notes.slug` unique index owns it.

use crate::model::note::SLUG_MAX_CHARS;
use once_cell::sync::Lazy;
use regex::Regex;

/// Appended to a colliding slug to build the slug field error.
pub const SLUG_TAKEN_WARNING: &str =
    " - такой slug уже существует, придумайте уникальное значение!";

static AMPERSAND_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&amp;|&").expect("valid ampersand regex"));
static SEPARATOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[-\s]+").expect("valid separator regex"));

/// Builds a URL-safe slug from free text.
///
/// Lowercases, spells `&` as `and`, collapses whitespace/hyphen runs into a
/// single `-`, transliterates Cyrillic to Latin and drops everything else
/// outside `[a-z0-9_-]`.
pub fn slugify(text: &str) -> String {
    let lowered = text.to_lowercase();
    let spelled = AMPERSAND_RE.replace_all(&lowered, " and ");
    let separated = SEPARATOR_RE.replace_all(&spelled, "-");

    let mut out = String::with_capacity(separated.len());
    for ch in separated.chars() {
        if let Some(latin) = transliterate(ch) {
            out.push_str(latin);
        } else if ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '_' || ch == '-' {
            out.push(ch);
        }
    }

    // Removed symbols can leave adjacent separators behind.
    SEPARATOR_RE
        .replace_all(&out, "-")
        .trim_matches('-')
        .to_string()
}

/// Chooses the slug a submission will be stored under.
///
/// A non-blank submitted slug wins (trimmed, otherwise verbatim); otherwise
/// the slug is derived from `title` and cut to the slug length limit.
pub fn resolve_slug(submitted: Option<&str>, title: &str) -> String {
    match submitted.map(str::trim) {
        Some(slug) if !slug.is_empty() => slug.to_string(),
        _ => slugify(title).chars().take(SLUG_MAX_CHARS).collect(),
    }
}

/// Field error message for a slug that is already taken.
pub fn slug_taken_message(slug: &str) -> String {
    format!("{slug}{SLUG_TAKEN_WARNING}")
}

fn transliterate(ch: char) -> Option<&'static str> {
    let latin = match ch {
        'а' => "a",
        'б' => "b",
        'в' => "v",
        'г' | 'ґ' => "g",
        'д' => "d",
        'е' | 'э' => "e",
        'ё' => "yo",
        'є' => "ye",
        'ж' => "zh",
        'з' => "z",
        'и' | 'і' => "i",
        'ї' => "yi",
        'й' => "j",
        'к' => "k",
        'л' => "l",
        'м' => "m",
        'н' => "n",
        'о' => "o",
        'п' => "p",
        'р' => "r",
        'с' => "s",
        'т' => "t",
        'у' => "u",
        'ф' => "f",
        'х' => "h",
        'ц' => "ts",
        'ч' => "ch",
        'ш' => "sh",
        'щ' => "sch",
        'ы' => "y",
        'ъ' | 'ь' => "",
        'ю' => "yu",
        'я' => "ya",
        _ => return None,
    };
    Some(latin)
}
