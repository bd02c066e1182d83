//! Download filename synthesis.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::item::ItemKind;

/// Maximum number of slug characters taken from a prompt.
const SLUG_MAX_LEN: usize = 30;

/// Name used when the caller supplies none:
/// `<kind>-<ISO 8601 timestamp with ':' and '.' replaced by '-'>.<ext>`.
#[must_use]
pub fn default_filename(kind: ItemKind, now: DateTime<Utc>) -> String {
    let timestamp = now
        .to_rfc3339_opts(SecondsFormat::Millis, true)
        .replace([':', '.'], "-");
    format!("{}-{timestamp}.{}", kind.label(), kind.extension())
}

/// Filesystem-friendly slug of a prompt.
///
/// Drops everything except ASCII letters, digits and whitespace, turns each
/// whitespace run into `-`, lowercases, and keeps the first 30 characters.
#[must_use]
pub fn prompt_slug(prompt: &str) -> String {
    let kept: String = prompt
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace())
        .collect();

    let mut slug = String::with_capacity(kept.len());
    let mut in_space = false;
    for c in kept.chars() {
        if c.is_whitespace() {
            if !in_space {
                slug.push('-');
            }
            in_space = true;
        } else {
            slug.push(c.to_ascii_lowercase());
            in_space = false;
        }
    }

    slug.chars().take(SLUG_MAX_LEN).collect()
}

/// Name for the `index`-th generated still: `wallpaper-<slug>-<index+1>.png`.
#[must_use]
pub fn prompt_filename(prompt: &str, index: usize) -> String {
    format!("wallpaper-{}-{}.png", prompt_slug(prompt), index + 1)
}

/// Name for the `index`-th favorite: `favorite-<kind>-<slug>-<index+1>.<ext>`.
#[must_use]
pub fn favorite_filename(prompt: &str, kind: ItemKind, index: usize) -> String {
    format!(
        "favorite-{}-{}-{}.{}",
        kind.label(),
        prompt_slug(prompt),
        index + 1,
        kind.extension()
    )
}
