//! Character and pattern level text rewrites.
//!
//! These are the plain functions behind most registered transformations.

use std::sync::LazyLock;

use regex::{NoExpand, Regex};

use crate::error::{LazyRegex, Result, compiled};

/// Ordered contraction table. Specific forms come before the general suffix
/// rules they would otherwise be consumed by.
const ENGLISH_CONTRACTIONS: &[(&str, &str)] = &[
    ("won't", "will not"),
    ("Won't", "Will not"),
    ("can't", "cannot"),
    ("Can't", "Cannot"),
    ("shan't", "shall not"),
    ("Shan't", "Shall not"),
    ("ain't", "am not"),
    ("Ain't", "Am not"),
    ("let's", "let us"),
    ("Let's", "Let us"),
    ("y'all", "you all"),
    ("Y'all", "You all"),
    ("n't", " not"),
    ("'m", " am"),
    ("'re", " are"),
    ("'s", " is"),
    ("'ll", " will"),
    ("'ve", " have"),
    ("'d", " would"),
];

static NON_ALPHANUMERICAL: LazyRegex = LazyLock::new(|| Regex::new(r"[^\s\w]+"));
static HTML_TAG: LazyRegex = LazyLock::new(|| Regex::new(r"<[^<]+?>"));
static DIGIT: LazyRegex = LazyLock::new(|| Regex::new(r"\d"));
static TOKEN: LazyRegex = LazyLock::new(|| Regex::new(r"\S+"));
static DOUBLE_SPACE: LazyRegex = LazyLock::new(|| Regex::new(r" {2,}"));

/// e→3, a→4, l→1, o→0. Uppercase letters are left alone.
pub fn to_leetspeak(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            'e' => '3',
            'a' => '4',
            'l' => '1',
            'o' => '0',
            other => other,
        })
        .collect()
}

/// Drop every code point outside of ASCII.
pub fn remove_non_ascii(text: &str) -> String {
    text.chars().filter(char::is_ascii).collect()
}

/// Keep only whitespace and word characters, then drop underscores.
pub fn remove_non_alphanumerical(text: &str) -> Result<String> {
    let pattern = compiled(&NON_ALPHANUMERICAL)?;
    Ok(pattern.replace_all(text, "").replace('_', ""))
}

/// Strip anything that looks like a markup tag.
pub fn remove_html_tags(text: &str) -> Result<String> {
    let pattern = compiled(&HTML_TAG)?;
    Ok(pattern.replace_all(text, "").into_owned())
}

/// Replace every decimal digit with `replacement`.
pub fn replace_digits(text: &str, replacement: &str) -> Result<String> {
    let pattern = compiled(&DIGIT)?;
    Ok(pattern.replace_all(text, NoExpand(replacement)).into_owned())
}

/// Expand English contractions such as "I'll" or "won't".
pub fn expand_english_contractions(text: &str) -> String {
    ENGLISH_CONTRACTIONS
        .iter()
        .fold(text.to_string(), |acc, (from, to)| acc.replace(from, to))
}

/// Remove tokens made mostly of symbols, such as `---;#aaa`.
///
/// A whitespace delimited token is dropped when it holds at least two
/// characters that are neither alphanumeric nor whitespace and those outnumber
/// its alphanumeric characters. With `remove_double_space` runs of spaces left
/// behind are collapsed.
pub fn remove_weird_tokens(text: &str, remove_double_space: bool) -> Result<String> {
    let tokens = compiled(&TOKEN)?;
    let cleaned = tokens.replace_all(text, |caps: &regex::Captures<'_>| {
        let token = &caps[0];
        let alnum = token.chars().filter(|c| c.is_alphanumeric()).count();
        let symbols = token.chars().count() - alnum;
        if symbols >= 2 && symbols > alnum {
            String::new()
        } else {
            token.to_string()
        }
    });

    if remove_double_space {
        let spaces = compiled(&DOUBLE_SPACE)?;
        Ok(spaces.replace_all(&cleaned, " ").trim_matches(' ').to_string())
    } else {
        Ok(cleaned.into_owned())
    }
}
