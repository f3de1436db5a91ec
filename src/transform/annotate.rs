//! Linguistic annotation capability.
//!
//! Part-of-speech tagging, lemmatization and stopword removal go through the
//! [`Annotator`] trait. Real deployments plug in a proper NLP backend; the
//! [`RuleBasedAnnotator`] is a small built-in fallback that tokenizes on
//! Unicode word boundaries and guesses Penn Treebank style tags from suffixes
//! and a handful of closed word classes.

use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

use crate::error::Result;

/// Tag given to whitespace-only tokens.
pub const SPACE_TAG: &str = "_SP";

/// One token produced by an annotator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotatedToken {
    /// The token text as it appears in the input.
    pub text: String,
    /// Part-of-speech tag.
    pub tag: String,
    /// Base form.
    pub lemma: String,
    /// Whitespace following the token in the input.
    pub whitespace: String,
}

impl AnnotatedToken {
    /// Whether this token only carries whitespace.
    pub fn is_space(&self) -> bool {
        self.tag == SPACE_TAG
    }
}

/// Splits text into tagged, lemmatized tokens.
///
/// Concatenating `text + whitespace` over all tokens must reproduce the input.
pub trait Annotator: Send + Sync {
    /// Annotate the text.
    fn annotate(&self, text: &str) -> Result<Vec<AnnotatedToken>>;

    /// Get the name of this annotator (for debugging and configuration).
    fn name(&self) -> &'static str;
}

/// Rebuild text with every token replaced by `token_TAG`.
pub fn postag(annotator: &dyn Annotator, text: &str) -> Result<String> {
    let mut out = String::with_capacity(text.len() * 2);
    for token in annotator.annotate(text)? {
        if token.is_space() {
            out.push_str(&token.text);
        } else {
            out.push_str(&token.text);
            out.push('_');
            out.push_str(&token.tag);
        }
        out.push_str(&token.whitespace);
    }
    Ok(out)
}

/// Rebuild text with every token replaced by its lemma.
pub fn lemmatize(annotator: &dyn Annotator, text: &str) -> Result<String> {
    let mut out = String::with_capacity(text.len());
    for token in annotator.annotate(text)? {
        if token.is_space() {
            out.push_str(&token.text);
        } else {
            out.push_str(&token.lemma);
        }
        out.push_str(&token.whitespace);
    }
    Ok(out)
}

const DETERMINERS: &[&str] = &["a", "an", "the", "this", "that", "these", "those", "every", "each", "some", "any", "no"];
const PREPOSITIONS: &[&str] = &[
    "in", "on", "at", "of", "for", "with", "by", "from", "into", "onto", "about", "over", "under",
    "after", "before", "between", "through", "during", "without", "within", "upon", "as",
];
const CONJUNCTIONS: &[&str] = &["and", "or", "but", "nor", "yet", "so"];
const PRONOUNS: &[&str] = &["i", "you", "he", "she", "it", "we", "they", "me", "him", "her", "us", "them"];
const MODALS: &[&str] = &["can", "could", "will", "would", "shall", "should", "may", "might", "must"];
const BE_FORMS: &[(&str, &str)] = &[
    ("am", "VBP"),
    ("are", "VBP"),
    ("is", "VBZ"),
    ("was", "VBD"),
    ("were", "VBD"),
    ("be", "VB"),
    ("been", "VBN"),
    ("being", "VBG"),
];

/// Built-in heuristic annotator.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleBasedAnnotator;

impl RuleBasedAnnotator {
    /// Create a new annotator.
    pub fn new() -> Self {
        RuleBasedAnnotator
    }

    fn tag(word: &str, sentence_start: bool) -> String {
        let lower = word.to_lowercase();
        let tag = if word.chars().all(|c| !c.is_alphanumeric()) {
            "."
        } else if word.chars().all(|c| c.is_numeric() || c == '.' || c == ',') {
            "CD"
        } else if let Some(&(_, tag)) = BE_FORMS.iter().find(|(form, _)| *form == lower) {
            tag
        } else if DETERMINERS.contains(&lower.as_str()) {
            "DT"
        } else if lower == "to" {
            "TO"
        } else if PREPOSITIONS.contains(&lower.as_str()) {
            "IN"
        } else if CONJUNCTIONS.contains(&lower.as_str()) {
            "CC"
        } else if PRONOUNS.contains(&lower.as_str()) {
            "PRP"
        } else if MODALS.contains(&lower.as_str()) {
            "MD"
        } else if !sentence_start && word.chars().next().is_some_and(char::is_uppercase) {
            "NNP"
        } else if lower.ends_with("ly") {
            "RB"
        } else if lower.ends_with("ing") && lower.len() > 4 {
            "VBG"
        } else if lower.ends_with("ed") && lower.len() > 3 {
            "VBD"
        } else if lower.ends_with('s') && !lower.ends_with("ss") && lower.len() > 3 {
            "NNS"
        } else {
            "NN"
        };
        tag.to_string()
    }

    fn lemma(word: &str, tag: &str) -> String {
        let lower = word.to_lowercase();
        match tag {
            "VBP" | "VBZ" | "VBD" | "VB" | "VBN" | "VBG"
                if BE_FORMS.iter().any(|(form, _)| *form == lower) =>
            {
                "be".to_string()
            }
            "NNS" => {
                if let Some(stem) = lower.strip_suffix("ies") {
                    format!("{stem}y")
                } else if let Some(stem) = lower.strip_suffix("sses") {
                    format!("{stem}ss")
                } else {
                    lower[..lower.len() - 1].to_string()
                }
            }
            "VBD" => {
                if let Some(stem) = lower.strip_suffix("ated") {
                    format!("{stem}ate")
                } else if let Some(stem) = lower.strip_suffix("ied") {
                    format!("{stem}y")
                } else {
                    lower[..lower.len() - 2].to_string()
                }
            }
            "VBG" => lower[..lower.len() - 3].to_string(),
            "NNP" => word.to_string(),
            _ => lower,
        }
    }
}

impl Annotator for RuleBasedAnnotator {
    fn annotate(&self, text: &str) -> Result<Vec<AnnotatedToken>> {
        let mut tokens: Vec<AnnotatedToken> = Vec::new();
        let mut sentence_start = true;

        for segment in text.split_word_bounds() {
            if segment.chars().all(char::is_whitespace) {
                match tokens.last_mut() {
                    Some(last) if !last.is_space() && last.whitespace.is_empty() => {
                        last.whitespace.push_str(segment)
                    }
                    Some(last) if last.is_space() => last.text.push_str(segment),
                    _ => tokens.push(AnnotatedToken {
                        text: segment.to_string(),
                        tag: SPACE_TAG.to_string(),
                        lemma: segment.to_string(),
                        whitespace: String::new(),
                    }),
                }
                continue;
            }

            let tag = Self::tag(segment, sentence_start);
            let lemma = Self::lemma(segment, &tag);
            sentence_start = matches!(segment, "." | "!" | "?");
            tokens.push(AnnotatedToken {
                text: segment.to_string(),
                tag,
                lemma,
                whitespace: String::new(),
            });
        }

        Ok(tokens)
    }

    fn name(&self) -> &'static str {
        "rule_based"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_annotation_reproduces_text() {
        let text = "  There is a house on the hill.\n\nIt's big!";
        let tokens = RuleBasedAnnotator::new().annotate(text).unwrap();
        let rebuilt: String = tokens
            .iter()
            .map(|t| format!("{}{}", t.text, t.whitespace))
            .collect();
        assert_eq!(rebuilt, text);
        assert!(tokens[0].is_space());
    }

    #[test]
    fn test_postag() {
        let tagged = postag(&RuleBasedAnnotator::new(), "The house is red.").unwrap();
        assert_eq!(tagged, "The_DT house_NN is_VBZ red_NN ._.");
    }

    #[test]
    fn test_lemmatize() {
        let lemmas = lemmatize(&RuleBasedAnnotator::new(), "Languages are complicated.").unwrap();
        assert_eq!(lemmas, "language be complicate.");
    }

    #[test]
    fn test_proper_noun_mid_sentence() {
        let tokens = RuleBasedAnnotator::new().annotate("We saw Paris").unwrap();
        assert_eq!(tokens[2].tag, "NNP");
        assert_eq!(tokens[2].lemma, "Paris");
    }
}
