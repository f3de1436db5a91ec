//! Registry of named transformations.
//!
//! Every transformation is a plain function pointer taking the shared
//! [`TransformContext`], the text and its positional string arguments.
//! Names carry the `transformation_` prefix; lookups accept the bare name as
//! well.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::{Result, TextDirectoryError};
use crate::spelling::DEFAULT_LANGUAGE_MODEL;
use crate::transform::annotate::{lemmatize, postag};
use crate::transform::context::TransformContext;
use crate::transform::stopwords::{INTERNAL_STOPWORDS, extend_stopwords, remove_stopwords};
use crate::transform::text;

/// Prefix every registered transformation name carries.
pub const TRANSFORMATION_PREFIX: &str = "transformation_";

/// Signature shared by every transformation.
pub type TransformFn = fn(&TransformContext, &str, &[String]) -> Result<String>;

/// A registered transformation.
#[derive(Clone, Copy, Serialize)]
pub struct Transformation {
    /// Full name, including the prefix.
    pub name: &'static str,
    /// Optional label for people.
    pub human_name: Option<&'static str>,
    /// Positional parameters, defaults in parentheses.
    pub params: &'static [&'static str],
    #[serde(skip)]
    pub apply: TransformFn,
}

impl Transformation {
    /// The human name if there is one, the registered name otherwise.
    pub fn label(&self) -> &'static str {
        self.human_name.unwrap_or(self.name)
    }
}

impl std::fmt::Debug for Transformation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transformation")
            .field("name", &self.name)
            .field("human_name", &self.human_name)
            .field("params", &self.params)
            .finish()
    }
}

/// Name-ordered set of transformations.
#[derive(Debug, Clone, Default)]
pub struct TransformationRegistry {
    transformations: BTreeMap<&'static str, Transformation>,
}

impl TransformationRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every built-in transformation.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for transformation in BUILTIN_TRANSFORMATIONS {
            // Built-in names are prefixed, so this cannot fail.
            let _ = registry.register(*transformation);
        }
        registry
    }

    /// Add a transformation, replacing one of the same name.
    pub fn register(&mut self, transformation: Transformation) -> Result<()> {
        if !transformation.name.starts_with(TRANSFORMATION_PREFIX) {
            return Err(TextDirectoryError::invalid_argument(format!(
                "transformation names must start with '{TRANSFORMATION_PREFIX}', got '{}'",
                transformation.name
            )));
        }
        self.transformations.insert(transformation.name, transformation);
        Ok(())
    }

    /// Look up a transformation by its full name.
    pub fn get(&self, name: &str) -> Option<&Transformation> {
        self.transformations.get(name)
    }

    /// Look up a transformation by full or bare name.
    pub fn resolve(&self, name: &str) -> Result<&Transformation> {
        self.get(name)
            .or_else(|| self.get(&format!("{TRANSFORMATION_PREFIX}{name}")))
            .ok_or_else(|| TextDirectoryError::unknown_transformation(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.resolve(name).is_ok()
    }

    /// Transformations in name order.
    pub fn iter(&self) -> impl Iterator<Item = &Transformation> {
        self.transformations.values()
    }

    pub fn len(&self) -> usize {
        self.transformations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transformations.is_empty()
    }
}

fn arg<'a>(args: &'a [String], index: usize, default: &'a str) -> &'a str {
    args.get(index).map(String::as_str).unwrap_or(default)
}

fn parse_flag(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "" | "false" | "0" | "no" => Ok(false),
        other => Err(TextDirectoryError::invalid_argument(format!(
            "'{other}' is not a boolean"
        ))),
    }
}

fn lowercase(_: &TransformContext, text: &str, _: &[String]) -> Result<String> {
    Ok(text.to_lowercase())
}

fn uppercase(_: &TransformContext, text: &str, _: &[String]) -> Result<String> {
    Ok(text.to_uppercase())
}

fn remove_nl(_: &TransformContext, text: &str, _: &[String]) -> Result<String> {
    Ok(text.replace('\n', " "))
}

fn remove_non_ascii(_: &TransformContext, text: &str, _: &[String]) -> Result<String> {
    Ok(text::remove_non_ascii(text))
}

fn remove_non_alphanumerical(_: &TransformContext, text: &str, _: &[String]) -> Result<String> {
    text::remove_non_alphanumerical(text)
}

fn to_leetspeak(_: &TransformContext, text: &str, _: &[String]) -> Result<String> {
    Ok(text::to_leetspeak(text))
}

fn remove_htmltags(_: &TransformContext, text: &str, _: &[String]) -> Result<String> {
    text::remove_html_tags(text)
}

fn replace_digits(_: &TransformContext, text: &str, args: &[String]) -> Result<String> {
    text::replace_digits(text, arg(args, 0, "%"))
}

fn replace_string(_: &TransformContext, text: &str, args: &[String]) -> Result<String> {
    let search = args.first().ok_or_else(|| {
        TextDirectoryError::invalid_argument("transformation_replace_string needs a search string")
    })?;
    if search.is_empty() {
        return Ok(text.to_string());
    }
    Ok(text.replace(search.as_str(), arg(args, 1, "")))
}

fn expand_english_contractions(_: &TransformContext, text: &str, _: &[String]) -> Result<String> {
    Ok(text::expand_english_contractions(text))
}

fn remove_weird_tokens(_: &TransformContext, text: &str, args: &[String]) -> Result<String> {
    text::remove_weird_tokens(text, parse_flag(arg(args, 0, "false"))?)
}

/// Arguments: stopword source, language, annotator model, custom stopwords.
/// The built-in annotator has a single model, so the third is not consulted.
fn remove_stopwords_transformation(
    context: &TransformContext,
    text: &str,
    args: &[String],
) -> Result<String> {
    let source = match arg(args, 0, INTERNAL_STOPWORDS) {
        "" => INTERNAL_STOPWORDS,
        source => source,
    };
    let stopwords = context.stopwords(source, arg(args, 1, "en"))?;
    match args.get(3).filter(|custom| !custom.trim().is_empty()) {
        Some(custom) => {
            let mut extended = (*stopwords).clone();
            extend_stopwords(&mut extended, custom);
            remove_stopwords(context.annotator(), text, &extended)
        }
        None => remove_stopwords(context.annotator(), text, &stopwords),
    }
}

fn postag_transformation(context: &TransformContext, text: &str, _: &[String]) -> Result<String> {
    postag(context.annotator(), text)
}

fn lemmatize_transformation(context: &TransformContext, text: &str, _: &[String]) -> Result<String> {
    lemmatize(context.annotator(), text)
}

fn crude_spellchecker(context: &TransformContext, text: &str, args: &[String]) -> Result<String> {
    context
        .corrector(arg(args, 0, DEFAULT_LANGUAGE_MODEL))?
        .correct_string(text)
}

const BUILTIN_TRANSFORMATIONS: &[Transformation] = &[
    Transformation {
        name: "transformation_lowercase",
        human_name: Some("Lowercase"),
        params: &[],
        apply: lowercase,
    },
    Transformation {
        name: "transformation_uppercase",
        human_name: Some("Uppercase"),
        params: &[],
        apply: uppercase,
    },
    Transformation {
        name: "transformation_remove_nl",
        human_name: Some("Remove newlines"),
        params: &[],
        apply: remove_nl,
    },
    Transformation {
        name: "transformation_remove_non_ascii",
        human_name: Some("Remove non-ASCII characters"),
        params: &[],
        apply: remove_non_ascii,
    },
    Transformation {
        name: "transformation_remove_non_alphanumerical",
        human_name: Some("Remove non-alphanumerical characters"),
        params: &[],
        apply: remove_non_alphanumerical,
    },
    Transformation {
        name: "transformation_to_leetspeak",
        human_name: Some("Leetspeak"),
        params: &[],
        apply: to_leetspeak,
    },
    Transformation {
        name: "transformation_remove_htmltags",
        human_name: Some("Remove HTML tags"),
        params: &[],
        apply: remove_htmltags,
    },
    Transformation {
        name: "transformation_replace_digits",
        human_name: Some("Replace digits"),
        params: &["replacement (%)"],
        apply: replace_digits,
    },
    Transformation {
        name: "transformation_replace_string",
        human_name: Some("Replace string"),
        params: &["search", "replacement"],
        apply: replace_string,
    },
    Transformation {
        name: "transformation_expand_english_contractions",
        human_name: Some("Expand English contractions"),
        params: &[],
        apply: expand_english_contractions,
    },
    Transformation {
        name: "transformation_remove_weird_tokens",
        human_name: Some("Remove weird tokens"),
        params: &["remove_double_space (false)"],
        apply: remove_weird_tokens,
    },
    Transformation {
        name: "transformation_remove_stopwords",
        human_name: Some("Remove stopwords"),
        params: &["stopwords (internal)", "language (en)", "model", "custom_stopwords"],
        apply: remove_stopwords_transformation,
    },
    Transformation {
        name: "transformation_postag",
        human_name: Some("Part-of-speech tags"),
        params: &[],
        apply: postag_transformation,
    },
    Transformation {
        name: "transformation_lemmatize",
        human_name: Some("Lemmatize"),
        params: &[],
        apply: lemmatize_transformation,
    },
    Transformation {
        name: "transformation_crude_spellchecker",
        human_name: Some("Crude spellchecker"),
        params: &["language_model (crudesc_lm_en)"],
        apply: crude_spellchecker,
    },
];
