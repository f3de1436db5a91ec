//! Configuration for loading and processing a text directory.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TextDirectoryError};

/// Text encodings supported when reading documents.
///
/// Decoding is best effort: bytes that are invalid for the encoding are
/// dropped instead of failing the read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    /// UTF-8.
    #[default]
    Utf8,
    /// ISO-8859-1, every byte maps to the code point of the same value.
    Latin1,
    /// 7-bit ASCII.
    Ascii,
}

impl Encoding {
    /// Decode raw bytes, silently dropping anything that is not valid.
    pub fn decode(&self, bytes: &[u8]) -> String {
        match self {
            Encoding::Utf8 => {
                let mut out = String::with_capacity(bytes.len());
                for chunk in bytes.utf8_chunks() {
                    out.push_str(chunk.valid());
                }
                out
            }
            Encoding::Latin1 => bytes.iter().map(|&b| b as char).collect(),
            Encoding::Ascii => bytes
                .iter()
                .filter(|b| b.is_ascii())
                .map(|&b| b as char)
                .collect(),
        }
    }
}

impl FromStr for Encoding {
    type Err = TextDirectoryError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().replace(['-', '_'], "").as_str() {
            "utf8" => Ok(Encoding::Utf8),
            "latin1" | "iso88591" => Ok(Encoding::Latin1),
            "ascii" | "usascii" => Ok(Encoding::Ascii),
            _ => Err(TextDirectoryError::encoding(format!(
                "unsupported encoding '{s}'"
            ))),
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Encoding::Utf8 => "utf8",
            Encoding::Latin1 => "latin1",
            Encoding::Ascii => "ascii",
        };
        f.write_str(name)
    }
}

/// Configuration for a [`WorkingSet`](crate::working_set::WorkingSet).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TextDirectoryConfig {
    /// Encoding used to read every document.
    pub encoding: Encoding,
    /// Whether to descend into subdirectories.
    pub recursive: bool,
    /// File extension to look for, `*` for any.
    pub filetype: String,
    /// Sort files by path before loading.
    pub sort: bool,
    /// Skip character and token counting at load time.
    pub fast: bool,
    /// Directory holding `<name>.lm` spelling models.
    pub models_dir: PathBuf,
    /// Optional directory holding `<language>.txt` stopword lists that
    /// override the built-in ones.
    pub stopwords_dir: Option<PathBuf>,
    /// Seed for random sampling. `None` seeds from the OS.
    pub seed: Option<u64>,
    /// Cache spelling corrections per corrector.
    pub spell_cache: bool,
    /// Transform documents on the rayon pool.
    pub parallel: bool,
}

impl Default for TextDirectoryConfig {
    fn default() -> Self {
        TextDirectoryConfig {
            encoding: Encoding::Utf8,
            recursive: true,
            filetype: "txt".to_string(),
            sort: true,
            fast: false,
            models_dir: PathBuf::from("language_models"),
            stopwords_dir: None,
            seed: None,
            spell_cache: true,
            parallel: false,
        }
    }
}

impl TextDirectoryConfig {
    /// Load a configuration from a JSON file. Missing keys take their defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Write the configuration as pretty JSON.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = TextDirectoryConfig::default();
        assert_eq!(config.encoding, Encoding::Utf8);
        assert!(config.recursive);
        assert_eq!(config.filetype, "txt");
        assert!(config.sort);
        assert!(!config.fast);
        assert!(config.seed.is_none());
        assert!(config.spell_cache);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: TextDirectoryConfig =
            serde_json::from_str(r#"{"encoding": "latin1", "seed": 7}"#).unwrap();
        assert_eq!(config.encoding, Encoding::Latin1);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.filetype, "txt");
    }

    #[test]
    fn test_encoding_names() {
        assert_eq!("UTF-8".parse::<Encoding>().unwrap(), Encoding::Utf8);
        assert_eq!("iso-8859-1".parse::<Encoding>().unwrap(), Encoding::Latin1);
        assert_eq!("latin_1".parse::<Encoding>().unwrap(), Encoding::Latin1);
        assert!("ebcdic".parse::<Encoding>().is_err());
    }

    #[test]
    fn test_decode_drops_invalid_bytes() {
        let bytes = b"caf\xff\xfee ok";
        assert_eq!(Encoding::Utf8.decode(bytes), "cafe ok");
        assert_eq!(Encoding::Ascii.decode("naïve".as_bytes()), "nave");
        assert_eq!(Encoding::Latin1.decode(&[0x63, 0xe9]), "cé");
    }
}
