//! Bionic reading transform.
//!
//! Emphasizes the leading fixation of every word so the eye can skim the rest.

use super::TextTransform;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

static WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\p{L}\p{N}]+").expect("word pattern is valid"));

const ANSI_BOLD: &str = "\x1b[1m";
const ANSI_NORMAL: &str = "\x1b[22m";

/// Markup used to emphasize fixations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmphasisStyle {
    /// `**Fix**ation`
    #[default]
    Markdown,
    /// `<b>Fix</b>ation`, with the surrounding text HTML-escaped.
    Html,
    /// SGR bold/normal escape codes for terminals.
    Ansi,
}

impl FromStr for EmphasisStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "md" | "markdown" => Ok(Self::Markdown),
            "html" => Ok(Self::Html),
            "ansi" | "terminal" => Ok(Self::Ansi),
            other => Err(format!("unknown emphasis style: {other}")),
        }
    }
}

impl fmt::Display for EmphasisStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Markdown => f.write_str("markdown"),
            Self::Html => f.write_str("html"),
            Self::Ansi => f.write_str("ansi"),
        }
    }
}

/// Number of leading characters to emphasize in a word of `word_len` chars.
pub fn fixation_len(word_len: usize) -> usize {
    match word_len {
        0 => 0,
        1..=3 => 1,
        4 => 2,
        n => n.div_ceil(2),
    }
}

/// Partial-bold ("bionic") transform.
#[derive(Debug, Clone, Copy, Default)]
pub struct BionicTransform {
    style: EmphasisStyle,
}

impl BionicTransform {
    pub fn new(style: EmphasisStyle) -> Self {
        Self { style }
    }

    pub fn style(&self) -> EmphasisStyle {
        self.style
    }

    fn push_plain(&self, out: &mut String, text: &str) {
        match self.style {
            EmphasisStyle::Html => out.push_str(&html_escape::encode_text(text)),
            EmphasisStyle::Markdown | EmphasisStyle::Ansi => out.push_str(text),
        }
    }

    fn push_emphasis(&self, out: &mut String, text: &str) {
        match self.style {
            EmphasisStyle::Markdown => {
                out.push_str("**");
                out.push_str(text);
                out.push_str("**");
            }
            EmphasisStyle::Html => {
                out.push_str("<b>");
                out.push_str(&html_escape::encode_text(text));
                out.push_str("</b>");
            }
            EmphasisStyle::Ansi => {
                out.push_str(ANSI_BOLD);
                out.push_str(text);
                out.push_str(ANSI_NORMAL);
            }
        }
    }
}

impl TextTransform for BionicTransform {
    fn transform(&self, raw: &str) -> String {
        let mut out = String::with_capacity(raw.len() * 2);
        let mut last = 0;

        for word in WORD.find_iter(raw) {
            self.push_plain(&mut out, &raw[last..word.start()]);

            let text = word.as_str();
            let fixation = fixation_len(text.chars().count());
            // Byte offset of the first non-emphasized char
            let split = text
                .char_indices()
                .nth(fixation)
                .map(|(idx, _)| idx)
                .unwrap_or(text.len());
            let (head, tail) = text.split_at(split);

            self.push_emphasis(&mut out, head);
            self.push_plain(&mut out, tail);
            last = word.end();
        }

        self.push_plain(&mut out, &raw[last..]);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn markdown(raw: &str) -> String {
        BionicTransform::new(EmphasisStyle::Markdown).transform(raw)
    }

    #[test]
    fn test_empty_input_yields_empty_output() {
        assert_eq!(markdown(""), "");
        assert_eq!(BionicTransform::new(EmphasisStyle::Html).transform(""), "");
    }

    #[test]
    fn test_fixation_lengths() {
        assert_eq!(fixation_len(1), 1);
        assert_eq!(fixation_len(3), 1);
        assert_eq!(fixation_len(4), 2);
        assert_eq!(fixation_len(5), 3);
        assert_eq!(fixation_len(6), 3);
        assert_eq!(fixation_len(11), 6);
    }

    #[test]
    fn test_markdown_sentence() {
        assert_eq!(markdown("The quick fox"), "**T**he **qui**ck **f**ox");
    }

    #[test]
    fn test_whitespace_and_punctuation_preserved() {
        assert_eq!(markdown("  Hi,\tworld!\n"), "  **H**i,\t**wor**ld!\n");
        assert_eq!(markdown("...---"), "...---");
    }

    #[test]
    fn test_multibyte_words_split_on_char_boundaries() {
        assert_eq!(markdown("Über straße"), "**Üb**er **str**aße");
    }

    #[test]
    fn test_html_escapes_surrounding_text() {
        let transform = BionicTransform::new(EmphasisStyle::Html);
        assert_eq!(transform.transform("a<b & cd"), "<b>a</b>&lt;<b>b</b> &amp; <b>c</b>d");
    }

    #[test]
    fn test_ansi_style() {
        let transform = BionicTransform::new(EmphasisStyle::Ansi);
        assert_eq!(transform.transform("read"), "\x1b[1mre\x1b[22mad");
    }

    #[test]
    fn test_deterministic() {
        let transform = BionicTransform::default();
        let text = "Numbers like 2024 count as words too.";
        assert_eq!(transform.transform(text), transform.transform(text));
    }

    #[test]
    fn test_style_from_str() {
        assert_eq!("md".parse::<EmphasisStyle>(), Ok(EmphasisStyle::Markdown));
        assert_eq!("HTML".parse::<EmphasisStyle>(), Ok(EmphasisStyle::Html));
        assert_eq!("ansi".parse::<EmphasisStyle>(), Ok(EmphasisStyle::Ansi));
        assert!("bold".parse::<EmphasisStyle>().is_err());
    }
}
