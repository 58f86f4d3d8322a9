//! Reparation of legacy BBCode/HTML post bodies into Markdown
//!
//! Each pattern rule is a pure function over the post text. Rules are looked
//! up through [`RuleName`], the only names a configuration may enable, and
//! applied by the [`Pipeline`] in [`RuleName::ALL`] order.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub mod pipeline;
pub mod rules;

pub use pipeline::{Pipeline, Repair, RuleSet};

/// Signature shared by every pattern rule.
///
/// Rules push anything the caller should hear about into `diagnostics`
/// instead of logging it.
pub type Rule = fn(&str, &mut Vec<Diagnostic>) -> Result<String, RepairError>;

/// Known pattern rules, declared in canonical application order
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum RuleName {
    /// `<ATTACHMENT>` placeholders to Markdown images
    ImageUploads,
    /// Paragraph-wrapped `<img>` tags to Markdown images
    ImageHtml,
    /// Repeated `<br/>` and `</p>` tags
    MultipleBr,
    /// Legacy `<URL>` link wrappers to Markdown links
    LinkText,
    /// BBCode quotes to Markdown blockquotes
    Quote,
}

impl RuleName {
    pub const ALL: [RuleName; 5] = [
        RuleName::ImageUploads,
        RuleName::ImageHtml,
        RuleName::MultipleBr,
        RuleName::LinkText,
        RuleName::Quote,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RuleName::ImageUploads => "image_uploads",
            RuleName::ImageHtml => "image_html",
            RuleName::MultipleBr => "multiple_br",
            RuleName::LinkText => "link_text",
            RuleName::Quote => "quote",
        }
    }

    /// The function implementing this rule
    pub fn rule(&self) -> Rule {
        match self {
            RuleName::ImageUploads => rules::image_uploads,
            RuleName::ImageHtml => rules::image_html,
            RuleName::MultipleBr => rules::multiple_br,
            RuleName::LinkText => rules::link_text,
            RuleName::Quote => rules::quote,
        }
    }
}

impl fmt::Display for RuleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RuleName {
    type Err = RepairError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RuleName::ALL
            .into_iter()
            .find(|rule| rule.as_str() == s)
            .ok_or_else(|| RepairError::UnknownRule(s.to_string()))
    }
}

/// Something a rule worked around while rewriting a post
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// An `<ATTACHMENT>` referenced a file with no upload marker in the post
    MissingAttachment { filename: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::MissingAttachment { filename } => {
                write!(f, "Missing attachment '{}'", filename)
            }
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum RepairError {
    #[error("Unknown reparation rule: {0}")]
    UnknownRule(String),

    #[error("Invalid pattern for rule {rule}: {source}")]
    Pattern {
        rule: RuleName,
        #[source]
        source: regex::Error,
    },
}
