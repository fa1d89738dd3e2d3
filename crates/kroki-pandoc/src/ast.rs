//! Minimal typed view of the pandoc JSON AST.
//!
//! Only the pieces the filter reads or writes are modeled: the attributes and
//! text of a `CodeBlock`, and the `Para [Image]` that replaces it. Every other
//! node stays as an untyped [`Value`], so the filter works across pandoc API
//! versions.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Attribute key holding the figure caption.
pub const CAPTION_KEY: &str = "caption";

/// Image title marking an implicit figure.
pub const FIGURE_TITLE: &str = "fig:";

/// Pandoc `Attr`: `[identifier, [classes], [[key, value]]]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "AttrRepr", into = "AttrRepr")]
pub struct Attr {
    pub identifier: String,
    pub classes: Vec<String>,
    pub attributes: Vec<(String, String)>,
}

#[derive(Serialize, Deserialize)]
struct AttrRepr(String, Vec<String>, Vec<(String, String)>);

impl From<AttrRepr> for Attr {
    fn from(AttrRepr(identifier, classes, attributes): AttrRepr) -> Self {
        Self {
            identifier,
            classes,
            attributes,
        }
    }
}

impl From<Attr> for AttrRepr {
    fn from(attr: Attr) -> Self {
        Self(attr.identifier, attr.classes, attr.attributes)
    }
}

/// A decoded `CodeBlock` node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBlock {
    pub attr: Attr,
    /// Raw block content, without the fences.
    pub text: String,
}

impl CodeBlock {
    /// Decode `node` if it is a well-formed `CodeBlock`.
    #[must_use]
    pub fn from_node(node: &Value) -> Option<Self> {
        if node.get("t")?.as_str()? != "CodeBlock" {
            return None;
        }
        match serde_json::from_value::<(Attr, String)>(node.get("c")?.clone()) {
            Ok((attr, text)) => Some(Self { attr, text }),
            Err(e) => {
                tracing::debug!("skipping malformed CodeBlock: {e}");
                None
            }
        }
    }
}

/// Caption pulled out of a block's attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Caption {
    pub text: Option<String>,
}

impl Caption {
    /// Remove every `caption` entry from `attributes`.
    ///
    /// When the key repeats, the last value wins.
    pub fn take(attributes: Vec<(String, String)>) -> (Self, Vec<(String, String)>) {
        let mut text = None;
        let mut rest = Vec::with_capacity(attributes.len());
        for (key, value) in attributes {
            if key == CAPTION_KEY {
                text = Some(value);
            } else {
                rest.push((key, value));
            }
        }
        (Self { text }, rest)
    }

    /// Caption inlines: a single `Str`, or nothing.
    #[must_use]
    pub fn inlines(&self) -> Vec<Value> {
        self.text
            .iter()
            .map(|text| json!({"t": "Str", "c": text}))
            .collect()
    }

    /// Image title: `fig:` when captioned so pandoc treats the image as a
    /// figure, empty otherwise.
    #[must_use]
    pub fn type_hint(&self) -> &'static str {
        if self.text.is_some() { FIGURE_TITLE } else { "" }
    }
}

/// Build `Para [Image attr caption (target, title)]`.
#[must_use]
pub fn image_para(attr: &Attr, caption: &Caption, target: &str) -> Value {
    json!({
        "t": "Para",
        "c": [{
            "t": "Image",
            "c": [attr, caption.inlines(), [target, caption.type_hint()]]
        }]
    })
}
