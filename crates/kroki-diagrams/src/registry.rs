//! Class-tag classification of code blocks.
//!
//! A code block is a render target when exactly one of its classes is a known
//! diagram identifier: either a canonical type name (`mermaid`), its
//! `kroki-` prefixed form (`kroki-mermaid`, as used by the `MkDocs` Kroki
//! plugin), or one of a few hand-declared aliases.

use std::collections::{BTreeMap, BTreeSet};

use crate::language::DiagramType;

/// Aliases that don't follow the `kroki-<type>` pattern.
const SPECIAL_ALIASES: [(&str, DiagramType); 3] = [
    ("kroki-dot", DiagramType::GraphViz),
    ("kroki-c4", DiagramType::C4PlantUml),
    ("kroki-vega-lite", DiagramType::VegaLite),
];

/// Prefix added to every canonical type to form its `kroki-` alias.
const ALIAS_PREFIX: &str = "kroki-";

/// Result of a successful classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// The class that matched (canonical name or alias).
    pub class: String,
    /// Canonical diagram type the class resolves to.
    pub diagram_type: DiagramType,
}

/// Lookup table from class tags to diagram types, with exclusions.
///
/// Built once and not mutated afterwards.
#[derive(Debug, Clone)]
pub struct TypeRegistry {
    /// Every recognized identifier. Canonical names map to themselves.
    available: BTreeMap<String, DiagramType>,
    /// Excluded identifiers, restricted to keys of `available`.
    blacklist: BTreeSet<String>,
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new(std::iter::empty::<&str>())
    }
}

impl TypeRegistry {
    /// Build the registry, keeping only exclusions that name a known identifier.
    ///
    /// Unknown exclusions are dropped without error.
    pub fn new<I, S>(blacklist: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut available = BTreeMap::new();
        for diagram_type in DiagramType::ALL {
            available.insert(diagram_type.as_str().to_owned(), diagram_type);
            available.insert(format!("{ALIAS_PREFIX}{diagram_type}"), diagram_type);
        }
        for (alias, diagram_type) in SPECIAL_ALIASES {
            available.insert(alias.to_owned(), diagram_type);
        }

        let blacklist = blacklist
            .into_iter()
            .filter_map(|entry| {
                let entry = entry.as_ref();
                if available.contains_key(entry) {
                    Some(entry.to_owned())
                } else {
                    tracing::debug!(entry, "ignoring unknown blacklist entry");
                    None
                }
            })
            .collect();

        Self {
            available,
            blacklist,
        }
    }

    /// Whether `identifier` is a recognized class tag.
    #[must_use]
    pub fn is_available(&self, identifier: &str) -> bool {
        self.available.contains_key(identifier)
    }

    /// Resolve a recognized identifier to its canonical type.
    #[must_use]
    pub fn resolve(&self, identifier: &str) -> Option<DiagramType> {
        self.available.get(identifier).copied()
    }

    /// All recognized identifiers in sorted order.
    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.available.keys().map(String::as_str)
    }

    /// Effective exclusions in sorted order.
    pub fn blacklist(&self) -> impl Iterator<Item = &str> {
        self.blacklist.iter().map(String::as_str)
    }

    /// Classify a code block by its class list.
    ///
    /// Returns `None` unless exactly one distinct class is recognized.
    /// Also returns `None` when the matched class, or the canonical type it
    /// resolves to, is excluded.
    pub fn classify<'c, I>(&self, classes: I) -> Option<Classification>
    where
        I: IntoIterator<Item = &'c str>,
    {
        let matches: BTreeSet<&str> = classes
            .into_iter()
            .filter(|class| self.is_available(class))
            .collect();

        let mut iter = matches.into_iter();
        let (Some(class), None) = (iter.next(), iter.next()) else {
            return None;
        };

        let diagram_type = self.resolve(class)?;
        if self.is_excluded(class, diagram_type) {
            tracing::debug!(class, %diagram_type, "diagram type is blacklisted");
            return None;
        }

        Some(Classification {
            class: class.to_owned(),
            diagram_type,
        })
    }

    fn is_excluded(&self, class: &str, diagram_type: DiagramType) -> bool {
        self.blacklist.contains(class) || self.blacklist.contains(diagram_type.as_str())
    }
}
