//! Diagram cache key computation.
//!
//! Provides [`DiagramKey`] for computing the content hash used to name cached files.

use std::fmt;

use sha2::{Digest as _, Sha256};

/// Diagram parameters for cache key computation.
///
/// Contains the parameters that identify a rendered artifact: the canonical
/// Kroki diagram type and the verbatim block source.
#[derive(Debug, Clone, Copy)]
pub struct DiagramKey<'a> {
    /// Canonical diagram type (e.g., "graphviz", "mermaid").
    pub diagram_type: &'a str,
    /// Diagram source code, exactly as written in the document.
    pub source: &'a str,
}

impl<'a> DiagramKey<'a> {
    #[must_use]
    pub fn new(diagram_type: &'a str, source: &'a str) -> Self {
        Self {
            diagram_type,
            source,
        }
    }

    /// Compute the content digest for this key.
    ///
    /// # Hash Format
    ///
    /// SHA-256 of the type bytes immediately followed by the source bytes,
    /// with no separator. Digests stay compatible with existing cache
    /// directories, so the field order must not change.
    #[must_use]
    pub fn digest(&self) -> Digest {
        let mut hasher = Sha256::new();
        hasher.update(self.diagram_type.as_bytes());
        hasher.update(self.source.as_bytes());
        Digest(hex::encode(hasher.finalize()))
    }
}

/// Hex-encoded SHA-256 digest naming a cache entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Digest(String);

impl Digest {
    /// Digest as a lowercase hex string (64 characters).
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use sha2::Digest as _;

    use super::*;

    #[test]
    fn test_digest_deterministic() {
        let key1 = DiagramKey::new("graphviz", "digraph { a -> b }");
        let key2 = DiagramKey::new("graphviz", "digraph { a -> b }");

        assert_eq!(key1.digest(), key2.digest());
    }

    #[test]
    fn test_digest_source_matters() {
        let key1 = DiagramKey::new("graphviz", "digraph { a -> b }");
        let key2 = DiagramKey::new("graphviz", "digraph { a -> c }");

        assert_ne!(key1.digest(), key2.digest());
    }

    #[test]
    fn test_digest_type_matters() {
        let key1 = DiagramKey::new("graphviz", "A -> B");
        let key2 = DiagramKey::new("plantuml", "A -> B");

        assert_ne!(key1.digest(), key2.digest());
    }

    #[test]
    fn test_digest_is_type_then_source_concatenation() {
        // No delimiter between fields: moving bytes across the boundary
        // yields the same digest.
        let split_a = DiagramKey::new("vega", "lite{}");
        let split_b = DiagramKey::new("vegalite", "{}");

        assert_eq!(split_a.digest(), split_b.digest());
    }

    #[test]
    fn test_digest_known_value() {
        // sha256("graphviz") with an empty source
        let key = DiagramKey::new("graphviz", "");
        let expected = {
            let mut hasher = Sha256::new();
            hasher.update(b"graphviz");
            hex::encode(hasher.finalize())
        };

        assert_eq!(key.digest().as_str(), expected);
    }

    #[test]
    fn test_digest_format() {
        let digest = DiagramKey::new("mermaid", "graph TD\n  A --> B").digest();

        assert_eq!(digest.as_str().len(), 64, "SHA-256 hash should be 64 hex characters");
        assert!(
            digest
                .as_str()
                .chars()
                .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()),
            "Hash should contain only lowercase hex digits"
        );
        assert_eq!(digest.to_string(), digest.as_str());
    }
}
