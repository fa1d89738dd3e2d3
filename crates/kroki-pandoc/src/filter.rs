//! Code block to image transformation.
//!
//! This module provides [`DiagramFilter`], which replaces diagram code blocks
//! with `Para [Image]` nodes pointing at rendered files in the cache.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use kroki_cache::DiagramCache;
use kroki_config::{Config, DEFAULT_TIMEOUT};
use kroki_diagrams::{DiagramFormat, RenderClient, RenderError, TypeRegistry};
use serde_json::Value;

use crate::ast::{Attr, Caption, CodeBlock, image_para};
use crate::walk::walk;

/// Filter error.
#[derive(Debug, thiserror::Error)]
pub enum FilterError {
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("failed to open cache directory {}: {source}", path.display())]
    CacheDir { path: PathBuf, source: io::Error },
    #[error("failed to write cache file {}: {source}", path.display())]
    CacheWrite { path: PathBuf, source: io::Error },
}

/// Counts of diagrams handled so far.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FilterStats {
    /// Diagrams rendered via Kroki.
    pub rendered: usize,
    /// Diagrams served from the cache.
    pub cached: usize,
}

/// Replaces diagram code blocks with cached image references.
///
/// Nodes are handled one at a time. The only state shared between nodes is
/// the cache directory and the registry.
///
/// # Example
///
/// ```no_run
/// use kroki_cache::DiagramCache;
/// use kroki_diagrams::{RenderClient, TypeRegistry};
/// use kroki_pandoc::DiagramFilter;
///
/// let mut filter = DiagramFilter::new(
///     TypeRegistry::default(),
///     DiagramCache::open(".kroki-cache", "svg")?,
///     RenderClient::new("https://kroki.io"),
/// );
///
/// let mut doc: serde_json::Value = serde_json::from_reader(std::io::stdin())?;
/// filter.transform_document(&mut doc)?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct DiagramFilter {
    registry: TypeRegistry,
    cache: DiagramCache,
    client: RenderClient,
    format: DiagramFormat,
    timeout: Duration,
    stats: FilterStats,
}

impl DiagramFilter {
    /// Create a filter rendering SVG with the default timeout.
    ///
    /// `cache` should have been opened with the SVG extension.
    #[must_use]
    pub fn new(registry: TypeRegistry, cache: DiagramCache, client: RenderClient) -> Self {
        Self {
            registry,
            cache,
            client,
            format: DiagramFormat::Svg,
            timeout: DEFAULT_TIMEOUT,
            stats: FilterStats::default(),
        }
    }

    /// Build every component from `config`.
    ///
    /// Creates the cache directory if needed.
    pub fn from_config(config: &Config) -> Result<Self, FilterError> {
        let format = DiagramFormat::Svg;
        let cache = DiagramCache::open(&config.cache_dir, format.extension()).map_err(|source| {
            FilterError::CacheDir {
                path: config.cache_dir.clone(),
                source,
            }
        })?;
        let registry = TypeRegistry::new(&config.blacklist);
        let client = RenderClient::new(config.server_url.as_str());

        Ok(Self::new(registry, cache, client).timeout(config.timeout))
    }

    /// Set the per-attempt timeout for Kroki requests.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Counts of diagrams rendered and served from cache.
    #[must_use]
    pub fn stats(&self) -> FilterStats {
        self.stats
    }

    /// Transform every diagram code block in a pandoc JSON document in place.
    ///
    /// Stops at the first error; the document is then partially transformed
    /// and should be discarded.
    pub fn transform_document(&mut self, doc: &mut Value) -> Result<(), FilterError> {
        walk(doc, &mut |node: &Value| self.transform_node(node))
    }

    /// Transform one node.
    ///
    /// Returns `Ok(None)` when the node is not a diagram code block, or is
    /// excluded, and should be left as is.
    pub fn transform_node(&mut self, node: &Value) -> Result<Option<Value>, FilterError> {
        let Some(block) = CodeBlock::from_node(node) else {
            return Ok(None);
        };
        let CodeBlock { attr, text } = block;

        let Some(found) = self.registry.classify(attr.classes.iter().map(String::as_str)) else {
            return Ok(None);
        };
        let diagram_type = found.diagram_type;

        let (caption, attributes) = Caption::take(attr.attributes);

        let digest = self.cache.key_for(diagram_type.as_str(), &text);
        let path = self.cache.path_for(&digest);

        if self.cache.exists(&path) {
            tracing::info!("using cache -> {}", path.display());
            self.stats.cached += 1;
        } else {
            tracing::info!("rendering via POST -> {diagram_type} (cache miss)");
            let bytes = self
                .client
                .render(diagram_type, &text, self.format, self.timeout)?;
            self.cache
                .store(&path, &bytes)
                .map_err(|source| FilterError::CacheWrite {
                    path: path.clone(),
                    source,
                })?;
            self.stats.rendered += 1;
        }

        let image_attr = Attr {
            identifier: attr.identifier,
            classes: Vec::new(),
            attributes,
        };
        Ok(Some(image_para(
            &image_attr,
            &caption,
            &path.to_string_lossy(),
        )))
    }
}
