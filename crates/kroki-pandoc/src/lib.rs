//! Pandoc JSON filter for Kroki diagrams.
//!
//! Replaces fenced code blocks whose class names a diagram type with an image
//! rendered by Kroki and stored in a content-addressed cache:
//!
//! ````markdown
//! ```{.kroki-dot #fig-flow caption="Data flow"}
//! digraph { a -> b }
//! ```
//! ````
//!
//! becomes `Para [Image ("fig-flow", [], []) [Str "Data flow"] (".kroki-cache/<sha256>.svg", "fig:")]`.
//!
//! - [`ast`]: the few pandoc node shapes the filter decodes and builds
//! - [`walk()`]: in-order traversal of a pandoc JSON document
//! - [`DiagramFilter`]: classification, caching and rendering per node

pub mod ast;
mod filter;
mod walk;

pub use filter::{DiagramFilter, FilterError, FilterStats};
pub use walk::walk;
