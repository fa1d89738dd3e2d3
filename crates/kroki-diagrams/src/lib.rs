//! Diagram classification and rendering via Kroki.
//!
//! # Architecture
//!
//! The crate is organized into modules:
//! - [`language`]: Canonical diagram types and output formats
//! - [`registry`]: Class-tag classification with aliases and exclusions
//! - [`strategy`]: Request shapes tried against the server, in order
//! - [`transport`]: HTTP seam ([`Transport`]) and its `ureq` implementation
//! - [`client`]: [`RenderClient`] walking the strategy chain
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use kroki_diagrams::{DiagramFormat, RenderClient, TypeRegistry};
//!
//! let registry = TypeRegistry::new(["mermaid"]);
//! let client = RenderClient::new("https://kroki.io");
//!
//! if let Some(found) = registry.classify(["python", "kroki-dot"]) {
//!     let svg = client.render(
//!         found.diagram_type,
//!         "digraph { a -> b }",
//!         DiagramFormat::Svg,
//!         Duration::from_secs(40),
//!     )?;
//!     assert!(!svg.is_empty());
//! }
//! # Ok::<(), kroki_diagrams::RenderError>(())
//! ```

pub mod client;
pub mod language;
pub mod registry;
pub mod strategy;
pub mod transport;

pub use client::{AttemptFailure, AttemptFailureKind, RenderClient, RenderError, Rendered};
pub use language::{DiagramFormat, DiagramType};
pub use registry::{Classification, TypeRegistry};
pub use strategy::{BodyEncoding, DEFAULT_STRATEGIES, Endpoint, RenderRequest, Strategy};
pub use transport::{HttpRequest, HttpResponse, Transport, TransportError, UreqTransport};
