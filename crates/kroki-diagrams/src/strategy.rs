//! Request shapes tried against a Kroki server, in order.
//!
//! Server deployments and versions accept different request shapes. Rather
//! than requiring configuration, the client walks [`DEFAULT_STRATEGIES`] until
//! one succeeds. Everything is POST so that large sources never hit URL
//! length limits.

use serde::Serialize;

use crate::language::{DiagramFormat, DiagramType};
use crate::transport::HttpRequest;

/// Where a strategy sends its request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// `<server>/<type>/<format>`
    TypeFormat,
    /// `<server>/render`
    Render,
    /// `<server>`
    Root,
}

/// How a strategy encodes the request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyEncoding {
    /// `{"diagram_source": ...}`
    SourceJson,
    /// Raw UTF-8 source as `text/plain`.
    PlainText,
    /// `{"diagram_source": ..., "diagram_type": ..., "output_format": ...}`
    RenderJson,
}

/// One request shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Strategy {
    /// Short name used in logs and in [`Rendered`](crate::Rendered).
    pub name: &'static str,
    pub endpoint: Endpoint,
    pub body: BodyEncoding,
}

/// Default fallback chain.
pub const DEFAULT_STRATEGIES: [Strategy; 4] = [
    Strategy {
        name: "POST JSON",
        endpoint: Endpoint::TypeFormat,
        body: BodyEncoding::SourceJson,
    },
    // Some deployments reject the JSON form or mangle sources containing
    // characters their JSON decoder treats specially.
    Strategy {
        name: "POST text",
        endpoint: Endpoint::TypeFormat,
        body: BodyEncoding::PlainText,
    },
    Strategy {
        name: "POST /render",
        endpoint: Endpoint::Render,
        body: BodyEncoding::RenderJson,
    },
    Strategy {
        name: "POST /",
        endpoint: Endpoint::Root,
        body: BodyEncoding::RenderJson,
    },
];

const JSON_CONTENT_TYPE: &str = "application/json";
const TEXT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// A single render request: what to draw and in which format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderRequest<'a> {
    pub diagram_type: DiagramType,
    /// Verbatim diagram source. Never inspected or modified.
    pub source: &'a str,
    pub format: DiagramFormat,
}

#[derive(Serialize)]
struct SourcePayload<'a> {
    diagram_source: &'a str,
}

#[derive(Serialize)]
struct RenderPayload<'a> {
    diagram_source: &'a str,
    diagram_type: &'a str,
    output_format: &'a str,
}

impl Strategy {
    /// Target URL for `request` on `server_url` (no trailing slash).
    #[must_use]
    pub fn url(&self, server_url: &str, request: &RenderRequest<'_>) -> String {
        match self.endpoint {
            Endpoint::TypeFormat => {
                format!("{server_url}/{}/{}", request.diagram_type, request.format)
            }
            Endpoint::Render => format!("{server_url}/render"),
            Endpoint::Root => server_url.to_owned(),
        }
    }

    /// Build the HTTP request for this strategy.
    pub fn build(
        &self,
        server_url: &str,
        request: &RenderRequest<'_>,
    ) -> Result<HttpRequest, serde_json::Error> {
        let (content_type, body) = match self.body {
            BodyEncoding::SourceJson => (
                JSON_CONTENT_TYPE,
                serde_json::to_vec(&SourcePayload {
                    diagram_source: request.source,
                })?,
            ),
            BodyEncoding::PlainText => (TEXT_CONTENT_TYPE, request.source.as_bytes().to_vec()),
            BodyEncoding::RenderJson => (
                JSON_CONTENT_TYPE,
                serde_json::to_vec(&RenderPayload {
                    diagram_source: request.source,
                    diagram_type: request.diagram_type.as_str(),
                    output_format: request.format.as_str(),
                })?,
            ),
        };

        Ok(HttpRequest {
            url: self.url(server_url, request),
            headers: vec![
                ("Accept", request.format.accept().to_owned()),
                ("Content-Type", content_type.to_owned()),
            ],
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};

    use super::*;

    const SERVER: &str = "http://kroki:8000";

    fn request(format: DiagramFormat) -> RenderRequest<'static> {
        RenderRequest {
            diagram_type: DiagramType::GraphViz,
            source: "digraph { \"a\" -> \"b\" }",
            format,
        }
    }

    fn json_body(http: &HttpRequest) -> Value {
        serde_json::from_slice(&http.body).unwrap()
    }

    #[test]
    fn test_default_order() {
        let names: Vec<_> = DEFAULT_STRATEGIES.iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["POST JSON", "POST text", "POST /render", "POST /"]);
    }

    #[test]
    fn test_source_json_strategy() {
        let http = DEFAULT_STRATEGIES[0]
            .build(SERVER, &request(DiagramFormat::Svg))
            .unwrap();

        assert_eq!(http.url, "http://kroki:8000/graphviz/svg");
        assert_eq!(http.header("Accept"), Some("image/svg+xml"));
        assert_eq!(http.header("Content-Type"), Some("application/json"));
        assert_eq!(
            json_body(&http),
            json!({"diagram_source": "digraph { \"a\" -> \"b\" }"})
        );
    }

    #[test]
    fn test_plain_text_strategy() {
        let http = DEFAULT_STRATEGIES[1]
            .build(SERVER, &request(DiagramFormat::Svg))
            .unwrap();

        assert_eq!(http.url, "http://kroki:8000/graphviz/svg");
        assert_eq!(http.header("Content-Type"), Some("text/plain; charset=utf-8"));
        assert_eq!(http.body, "digraph { \"a\" -> \"b\" }".as_bytes());
    }

    #[test]
    fn test_render_endpoint_strategies() {
        let render = DEFAULT_STRATEGIES[2]
            .build(SERVER, &request(DiagramFormat::Svg))
            .unwrap();
        let root = DEFAULT_STRATEGIES[3]
            .build(SERVER, &request(DiagramFormat::Svg))
            .unwrap();

        assert_eq!(render.url, "http://kroki:8000/render");
        assert_eq!(root.url, "http://kroki:8000");
        let expected = json!({
            "diagram_source": "digraph { \"a\" -> \"b\" }",
            "diagram_type": "graphviz",
            "output_format": "svg",
        });
        assert_eq!(json_body(&render), expected);
        assert_eq!(json_body(&root), expected);
    }

    #[test]
    fn test_non_svg_accepts_anything() {
        for strategy in DEFAULT_STRATEGIES {
            let http = strategy.build(SERVER, &request(DiagramFormat::Png)).unwrap();
            assert_eq!(http.header("Accept"), Some("*/*"), "{}", strategy.name);
        }
        let http = DEFAULT_STRATEGIES[0]
            .build(SERVER, &request(DiagramFormat::Png))
            .unwrap();
        assert_eq!(http.url, "http://kroki:8000/graphviz/png");
    }

    #[test]
    fn test_plain_text_keeps_unicode_verbatim() {
        let source = "graph TD\n  A[Größe] --> B[\u{1F600}]";
        let req = RenderRequest {
            diagram_type: DiagramType::Mermaid,
            source,
            format: DiagramFormat::Svg,
        };
        let http = DEFAULT_STRATEGIES[1].build(SERVER, &req).unwrap();

        assert_eq!(http.body, source.as_bytes());
    }
}
