//! Kroki render client with ordered fallback.
//!
//! Each [`Strategy`] is tried in turn. The first 2xx response wins; every
//! failed attempt is logged at info level and recorded, but only exhausting
//! the whole chain is an error.

use std::time::Duration;

use crate::language::{DiagramFormat, DiagramType};
use crate::strategy::{DEFAULT_STRATEGIES, RenderRequest, Strategy};
use crate::transport::{Transport, UreqTransport};

/// Successful render, with the attempt history.
#[derive(Debug)]
pub struct Rendered {
    /// Raw response body.
    pub bytes: Vec<u8>,
    /// Name of the strategy that succeeded.
    pub strategy: &'static str,
    /// Attempts that failed before the successful one.
    pub failures: Vec<AttemptFailure>,
}

/// A single failed attempt.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{strategy} at {url}: {kind}")]
pub struct AttemptFailure {
    pub strategy: &'static str,
    pub url: String,
    pub kind: AttemptFailureKind,
}

/// Why an attempt failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AttemptFailureKind {
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("transport error: {0}")]
    Transport(String),
    #[error("request encoding error: {0}")]
    Encode(String),
}

/// Render error.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// Every strategy failed.
    #[error(
        "Kroki POST failed for diagram_type='{diagram_type}' format='{format}' server='{server}'"
    )]
    Exhausted {
        diagram_type: DiagramType,
        format: DiagramFormat,
        server: String,
        failures: Vec<AttemptFailure>,
    },
}

/// Client for a single Kroki server.
pub struct RenderClient {
    server_url: String,
    transport: Box<dyn Transport>,
    strategies: Vec<Strategy>,
}

impl RenderClient {
    /// Create a client for `server_url` using the default HTTP transport.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use std::time::Duration;
    /// use kroki_diagrams::{DiagramFormat, DiagramType, RenderClient};
    ///
    /// let client = RenderClient::new("https://kroki.io");
    /// let svg = client.render(
    ///     DiagramType::GraphViz,
    ///     "digraph { a -> b }",
    ///     DiagramFormat::Svg,
    ///     Duration::from_secs(40),
    /// )?;
    /// # Ok::<(), kroki_diagrams::RenderError>(())
    /// ```
    #[must_use]
    pub fn new(server_url: impl Into<String>) -> Self {
        Self::with_transport(server_url, UreqTransport::new())
    }

    /// Create a client with a custom transport.
    #[must_use]
    pub fn with_transport(server_url: impl Into<String>, transport: impl Transport + 'static) -> Self {
        let server_url = server_url.into().trim_end_matches('/').to_owned();
        Self {
            server_url,
            transport: Box::new(transport),
            strategies: DEFAULT_STRATEGIES.to_vec(),
        }
    }

    /// Replace the fallback chain.
    #[must_use]
    pub fn strategies(mut self, strategies: Vec<Strategy>) -> Self {
        self.strategies = strategies;
        self
    }

    /// Server base URL (no trailing slash).
    #[must_use]
    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    /// Render a diagram, returning the body of the first successful response.
    pub fn render(
        &self,
        diagram_type: DiagramType,
        source: &str,
        format: DiagramFormat,
        timeout: Duration,
    ) -> Result<Vec<u8>, RenderError> {
        let request = RenderRequest {
            diagram_type,
            source,
            format,
        };
        self.render_detailed(&request, timeout)
            .map(|rendered| rendered.bytes)
    }

    /// Render a diagram, also reporting which strategy succeeded and which failed.
    ///
    /// `timeout` applies to each attempt separately.
    pub fn render_detailed(
        &self,
        request: &RenderRequest<'_>,
        timeout: Duration,
    ) -> Result<Rendered, RenderError> {
        let mut failures = Vec::new();

        for strategy in &self.strategies {
            match self.attempt(strategy, request, timeout) {
                Ok(bytes) => {
                    tracing::debug!(
                        strategy = strategy.name,
                        diagram_type = %request.diagram_type,
                        bytes = bytes.len(),
                        "rendered diagram"
                    );
                    return Ok(Rendered {
                        bytes,
                        strategy: strategy.name,
                        failures,
                    });
                }
                Err(failure) => {
                    tracing::info!("{failure}");
                    failures.push(failure);
                }
            }
        }

        Err(RenderError::Exhausted {
            diagram_type: request.diagram_type,
            format: request.format,
            server: self.server_url.clone(),
            failures,
        })
    }

    fn attempt(
        &self,
        strategy: &Strategy,
        request: &RenderRequest<'_>,
        timeout: Duration,
    ) -> Result<Vec<u8>, AttemptFailure> {
        let fail = |url: String, kind| AttemptFailure {
            strategy: strategy.name,
            url,
            kind,
        };

        let http = strategy
            .build(&self.server_url, request)
            .map_err(|e| {
                fail(
                    strategy.url(&self.server_url, request),
                    AttemptFailureKind::Encode(e.to_string()),
                )
            })?;

        let response = match self.transport.post(&http, timeout) {
            Ok(response) => response,
            Err(e) => return Err(fail(http.url, AttemptFailureKind::Transport(e.0))),
        };

        if response.is_success() {
            return Ok(response.body);
        }

        Err(fail(
            http.url,
            AttemptFailureKind::Status {
                status: response.status,
                body: response.text(),
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::transport::{HttpRequest, HttpResponse, TransportError};

    type Reply = Result<HttpResponse, TransportError>;

    /// Transport that replays canned replies and records every request.
    #[derive(Clone, Default)]
    struct ScriptedTransport {
        replies: Rc<RefCell<VecDeque<Reply>>>,
        calls: Rc<RefCell<Vec<(HttpRequest, Duration)>>>,
    }

    impl ScriptedTransport {
        fn new(replies: Vec<Reply>) -> Self {
            Self {
                replies: Rc::new(RefCell::new(replies.into())),
                calls: Rc::default(),
            }
        }

        fn urls(&self) -> Vec<String> {
            self.calls.borrow().iter().map(|(r, _)| r.url.clone()).collect()
        }
    }

    impl Transport for ScriptedTransport {
        fn post(&self, request: &HttpRequest, timeout: Duration) -> Reply {
            self.calls.borrow_mut().push((request.clone(), timeout));
            self.replies
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Err(TransportError("no reply scripted".to_owned())))
        }
    }

    fn ok(body: &str) -> Reply {
        Ok(HttpResponse {
            status: 200,
            body: body.as_bytes().to_vec(),
        })
    }

    fn status(status: u16, body: &str) -> Reply {
        Ok(HttpResponse {
            status,
            body: body.as_bytes().to_vec(),
        })
    }

    fn graphviz(source: &str) -> RenderRequest<'_> {
        RenderRequest {
            diagram_type: DiagramType::GraphViz,
            source,
            format: DiagramFormat::Svg,
        }
    }

    const TIMEOUT: Duration = Duration::from_secs(40);

    #[test]
    fn test_first_strategy_success_short_circuits() {
        let transport = ScriptedTransport::new(vec![ok("<svg>1</svg>"), ok("<svg>2</svg>")]);
        let client = RenderClient::with_transport("http://kroki", transport.clone());

        let bytes = client
            .render(DiagramType::GraphViz, "digraph {}", DiagramFormat::Svg, TIMEOUT)
            .unwrap();

        assert_eq!(bytes, b"<svg>1</svg>");
        assert_eq!(transport.urls(), vec!["http://kroki/graphviz/svg"]);
    }

    #[test]
    fn test_falls_back_to_third_strategy() {
        let transport = ScriptedTransport::new(vec![
            status(400, "bad json"),
            status(415, "unsupported"),
            ok("<svg>third</svg>"),
        ]);
        let client = RenderClient::with_transport("http://kroki", transport.clone());

        let rendered = client.render_detailed(&graphviz("digraph {}"), TIMEOUT).unwrap();

        assert_eq!(rendered.bytes, b"<svg>third</svg>");
        assert_eq!(rendered.strategy, "POST /render");
        assert_eq!(rendered.failures.len(), 2);
        assert_eq!(
            rendered.failures[0],
            AttemptFailure {
                strategy: "POST JSON",
                url: "http://kroki/graphviz/svg".to_owned(),
                kind: AttemptFailureKind::Status {
                    status: 400,
                    body: "bad json".to_owned(),
                },
            }
        );
        assert_eq!(rendered.failures[1].strategy, "POST text");
        assert_eq!(
            transport.urls(),
            vec![
                "http://kroki/graphviz/svg",
                "http://kroki/graphviz/svg",
                "http://kroki/render",
            ]
        );
    }

    #[test]
    fn test_transport_error_falls_through() {
        let transport = ScriptedTransport::new(vec![
            Err(TransportError("connection refused".to_owned())),
            ok("<svg>text</svg>"),
        ]);
        let client = RenderClient::with_transport("http://kroki", transport.clone());

        let rendered = client.render_detailed(&graphviz("digraph {}"), TIMEOUT).unwrap();

        assert_eq!(rendered.bytes, b"<svg>text</svg>");
        assert_eq!(rendered.strategy, "POST text");
        assert_eq!(
            rendered.failures[0].kind,
            AttemptFailureKind::Transport("connection refused".to_owned())
        );
    }

    #[test]
    fn test_exhaustion_reports_context() {
        let transport = ScriptedTransport::new(vec![
            status(500, "a"),
            status(500, "b"),
            Err(TransportError("timed out".to_owned())),
            status(404, "d"),
        ]);
        let client = RenderClient::with_transport("http://kroki/", transport.clone());

        let err = client.render_detailed(&graphviz("digraph {}"), TIMEOUT).unwrap_err();

        assert_eq!(
            err.to_string(),
            "Kroki POST failed for diagram_type='graphviz' format='svg' server='http://kroki'"
        );
        let RenderError::Exhausted { failures, .. } = err;
        assert_eq!(failures.len(), 4);
        assert_eq!(
            transport.urls(),
            vec![
                "http://kroki/graphviz/svg",
                "http://kroki/graphviz/svg",
                "http://kroki/render",
                "http://kroki",
            ]
        );
    }

    #[test]
    fn test_non_2xx_success_range() {
        // Redirect-class statuses that reach the client are failures
        let transport = ScriptedTransport::new(vec![status(304, ""), status(201, "<svg/>")]);
        let client = RenderClient::with_transport("http://kroki", transport);

        let rendered = client.render_detailed(&graphviz("x"), TIMEOUT).unwrap();
        assert_eq!(rendered.bytes, b"<svg/>");
        assert_eq!(rendered.failures.len(), 1);
    }

    #[test]
    fn test_timeout_applied_to_every_attempt() {
        let transport = ScriptedTransport::new(vec![
            status(500, ""),
            status(500, ""),
            status(500, ""),
            ok("<svg/>"),
        ]);
        let client = RenderClient::with_transport("http://kroki", transport.clone());
        let timeout = Duration::from_secs(7);

        client.render_detailed(&graphviz("x"), timeout).unwrap();

        let calls = transport.calls.borrow();
        assert_eq!(calls.len(), 4);
        assert!(calls.iter().all(|(_, t)| *t == timeout));
    }

    #[test]
    fn test_source_sent_verbatim() {
        let source = "digraph {\n  a -> b [label=\"\\n\"];\n}\n";
        let transport = ScriptedTransport::new(vec![status(400, ""), ok("<svg/>")]);
        let client = RenderClient::with_transport("http://kroki", transport.clone());

        client.render_detailed(&graphviz(source), TIMEOUT).unwrap();

        let calls = transport.calls.borrow();
        let json: serde_json::Value = serde_json::from_slice(&calls[0].0.body).unwrap();
        assert_eq!(json["diagram_source"], source);
        assert_eq!(calls[1].0.body, source.as_bytes());
    }

    #[test]
    fn test_custom_strategy_chain() {
        let transport = ScriptedTransport::new(vec![status(500, "")]);
        let client = RenderClient::with_transport("http://kroki", transport.clone())
            .strategies(vec![DEFAULT_STRATEGIES[1]]);

        assert!(client.render_detailed(&graphviz("x"), TIMEOUT).is_err());
        assert_eq!(transport.calls.borrow().len(), 1);
    }
}
