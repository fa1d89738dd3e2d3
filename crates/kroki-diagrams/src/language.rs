//! Diagram types and output formats supported by Kroki.

use std::fmt;

/// Canonical diagram types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiagramType {
    BlockDiag,
    Bpmn,
    Bytefield,
    SeqDiag,
    ActDiag,
    NwDiag,
    PacketDiag,
    RackDiag,
    C4PlantUml,
    Ditaa,
    Erd,
    Excalidraw,
    GraphViz,
    Mermaid,
    Nomnoml,
    PlantUml,
    Svgbob,
    Umlet,
    Vega,
    VegaLite,
    WaveDrom,
    Pikchr,
}

impl DiagramType {
    /// Every canonical diagram type.
    pub const ALL: [Self; 22] = [
        Self::BlockDiag,
        Self::Bpmn,
        Self::Bytefield,
        Self::SeqDiag,
        Self::ActDiag,
        Self::NwDiag,
        Self::PacketDiag,
        Self::RackDiag,
        Self::C4PlantUml,
        Self::Ditaa,
        Self::Erd,
        Self::Excalidraw,
        Self::GraphViz,
        Self::Mermaid,
        Self::Nomnoml,
        Self::PlantUml,
        Self::Svgbob,
        Self::Umlet,
        Self::Vega,
        Self::VegaLite,
        Self::WaveDrom,
        Self::Pikchr,
    ];

    /// Parse a canonical diagram type name.
    ///
    /// Aliases such as `kroki-dot` are resolved by
    /// [`TypeRegistry`](crate::TypeRegistry), not here.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == s)
    }

    /// Kroki endpoint name for this diagram type.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BlockDiag => "blockdiag",
            Self::Bpmn => "bpmn",
            Self::Bytefield => "bytefield",
            Self::SeqDiag => "seqdiag",
            Self::ActDiag => "actdiag",
            Self::NwDiag => "nwdiag",
            Self::PacketDiag => "packetdiag",
            Self::RackDiag => "rackdiag",
            Self::C4PlantUml => "c4plantuml",
            Self::Ditaa => "ditaa",
            Self::Erd => "erd",
            Self::Excalidraw => "excalidraw",
            Self::GraphViz => "graphviz",
            Self::Mermaid => "mermaid",
            Self::Nomnoml => "nomnoml",
            Self::PlantUml => "plantuml",
            Self::Svgbob => "svgbob",
            Self::Umlet => "umlet",
            Self::Vega => "vega",
            Self::VegaLite => "vegalite",
            Self::WaveDrom => "wavedrom",
            Self::Pikchr => "pikchr",
        }
    }
}

impl fmt::Display for DiagramType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output format requested from Kroki.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DiagramFormat {
    /// Vector graphics (default).
    #[default]
    Svg,
    Png,
    Pdf,
    Jpeg,
}

impl DiagramFormat {
    /// Parse format from its Kroki name.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "svg" => Some(Self::Svg),
            "png" => Some(Self::Png),
            "pdf" => Some(Self::Pdf),
            "jpeg" => Some(Self::Jpeg),
            _ => None,
        }
    }

    /// Format name as used in Kroki URLs and request payloads.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Svg => "svg",
            Self::Png => "png",
            Self::Pdf => "pdf",
            Self::Jpeg => "jpeg",
        }
    }

    /// File extension for cached artifacts.
    #[must_use]
    pub fn extension(self) -> &'static str {
        self.as_str()
    }

    /// `Accept` header value sent with render requests.
    #[must_use]
    pub fn accept(self) -> &'static str {
        match self {
            Self::Svg => "image/svg+xml",
            Self::Png | Self::Pdf | Self::Jpeg => "*/*",
        }
    }
}

impl fmt::Display for DiagramFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_roundtrips_all_types() {
        for diagram_type in DiagramType::ALL {
            assert_eq!(
                DiagramType::parse(diagram_type.as_str()),
                Some(diagram_type),
                "Failed to parse: {diagram_type}"
            );
        }
    }

    #[test]
    fn test_parse_rejects_aliases_and_unknown() {
        assert_eq!(DiagramType::parse("kroki-dot"), None);
        assert_eq!(DiagramType::parse("dot"), None);
        assert_eq!(DiagramType::parse("python"), None);
        assert_eq!(DiagramType::parse(""), None);
    }

    #[test]
    fn test_endpoints() {
        assert_eq!(DiagramType::GraphViz.as_str(), "graphviz");
        assert_eq!(DiagramType::C4PlantUml.as_str(), "c4plantuml");
        assert_eq!(DiagramType::VegaLite.as_str(), "vegalite");
        assert_eq!(DiagramType::Pikchr.to_string(), "pikchr");
    }

    #[test]
    fn test_endpoint_names_unique() {
        let mut names: Vec<_> = DiagramType::ALL.iter().map(|t| t.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), DiagramType::ALL.len());
    }

    #[test]
    fn test_format_default_is_svg() {
        assert_eq!(DiagramFormat::default(), DiagramFormat::Svg);
    }

    #[test]
    fn test_format_parse() {
        assert_eq!(DiagramFormat::parse("svg"), Some(DiagramFormat::Svg));
        assert_eq!(DiagramFormat::parse("png"), Some(DiagramFormat::Png));
        assert_eq!(DiagramFormat::parse("gif"), None);
        assert_eq!(DiagramFormat::parse(""), None);
    }

    #[test]
    fn test_format_accept_header() {
        assert_eq!(DiagramFormat::Svg.accept(), "image/svg+xml");
        assert_eq!(DiagramFormat::Png.accept(), "*/*");
        assert_eq!(DiagramFormat::Pdf.accept(), "*/*");
    }
}
