//! Canvas files: JSON documents with a list of nodes.

use qs_core::CanvasNode;
use serde::Deserialize;

/// The parts of a canvas file the switcher reads.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CanvasFile {
    /// Canvas nodes.
    nodes: Vec<RawNode>,
}

/// A canvas node as stored on disk.
#[derive(Debug, Deserialize)]
struct RawNode {
    /// Node id.
    id: String,
    /// `text`, `file`, `link` or `group`.
    #[serde(rename = "type")]
    node_type: String,
    /// Body of a text node.
    text: Option<String>,
    /// Target of a file node.
    file: Option<String>,
    /// Target of a link node.
    url: Option<String>,
    /// Title of a group node.
    label: Option<String>,
}

impl From<RawNode> for CanvasNode {
    fn from(raw: RawNode) -> Self {
        let text = match raw.node_type.as_str() {
            "file" => raw.file,
            "link" => raw.url,
            "group" => raw.label,
            _ => raw.text,
        };
        Self {
            id: raw.id,
            node_type: raw.node_type,
            text: text.unwrap_or_default(),
        }
    }
}

/// Parses the nodes of a canvas file, in file order.
pub fn parse_canvas(content: &str) -> Result<Vec<CanvasNode>, serde_json::Error> {
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }
    let canvas: CanvasFile = serde_json::from_str(content)?;
    Ok(canvas.nodes.into_iter().map(CanvasNode::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_text_by_type() {
        let json = r#"{
            "nodes": [
                {"id": "a", "type": "text", "text": "Idea", "x": 0, "y": 0},
                {"id": "b", "type": "file", "file": "notes/plan.md"},
                {"id": "c", "type": "link", "url": "https://example.com"},
                {"id": "d", "type": "group", "label": "Sprint"},
                {"id": "e", "type": "group"}
            ],
            "edges": []
        }"#;
        let nodes = parse_canvas(json).unwrap();
        let texts: Vec<_> = nodes.iter().map(|n| n.text.as_str()).collect();
        assert_eq!(
            texts,
            vec!["Idea", "notes/plan.md", "https://example.com", "Sprint", ""]
        );
        assert_eq!(nodes[1].node_type, "file");
    }

    #[test]
    fn empty_file_has_no_nodes() {
        assert!(parse_canvas("").unwrap().is_empty());
        assert!(parse_canvas("{}").unwrap().is_empty());
    }

    #[test]
    fn invalid_json_is_an_error() {
        assert!(parse_canvas("{nodes").is_err());
    }
}
