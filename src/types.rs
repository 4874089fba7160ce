//! Shared types used across the dispatcher, client and protocol server.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ToolError;

// ---------------------------------------------------------------------------
// Network identity
// ---------------------------------------------------------------------------

/// A network as named by a caller: the SUID Cytoscape assigned, or a title.
///
/// Titles are resolved against the application on every call; nothing is
/// cached locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NetworkRef {
    Suid(i64),
    Title(String),
}

impl fmt::Display for NetworkRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Suid(suid) => write!(f, "SUID {}", suid),
            Self::Title(title) => write!(f, "'{}'", title),
        }
    }
}

// ---------------------------------------------------------------------------
// Response envelope
// ---------------------------------------------------------------------------

/// Prefix carried by every failure text block.
pub const ERROR_PREFIX: &str = "Error:";

/// One block of tool output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
}

impl ContentBlock {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            kind: "text".into(),
            text: text.into(),
        }
    }
}

/// Outcome of a single tool invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolCallResult {
    Success { content: Vec<ContentBlock> },
    Failure { message: String },
}

impl ToolCallResult {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Success {
            content: vec![ContentBlock::text(text)],
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure {
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Failure { .. })
    }

    /// Render as content blocks. A failure becomes a single `Error:` block.
    pub fn content(&self) -> Vec<ContentBlock> {
        match self {
            Self::Success { content } => content.clone(),
            Self::Failure { message } => {
                vec![ContentBlock::text(format!("{} {}", ERROR_PREFIX, message))]
            }
        }
    }

    /// All text of the rendered blocks, joined by newlines.
    pub fn joined_text(&self) -> String {
        self.content()
            .into_iter()
            .map(|b| b.text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl From<ToolError> for ToolCallResult {
    fn from(e: ToolError) -> Self {
        Self::failure(e.to_string())
    }
}

// ---------------------------------------------------------------------------
// Enumerated parameter values
// ---------------------------------------------------------------------------

/// Image formats accepted by `view export`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ImageFormat {
    Png,
    Jpg,
    Pdf,
    Svg,
}

impl ImageFormat {
    pub const NAMES: &'static [&'static str] = &["PNG", "JPG", "PDF", "SVG"];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Png => "PNG",
            Self::Jpg => "JPG",
            Self::Pdf => "PDF",
            Self::Svg => "SVG",
        }
    }

    /// Only raster formats take a resolution.
    pub fn is_raster(self) -> bool {
        matches!(self, Self::Png | Self::Jpg)
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// STRING network flavours, as offered to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StringNetworkType {
    Functional,
    Physical,
}

impl StringNetworkType {
    pub const NAMES: &'static [&'static str] = &["functional", "physical"];

    /// Value stringApp expects for its `networkType` argument.
    pub fn command_value(self) -> &'static str {
        match self {
            Self::Functional => "full STRING network",
            Self::Physical => "physical subnetwork",
        }
    }
}

/// Units for the new-style export sizing family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeUnits {
    Pixels,
    Inches,
    Centimeters,
    Millimeters,
}

impl SizeUnits {
    pub const NAMES: &'static [&'static str] = &["pixels", "inches", "centimeters", "millimeters"];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pixels => "pixels",
            Self::Inches => "inches",
            Self::Centimeters => "centimeters",
            Self::Millimeters => "millimeters",
        }
    }
}

// ---------------------------------------------------------------------------
// Payloads returned by the client
// ---------------------------------------------------------------------------

/// `GET /v1/version`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionInfo {
    #[serde(rename = "apiVersion")]
    pub api_version: String,
    #[serde(rename = "cytoscapeVersion")]
    pub cytoscape_version: String,
}

/// Network and view created by a file import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportedNetwork {
    pub network_suid: i64,
    pub view_suid: Option<i64>,
}

/// Summary assembled by `get_network_info`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkInfo {
    pub suid: i64,
    pub name: String,
    pub node_count: u64,
    pub edge_count: u64,
    pub view_suid: Option<i64>,
}

/// Descriptive properties attached to a network on NDEx.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NdexMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn network_ref_accepts_both_forms() {
        let by_id: NetworkRef = serde_json::from_value(json!(52)).unwrap();
        let by_title: NetworkRef = serde_json::from_value(json!("galFiltered.sif")).unwrap();
        assert_eq!(by_id, NetworkRef::Suid(52));
        assert_eq!(by_title, NetworkRef::Title("galFiltered.sif".into()));
    }

    #[test]
    fn failure_renders_with_error_prefix() {
        let result = ToolCallResult::failure("style 'Nope' does not exist");
        assert!(result.is_error());
        let blocks = result.content();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].kind, "text");
        assert_eq!(blocks[0].text, "Error: style 'Nope' does not exist");
    }

    #[test]
    fn string_network_type_maps_to_command_vocabulary() {
        assert_eq!(StringNetworkType::Functional.command_value(), "full STRING network");
        assert_eq!(StringNetworkType::Physical.command_value(), "physical subnetwork");
    }

    #[test]
    fn image_format_parses_uppercase_names() {
        let fmt: ImageFormat = serde_json::from_value(json!("SVG")).unwrap();
        assert_eq!(fmt, ImageFormat::Svg);
        assert!(!fmt.is_raster());
        assert!(serde_json::from_value::<ImageFormat>(json!("GIF")).is_err());
    }
}
