//! Request bodies in CyREST's own vocabulary.
//!
//! Field names here are the names the application accepts on the wire.
//! Handlers build these from their caller-facing argument structs, so every
//! rename between the two vocabularies is written out once, in one place.

use serde::Serialize;
use serde_json::{json, Value};

use crate::types::{ImageFormat, NdexMetadata, SizeUnits};

// -- Network creation ---------------------------------------------------------

/// One row of the node table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeRow {
    pub id: String,
}

/// One row of the edge table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EdgeRow {
    pub source: String,
    pub target: String,
    pub interaction: String,
}

impl EdgeRow {
    /// Edge name the way Cytoscape labels it: `A (interacts) B`.
    pub fn display_name(&self) -> String {
        format!("{} ({}) {}", self.source, self.interaction, self.target)
    }
}

/// Tabular input for `POST /v1/networks`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateNetworkRequest {
    pub title: String,
    pub collection: String,
    pub nodes: Vec<NodeRow>,
    pub edges: Vec<EdgeRow>,
}

impl CreateNetworkRequest {
    /// Render the node and edge tables as Cytoscape.js JSON.
    pub fn to_cyjs(&self) -> Value {
        let nodes: Vec<Value> = self
            .nodes
            .iter()
            .map(|n| json!({ "data": { "id": n.id, "name": n.id } }))
            .collect();
        let edges: Vec<Value> = self
            .edges
            .iter()
            .map(|e| {
                json!({
                    "data": {
                        "source": e.source,
                        "target": e.target,
                        "interaction": e.interaction,
                        "name": e.display_name(),
                    }
                })
            })
            .collect();

        json!({
            "data": { "name": self.title },
            "elements": { "nodes": nodes, "edges": edges },
        })
    }

    /// Query string for the create call.
    pub fn query(&self) -> [(&'static str, &str); 3] {
        [
            ("format", "cyjs"),
            ("title", self.title.as_str()),
            ("collection", self.collection.as_str()),
        ]
    }
}

// -- File import ----------------------------------------------------------------

/// Body of the `network import file` command. Header handling is not part of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportFileRequest {
    pub file: String,
}

// -- Layout and style -------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutRequest {
    pub layout_name: String,
    /// `None` targets the current network.
    pub network: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleRequest {
    pub style_name: String,
    pub network: Option<i64>,
}

// -- Image export -----------------------------------------------------------------

/// Body of the `view export` command.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportImageRequest {
    #[serde(rename = "outputFile")]
    pub output_file: String,
    pub options: ImageFormat,
    #[serde(rename = "Resolution", skip_serializing_if = "Option::is_none")]
    pub resolution: Option<u32>,
    #[serde(rename = "Units", skip_serializing_if = "Option::is_none")]
    pub units: Option<SizeUnits>,
    #[serde(rename = "Width", skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(rename = "Height", skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(rename = "Zoom", skip_serializing_if = "Option::is_none")]
    pub zoom: Option<f64>,
    #[serde(rename = "TransparentBackground", skip_serializing_if = "Option::is_none")]
    pub transparent_background: Option<bool>,
    /// Resolved by the client into the `view` argument.
    #[serde(skip)]
    pub network: Option<i64>,
}

// -- Selection --------------------------------------------------------------------

/// Body of the `network select` command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectNodesRequest {
    /// `col:value` pairs joined by commas.
    #[serde(rename = "nodeList")]
    pub node_list: String,
    /// When false the client clears the existing selection first.
    #[serde(skip)]
    pub preserve_current_selection: bool,
    #[serde(skip)]
    pub network: Option<i64>,
}

impl SelectNodesRequest {
    pub fn node_list(by_col: &str, identifiers: &[String]) -> String {
        identifiers
            .iter()
            .map(|id| format!("{}:{}", by_col, id))
            .collect::<Vec<_>>()
            .join(",")
    }
}

// -- NDEx -------------------------------------------------------------------------

/// Body of `POST /cyndex2/v1/networks`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NdexImportRequest {
    #[serde(rename = "serverUrl")]
    pub server_url: String,
    pub uuid: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(rename = "accessKey", skip_serializing_if = "Option::is_none")]
    pub access_key: Option<String>,
}

/// Body of `POST` (export) and `PUT` (update) on `/cyndex2/v1/networks/{suid}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NdexUploadRequest {
    #[serde(rename = "serverUrl")]
    pub server_url: String,
    pub username: String,
    pub password: String,
    #[serde(rename = "isPublic")]
    pub is_public: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<NdexMetadata>,
    #[serde(skip)]
    pub network: Option<i64>,
}

/// NDEx v2 API root for a website URL.
pub fn ndex_server_url(ndex_url: &str) -> String {
    format!("{}/v2", ndex_url.trim_end_matches('/'))
}
