//! Network control: the interface the tool handlers call, and its CyREST implementation.

pub mod client;
pub mod commands;
pub mod ndex;
pub mod requests;

pub use client::CyRestClient;
pub use commands::Command;
pub use requests::*;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::ToolOutcome;
use crate::types::{ImportedNetwork, VersionInfo};

/// Operations offered by a running Cytoscape Desktop.
///
/// Networks are addressed by SUID. `None` means "the application's current
/// network", which is external state and never cached here.
#[async_trait]
pub trait CytoscapeApi: Send + Sync {
    async fn version_info(&self) -> ToolOutcome<VersionInfo>;

    async fn create_network_from_data_frames(&self, req: &CreateNetworkRequest) -> ToolOutcome<i64>;

    async fn import_network_from_file(&self, req: &ImportFileRequest) -> ToolOutcome<ImportedNetwork>;

    /// Names of all networks in the session, in application order.
    async fn get_network_list(&self) -> ToolOutcome<Vec<String>>;

    /// Resolve a title to its SUID, or the current network when `title` is `None`.
    async fn get_network_suid(&self, title: Option<&str>) -> ToolOutcome<i64>;

    async fn get_network_name(&self, suid: i64) -> ToolOutcome<String>;

    async fn get_node_count(&self, suid: i64) -> ToolOutcome<u64>;

    async fn get_edge_count(&self, suid: i64) -> ToolOutcome<u64>;

    async fn get_network_views(&self, suid: i64) -> ToolOutcome<Vec<i64>>;

    async fn layout_network(&self, req: &LayoutRequest) -> ToolOutcome<Value>;

    async fn set_visual_style(&self, req: &StyleRequest) -> ToolOutcome<Value>;

    async fn export_image(&self, req: &ExportImageRequest) -> ToolOutcome<Value>;

    /// Returns the SUIDs selected by this call.
    async fn select_nodes(&self, req: &SelectNodesRequest) -> ToolOutcome<Vec<i64>>;

    /// Run a command through the generic commands endpoint and return its output lines.
    async fn commands_run(&self, command: &Command) -> ToolOutcome<Vec<String>>;

    async fn import_network_from_ndex(&self, req: &NdexImportRequest) -> ToolOutcome<i64>;

    /// Returns the NDEx UUID of the new entry.
    async fn export_network_to_ndex(&self, req: &NdexUploadRequest) -> ToolOutcome<String>;

    async fn update_network_in_ndex(&self, req: &NdexUploadRequest) -> ToolOutcome<String>;

    /// `Ok(None)` when the network has never been saved to NDEx.
    async fn get_network_ndex_id(&self, network: Option<i64>) -> ToolOutcome<Option<String>>;
}
