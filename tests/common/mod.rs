#![allow(dead_code)]
//! In-memory stand-in for Cytoscape that records every call it receives.

pub mod loopback;

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use cytoscape_mcp::cyrest::*;
use cytoscape_mcp::error::{ToolError, ToolOutcome};
use cytoscape_mcp::tools::Dispatcher;
use cytoscape_mcp::types::{ImportedNetwork, VersionInfo};

pub const NDEX_URL: &str = "http://ndexbio.org";

/// One call as it reached the network control interface.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    VersionInfo,
    CreateNetwork(CreateNetworkRequest),
    ImportFile(ImportFileRequest),
    NetworkList,
    NetworkSuid(Option<String>),
    NetworkName(i64),
    NodeCount(i64),
    EdgeCount(i64),
    NetworkViews(i64),
    Layout(LayoutRequest),
    Style(StyleRequest),
    ExportImage(ExportImageRequest),
    SelectNodes(SelectNodesRequest),
    CommandsRun(String),
    NdexImport(NdexImportRequest),
    NdexExport(NdexUploadRequest),
    NdexUpdate(NdexUploadRequest),
    NdexId(Option<i64>),
}

#[derive(Debug, Clone)]
struct FakeNetwork {
    suid: i64,
    name: String,
    nodes: u64,
    edges: u64,
    view: i64,
}

#[derive(Debug, Default)]
struct State {
    calls: Vec<Call>,
    networks: Vec<FakeNetwork>,
    current: Option<i64>,
    next_suid: i64,
    styles: Vec<String>,
    ndex_ids: HashMap<i64, String>,
    offline: bool,
}

#[derive(Debug)]
pub struct FakeCytoscape {
    state: Mutex<State>,
}

impl FakeCytoscape {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(State {
                next_suid: 100,
                styles: vec!["default".into(), "Marquee".into()],
                ..State::default()
            }),
        })
    }

    /// A fake whose every call fails as if Cytoscape were not running.
    pub fn offline() -> Arc<Self> {
        let fake = Self::new();
        fake.state.lock().unwrap().offline = true;
        fake
    }

    pub fn dispatcher(self: &Arc<Self>) -> Dispatcher {
        Dispatcher::new(self.clone(), NDEX_URL)
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    /// Add a network directly, bypassing the call log.
    pub fn seed_network(&self, name: &str, nodes: u64, edges: u64) -> i64 {
        let mut state = self.state.lock().unwrap();
        add_network(&mut state, name, nodes, edges)
    }

    pub fn seed_ndex_id(&self, suid: i64, uuid: &str) {
        self.state.lock().unwrap().ndex_ids.insert(suid, uuid.into());
    }

    fn record(&self, call: Call) -> ToolOutcome<std::sync::MutexGuard<'_, State>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call);
        if state.offline {
            return Err(ToolError::ExternalCall(
                "could not connect to Cytoscape: connection refused".into(),
            ));
        }
        Ok(state)
    }
}

fn add_network(state: &mut State, name: &str, nodes: u64, edges: u64) -> i64 {
    let suid = state.next_suid;
    state.next_suid += 2;
    state.networks.push(FakeNetwork {
        suid,
        name: name.into(),
        nodes,
        edges,
        view: suid + 1,
    });
    state.current = Some(suid);
    suid
}

fn find(state: &State, suid: i64) -> ToolOutcome<FakeNetwork> {
    state
        .networks
        .iter()
        .find(|n| n.suid == suid)
        .cloned()
        .ok_or_else(|| ToolError::NotFound(format!("No network found with SUID {}", suid)))
}

fn target(state: &State, network: Option<i64>) -> ToolOutcome<i64> {
    network
        .or(state.current)
        .ok_or_else(|| ToolError::NotFound("No current network is selected in Cytoscape".into()))
}

#[async_trait]
impl CytoscapeApi for FakeCytoscape {
    async fn version_info(&self) -> ToolOutcome<VersionInfo> {
        let _state = self.record(Call::VersionInfo)?;
        Ok(VersionInfo {
            api_version: "v1".into(),
            cytoscape_version: "3.10.2".into(),
        })
    }

    async fn create_network_from_data_frames(&self, req: &CreateNetworkRequest) -> ToolOutcome<i64> {
        let mut state = self.record(Call::CreateNetwork(req.clone()))?;
        Ok(add_network(
            &mut state,
            &req.title,
            req.nodes.len() as u64,
            req.edges.len() as u64,
        ))
    }

    async fn import_network_from_file(&self, req: &ImportFileRequest) -> ToolOutcome<ImportedNetwork> {
        let mut state = self.record(Call::ImportFile(req.clone()))?;
        let suid = add_network(&mut state, &req.file, 3, 3);
        Ok(ImportedNetwork {
            network_suid: suid,
            view_suid: Some(suid + 1),
        })
    }

    async fn get_network_list(&self) -> ToolOutcome<Vec<String>> {
        let state = self.record(Call::NetworkList)?;
        Ok(state.networks.iter().map(|n| n.name.clone()).collect())
    }

    async fn get_network_suid(&self, title: Option<&str>) -> ToolOutcome<i64> {
        let state = self.record(Call::NetworkSuid(title.map(str::to_string)))?;
        match title {
            None => target(&state, None),
            Some(title) => state
                .networks
                .iter()
                .find(|n| n.name == title)
                .map(|n| n.suid)
                .ok_or_else(|| ToolError::NotFound(format!("No network found with title '{}'", title))),
        }
    }

    async fn get_network_name(&self, suid: i64) -> ToolOutcome<String> {
        let state = self.record(Call::NetworkName(suid))?;
        Ok(find(&state, suid)?.name)
    }

    async fn get_node_count(&self, suid: i64) -> ToolOutcome<u64> {
        let state = self.record(Call::NodeCount(suid))?;
        Ok(find(&state, suid)?.nodes)
    }

    async fn get_edge_count(&self, suid: i64) -> ToolOutcome<u64> {
        let state = self.record(Call::EdgeCount(suid))?;
        Ok(find(&state, suid)?.edges)
    }

    async fn get_network_views(&self, suid: i64) -> ToolOutcome<Vec<i64>> {
        let state = self.record(Call::NetworkViews(suid))?;
        Ok(vec![find(&state, suid)?.view])
    }

    async fn layout_network(&self, req: &LayoutRequest) -> ToolOutcome<Value> {
        let state = self.record(Call::Layout(req.clone()))?;
        target(&state, req.network)?;
        if req.layout_name == "no-such-layout" {
            return Err(ToolError::NotFound(format!(
                "layout '{}' not found: unknown algorithm",
                req.layout_name
            )));
        }
        Ok(json!({}))
    }

    async fn set_visual_style(&self, req: &StyleRequest) -> ToolOutcome<Value> {
        let state = self.record(Call::Style(req.clone()))?;
        target(&state, req.network)?;
        if state.styles.contains(&req.style_name) {
            Ok(json!({ "message": "Visual Style applied." }))
        } else {
            Err(ToolError::NotFound(format!(
                "Visual style '{}' does not exist in Cytoscape",
                req.style_name
            )))
        }
    }

    async fn export_image(&self, req: &ExportImageRequest) -> ToolOutcome<Value> {
        let _state = self.record(Call::ExportImage(req.clone()))?;
        Ok(json!({ "file": req.output_file }))
    }

    async fn select_nodes(&self, req: &SelectNodesRequest) -> ToolOutcome<Vec<i64>> {
        let _state = self.record(Call::SelectNodes(req.clone()))?;
        Ok((0..req.node_list.split(',').count() as i64).map(|i| 500 + i).collect())
    }

    async fn commands_run(&self, command: &Command) -> ToolOutcome<Vec<String>> {
        let _state = self.record(Call::CommandsRun(command.to_string()))?;
        match command.path().first().map(String::as_str) {
            Some("bogus") => Err(ToolError::Unsupported(format!(
                "command '{}' is not available in Cytoscape: no such namespace",
                command.path().join(" ")
            ))),
            _ => Ok(vec!["Finished command".into()]),
        }
    }

    async fn import_network_from_ndex(&self, req: &NdexImportRequest) -> ToolOutcome<i64> {
        let mut state = self.record(Call::NdexImport(req.clone()))?;
        let anonymous = req.username.is_none() && req.access_key.is_none();
        if req.uuid.starts_with("private-") && anonymous {
            return Err(ToolError::Authorization(
                "import from NDEx (401): network is private".into(),
            ));
        }
        let suid = add_network(&mut state, &req.uuid, 10, 12);
        state.ndex_ids.insert(suid, req.uuid.clone());
        Ok(suid)
    }

    async fn export_network_to_ndex(&self, req: &NdexUploadRequest) -> ToolOutcome<String> {
        let mut state = self.record(Call::NdexExport(req.clone()))?;
        let suid = target(&state, req.network)?;
        let uuid = format!("ndex-{}", suid);
        state.ndex_ids.insert(suid, uuid.clone());
        Ok(uuid)
    }

    async fn update_network_in_ndex(&self, req: &NdexUploadRequest) -> ToolOutcome<String> {
        let state = self.record(Call::NdexUpdate(req.clone()))?;
        let suid = target(&state, req.network)?;
        state
            .ndex_ids
            .get(&suid)
            .cloned()
            .ok_or_else(|| ToolError::NotFound("network has no NDEx entry".into()))
    }

    async fn get_network_ndex_id(&self, network: Option<i64>) -> ToolOutcome<Option<String>> {
        let state = self.record(Call::NdexId(network))?;
        let suid = target(&state, network)?;
        Ok(state.ndex_ids.get(&suid).cloned())
    }
}
