//! CyREST client for a locally running Cytoscape Desktop.

use async_trait::async_trait;
use reqwest::{RequestBuilder, StatusCode, Url};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use super::commands::{output_lines, route, Command};
use super::requests::*;
use super::CytoscapeApi;
use crate::config::CytoscapeConfig;
use crate::error::{ToolError, ToolOutcome};
use crate::types::{ImportedNetwork, VersionInfo};

/// HTTP client for CyREST (`/v1`) and the CyNDEx-2 app (`/cyndex2/v1`).
#[derive(Debug, Clone)]
pub struct CyRestClient {
    pub(super) base_url: Url,
    pub(super) ndex_base_url: Url,
    pub(super) http: reqwest::Client,
}

// -- Response types ------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct NetworkName {
    name: String,
    #[serde(rename = "SUID")]
    suid: i64,
}

#[derive(Debug, Deserialize)]
struct Count {
    count: u64,
}

#[derive(Debug, Deserialize)]
struct CurrentNetwork {
    #[serde(rename = "networkSUID")]
    network_suid: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct CreatedNetwork {
    #[serde(rename = "networkSUID")]
    network_suid: i64,
}

#[derive(Debug, Deserialize)]
struct ImportResult {
    #[serde(default)]
    networks: Vec<i64>,
    #[serde(default)]
    views: Vec<i64>,
}

#[derive(Debug, Deserialize)]
struct SelectResult {
    #[serde(default)]
    nodes: Vec<i64>,
}

impl CyRestClient {
    /// Build a client from configuration. Every request is bounded by the configured timeout.
    pub fn new(config: &CytoscapeConfig) -> anyhow::Result<Self> {
        let base_url = Url::parse(&config.base_url())?;
        let ndex_base_url = Url::parse(&config.cyndex_url())?;
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;
        Ok(Self {
            base_url,
            ndex_base_url,
            http,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Send a request and turn any non-success status into a typed failure.
    pub(super) async fn send(&self, req: RequestBuilder, what: &str) -> ToolOutcome<reqwest::Response> {
        let resp = req.send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(status_error(status, what, &body));
        }
        Ok(resp)
    }

    /// Send a request and unwrap the CyREST `{data, errors}` envelope.
    pub(super) async fn send_json(&self, req: RequestBuilder, what: &str) -> ToolOutcome<Value> {
        let resp = self.send(req, what).await?;
        let body: Value = resp
            .json()
            .await
            .map_err(|e| ToolError::ExternalCall(format!("{}: unreadable response: {}", what, e)))?;
        cyrest_data(body, what)
    }

    /// SUID of the explicit network, or of the application's current network.
    pub(super) async fn target(&self, network: Option<i64>) -> ToolOutcome<i64> {
        match network {
            Some(suid) => Ok(suid),
            None => self.current_network().await,
        }
    }

    async fn current_network(&self) -> ToolOutcome<i64> {
        let url = endpoint(&self.base_url, &["networks", "currentNetwork"]);
        let data = self.send_json(self.http.get(url), "get current network").await?;
        let current: Option<CurrentNetwork> = parse(data, "get current network")?;
        current
            .and_then(|c| c.network_suid)
            .ok_or_else(|| ToolError::NotFound("No current network is selected in Cytoscape".into()))
    }

    async fn network_names(&self) -> ToolOutcome<Vec<NetworkName>> {
        let url = endpoint(&self.base_url, &["networks.names"]);
        let data = self.send_json(self.http.get(url), "list networks").await?;
        parse(data, "list networks")
    }

    /// URL of a command under `/v1/commands`.
    fn command_url<S: AsRef<str>>(&self, path: &[S]) -> Url {
        let parts = route(path);
        let mut segments = vec!["commands"];
        segments.extend(parts.iter().map(String::as_str));
        endpoint(&self.base_url, &segments)
    }

    /// POST a JSON body to a command, e.g. `"network import file"`.
    async fn commands_post(&self, command: &str, body: &Value) -> ToolOutcome<Value> {
        let path: Vec<&str> = command.split_whitespace().collect();
        let url = self.command_url(&path);
        let what = format!("command '{}'", command);
        debug!("CyREST {}: {}", what, body);
        self.send_json(self.http.post(url).json(body), &what).await
    }
}

#[async_trait]
impl CytoscapeApi for CyRestClient {
    async fn version_info(&self) -> ToolOutcome<VersionInfo> {
        let url = endpoint(&self.base_url, &["version"]);
        let data = self.send_json(self.http.get(url), "get version").await?;
        parse(data, "get version")
    }

    async fn create_network_from_data_frames(&self, req: &CreateNetworkRequest) -> ToolOutcome<i64> {
        debug!(
            "CyREST create network '{}' ({} nodes, {} edges)",
            req.title,
            req.nodes.len(),
            req.edges.len()
        );
        let url = endpoint(&self.base_url, &["networks"]);
        let data = self
            .send_json(
                self.http.post(url).query(&req.query()).json(&req.to_cyjs()),
                "create network",
            )
            .await?;
        let created: CreatedNetwork = parse(data, "create network")?;
        Ok(created.network_suid)
    }

    async fn import_network_from_file(&self, req: &ImportFileRequest) -> ToolOutcome<ImportedNetwork> {
        let body = serde_json::to_value(req)
            .map_err(|e| ToolError::ExternalCall(format!("cannot encode import request: {}", e)))?;
        let data = self.commands_post("network import file", &body).await?;
        let result: ImportResult = parse(data, "import network file")?;
        let network_suid = result.networks.first().copied().ok_or_else(|| {
            ToolError::ExternalCall(format!("importing {} produced no network", req.file))
        })?;
        Ok(ImportedNetwork {
            network_suid,
            view_suid: result.views.first().copied(),
        })
    }

    async fn get_network_list(&self) -> ToolOutcome<Vec<String>> {
        Ok(self.network_names().await?.into_iter().map(|n| n.name).collect())
    }

    async fn get_network_suid(&self, title: Option<&str>) -> ToolOutcome<i64> {
        let Some(title) = title else {
            return self.current_network().await;
        };
        self.network_names()
            .await?
            .into_iter()
            .find(|n| n.name == title)
            .map(|n| n.suid)
            .ok_or_else(|| ToolError::NotFound(format!("No network found with title '{}'", title)))
    }

    async fn get_network_name(&self, suid: i64) -> ToolOutcome<String> {
        self.network_names()
            .await?
            .into_iter()
            .find(|n| n.suid == suid)
            .map(|n| n.name)
            .ok_or_else(|| ToolError::NotFound(format!("No network found with SUID {}", suid)))
    }

    async fn get_node_count(&self, suid: i64) -> ToolOutcome<u64> {
        let url = endpoint(&self.base_url, &["networks", &suid.to_string(), "nodes", "count"]);
        let data = self.send_json(self.http.get(url), "count nodes").await?;
        Ok(parse::<Count>(data, "count nodes")?.count)
    }

    async fn get_edge_count(&self, suid: i64) -> ToolOutcome<u64> {
        let url = endpoint(&self.base_url, &["networks", &suid.to_string(), "edges", "count"]);
        let data = self.send_json(self.http.get(url), "count edges").await?;
        Ok(parse::<Count>(data, "count edges")?.count)
    }

    async fn get_network_views(&self, suid: i64) -> ToolOutcome<Vec<i64>> {
        let url = endpoint(&self.base_url, &["networks", &suid.to_string(), "views"]);
        let data = self.send_json(self.http.get(url), "list views").await?;
        parse(data, "list views")
    }

    async fn layout_network(&self, req: &LayoutRequest) -> ToolOutcome<Value> {
        let suid = self.target(req.network).await?;
        debug!("CyREST layout '{}' on {}", req.layout_name, suid);
        let url = endpoint(
            &self.base_url,
            &["apply", "layouts", &req.layout_name, &suid.to_string()],
        );
        self.send_json(self.http.get(url), &format!("layout '{}'", req.layout_name))
            .await
    }

    async fn set_visual_style(&self, req: &StyleRequest) -> ToolOutcome<Value> {
        let suid = self.target(req.network).await?;
        let url = endpoint(
            &self.base_url,
            &["apply", "styles", &req.style_name, &suid.to_string()],
        );
        self.send_json(self.http.get(url), &format!("apply style '{}'", req.style_name))
            .await
            .map_err(|e| match e {
                ToolError::NotFound(_) => ToolError::NotFound(format!(
                    "Visual style '{}' does not exist in Cytoscape",
                    req.style_name
                )),
                other => other,
            })
    }

    async fn export_image(&self, req: &ExportImageRequest) -> ToolOutcome<Value> {
        let mut body = serde_json::to_value(req)
            .map_err(|e| ToolError::ExternalCall(format!("cannot encode export request: {}", e)))?;
        if let Some(suid) = req.network {
            let view = self.get_network_views(suid).await?.first().copied().ok_or_else(|| {
                ToolError::Precondition(format!("network {} has no view to export", suid))
            })?;
            body["view"] = json!(format!("SUID:{}", view));
        }
        self.commands_post("view export", &body).await
    }

    async fn select_nodes(&self, req: &SelectNodesRequest) -> ToolOutcome<Vec<i64>> {
        let network = match req.network {
            Some(suid) => format!("SUID:{}", suid),
            None => "current".to_string(),
        };
        if !req.preserve_current_selection {
            self.commands_post(
                "network deselect",
                &json!({ "network": network, "nodeList": "all", "edgeList": "all" }),
            )
            .await?;
        }
        let data = self
            .commands_post(
                "network select",
                &json!({ "network": network, "nodeList": req.node_list, "extendEdges": "false" }),
            )
            .await?;
        Ok(parse::<SelectResult>(data, "select nodes")?.nodes)
    }

    async fn commands_run(&self, command: &Command) -> ToolOutcome<Vec<String>> {
        let url = self.command_url(command.path());
        debug!("CyREST command: {}", command);

        let resp = self.http.get(url).query(command.args()).send().await?;
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        match status {
            s if s.is_success() => Ok(output_lines(&body)),
            StatusCode::NOT_FOUND => Err(ToolError::Unsupported(format!(
                "command '{}' is not available in Cytoscape: {}",
                command.path().join(" "),
                body.trim()
            ))),
            s => Err(status_error(s, "command", &body)),
        }
    }

    async fn import_network_from_ndex(&self, req: &NdexImportRequest) -> ToolOutcome<i64> {
        self.ndex_import(req).await
    }

    async fn export_network_to_ndex(&self, req: &NdexUploadRequest) -> ToolOutcome<String> {
        self.ndex_export(req).await
    }

    async fn update_network_in_ndex(&self, req: &NdexUploadRequest) -> ToolOutcome<String> {
        self.ndex_update(req).await
    }

    async fn get_network_ndex_id(&self, network: Option<i64>) -> ToolOutcome<Option<String>> {
        self.ndex_id(network).await
    }
}

// -- Helpers -------------------------------------------------------------------

/// Append path segments to a base URL, percent-encoding each one.
pub(super) fn endpoint(base: &Url, segments: &[&str]) -> Url {
    let mut url = base.clone();
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}

pub(super) fn parse<T: serde::de::DeserializeOwned>(data: Value, what: &str) -> ToolOutcome<T> {
    serde_json::from_value(data)
        .map_err(|e| ToolError::ExternalCall(format!("{}: unexpected response shape: {}", what, e)))
}

/// Unwrap `{data, errors}`. Responses without the envelope pass through unchanged.
pub(super) fn cyrest_data(body: Value, what: &str) -> ToolOutcome<Value> {
    if let Some(first) = body
        .get("errors")
        .and_then(Value::as_array)
        .and_then(|errors| errors.first())
    {
        let status = first
            .get("status")
            .and_then(Value::as_u64)
            .and_then(|s| u16::try_from(s).ok())
            .and_then(|s| StatusCode::from_u16(s).ok())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let message = first
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| first.to_string());
        return Err(status_error(status, what, &message));
    }

    match body {
        Value::Object(mut map) if map.contains_key("data") => {
            Ok(map.remove("data").unwrap_or(Value::Null))
        }
        other => Ok(other),
    }
}

/// Map an HTTP failure onto the error taxonomy.
pub(super) fn status_error(status: StatusCode, what: &str, body: &str) -> ToolError {
    let message = error_message(body);
    let lower = message.to_lowercase();
    if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
        || lower.contains("unauthorized")
        || lower.contains("not authorized")
    {
        return ToolError::Authorization(format!("{} ({}): {}", what, status.as_u16(), message));
    }
    if status == StatusCode::NOT_FOUND {
        return ToolError::NotFound(format!("{} not found: {}", what, message));
    }
    ToolError::ExternalCall(format!("{} failed ({}): {}", what, status.as_u16(), message))
}

/// Pull a readable message out of a CyREST error body.
fn error_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        let nested = value
            .get("errors")
            .and_then(Value::as_array)
            .and_then(|errors| errors.first())
            .and_then(|e| e.get("message"))
            .or_else(|| value.get("message"))
            .and_then(Value::as_str);
        if let Some(message) = nested {
            return message.to_string();
        }
    }
    body.trim().to_string()
}
