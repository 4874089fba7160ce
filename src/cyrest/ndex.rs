//! NDEx exchange through the CyNDEx-2 app.
//!
//! Cytoscape talks to the NDEx server named in each request's `serverUrl`;
//! this client only ever reaches the local `/cyndex2/v1` endpoints.

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

use super::client::{endpoint, parse, CyRestClient};
use super::requests::{NdexImportRequest, NdexUploadRequest};
use crate::error::{ToolError, ToolOutcome};

#[derive(Debug, Deserialize)]
struct ImportedFromNdex {
    suid: i64,
}

#[derive(Debug, Deserialize)]
struct UploadedToNdex {
    uuid: String,
}

/// Path segment addressing a network in CyNDEx-2.
fn network_segment(network: Option<i64>) -> String {
    match network {
        Some(suid) => suid.to_string(),
        None => "current".to_string(),
    }
}

impl CyRestClient {
    pub(super) async fn ndex_import(&self, req: &NdexImportRequest) -> ToolOutcome<i64> {
        debug!("CyNDEx import {} from {}", req.uuid, req.server_url);
        let url = endpoint(&self.ndex_base_url, &["networks"]);
        let data = self
            .send_json(self.http.post(url).json(req), "import from NDEx")
            .await?;
        let imported: ImportedFromNdex = parse(data, "import from NDEx")?;
        info!("Imported NDEx network {} as SUID {}", req.uuid, imported.suid);
        Ok(imported.suid)
    }

    pub(super) async fn ndex_export(&self, req: &NdexUploadRequest) -> ToolOutcome<String> {
        let segment = network_segment(req.network);
        let url = endpoint(&self.ndex_base_url, &["networks", &segment]);
        let data = self
            .send_json(self.http.post(url).json(req), "export to NDEx")
            .await?;
        Ok(parse::<UploadedToNdex>(data, "export to NDEx")?.uuid)
    }

    pub(super) async fn ndex_update(&self, req: &NdexUploadRequest) -> ToolOutcome<String> {
        let segment = network_segment(req.network);
        let url = endpoint(&self.ndex_base_url, &["networks", &segment]);
        let data = self
            .send_json(self.http.put(url).json(req), "update in NDEx")
            .await?;
        Ok(parse::<UploadedToNdex>(data, "update in NDEx")?.uuid)
    }

    pub(super) async fn ndex_id(&self, network: Option<i64>) -> ToolOutcome<Option<String>> {
        let segment = network_segment(network);
        let url = endpoint(&self.ndex_base_url, &["networks", &segment]);
        match self.send_json(self.http.get(url), "look up NDEx id").await {
            Ok(data) => Ok(ndex_uuid(&data, network)),
            // Networks never saved to NDEx have no CyNDEx record at all.
            Err(ToolError::NotFound(_)) if network.is_some() => Ok(None),
            Err(e) => Err(e),
        }
    }
}

/// Extract the NDEx UUID recorded for a network, if any.
fn ndex_uuid(data: &Value, suid: Option<i64>) -> Option<String> {
    let non_empty = |v: &Value| {
        v.as_str()
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    if let Some(members) = data.get("members").and_then(Value::as_array) {
        return members
            .iter()
            .filter(|m| match suid {
                Some(target) => m.get("suid").and_then(Value::as_i64) == Some(target),
                None => true,
            })
            .find_map(|m| m.get("uuid").and_then(non_empty));
    }
    data.get("uuid").and_then(non_empty)
}
