//! One forwarding function per tool.
//!
//! Each handler reads its validated arguments into a struct named in the
//! caller's vocabulary, then builds the client request in CyREST's
//! vocabulary. The two sets of names differ on purpose and are mapped by hand.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;

use super::definitions::ToolKind;
use crate::cyrest::{
    ndex_server_url, Command, CreateNetworkRequest, CytoscapeApi, EdgeRow, ExportImageRequest,
    ImportFileRequest, LayoutRequest, NdexImportRequest, NdexUploadRequest, NodeRow,
    SelectNodesRequest, StyleRequest,
};
use crate::error::{ToolError, ToolOutcome};
use crate::types::{ImageFormat, NdexMetadata, NetworkInfo, NetworkRef, SizeUnits, StringNetworkType};

const DEFAULT_INTERACTION: &str = "interacts";

/// Run the handler for `kind` with already-validated arguments.
pub async fn run(kind: ToolKind, api: &dyn CytoscapeApi, args: Map<String, Value>) -> ToolOutcome<String> {
    match kind {
        ToolKind::Ping => ping(api).await,
        ToolKind::CreateNetwork => create_network(api, parse(args)?).await,
        ToolKind::LoadNetworkFile => load_network_file(api, parse(args)?).await,
        ToolKind::GetNetworkList => get_network_list(api).await,
        ToolKind::GetNetworkInfo => get_network_info(api, parse(args)?).await,
        ToolKind::SelectNodes => select_nodes(api, parse(args)?).await,
        ToolKind::ApplyLayout => apply_layout(api, parse(args)?).await,
        ToolKind::SetVisualStyle => set_visual_style(api, parse(args)?).await,
        ToolKind::ExportImage => export_image(api, parse(args)?).await,
        ToolKind::RunAppCommand => run_app_command(api, parse(args)?).await,
        ToolKind::LoadStringNetwork => load_string_network(api, parse(args)?).await,
        ToolKind::ImportNetworkFromNdex => import_network_from_ndex(api, parse(args)?).await,
        ToolKind::ExportNetworkToNdex => export_network_to_ndex(api, parse(args)?).await,
        ToolKind::GetNetworkNdexId => get_network_ndex_id(api, parse(args)?).await,
        ToolKind::UpdateNetworkInNdex => update_network_in_ndex(api, parse(args)?).await,
    }
}

fn parse<T: DeserializeOwned>(args: Map<String, Value>) -> ToolOutcome<T> {
    serde_json::from_value(Value::Object(args))
        .map_err(|e| ToolError::validation("arguments", e.to_string()))
}

fn pretty(value: &impl serde::Serialize) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "null".into())
}

/// Turn a caller's network reference into a SUID, or `None` for the current network.
async fn resolve(api: &dyn CytoscapeApi, network: Option<NetworkRef>) -> ToolOutcome<Option<i64>> {
    match network {
        None => Ok(None),
        Some(NetworkRef::Suid(suid)) => Ok(Some(suid)),
        Some(NetworkRef::Title(title)) => api.get_network_suid(Some(&title)).await.map(Some),
    }
}

// -- Connectivity ----------------------------------------------------------------

async fn ping(api: &dyn CytoscapeApi) -> ToolOutcome<String> {
    let info = api
        .version_info()
        .await
        .map_err(|e| ToolError::ExternalCall(format!("Cytoscape not accessible: {}", e)))?;
    Ok(format!("Cytoscape is running. Version info: {}", pretty(&info)))
}

// -- Network creation and import -------------------------------------------------

#[derive(Debug, Deserialize)]
struct CreateNetworkArgs {
    nodes: Vec<String>,
    edges: Vec<Vec<String>>,
    title: String,
    collection: String,
}

async fn create_network(api: &dyn CytoscapeApi, args: CreateNetworkArgs) -> ToolOutcome<String> {
    let mut known = HashSet::new();
    for node in &args.nodes {
        if !known.insert(node.as_str()) {
            return Err(ToolError::validation("nodes", format!("duplicate node '{}'", node)));
        }
    }

    let mut edges = Vec::with_capacity(args.edges.len());
    for (i, edge) in args.edges.iter().enumerate() {
        let (source, target) = match edge.as_slice() {
            [source, target] | [source, target, _] => (source, target),
            _ => {
                return Err(ToolError::validation(
                    "edges",
                    format!("edge {} must have two or three entries", i),
                ))
            }
        };
        for endpoint in [source, target] {
            if !known.contains(endpoint.as_str()) {
                return Err(ToolError::validation(
                    "edges",
                    format!("edge {} references unknown node '{}'", i, endpoint),
                ));
            }
        }
        edges.push(EdgeRow {
            source: source.clone(),
            target: target.clone(),
            interaction: edge
                .get(2)
                .cloned()
                .unwrap_or_else(|| DEFAULT_INTERACTION.to_string()),
        });
    }

    let request = CreateNetworkRequest {
        title: args.title,
        collection: args.collection,
        nodes: args.nodes.into_iter().map(|id| NodeRow { id }).collect(),
        edges,
    };
    let suid = api.create_network_from_data_frames(&request).await?;
    Ok(format!("Created network '{}' with SUID: {}", request.title, suid))
}

#[derive(Debug, Deserialize)]
struct LoadNetworkFileArgs {
    file_path: String,
    first_row_as_column_names: bool,
}

async fn load_network_file(api: &dyn CytoscapeApi, args: LoadNetworkFileArgs) -> ToolOutcome<String> {
    // Not part of the import command; accepted and dropped.
    debug!(
        "Ignoring first_row_as_column_names={} for {}",
        args.first_row_as_column_names, args.file_path
    );
    let imported = api
        .import_network_from_file(&ImportFileRequest {
            file: args.file_path.clone(),
        })
        .await?;

    let mut text = format!(
        "Loaded network from {} with SUID: {}",
        args.file_path, imported.network_suid
    );
    if let Some(view) = imported.view_suid {
        text.push_str(&format!(" (view SUID: {})", view));
    }
    Ok(text)
}

// -- Network queries -------------------------------------------------------------

async fn get_network_list(api: &dyn CytoscapeApi) -> ToolOutcome<String> {
    let names = api.get_network_list().await?;
    Ok(format!("Networks: {}", pretty(&names)))
}

#[derive(Debug, Deserialize)]
struct NetworkArgs {
    network: Option<NetworkRef>,
}

async fn get_network_info(api: &dyn CytoscapeApi, args: NetworkArgs) -> ToolOutcome<String> {
    let suid = match args.network {
        Some(NetworkRef::Suid(suid)) => suid,
        Some(NetworkRef::Title(title)) => api.get_network_suid(Some(&title)).await?,
        None => api.get_network_suid(None).await?,
    };

    let info = NetworkInfo {
        suid,
        name: api.get_network_name(suid).await?,
        node_count: api.get_node_count(suid).await?,
        edge_count: api.get_edge_count(suid).await?,
        view_suid: api.get_network_views(suid).await?.first().copied(),
    };
    Ok(format!("Network info: {}", pretty(&info)))
}

// -- Selection, layout, style ------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NodeIdentifier {
    Suid(i64),
    Name(String),
}

impl NodeIdentifier {
    fn into_string(self) -> String {
        match self {
            Self::Suid(suid) => suid.to_string(),
            Self::Name(name) => name,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SelectNodesArgs {
    nodes: Vec<NodeIdentifier>,
    by_col: String,
    preserve_current_selection: bool,
    network: Option<NetworkRef>,
}

async fn select_nodes(api: &dyn CytoscapeApi, args: SelectNodesArgs) -> ToolOutcome<String> {
    let identifiers: Vec<String> = args.nodes.into_iter().map(NodeIdentifier::into_string).collect();
    let request = SelectNodesRequest {
        node_list: SelectNodesRequest::node_list(&args.by_col, &identifiers),
        preserve_current_selection: args.preserve_current_selection,
        network: resolve(api, args.network).await?,
    };
    let selected = api.select_nodes(&request).await?;
    Ok(format!("Selected {} nodes: {:?}", selected.len(), selected))
}

#[derive(Debug, Deserialize)]
struct ApplyLayoutArgs {
    layout_name: String,
    network: Option<NetworkRef>,
}

async fn apply_layout(api: &dyn CytoscapeApi, args: ApplyLayoutArgs) -> ToolOutcome<String> {
    let request = LayoutRequest {
        network: resolve(api, args.network).await?,
        layout_name: args.layout_name,
    };
    let result = api.layout_network(&request).await?;
    Ok(format!("Applied layout '{}': {}", request.layout_name, result))
}

#[derive(Debug, Deserialize)]
struct SetVisualStyleArgs {
    style_name: String,
    network: Option<NetworkRef>,
}

async fn set_visual_style(api: &dyn CytoscapeApi, args: SetVisualStyleArgs) -> ToolOutcome<String> {
    let request = StyleRequest {
        network: resolve(api, args.network).await?,
        style_name: args.style_name,
    };
    let result = api.set_visual_style(&request).await?;
    Ok(format!("Applied visual style '{}': {}", request.style_name, result))
}

// -- Image export ----------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ExportImageArgs {
    filename: String,
    #[serde(rename = "type")]
    format: ImageFormat,
    resolution: u32,
    zoom: Option<f64>,
    width: Option<f64>,
    height: Option<f64>,
    units: Option<SizeUnits>,
    transparent_background: Option<bool>,
    overwrite_file: bool,
    network: Option<NetworkRef>,
}

/// Append the format's extension unless the filename already ends in it.
fn with_extension(filename: &str, format: ImageFormat) -> String {
    let has_format_extension = Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            ext.eq_ignore_ascii_case(format.as_str())
                || (matches!(format, ImageFormat::Jpg) && ext.eq_ignore_ascii_case("jpeg"))
        });
    if has_format_extension {
        filename.to_string()
    } else {
        format!("{}.{}", filename, format.as_str().to_lowercase())
    }
}

async fn export_image(api: &dyn CytoscapeApi, args: ExportImageArgs) -> ToolOutcome<String> {
    let sized = args.width.is_some() || args.height.is_some() || args.units.is_some();
    if args.zoom.is_some() && sized {
        return Err(ToolError::validation(
            "zoom",
            "cannot be combined with width, height or units; choose one sizing family",
        ));
    }
    if args.units.is_some() && args.width.is_none() && args.height.is_none() {
        return Err(ToolError::validation("units", "only applies together with width or height"));
    }

    let output_file = with_extension(&args.filename, args.format);
    if !args.overwrite_file && Path::new(&output_file).exists() {
        return Err(ToolError::validation(
            "filename",
            format!("{} already exists and overwrite_file is false", output_file),
        ));
    }

    let request = ExportImageRequest {
        output_file,
        options: args.format,
        resolution: args.format.is_raster().then_some(args.resolution),
        units: args.units,
        width: args.width,
        height: args.height,
        zoom: args.zoom,
        transparent_background: args.transparent_background,
        network: resolve(api, args.network).await?,
    };
    let result = api.export_image(&request).await?;
    Ok(format!("Exported image to {}: {}", request.output_file, result))
}

// -- Commands ----------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RunAppCommandArgs {
    command: String,
}

async fn run_app_command(api: &dyn CytoscapeApi, args: RunAppCommandArgs) -> ToolOutcome<String> {
    let command = Command::parse(&args.command)
        .ok_or_else(|| ToolError::validation("command", "must start with a command namespace"))?;
    let lines = api.commands_run(&command).await?;
    Ok(format!("Command result: {}", pretty(&lines)))
}

#[derive(Debug, Deserialize)]
struct LoadStringNetworkArgs {
    protein_query: String,
    species: u32,
    confidence_score: f64,
    network_type: StringNetworkType,
    additional_nodes: Option<u32>,
}

/// Assemble the stringApp query command. stringApp's own argument names differ from ours.
pub fn string_query_command(
    protein_query: &str,
    species: u32,
    confidence_score: f64,
    network_type: StringNetworkType,
    additional_nodes: Option<u32>,
) -> Command {
    Command::new("string protein query")
        .arg("query", protein_query.trim())
        .arg("taxonID", species)
        .arg("cutoff", confidence_score)
        .arg("networkType", network_type.command_value())
        .arg_opt("limit", additional_nodes)
}

async fn load_string_network(api: &dyn CytoscapeApi, args: LoadStringNetworkArgs) -> ToolOutcome<String> {
    let command = string_query_command(
        &args.protein_query,
        args.species,
        args.confidence_score,
        args.network_type,
        args.additional_nodes,
    );
    debug!("STRING query: {}", command);
    let lines = api.commands_run(&command).await?;
    Ok(format!("Loaded STRING network: {}", pretty(&lines)))
}

// -- NDEx --------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ImportFromNdexArgs {
    ndex_id: String,
    username: Option<String>,
    password: Option<String>,
    access_key: Option<String>,
    ndex_url: String,
}

async fn import_network_from_ndex(api: &dyn CytoscapeApi, args: ImportFromNdexArgs) -> ToolOutcome<String> {
    let (username, password) = match (args.username, args.password) {
        (Some(u), Some(p)) => (Some(u), Some(p)),
        (Some(_), None) => {
            return Err(ToolError::validation("password", "is required when username is given"))
        }
        (None, Some(_)) => {
            return Err(ToolError::validation("username", "is required when password is given"))
        }
        (None, None) => (None, None),
    };
    let access_key = if username.is_some() { None } else { args.access_key };

    let request = NdexImportRequest {
        server_url: ndex_server_url(&args.ndex_url),
        uuid: args.ndex_id,
        username,
        password,
        access_key,
    };
    let suid = api.import_network_from_ndex(&request).await?;
    Ok(format!(
        "Imported network from NDEx ID '{}' with SUID: {}",
        request.uuid, suid
    ))
}

#[derive(Debug, Deserialize)]
struct NdexUploadArgs {
    username: String,
    password: String,
    is_public: bool,
    network: Option<NetworkRef>,
    metadata: Option<NdexMetadata>,
    ndex_url: String,
}

impl NdexUploadArgs {
    fn into_request(self, network: Option<i64>) -> NdexUploadRequest {
        NdexUploadRequest {
            server_url: ndex_server_url(&self.ndex_url),
            username: self.username,
            password: self.password,
            is_public: self.is_public,
            metadata: self.metadata,
            network,
        }
    }
}

async fn export_network_to_ndex(api: &dyn CytoscapeApi, mut args: NdexUploadArgs) -> ToolOutcome<String> {
    let network = resolve(api, args.network.take()).await?;
    let uuid = api.export_network_to_ndex(&args.into_request(network)).await?;
    Ok(format!("Exported network to NDEx with ID: {}", uuid))
}

async fn get_network_ndex_id(api: &dyn CytoscapeApi, args: NetworkArgs) -> ToolOutcome<String> {
    let network = resolve(api, args.network).await?;
    Ok(match api.get_network_ndex_id(network).await? {
        Some(uuid) => format!("Network NDEx ID: {}", uuid),
        None => "Network is not associated with any NDEx entry".to_string(),
    })
}

async fn update_network_in_ndex(api: &dyn CytoscapeApi, mut args: NdexUploadArgs) -> ToolOutcome<String> {
    let network = resolve(api, args.network.take()).await?;
    if api.get_network_ndex_id(network).await?.is_none() {
        return Err(ToolError::Precondition(
            "network is not associated with any NDEx entry; export it with export_network_to_ndex first"
                .into(),
        ));
    }
    let uuid = api.update_network_in_ndex(&args.into_request(network)).await?;
    Ok(format!("Updated network in NDEx: {}", uuid))
}
