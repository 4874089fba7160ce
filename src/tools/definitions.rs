//! The fixed catalogue of tools exposed to clients.

use serde_json::json;

use super::schema::{ParamSpec, ParamType, ToolDescriptor};
use crate::types::{ImageFormat, SizeUnits, StringNetworkType};

const NDEX_METADATA_FIELDS: &[&str] = &["name", "description", "version", "author"];

/// Handler selector, one variant per tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolKind {
    Ping,
    CreateNetwork,
    LoadNetworkFile,
    GetNetworkList,
    GetNetworkInfo,
    SelectNodes,
    ApplyLayout,
    SetVisualStyle,
    ExportImage,
    RunAppCommand,
    LoadStringNetwork,
    ImportNetworkFromNdex,
    ExportNetworkToNdex,
    GetNetworkNdexId,
    UpdateNetworkInNdex,
}

impl ToolKind {
    /// Every tool, in listing order.
    pub const ALL: [ToolKind; 15] = [
        Self::Ping,
        Self::CreateNetwork,
        Self::LoadNetworkFile,
        Self::GetNetworkList,
        Self::GetNetworkInfo,
        Self::SelectNodes,
        Self::ApplyLayout,
        Self::SetVisualStyle,
        Self::ExportImage,
        Self::RunAppCommand,
        Self::LoadStringNetwork,
        Self::ImportNetworkFromNdex,
        Self::ExportNetworkToNdex,
        Self::GetNetworkNdexId,
        Self::UpdateNetworkInNdex,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Ping => "ping",
            Self::CreateNetwork => "create_network",
            Self::LoadNetworkFile => "load_network_file",
            Self::GetNetworkList => "get_network_list",
            Self::GetNetworkInfo => "get_network_info",
            Self::SelectNodes => "select_nodes",
            Self::ApplyLayout => "apply_layout",
            Self::SetVisualStyle => "set_visual_style",
            Self::ExportImage => "export_image",
            Self::RunAppCommand => "run_app_command",
            Self::LoadStringNetwork => "load_string_network",
            Self::ImportNetworkFromNdex => "import_network_from_ndex",
            Self::ExportNetworkToNdex => "export_network_to_ndex",
            Self::GetNetworkNdexId => "get_network_ndex_id",
            Self::UpdateNetworkInNdex => "update_network_in_ndex",
        }
    }

    /// Build this tool's descriptor. `ndex_url` is the default NDEx website.
    pub fn descriptor(self, ndex_url: &str) -> ToolDescriptor {
        let (description, params) = match self {
            Self::Ping => ("Check if Cytoscape is running and accessible", vec![]),

            Self::CreateNetwork => (
                "Create a new network from nodes and edges",
                vec![
                    ParamSpec::required("nodes", ParamType::StringList, "List of node names"),
                    ParamSpec::required(
                        "edges",
                        ParamType::EdgeList,
                        "List of edges [source, target] or [source, target, interaction]; \
                         interaction defaults to 'interacts'",
                    ),
                    ParamSpec::optional("title", ParamType::String, "Network title")
                        .default(json!("New Network")),
                    ParamSpec::optional("collection", ParamType::String, "Collection name")
                        .default(json!("My Collection")),
                ],
            ),

            Self::LoadNetworkFile => (
                "Load a network from file (SIF, GraphML, XGMML, CX, etc.)",
                vec![
                    ParamSpec::required("file_path", ParamType::String, "Path to network file")
                        .non_empty(),
                    ParamSpec::optional(
                        "first_row_as_column_names",
                        ParamType::Boolean,
                        "Accepted for compatibility only; Cytoscape's file import has no \
                         header option, so this flag has no effect",
                    )
                    .default(json!(true)),
                ],
            ),

            Self::GetNetworkList => ("Get list of all networks in current session", vec![]),

            Self::GetNetworkInfo => (
                "Get SUID, name, node count, edge count and view of a network",
                vec![network_param(
                    "Network name or SUID; current network if not specified",
                )],
            ),

            Self::SelectNodes => (
                "Select nodes in the network",
                vec![
                    ParamSpec::required(
                        "nodes",
                        ParamType::IdentifierList,
                        "List of node names or SUIDs to select",
                    )
                    .non_empty(),
                    ParamSpec::optional("by_col", ParamType::String, "Column name to select by")
                        .default(json!("name")),
                    ParamSpec::optional(
                        "preserve_current_selection",
                        ParamType::Boolean,
                        "Keep nodes that are already selected; false clears the selection first",
                    )
                    .default(json!(true)),
                    network_param("Network name or SUID; current network if not specified"),
                ],
            ),

            Self::ApplyLayout => (
                "Apply a layout algorithm to the network",
                vec![
                    ParamSpec::optional(
                        "layout_name",
                        ParamType::String,
                        "Layout algorithm name (e.g., 'force-directed', 'circular', 'hierarchical')",
                    )
                    .default(json!("force-directed")),
                    network_param("Network name or SUID; current network if not specified"),
                ],
            ),

            Self::SetVisualStyle => (
                "Apply an existing visual style to the network",
                vec![
                    ParamSpec::required("style_name", ParamType::String, "Visual style name")
                        .non_empty(),
                    network_param("Network name or SUID; current network if not specified"),
                ],
            ),

            Self::ExportImage => (
                "Export network view as image. Size with either zoom, or width/height/units; \
                 the two families cannot be mixed",
                vec![
                    ParamSpec::required(
                        "filename",
                        ParamType::String,
                        "Output filename; the format's extension is added when missing",
                    )
                    .non_empty(),
                    ParamSpec::optional("type", ParamType::String, "Image format")
                        .one_of(ImageFormat::NAMES)
                        .default(json!("PNG")),
                    ParamSpec::optional(
                        "resolution",
                        ParamType::Integer,
                        "Image resolution (DPI), PNG and JPG only",
                    )
                    .range(1.0, 10_000.0)
                    .default(json!(300)),
                    ParamSpec::optional("zoom", ParamType::Number, "Zoom percentage (legacy sizing)")
                        .range(0.0, 10_000.0),
                    ParamSpec::optional("width", ParamType::Number, "Image width in units")
                        .range(0.0, 100_000.0),
                    ParamSpec::optional("height", ParamType::Number, "Image height in units")
                        .range(0.0, 100_000.0),
                    ParamSpec::optional("units", ParamType::String, "Units for width and height")
                        .one_of(SizeUnits::NAMES),
                    ParamSpec::optional(
                        "transparent_background",
                        ParamType::Boolean,
                        "Render with a transparent background (PNG only)",
                    ),
                    ParamSpec::optional(
                        "overwrite_file",
                        ParamType::Boolean,
                        "Replace an existing file at the target path. When false, the \
                         existing-file check runs on this server's filesystem and is only \
                         reliable when Cytoscape runs on the same machine",
                    )
                    .default(json!(true)),
                    network_param("Network name or SUID; current view if not specified"),
                ],
            ),

            Self::RunAppCommand => (
                "Execute a raw Cytoscape command, e.g. 'layout circular' or \
                 'network rename name=\"My net\"'",
                vec![ParamSpec::required(
                    "command",
                    ParamType::String,
                    "Command text: namespace, verb, then key=value arguments",
                )
                .non_empty()],
            ),

            Self::LoadStringNetwork => (
                "Load protein interaction network from STRING database (requires stringApp)",
                vec![
                    ParamSpec::required(
                        "protein_query",
                        ParamType::String,
                        "Protein names/IDs (comma-separated)",
                    )
                    .non_empty(),
                    ParamSpec::optional(
                        "species",
                        ParamType::Integer,
                        "NCBI taxonomy ID (e.g., 9606 for human)",
                    )
                    .range(1.0, f64::from(u32::MAX))
                    .default(json!(9606)),
                    ParamSpec::optional(
                        "confidence_score",
                        ParamType::Number,
                        "Confidence threshold (0.0-1.0)",
                    )
                    .range(0.0, 1.0)
                    .default(json!(0.4)),
                    ParamSpec::optional("network_type", ParamType::String, "STRING network type")
                        .one_of(StringNetworkType::NAMES)
                        .default(json!("functional")),
                    ParamSpec::optional(
                        "additional_nodes",
                        ParamType::Integer,
                        "Maximum number of additional interactors to add",
                    )
                    .range(0.0, 10_000.0),
                ],
            ),

            Self::ImportNetworkFromNdex => (
                "Import a network from the NDEx database into Cytoscape",
                vec![
                    ParamSpec::required(
                        "ndex_id",
                        ParamType::String,
                        "Network external ID provided by NDEx (not Cytoscape SUID)",
                    )
                    .non_empty(),
                    ParamSpec::optional(
                        "username",
                        ParamType::String,
                        "NDEx account username (required for private content)",
                    ),
                    ParamSpec::optional(
                        "password",
                        ParamType::String,
                        "NDEx account password (required for private content)",
                    ),
                    ParamSpec::optional(
                        "access_key",
                        ParamType::String,
                        "NDEx access key (alternative to username/password)",
                    ),
                    ndex_url_param(ndex_url),
                ],
            ),

            Self::ExportNetworkToNdex => (
                "Export a network to the NDEx database",
                ndex_upload_params(ndex_url, "Network metadata (name, description, version, author)"),
            ),

            Self::GetNetworkNdexId => (
                "Get the NDEx external ID for a Cytoscape network",
                vec![network_param(
                    "Network name or SUID; current network if not specified",
                )],
            ),

            Self::UpdateNetworkInNdex => (
                "Update an existing network in NDEx; the network must have been exported before",
                ndex_upload_params(ndex_url, "Updated network metadata"),
            ),
        };

        ToolDescriptor {
            name: self.name(),
            description,
            params,
        }
    }
}

fn network_param(description: &'static str) -> ParamSpec {
    ParamSpec::optional("network", ParamType::Network, description)
}

fn ndex_url_param(ndex_url: &str) -> ParamSpec {
    ParamSpec::optional("ndex_url", ParamType::String, "NDEx website URL").default(json!(ndex_url))
}

fn ndex_upload_params(ndex_url: &str, metadata_description: &'static str) -> Vec<ParamSpec> {
    vec![
        ParamSpec::required("username", ParamType::String, "NDEx account username").non_empty(),
        ParamSpec::required("password", ParamType::String, "NDEx account password").non_empty(),
        ParamSpec::optional(
            "is_public",
            ParamType::Boolean,
            "Whether to make the network publicly accessible",
        )
        .default(json!(false)),
        network_param("Network name or SUID; current network if not specified"),
        ParamSpec::optional("metadata", ParamType::Object, metadata_description)
            .fields(NDEX_METADATA_FIELDS),
        ndex_url_param(ndex_url),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn names_are_unique() {
        let names: HashSet<_> = ToolKind::ALL.iter().map(|k| k.name()).collect();
        assert_eq!(names.len(), ToolKind::ALL.len());
    }

    #[test]
    fn every_descriptor_carries_its_kind_name() {
        for kind in ToolKind::ALL {
            let descriptor = kind.descriptor("http://ndexbio.org");
            assert_eq!(descriptor.name, kind.name());
            assert!(!descriptor.description.is_empty());
            let params: HashSet<_> = descriptor.params.iter().map(|p| p.name).collect();
            assert_eq!(params.len(), descriptor.params.len(), "{}", kind.name());
        }
    }

    #[test]
    fn ndex_default_follows_configuration() {
        let descriptor = ToolKind::ImportNetworkFromNdex.descriptor("https://test.ndexbio.org");
        assert_eq!(
            descriptor.param("ndex_url").unwrap().default,
            Some(json!("https://test.ndexbio.org"))
        );
    }

    #[test]
    fn overwrite_check_states_its_filesystem_scope() {
        let descriptor = ToolKind::ExportImage.descriptor("http://ndexbio.org");
        let overwrite = descriptor.param("overwrite_file").unwrap();
        assert!(overwrite.description.contains("same machine"), "{}", overwrite.description);
    }

    #[test]
    fn unsigned_integer_params_are_bounded() {
        let descriptor = ToolKind::LoadStringNetwork.descriptor("http://ndexbio.org");
        assert_eq!(
            descriptor.param("species").unwrap().range,
            Some((1.0, f64::from(u32::MAX)))
        );
        assert_eq!(
            descriptor.param("additional_nodes").unwrap().range,
            Some((0.0, 10_000.0))
        );
    }

    #[test]
    fn ndex_uploads_require_credentials() {
        for kind in [ToolKind::ExportNetworkToNdex, ToolKind::UpdateNetworkInNdex] {
            let descriptor = kind.descriptor("http://ndexbio.org");
            assert!(descriptor.param("username").unwrap().required);
            assert!(descriptor.param("password").unwrap().required);
        }
    }
}
