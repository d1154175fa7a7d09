//! The MCP tool surface: three tools, all rendering text results.
//!
//! Every failure path is converted into an error-flagged tool result; nothing
//! here returns `Err` to the protocol layer for upstream or extraction
//! failures.

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, ErrorData, Implementation, ProtocolVersion, ServerCapabilities,
    ServerInfo,
};
use rmcp::{ServerHandler, tool, tool_handler, tool_router};

use crate::client::BailianClient;
use crate::extract::{extract_image_url, request_id};
use crate::models::render_model_catalog;
use crate::payload::{EditRequest, GenerationRequest, build_edit, build_generation};

#[derive(Clone)]
pub struct BailianImageServer {
    client: BailianClient,
    tool_router: ToolRouter<BailianImageServer>,
}

fn error_result(text: String) -> CallToolResult {
    CallToolResult::error(vec![Content::text(text)])
}

fn render_image_reference(label: &str, url: &str, model: &str, request_id: Option<&str>) -> String {
    let mut out = format!("![{label}]({url})");
    if let Some(id) = request_id {
        out.push_str(&format!("\n\nRequest ID: {id}"));
    }
    out.push_str(&format!("\nModel: {model}"));
    out.push_str("\n\n*Note: Do not modify the URL parameters.*");
    out
}

#[tool_router]
impl BailianImageServer {
    pub fn new(client: BailianClient) -> Self {
        Self {
            client,
            tool_router: Self::tool_router(),
        }
    }

    /// Static catalog, no network call.
    #[tool(description = "List available Bailian image models and their descriptions")]
    async fn list_image_models(&self) -> Result<CallToolResult, ErrorData> {
        Ok(CallToolResult::success(vec![Content::text(
            render_model_catalog(),
        )]))
    }

    #[tool(description = "Generate an image from a text prompt using the Aliyun Bailian API")]
    async fn generate_image(
        &self,
        Parameters(request): Parameters<GenerationRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        tracing::info!(model = %request.model, "generate_image");
        let (endpoint, payload) = build_generation(&request);

        let response = match self.client.post(endpoint, &payload).await {
            Ok(response) => response,
            Err(err) => return Ok(error_result(format!("Execution Error: {err}"))),
        };

        let Some(url) = extract_image_url(&response) else {
            return Ok(error_result(format!(
                "Error: No image URL in response. Raw: {response}"
            )));
        };

        Ok(CallToolResult::success(vec![Content::text(
            render_image_reference("Generated Image", url, &request.model, request_id(&response)),
        )]))
    }

    #[tool(description = "Edit an existing image according to a text instruction")]
    async fn image_edit_generation(
        &self,
        Parameters(request): Parameters<EditRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        tracing::info!(model = %request.model, "image_edit_generation");
        let (endpoint, payload) = build_edit(&request);

        let response = match self.client.post(endpoint, &payload).await {
            Ok(response) => response,
            Err(err) => return Ok(error_result(format!("Execution Error: {err}"))),
        };

        let Some(url) = extract_image_url(&response) else {
            return Ok(error_result(format!(
                "Error: No image URL in response. Raw: {response}"
            )));
        };

        Ok(CallToolResult::success(vec![Content::text(
            render_image_reference("Edited Image", url, &request.model, request_id(&response)),
        )]))
    }
}

#[tool_handler]
impl ServerHandler for BailianImageServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "bailian-image-mcp".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            instructions: Some(
                "Aliyun Bailian image generation and editing over MCP".to_string(),
            ),
        }
    }
}
