//! MCP (Model Context Protocol) server.
//!
//! Exposes the comparison and detection engines to AI assistants over stdio.
//! The tools are a thin presentation layer over `docsim-core`: documents arrive
//! inline as text, results leave as pretty-printed JSON.

use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, Content, Implementation, ServerCapabilities, ServerInfo};
use rmcp::schemars;
use rmcp::{ErrorData as McpError, ServerHandler, tool, tool_handler, tool_router};

use docsim_core::config::Config;
use docsim_core::markdown::markdown_to_prose;
use docsim_core::{AiLikelihoodScorer, CompareSettings, Document, compare_all};

/// Parameters for the `get_info` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct GetInfoParams {
    /// Output format: "text" or "json"
    #[serde(default = "default_format")]
    pub format: String,
}

fn default_format() -> String {
    "text".to_string()
}

/// A document supplied inline to `compare_documents`.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct InlineDocument {
    /// Identifier echoed back in results.
    pub id: String,
    /// Display name, usually a file name.
    #[serde(default)]
    pub name: String,
    /// MIME type or file extension; drives code detection.
    #[serde(default)]
    pub mime_or_ext: String,
    /// Plain-text content.
    pub content: String,
}

impl From<InlineDocument> for Document {
    fn from(doc: InlineDocument) -> Self {
        let name = if doc.name.is_empty() {
            doc.id.clone()
        } else {
            doc.name
        };
        Self::new(doc.id, name, doc.mime_or_ext, doc.content)
    }
}

/// Parameters for the `compare_documents` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct CompareDocumentsParams {
    /// Documents to compare pairwise (at least two).
    pub documents: Vec<InlineDocument>,
    /// Minimum shared substring length in characters.
    pub min_match_length: Option<usize>,
}

/// Parameters for the `detect_ai_text` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct DetectAiTextParams {
    /// The text to score.
    pub text: String,
    /// Reduce markdown to prose before scoring.
    #[serde(default)]
    pub strip_markdown: bool,
}

/// MCP server for document comparison and AI-likelihood scoring.
#[derive(Clone)]
pub struct DocsimServer {
    tool_router: rmcp::handler::server::router::tool::ToolRouter<Self>,
    compare: CompareSettings,
    detector: AiLikelihoodScorer,
    max_input_bytes: Option<usize>,
}

impl Default for DocsimServer {
    fn default() -> Self {
        let config = Config::default();
        Self::new(&config, config.input_limit())
    }
}

#[tool_router]
impl DocsimServer {
    /// Create a server using the loaded configuration.
    pub fn new(config: &Config, max_input_bytes: Option<usize>) -> Self {
        Self {
            tool_router: Self::tool_router(),
            compare: config.compare.clone(),
            detector: AiLikelihoodScorer::new(config.detector.clone()),
            max_input_bytes,
        }
    }

    fn check_size(&self, label: &str, len: usize) -> Result<(), McpError> {
        match self.max_input_bytes {
            Some(max) if len > max => Err(McpError::invalid_params(
                format!("input too large: {label} is {len} bytes (limit: {max} bytes)"),
                None,
            )),
            _ => Ok(()),
        }
    }

    /// Get project information.
    #[tool(description = "Get project name, version, and description")]
    #[tracing::instrument(skip(self), fields(otel.kind = "server"))]
    fn get_info(
        &self,
        Parameters(params): Parameters<GetInfoParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(tool = "get_info", format = %params.format, "executing MCP tool");

        let text = if params.format == "json" {
            let info = serde_json::json!({
                "name": env!("CARGO_PKG_NAME"),
                "version": env!("CARGO_PKG_VERSION"),
                "description": env!("CARGO_PKG_DESCRIPTION"),
            });
            to_json(&info)?
        } else {
            format!(
                "{} v{}\n{}",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION"),
                env!("CARGO_PKG_DESCRIPTION"),
            )
        };

        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    /// Compare inline documents pairwise.
    #[tool(
        description = "Compare two or more documents pairwise. Returns one result per pair with a similarity percentage (0-100) and matched character spans."
    )]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server", documents = params.documents.len()))]
    fn compare_documents(
        &self,
        Parameters(params): Parameters<CompareDocumentsParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(tool = "compare_documents", "executing MCP tool");

        for doc in &params.documents {
            self.check_size(&doc.id, doc.content.len())?;
        }
        let mut settings = self.compare.clone();
        if let Some(min) = params.min_match_length {
            settings = settings.with_min_match_length(min);
        }
        let documents: Vec<Document> = params.documents.into_iter().map(Document::from).collect();

        let results = compare_all(&documents, &settings)
            .map_err(|e| McpError::invalid_params(e.to_string(), None))?;
        let json = to_json(&results)?;

        tracing::info!(tool = "compare_documents", pairs = results.len(), "MCP tool completed");
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    /// Score text for AI likelihood.
    #[tool(
        description = "Score how likely a text is AI-generated. Returns a 0-100 score, a label, per-feature confidences and the underlying statistics."
    )]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server"))]
    fn detect_ai_text(
        &self,
        Parameters(params): Parameters<DetectAiTextParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(
            tool = "detect_ai_text",
            strip_md = params.strip_markdown,
            "executing MCP tool"
        );

        self.check_size("text", params.text.len())?;
        let text = if params.strip_markdown {
            markdown_to_prose(&params.text)
        } else {
            params.text
        };

        let analysis = self
            .detector
            .analyze(&text)
            .map_err(|e| McpError::invalid_params(e.to_string(), None))?;
        let json = to_json(&analysis)?;

        tracing::info!(tool = "detect_ai_text", score = analysis.score, "MCP tool completed");
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, McpError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("serialization error: {e}"), None))
}

#[tool_handler]
impl ServerHandler for DocsimServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: Default::default(),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: env!("CARGO_PKG_NAME").to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            instructions: Some(format!(
                "{} MCP server. Use compare_documents to measure overlap between texts \
                 and detect_ai_text to score a text for machine-generated style.",
                env!("CARGO_PKG_NAME"),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rmcp::model::RawContent;

    fn extract_text(result: &CallToolResult) -> Option<&str> {
        result.content.first().and_then(|c| match &c.raw {
            RawContent::Text(t) => Some(t.text.as_str()),
            _ => None,
        })
    }

    fn inline(id: &str, content: &str) -> InlineDocument {
        InlineDocument {
            id: id.to_string(),
            name: String::new(),
            mime_or_ext: "txt".to_string(),
            content: content.to_string(),
        }
    }

    #[test]
    fn server_info_has_correct_name() {
        let info = ServerHandler::get_info(&DocsimServer::default());
        assert_eq!(info.server_info.name, env!("CARGO_PKG_NAME"));
        assert_eq!(info.server_info.version, env!("CARGO_PKG_VERSION"));
        assert!(info.capabilities.tools.is_some());
        assert!(info.instructions.unwrap().contains("compare_documents"));
    }

    #[test]
    fn get_info_tool_returns_json_when_requested() {
        let server = DocsimServer::default();
        let params = Parameters(GetInfoParams {
            format: "json".to_string(),
        });
        let result = server.get_info(params).unwrap();
        let json: serde_json::Value = serde_json::from_str(extract_text(&result).unwrap()).unwrap();
        assert_eq!(json["name"], env!("CARGO_PKG_NAME"));
    }

    #[test]
    fn compare_documents_returns_pairs() {
        let server = DocsimServer::default();
        let params = Parameters(CompareDocumentsParams {
            documents: vec![
                inline("a", "the quick brown fox jumps over the lazy dog"),
                inline("b", "a quick brown fox jumps over a lazy dog"),
                inline("c", "nothing in common here"),
            ],
            min_match_length: Some(10),
        });
        let result = server.compare_documents(params).unwrap();
        let json: serde_json::Value = serde_json::from_str(extract_text(&result).unwrap()).unwrap();
        let pairs = json.as_array().unwrap();
        assert_eq!(pairs.len(), 3);
        assert_eq!(pairs[0]["id"], "pair-0-1");
        assert_eq!(pairs[0]["document_a_id"], "a");
        assert!(pairs[0]["similarity_percentage"].as_f64().unwrap() > 0.0);
    }

    #[test]
    fn compare_documents_needs_two() {
        let server = DocsimServer::default();
        let params = Parameters(CompareDocumentsParams {
            documents: vec![inline("a", "alone")],
            min_match_length: None,
        });
        assert!(server.compare_documents(params).is_err());
    }

    #[test]
    fn oversize_document_is_rejected() {
        let server = DocsimServer::new(&Config::default(), Some(4));
        let params = Parameters(CompareDocumentsParams {
            documents: vec![inline("a", "12345"), inline("b", "1")],
            min_match_length: None,
        });
        assert!(server.compare_documents(params).is_err());
    }

    #[test]
    fn detect_ai_text_scores() {
        let server = DocsimServer::default();
        let params = Parameters(DetectAiTextParams {
            text: "Furthermore, the system demonstrates robust performance. Moreover, the \
                   implementation ensures consistent results across environments."
                .to_string(),
            strip_markdown: false,
        });
        let result = server.detect_ai_text(params).unwrap();
        let json: serde_json::Value = serde_json::from_str(extract_text(&result).unwrap()).unwrap();
        let score = json["score"].as_f64().unwrap();
        assert!((0.0..=100.0).contains(&score));
        assert!(json["likelihood"].is_string());
        assert_eq!(json["features"].as_array().unwrap().len(), 8);
    }

    #[test]
    fn detect_ai_text_rejects_short_input() {
        let server = DocsimServer::default();
        let params = Parameters(DetectAiTextParams {
            text: "short".to_string(),
            strip_markdown: true,
        });
        assert!(server.detect_ai_text(params).is_err());
    }
}
