//! 网络搜索工具

use rig::tool::Tool;
use serde::Deserialize;
use std::convert::Infallible;
use std::sync::Arc;
use tracing::warn;

use crate::search::{SearchBackend, SearchDepth};

/// 搜索工具
///
/// 远程失败时返回 `Error: <message>` 文本而不是错误，
/// 调用方不能假设工具结果一定是有效的搜索内容。
#[derive(Clone)]
pub struct AgentToolSearch {
    backend: Arc<dyn SearchBackend>,
    default_depth: SearchDepth,
}

/// 搜索参数
#[derive(Debug, Deserialize)]
pub struct SearchArgs {
    pub query: String,
    pub depth: Option<SearchDepth>,
}

impl AgentToolSearch {
    pub fn new(backend: Arc<dyn SearchBackend>, default_depth: SearchDepth) -> Self {
        Self {
            backend,
            default_depth,
        }
    }

    /// 执行一次搜索，总是返回文本
    pub async fn run(&self, query: &str, depth: SearchDepth) -> String {
        match self.backend.search(query, depth).await {
            Ok(text) => text,
            Err(e) => {
                warn!(query, error = %e, "search tool call failed");
                format!("Error: {}", e)
            }
        }
    }
}

impl Tool for AgentToolSearch {
    const NAME: &'static str = "linkup_search";

    type Error = Infallible;
    type Args = SearchArgs;
    type Output = String;

    async fn definition(&self, _prompt: String) -> rig::completion::ToolDefinition {
        rig::completion::ToolDefinition {
            name: Self::NAME.to_string(),
            description: "Search the web for specific technical details, future work sections, and research gaps.".to_string(),
            parameters: serde_json::json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "The search query to perform"
                    },
                    "depth": {
                        "type": "string",
                        "enum": ["shallow", "deep"],
                        "description": "Use 'deep' for research papers (default), 'shallow' for quick lookups"
                    }
                },
                "required": ["query"]
            }),
        }
    }

    async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error> {
        println!("   🔧 tool called...linkup_search@{:?}", args);

        let depth = args.depth.unwrap_or(self.default_depth);
        Ok(self.run(&args.query, depth).await)
    }
}
