use crate::config::{Config, LLMProvider};
use crate::search::SearchDepth;
use anyhow::{Context, Result, anyhow};
use clap::Parser;
use std::path::PathBuf;

/// 未指定 --config 时尝试加载的配置文件
pub const DEFAULT_CONFIG_FILE: &str = "deep-researcher.toml";

/// Deep Researcher - 由Rust与AI驱动的技术调研报告生成器
#[derive(Parser, Debug)]
#[command(name = "deep-researcher")]
#[command(
    about = "Agentic research report generator. Mines recent technical sources for a topic, finds research gaps, drafts and publishes a complete technical survey."
)]
#[command(version)]
pub struct Args {
    /// 研究主题
    pub topic: String,

    /// 配置文件路径
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// 输出路径
    #[arg(short, long)]
    pub output_path: Option<PathBuf>,

    /// LLM Provider (groq, openai, ollama)
    #[arg(long)]
    pub llm_provider: Option<String>,

    /// LLM API KEY，未指定时读取 GROQ_API_KEY
    #[arg(long)]
    pub llm_api_key: Option<String>,

    /// LLM API基地址
    #[arg(long)]
    pub llm_api_base_url: Option<String>,

    /// 搜索 API KEY，未指定时读取 LINKUP_API_KEY
    #[arg(long)]
    pub search_api_key: Option<String>,

    /// 标准模型，用于检索、分析与撰写阶段
    #[arg(long)]
    pub model_standard: Option<String>,

    /// 快速模型，用于发布阶段
    #[arg(long)]
    pub model_fast: Option<String>,

    /// 最大tokens数
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// 温度参数
    #[arg(long)]
    pub temperature: Option<f64>,

    /// 检索阶段最多的工具轮次
    #[arg(long)]
    pub max_tool_turns: Option<usize>,

    /// 默认搜索深度 (shallow, deep)
    #[arg(long)]
    pub search_depth: Option<String>,

    /// 整个流程的超时时间（秒），0表示不限制
    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    /// 遇到限流时重新执行整个流程的次数
    #[arg(long)]
    pub rate_limit_retries: Option<u32>,

    /// 不保存报告到输出目录
    #[arg(long)]
    pub no_save: bool,

    /// 是否启用详细日志
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// 将CLI参数转换为配置
    ///
    /// 优先级：CLI参数 > 配置文件 > 环境变量（仅凭据）> 默认值
    pub fn into_config(self) -> Result<Config> {
        let mut config = match &self.config {
            Some(config_path) => Config::from_file(config_path)
                .with_context(|| format!("无法读取配置文件 {:?}", config_path))?,
            None => {
                let default_config_path = std::env::current_dir()
                    .unwrap_or_else(|_| PathBuf::from("."))
                    .join(DEFAULT_CONFIG_FILE);

                if default_config_path.exists() {
                    Config::from_file(&default_config_path).with_context(|| {
                        format!("无法读取默认配置文件 {:?}", default_config_path)
                    })?
                } else {
                    Config::default()
                }
            }
        };

        if let Some(output_path) = self.output_path {
            config.output_path = output_path;
        }

        // 覆盖LLM配置
        if let Some(provider_str) = self.llm_provider {
            let provider = provider_str
                .parse::<LLMProvider>()
                .map_err(|e| anyhow!(e))?;
            // 切换provider时同步默认基地址，显式指定的基地址在下面覆盖
            if provider != config.llm.provider {
                config.llm.api_base_url = provider.default_base_url().to_string();
            }
            config.llm.provider = provider;
        }
        if let Some(llm_api_base_url) = self.llm_api_base_url {
            config.llm.api_base_url = llm_api_base_url;
        }
        if let Some(llm_api_key) = self.llm_api_key {
            config.llm.api_key = llm_api_key;
        }
        if let Some(model_standard) = self.model_standard {
            config.llm.model_standard = model_standard;
        }
        if let Some(model_fast) = self.model_fast {
            config.llm.model_fast = model_fast;
        }
        if let Some(max_tokens) = self.max_tokens {
            config.llm.max_tokens = max_tokens;
        }
        if let Some(temperature) = self.temperature {
            config.llm.temperature = temperature;
        }
        if let Some(max_tool_turns) = self.max_tool_turns {
            config.llm.max_tool_turns = max_tool_turns;
        }

        // 覆盖搜索配置
        if let Some(search_api_key) = self.search_api_key {
            config.search.api_key = search_api_key;
        }
        if let Some(depth_str) = self.search_depth {
            config.search.default_depth = depth_str
                .parse::<SearchDepth>()
                .map_err(|e| anyhow!(e))?;
        }

        // 其他配置
        if let Some(timeout_seconds) = self.timeout_seconds {
            config.timeout_seconds = timeout_seconds;
        }
        if let Some(rate_limit_retries) = self.rate_limit_retries {
            config.rate_limit_retries = rate_limit_retries;
        }
        if self.no_save {
            config.save_report = false;
        }
        if self.verbose {
            config.verbose = true;
        }

        config.resolve_credentials_from_env();

        Ok(config)
    }
}
