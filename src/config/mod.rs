use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::PathBuf;

use crate::error::ResearchError;
use crate::search::SearchDepth;

/// LLM凭据的环境变量名
pub const LLM_API_KEY_ENV: &str = "GROQ_API_KEY";
/// 搜索服务凭据的环境变量名
pub const SEARCH_API_KEY_ENV: &str = "LINKUP_API_KEY";

/// LLM Provider类型
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub enum LLMProvider {
    #[serde(rename = "groq")]
    #[default]
    Groq,
    #[serde(rename = "openai")]
    OpenAI,
    #[serde(rename = "ollama")]
    Ollama,
}

impl LLMProvider {
    /// Provider的默认API基地址
    pub fn default_base_url(&self) -> &'static str {
        match self {
            LLMProvider::Groq => "https://api.groq.com/openai/v1",
            LLMProvider::OpenAI => "https://api.openai.com/v1",
            LLMProvider::Ollama => "http://localhost:11434",
        }
    }
}

impl std::fmt::Display for LLMProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LLMProvider::Groq => write!(f, "groq"),
            LLMProvider::OpenAI => write!(f, "openai"),
            LLMProvider::Ollama => write!(f, "ollama"),
        }
    }
}

impl std::str::FromStr for LLMProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "groq" => Ok(LLMProvider::Groq),
            "openai" => Ok(LLMProvider::OpenAI),
            "ollama" => Ok(LLMProvider::Ollama),
            _ => Err(format!("Unknown provider: {}", s)),
        }
    }
}

/// 应用程序配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct Config {
    /// LLM模型配置
    pub llm: LLMConfig,

    /// 搜索服务配置
    pub search: SearchConfig,

    /// 报告输出路径
    pub output_path: PathBuf,

    /// 整个研究流程的超时时间（秒），0表示不限制
    pub timeout_seconds: u64,

    /// 遇到限流时重新执行整个流程的次数
    pub rate_limit_retries: u32,

    /// 限流后重新执行前的等待时间（秒）
    pub rate_limit_wait_secs: u64,

    /// 是否把报告保存到输出路径
    pub save_report: bool,

    /// 是否启用详细日志
    pub verbose: bool,
}

/// LLM模型配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct LLMConfig {
    /// LLM Provider类型
    pub provider: LLMProvider,

    /// LLM API KEY
    pub api_key: String,

    /// LLM API基地址
    pub api_base_url: String,

    /// 标准模型，用于检索、分析与撰写阶段
    pub model_standard: String,

    /// 快速模型，用于最后的发布阶段，降低触发限流的概率
    pub model_fast: String,

    /// 最大tokens
    pub max_tokens: u32,

    /// 温度
    pub temperature: f64,

    /// 带搜索工具的阶段在一次调用内最多进行的工具轮次
    pub max_tool_turns: usize,
}

/// 搜索服务配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct SearchConfig {
    /// 搜索 API KEY
    pub api_key: String,

    /// 搜索 API基地址
    pub api_base_url: String,

    /// 工具调用未指定深度时使用的深度
    pub default_depth: SearchDepth,

    /// 最多保留的搜索结果条数
    pub max_results: usize,

    /// 单条结果正文的截断长度（字符），None表示不截断
    pub content_truncate_length: Option<usize>,

    /// 单次搜索请求超时时间（秒）
    pub timeout_seconds: u64,
}

impl Config {
    /// 从文件加载配置
    pub fn from_file(path: &PathBuf) -> Result<Self> {
        let mut file =
            File::open(path).context(format!("Failed to open config file: {:?}", path))?;
        let mut content = String::new();
        file.read_to_string(&mut content)
            .context("Failed to read config file")?;

        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }

    /// 用环境变量补齐尚未配置的凭据
    ///
    /// 只在进程启动时调用一次，之后凭据随Config显式传递。
    pub fn resolve_credentials_from_env(&mut self) {
        self.resolve_credentials_with(|name| std::env::var(name).ok());
    }

    /// 使用给定的查找函数补齐凭据，已有的非空凭据不会被覆盖
    pub fn resolve_credentials_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if self.llm.api_key.trim().is_empty()
            && let Some(key) = lookup(LLM_API_KEY_ENV)
        {
            self.llm.api_key = key.trim().to_string();
        }
        if self.search.api_key.trim().is_empty()
            && let Some(key) = lookup(SEARCH_API_KEY_ENV)
        {
            self.search.api_key = key.trim().to_string();
        }
    }

    /// 校验两个远程服务的凭据都已配置
    pub fn validate(&self) -> Result<(), ResearchError> {
        let mut missing = Vec::new();
        if self.llm.api_key.trim().is_empty() {
            missing.push(LLM_API_KEY_ENV);
        }
        if self.search.api_key.trim().is_empty() {
            missing.push(SEARCH_API_KEY_ENV);
        }
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ResearchError::Configuration(format!(
                "missing credentials: {}",
                missing.join(", ")
            )))
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            llm: LLMConfig::default(),
            search: SearchConfig::default(),
            output_path: PathBuf::from("./research.reports"),
            timeout_seconds: 600,
            rate_limit_retries: 0,
            rate_limit_wait_secs: 15,
            save_report: true,
            verbose: false,
        }
    }
}

impl Default for LLMConfig {
    fn default() -> Self {
        let provider = LLMProvider::default();
        Self {
            api_base_url: provider.default_base_url().to_string(),
            provider,
            api_key: String::new(),
            model_standard: String::from("llama-3.3-70b-versatile"),
            model_fast: String::from("llama-3.1-8b-instant"),
            max_tokens: 4096,
            temperature: 0.1,
            max_tool_turns: 5,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_base_url: String::from("https://api.linkup.so/v1"),
            default_depth: SearchDepth::Deep,
            max_results: 10,
            content_truncate_length: Some(2000),
            timeout_seconds: 60,
        }
    }
}
