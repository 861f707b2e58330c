use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::PathBuf;

use crate::i18n::TargetLanguage;

/// LLM Provider类型
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub enum LLMProvider {
    #[serde(rename = "openai")]
    #[default]
    OpenAI,
    #[serde(rename = "deepseek")]
    DeepSeek,
    #[serde(rename = "openrouter")]
    OpenRouter,
    #[serde(rename = "anthropic")]
    Anthropic,
    #[serde(rename = "ollama")]
    Ollama,
}

impl std::fmt::Display for LLMProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LLMProvider::OpenAI => write!(f, "openai"),
            LLMProvider::DeepSeek => write!(f, "deepseek"),
            LLMProvider::OpenRouter => write!(f, "openrouter"),
            LLMProvider::Anthropic => write!(f, "anthropic"),
            LLMProvider::Ollama => write!(f, "ollama"),
        }
    }
}

impl std::str::FromStr for LLMProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(LLMProvider::OpenAI),
            "deepseek" => Ok(LLMProvider::DeepSeek),
            "openrouter" => Ok(LLMProvider::OpenRouter),
            "anthropic" => Ok(LLMProvider::Anthropic),
            "ollama" => Ok(LLMProvider::Ollama),
            _ => Err(format!("Unknown provider: {}", s)),
        }
    }
}

/// 应用程序配置
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    /// 公司名称（未配置时从URL自动推断）
    pub company_name: Option<String>,

    /// 公司官网URL，调研的起点
    pub company_url: String,

    /// 输出路径
    pub output_path: PathBuf,

    /// 内部工作目录路径 (.dossier)
    pub internal_path: PathBuf,

    /// 报告目标语言
    pub target_language: TargetLanguage,

    /// 调研配置
    pub research: ResearchConfig,

    /// LLM模型配置
    pub llm: LLMConfig,

    /// 缓存配置
    pub cache: CacheConfig,

    /// 强制重新生成（绕过缓存读取）
    pub force_regenerate: bool,

    /// 跳过资料采集
    pub skip_intake: bool,

    /// 跳过调研阶段
    pub skip_research: bool,

    /// 跳过报告生成
    pub skip_report: bool,

    /// 是否启用详细日志
    pub verbose: bool,
}

/// 调研配置
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ResearchConfig {
    /// 除公司官网外，额外采集的种子URL
    pub seed_urls: Vec<String>,

    /// 在公司域名下尝试采集的常见子路径
    pub well_known_paths: Vec<String>,

    /// 采集页面数量上限
    pub max_pages: usize,

    /// 单个资料文档的最大字符数（超出截断）
    pub max_document_chars: usize,

    /// 每个检索问题最多引用的证据文档数
    pub documents_per_query: usize,
}

/// LLM模型配置
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LLMConfig {
    /// LLM Provider类型
    pub provider: LLMProvider,

    /// LLM API KEY
    pub api_key: String,

    /// LLM API基地址
    pub api_base_url: String,

    /// 高能效模型，优先用于常规推理任务
    pub model_efficient: String,

    /// 高质量模型，优先用于复杂推理任务，以及作为efficient失效情况下的兜底
    pub model_powerful: String,

    /// 最大tokens
    pub max_tokens: u32,

    /// 温度
    pub temperature: f64,

    /// 重试次数
    pub retry_attempts: u32,

    /// 重试间隔（毫秒）
    pub retry_delay_ms: u64,

    /// 超时时间（秒）
    pub timeout_seconds: u64,

    /// 并行调用上限
    pub max_parallels: usize,
}

/// 缓存配置
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CacheConfig {
    /// 是否启用缓存
    pub enabled: bool,

    /// 缓存目录
    pub cache_dir: PathBuf,

    /// 缓存过期时间（小时）
    pub expire_hours: u64,
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

    /// 获取公司名称，优先使用配置的company_name，否则从URL自动推断
    pub fn get_company_name(&self) -> String {
        if let Some(ref name) = self.company_name
            && !name.trim().is_empty()
        {
            return name.clone();
        }

        self.infer_company_name()
    }

    /// 从公司URL推断公司名称
    fn infer_company_name(&self) -> String {
        let host = Self::extract_host(&self.company_url);
        if host.is_empty() {
            return self.company_url.clone();
        }

        // 去掉 www. 前缀，取主域名的首段
        let host = host.strip_prefix("www.").unwrap_or(&host);
        let label = host.split('.').next().unwrap_or(host);

        // 首字母大写作为展示名称
        let mut chars = label.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
            None => label.to_string(),
        }
    }

    /// 从URL中提取host部分
    pub fn extract_host(url: &str) -> String {
        let trimmed = url.trim();
        let without_scheme = trimmed
            .strip_prefix("https://")
            .or_else(|| trimmed.strip_prefix("http://"))
            .unwrap_or(trimmed);

        without_scheme
            .split(['/', '?', '#'])
            .next()
            .unwrap_or("")
            .split('@')
            .next_back()
            .unwrap_or("")
            .split(':')
            .next()
            .unwrap_or("")
            .to_string()
    }

    /// 标准化公司URL，缺失scheme时补全https
    pub fn normalized_company_url(&self) -> String {
        let url = self.company_url.trim();
        if url.starts_with("http://") || url.starts_with("https://") {
            url.trim_end_matches('/').to_string()
        } else {
            format!("https://{}", url.trim_end_matches('/'))
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            company_name: None,
            company_url: String::new(),
            output_path: PathBuf::from("./dossier.report"),
            internal_path: PathBuf::from("./.dossier"),
            target_language: TargetLanguage::default(),
            research: ResearchConfig::default(),
            llm: LLMConfig::default(),
            cache: CacheConfig::default(),
            force_regenerate: false,
            skip_intake: false,
            skip_research: false,
            skip_report: false,
            verbose: false,
        }
    }
}

impl Default for ResearchConfig {
    fn default() -> Self {
        Self {
            seed_urls: vec![],
            well_known_paths: vec![
                "about".to_string(),
                "company".to_string(),
                "team".to_string(),
                "products".to_string(),
                "news".to_string(),
                "careers".to_string(),
            ],
            max_pages: 12,
            max_document_chars: 16384,
            documents_per_query: 4,
        }
    }
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            provider: LLMProvider::default(),
            api_key: std::env::var("DOSSIER_LLM_API_KEY").unwrap_or_default(),
            api_base_url: String::from("https://api-inference.modelscope.cn/v1"),
            model_efficient: String::from("Qwen/Qwen3-Next-80B-A3B-Instruct"),
            model_powerful: String::from("Qwen/Qwen3-235B-A22B-Instruct-2507"),
            max_tokens: 131072,
            temperature: 0.1,
            retry_attempts: 5,
            retry_delay_ms: 5000,
            timeout_seconds: 300,
            max_parallels: 3,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            cache_dir: PathBuf::from(".dossier/cache"),
            expire_hours: 8760,
        }
    }
}
