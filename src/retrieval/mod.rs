//! 证据检索边界 - 「提出问题，拿回带引用的回答」
//!
//! 图谱抽取流水线只依赖`EvidenceRetriever`这一接口；
//! 默认实现基于采集阶段入库的资料文档（见`answerer`）。

use anyhow::Result;
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub mod answerer;

pub use answerer::MemoryEvidenceRetriever;

/// 信源可信度等级
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum CredibilityLevel {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for CredibilityLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CredibilityLevel::Low => write!(f, "low"),
            CredibilityLevel::Medium => write!(f, "medium"),
            CredibilityLevel::High => write!(f, "high"),
        }
    }
}

/// 单个信源的可信度评估
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceCredibility {
    /// 信源（URL或文档标识）
    pub source: String,

    /// 可信度等级
    pub credibility: CredibilityLevel,
}

/// 检索回答：带引用文档与信源可信度的完整溯源包
///
/// `documents`、`citations`、`source_credibility`、
/// `source_credibility_reasoning`按下标一一对应。
/// 未命中任何资料时各列表为空，而不是返回错误。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievedAnswer {
    /// 检索问题原文
    pub question: String,

    /// 综合回答文本
    pub answer: String,

    /// 证据文档正文
    pub documents: Vec<String>,

    /// 证据文档的引用来源
    pub citations: Vec<String>,

    /// 回答对证据的忠实度评分（1-5）
    pub faithfulness: u8,

    /// 回答的事实正确性评分（1-5）
    pub factual_correctness: u8,

    /// 回答的置信度评分（1-5）
    pub confidence: u8,

    /// 各信源可信度评估
    pub source_credibility: Vec<SourceCredibility>,

    /// 各信源可信度评估的理由说明
    pub source_credibility_reasoning: Vec<String>,
}

impl RetrievedAnswer {
    /// 构造一个未命中任何资料的空回答
    pub fn empty(question: &str) -> Self {
        Self {
            question: question.to_string(),
            answer: String::new(),
            documents: vec![],
            citations: vec![],
            faithfulness: 1,
            factual_correctness: 1,
            confidence: 1,
            source_credibility: vec![],
            source_credibility_reasoning: vec![],
        }
    }
}

/// 证据检索接口
#[async_trait]
pub trait EvidenceRetriever: Send + Sync {
    /// 针对一个自然语言问题，返回带引用的检索回答
    async fn retrieve(&self, query: &str) -> Result<RetrievedAnswer>;
}
