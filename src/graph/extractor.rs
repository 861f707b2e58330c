use anyhow::Result;
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::graph::GraphError;
use crate::graph::model::{Entity, Relationship, TripleType};
use crate::pipeline::agent_executor::{AgentExecuteParams, extract};
use crate::pipeline::context::ResearchContext;

/// 黑盒结构化抽取调用返回的原始候选
///
/// 关系类型与两端实体类型由三元组类型约束锁定，
/// 抽取调用只负责给出端点名称与评分。
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RelationshipCandidate {
    /// 源实体名称
    pub source_name: String,

    /// 目标实体名称
    pub target_name: String,

    /// 对文档的忠实度评分（1-5）
    pub faithfulness: u8,

    /// 事实正确性评分（1-5）
    pub factual_correctness: u8,

    /// 置信度评分（1-5）
    pub confidence: u8,
}

/// 抽取调用的结构化输出
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
struct RelationshipCandidateList {
    /// 从文档中抽取到的全部候选关系，没有时为空列表
    #[serde(default)]
    relationships: Vec<RelationshipCandidate>,
}

/// 黑盒结构化抽取接口：(查询, 文档, 三元组类型) -> 候选关系列表
#[async_trait]
pub trait ExtractionBackend: Send + Sync {
    async fn extract_candidates(
        &self,
        query: &str,
        document: &str,
        triple_type: &TripleType,
    ) -> Result<Vec<RelationshipCandidate>>;
}

/// LLM实现的抽取后端
pub struct LlmExtractionBackend {
    context: ResearchContext,
}

impl LlmExtractionBackend {
    pub fn new(context: ResearchContext) -> Self {
        Self { context }
    }
}

#[async_trait]
impl ExtractionBackend for LlmExtractionBackend {
    async fn extract_candidates(
        &self,
        query: &str,
        document: &str,
        triple_type: &TripleType,
    ) -> Result<Vec<RelationshipCandidate>> {
        let prompt_sys = format!(
            "你是一个企业关系抽取器。从给定文档中抽取满足关系模式「{}」的关系实例：源实体必须是{}，目标实体必须是{}。只抽取文档明确支持的关系，每条关系给出忠实度、事实正确性、置信度评分（1-5）。文档中没有满足模式的关系时返回空列表。",
            triple_type.describe(),
            triple_type.source.as_str(),
            triple_type.target.as_str()
        );

        let prompt_user = format!(
            "## 检索问题
{}

## 文档
{}

请从文档中抽取满足关系模式的关系实例。",
            query, document
        );

        let params = AgentExecuteParams {
            prompt_sys,
            prompt_user,
            cache_scope: "graph_extraction".to_string(),
            log_tag: format!("关系抽取[{}]", triple_type.relationship_type.as_str()),
        };

        let result: RelationshipCandidateList = extract(&self.context, params).await?;
        Ok(result.relationships)
    }
}

/// 关系抽取器 - 在黑盒抽取调用之上强制有效性约束
///
/// 端点名称为空或仅含空白的候选在此被抑制，绝不进入下游；
/// 评分统一收敛到[1,5]。
pub struct RelationshipExtractor<'a> {
    backend: &'a dyn ExtractionBackend,
    verbose: bool,
}

impl<'a> RelationshipExtractor<'a> {
    pub fn new(backend: &'a dyn ExtractionBackend, verbose: bool) -> Self {
        Self { backend, verbose }
    }

    /// 对单个（查询, 文档）执行抽取
    ///
    /// 抽取调用失败时返回`GraphError::Extraction`，
    /// 由流水线按「该文档零关系」处理，不中断批次。
    pub async fn extract(
        &self,
        query: &str,
        document: &str,
        triple_type: &TripleType,
    ) -> Result<Vec<Relationship>, GraphError> {
        let candidates = self
            .backend
            .extract_candidates(query, document, triple_type)
            .await
            .map_err(|e| GraphError::Extraction {
                query: query.to_string(),
                source: e,
            })?;

        let total = candidates.len();
        let relationships = Self::sanitize(candidates, triple_type);

        if self.verbose && relationships.len() < total {
            println!(
                "   🧹 关系抽取[{}]: 过滤无效候选 {} 条",
                triple_type.relationship_type.as_str(),
                total - relationships.len()
            );
        }

        Ok(relationships)
    }

    /// 有效性约束：过滤空名称候选，锁定类型，收敛评分
    fn sanitize(
        candidates: Vec<RelationshipCandidate>,
        triple_type: &TripleType,
    ) -> Vec<Relationship> {
        candidates
            .into_iter()
            .filter(|candidate| {
                !candidate.source_name.trim().is_empty() && !candidate.target_name.trim().is_empty()
            })
            .map(|candidate| Relationship {
                source: Entity::new(triple_type.source, candidate.source_name),
                target: Entity::new(triple_type.target, candidate.target_name),
                relationship_type: triple_type.relationship_type,
                faithfulness: candidate.faithfulness.clamp(1, 5),
                factual_correctness: candidate.factual_correctness.clamp(1, 5),
                confidence: candidate.confidence.clamp(1, 5),
            })
            .collect()
    }
}
