use anyhow::Result;
use async_trait::async_trait;

use crate::graph::model::Relationship;
use crate::pipeline::agent_executor::{AgentExecuteParams, prompt};
use crate::pipeline::context::ResearchContext;

/// 黑盒推理接口：(查询, 文档, 关系) -> 自然语言论证文本
#[async_trait]
pub trait ReasoningBackend: Send + Sync {
    async fn reason(
        &self,
        query: &str,
        document: &str,
        relationship: &Relationship,
    ) -> Result<String>;
}

/// LLM实现的推理后端
pub struct LlmReasoningBackend {
    context: ResearchContext,
}

impl LlmReasoningBackend {
    pub fn new(context: ResearchContext) -> Self {
        Self { context }
    }
}

#[async_trait]
impl ReasoningBackend for LlmReasoningBackend {
    async fn reason(
        &self,
        query: &str,
        document: &str,
        relationship: &Relationship,
    ) -> Result<String> {
        let prompt_sys =
            "你是一个企业关系审阅员。针对给定的关系断言，结合检索问题与证据文档，用一段话说明该关系是否成立、文档中哪些内容支持或削弱它。"
                .to_string();

        let prompt_user = format!(
            "## 检索问题
{}

## 关系断言
{} -[{}]-> {}

## 证据文档
{}

请论证该关系断言。",
            query,
            relationship.source.name,
            relationship.relationship_type.as_str(),
            relationship.target.name,
            document
        );

        let params = AgentExecuteParams {
            prompt_sys,
            prompt_user,
            cache_scope: "graph_reasoning".to_string(),
            log_tag: format!("关系论证[{}]", relationship.relationship_type.as_str()),
        };

        prompt(&self.context, params).await
    }
}

/// 关系论证器 - 推理失败不丢关系
///
/// 论证属于增强信息而非正确性门槛：后端调用失败时
/// 记录日志并以空论证代替，关系照常产出。
pub struct RelationshipReasoner<'a> {
    backend: &'a dyn ReasoningBackend,
}

impl<'a> RelationshipReasoner<'a> {
    pub fn new(backend: &'a dyn ReasoningBackend) -> Self {
        Self { backend }
    }

    pub async fn reason(&self, query: &str, document: &str, relationship: &Relationship) -> String {
        match self.backend.reason(query, document, relationship).await {
            Ok(reasoning) => reasoning,
            Err(e) => {
                let err = crate::graph::GraphError::Reasoning {
                    relationship: format!(
                        "{} -[{}]-> {}",
                        relationship.source.name,
                        relationship.relationship_type.as_str(),
                        relationship.target.name
                    ),
                    source: e,
                };
                eprintln!("⚠️ {}，以空论证继续", err);
                String::new()
            }
        }
    }
}
