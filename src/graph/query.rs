use anyhow::Result;
use async_trait::async_trait;

use crate::graph::model::TripleType;
use crate::pipeline::agent_executor::{AgentExecuteParams, prompt};
use crate::pipeline::context::ResearchContext;

/// 检索查询生成接口：由实体描述与三元组类型生成一条自然语言检索问题
#[async_trait]
pub trait QueryGenerator: Send + Sync {
    async fn generate(&self, specification: &str, triple_type: &TripleType) -> Result<String>;
}

/// LLM实现的查询生成器
pub struct LlmQueryGenerator {
    context: ResearchContext,
}

impl LlmQueryGenerator {
    pub fn new(context: ResearchContext) -> Self {
        Self { context }
    }
}

#[async_trait]
impl QueryGenerator for LlmQueryGenerator {
    async fn generate(&self, specification: &str, triple_type: &TripleType) -> Result<String> {
        let prompt_sys =
            "你是一个企业调研查询设计师。基于给定的调研对象描述和关系模式，生成一条用于检索证据的自然语言问题。只输出问题本身，不要任何解释或前后缀。"
                .to_string();

        let prompt_user = format!(
            "## 调研对象
{}

## 关系模式
{}（{}）

请生成一条针对该调研对象、用于回答上述关系模式的检索问题。",
            specification,
            triple_type.describe(),
            triple_type.relationship_type.query_hint()
        );

        let params = AgentExecuteParams {
            prompt_sys,
            prompt_user,
            cache_scope: "graph_query".to_string(),
            log_tag: format!("查询生成[{}]", triple_type.relationship_type.as_str()),
        };

        let generated = prompt(&self.context, params).await?;

        // 模型偶尔会输出多行，只保留第一条非空行
        let query = generated
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .unwrap_or_default()
            .to_string();

        Ok(query)
    }
}
