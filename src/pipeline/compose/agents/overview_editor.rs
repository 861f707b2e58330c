use anyhow::{Result, anyhow};
use async_trait::async_trait;

use crate::graph::model::AggregatedCitedGraph;
use crate::pipeline::agent::{AgentCallMode, ResearchAgent};
use crate::pipeline::compose::memory::{MemoryScope, SectionKeys};
use crate::pipeline::context::ResearchContext;
use crate::pipeline::research::memory::{
    MemoryScope as ResearchScope, ResearchMemory, ScopedKeys,
};

/// 概览编辑 - 基于画像与图谱撰写报告的公司概览分节
#[derive(Default)]
pub struct OverviewEditor;

#[async_trait]
impl ResearchAgent for OverviewEditor {
    type Output = String;

    fn agent_type(&self) -> String {
        SectionKeys::OVERVIEW.to_string()
    }

    fn memory_scope(&self) -> String {
        MemoryScope::REPORT.to_string()
    }

    fn call_mode(&self) -> AgentCallMode {
        AgentCallMode::Prompt
    }

    fn system_prompt(&self) -> String {
        r#"你是一个专业的商业分析报告撰稿人。

基于提供的公司画像与关系图谱摘要，撰写一篇结构清晰的公司概览，内容包括：
1. 公司定位与核心业务
2. 产品与服务
3. 关键人物与组织脉络
4. 重要的对外关系（母子公司、收购、投资、合作等）

直接输出Markdown正文，以一级标题开头，不要任何额外说明。"#
            .to_string()
    }

    fn closing_instruction(&self) -> String {
        r#"
## 撰写要求：
- 只陈述材料支持的事实，不做臆测
- 对不确定的信息明确标注"#
            .to_string()
    }

    async fn gather_material(&self, context: &ResearchContext) -> Result<String> {
        let profile = context
            .get_research(ScopedKeys::COMPANY_PROFILE)
            .await
            .ok_or_else(|| anyhow!("必需的调研结果 {} 不可用", ScopedKeys::COMPANY_PROFILE))?;

        let mut material = format!(
            "### 公司画像\n{}\n\n",
            serde_json::to_string_pretty(&profile)?
        );

        // 图谱摘要只取结构性信息，完整明细由图谱分节呈现
        if let Some(graph) = context
            .get_from_memory::<AggregatedCitedGraph>(
                ResearchScope::RESEARCH,
                ScopedKeys::KNOWLEDGE_GRAPH,
            )
            .await
        {
            material.push_str(&format!(
                "### 关系图谱摘要\n实体 {} 个，关系 {} 条\n",
                graph.entities.len(),
                graph.relationships.len()
            ));
            for relationship in &graph.relationships {
                material.push_str(&format!(
                    "- {} -[{}]-> {}（置信度 {}/5）\n",
                    relationship.source.name,
                    relationship.relationship_type.as_str(),
                    relationship.target.name,
                    relationship.relationship_confidence
                ));
            }
        }

        Ok(material)
    }
}
