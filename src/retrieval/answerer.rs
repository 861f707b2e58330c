use anyhow::Result;
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::pipeline::agent_executor::{AgentExecuteParams, extract};
use crate::pipeline::context::ResearchContext;
use crate::pipeline::intake::memory::IntakeMemory;
use crate::retrieval::{EvidenceRetriever, RetrievedAnswer, SourceCredibility};
use crate::types::source_document::SourceDocument;

/// LLM回答综合的结构化输出
#[derive(Debug, Serialize, Deserialize, Clone, JsonSchema)]
struct AnswerSynthesis {
    /// 基于证据文档的综合回答
    answer: String,

    /// 回答对证据的忠实度评分（1-5）
    faithfulness: u8,

    /// 回答的事实正确性评分（1-5）
    factual_correctness: u8,

    /// 回答的置信度评分（1-5）
    confidence: u8,

    /// 按证据文档顺序逐一给出的信源评估
    #[serde(default)]
    source_assessments: Vec<SourceAssessment>,
}

/// 单个信源的评估
#[derive(Debug, Serialize, Deserialize, Clone, JsonSchema)]
struct SourceAssessment {
    /// 信源URL
    source: String,

    /// 可信度等级
    credibility: crate::retrieval::CredibilityLevel,

    /// 评估理由
    reasoning: String,
}

/// 基于采集资料的证据检索器
///
/// 用词频重叠从入库资料中选出最相关的top-k文档，
/// 再由LLM综合出带引用和信源可信度评估的回答。
/// 它是外部检索服务在本仓库内的替身，真正的边界是`EvidenceRetriever`接口。
pub struct MemoryEvidenceRetriever {
    context: ResearchContext,
}

impl MemoryEvidenceRetriever {
    pub fn new(context: ResearchContext) -> Self {
        Self { context }
    }

    /// 按查询词命中数为文档排序，返回top-k
    fn rank_documents(
        query: &str,
        documents: &[SourceDocument],
        top_k: usize,
    ) -> Vec<SourceDocument> {
        let terms: Vec<String> = query
            .to_lowercase()
            .split_whitespace()
            .map(|term| {
                term.trim_matches(|c: char| !c.is_alphanumeric())
                    .to_string()
            })
            .filter(|term| term.chars().count() > 2)
            .collect();

        if terms.is_empty() {
            return documents.iter().take(top_k).cloned().collect();
        }

        let mut scored: Vec<(usize, &SourceDocument)> = documents
            .iter()
            .map(|doc| {
                let text = doc.text.to_lowercase();
                let hits = terms.iter().filter(|term| text.contains(*term)).count();
                (hits, doc)
            })
            .filter(|(hits, _)| *hits > 0)
            .collect();

        // 稳定排序保持语料顺序作为平局规则
        scored.sort_by(|a, b| b.0.cmp(&a.0));
        scored
            .into_iter()
            .take(top_k)
            .map(|(_, doc)| doc.clone())
            .collect()
    }

    /// 构建回答综合的prompt
    fn build_synthesis_prompts(query: &str, documents: &[SourceDocument]) -> (String, String) {
        let prompt_sys = "你是一个严谨的企业调研助理。你只依据给定的证据文档回答问题，不编造任何文档之外的信息。回答需给出对证据的忠实度、事实正确性、置信度评分（1-5），并按文档顺序逐一评估各信源的可信度。".to_string();

        let mut materials = String::new();
        for (i, doc) in documents.iter().enumerate() {
            materials.push_str(&format!(
                "### 证据文档{}\n来源: {}\n{}\n\n",
                i + 1,
                doc.url,
                doc.text
            ));
        }

        let prompt_user = format!(
            "请基于以下证据文档回答调研问题。

## 调研问题
{}

## 证据文档
{}

## 回答要求
- 回答只能基于证据文档内容
- source_assessments必须与证据文档顺序一致，每个文档一条
- 可信度等级：官方信息源为High，权威媒体为Medium，不可考来源为Low",
            query, materials
        );

        (prompt_sys, prompt_user)
    }
}

#[async_trait]
impl EvidenceRetriever for MemoryEvidenceRetriever {
    async fn retrieve(&self, query: &str) -> Result<RetrievedAnswer> {
        let documents: Vec<SourceDocument> = self.context.get_source_documents().await;

        let top_k = self.context.config.research.documents_per_query;
        let selected = Self::rank_documents(query, &documents, top_k);

        // 未命中任何资料时返回空回答而不是报错
        if selected.is_empty() {
            return Ok(RetrievedAnswer::empty(query));
        }

        let (prompt_sys, prompt_user) = Self::build_synthesis_prompts(query, &selected);
        let params = AgentExecuteParams {
            prompt_sys,
            prompt_user,
            cache_scope: "retrieval_answer".to_string(),
            log_tag: "证据检索".to_string(),
        };

        let synthesis: AnswerSynthesis = extract(&self.context, params).await?;

        // 信源评估与所选文档按下标对齐，数量不符时以文档为准
        let source_credibility = selected
            .iter()
            .enumerate()
            .map(|(i, doc)| {
                let assessment = synthesis.source_assessments.get(i);
                SourceCredibility {
                    source: assessment
                        .map(|a| a.source.clone())
                        .filter(|s| !s.trim().is_empty())
                        .unwrap_or_else(|| doc.url.clone()),
                    credibility: assessment
                        .map(|a| a.credibility)
                        .unwrap_or(crate::retrieval::CredibilityLevel::Medium),
                }
            })
            .collect();
        let source_credibility_reasoning = selected
            .iter()
            .enumerate()
            .map(|(i, _)| {
                synthesis
                    .source_assessments
                    .get(i)
                    .map(|a| a.reasoning.clone())
                    .unwrap_or_default()
            })
            .collect();

        Ok(RetrievedAnswer {
            question: query.to_string(),
            answer: synthesis.answer,
            documents: selected.iter().map(|doc| doc.text.clone()).collect(),
            citations: selected.iter().map(|doc| doc.url.clone()).collect(),
            faithfulness: synthesis.faithfulness.clamp(1, 5),
            factual_correctness: synthesis.factual_correctness.clamp(1, 5),
            confidence: synthesis.confidence.clamp(1, 5),
            source_credibility,
            source_credibility_reasoning,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(url: &str, text: &str) -> SourceDocument {
        SourceDocument::new(url.to_string(), None, text.to_string())
    }

    #[test]
    fn test_rank_documents_prefers_term_hits() {
        let documents = vec![
            doc("https://a.com", "nothing relevant here"),
            doc("https://b.com", "acme subsidiaries include foo and bar"),
            doc("https://c.com", "acme was founded by jane"),
        ];

        let ranked = MemoryEvidenceRetriever::rank_documents(
            "Which companies are subsidiaries of Acme?",
            &documents,
            2,
        );

        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].url, "https://b.com");
    }

    #[test]
    fn test_rank_documents_drops_zero_hit_documents() {
        let documents = vec![doc("https://a.com", "totally unrelated text")];

        let ranked =
            MemoryEvidenceRetriever::rank_documents("acme founders", &documents, 4);
        assert!(ranked.is_empty());
    }

    #[test]
    fn test_rank_documents_empty_query_falls_back_to_corpus_order() {
        let documents = vec![
            doc("https://a.com", "first"),
            doc("https://b.com", "second"),
        ];

        let ranked = MemoryEvidenceRetriever::rank_documents("是 的", &documents, 1);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].url, "https://a.com");
    }
}
