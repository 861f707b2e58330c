//! 关系图谱子系统
//!
//! 给定调研对象描述与一组三元组类型，并行完成「查询生成 - 证据检索 -
//! 关系抽取 - 关系论证」，再将候选关系去重聚合为带完整引用的知识图谱。

use anyhow::Result;
use thiserror::Error;

pub mod dedup;
pub mod extractor;
pub mod model;
pub mod pipeline;
pub mod query;
pub mod reasoner;

pub use dedup::create_deduplicated_graph;
pub use model::{
    AggregatedCitedEntity, AggregatedCitedGraph, AggregatedCitedRelationship, CitedRelationship,
    DocumentWithCredibility, Entity, EntityType, Relationship, RelationshipType, TripleType,
    default_triple_types,
};
pub use pipeline::GraphExtractionPipeline;

use crate::pipeline::context::ResearchContext;
use crate::retrieval::EvidenceRetriever;
use extractor::{LlmExtractionBackend, RelationshipExtractor};
use query::LlmQueryGenerator;
use reasoner::{LlmReasoningBackend, RelationshipReasoner};

/// 图谱构建过程中的单元级失败
///
/// 除`EmptyTripleTypes`外，全部在流水线内部就地吸收：
/// 记录日志后丢弃对应单元，批次继续。
#[derive(Debug, Error)]
pub enum GraphError {
    /// 三元组类型列表为空，无法生成任何检索查询
    #[error("三元组类型列表为空，无法生成任何检索查询")]
    EmptyTripleTypes,

    /// 某个三元组类型的查询生成失败
    #[error("查询生成失败 [{triple}]: {source}")]
    QueryGeneration {
        triple: String,
        #[source]
        source: anyhow::Error,
    },

    /// 某个查询的证据检索失败
    #[error("证据检索失败 [{query}]: {source}")]
    Retrieval {
        query: String,
        #[source]
        source: anyhow::Error,
    },

    /// 某个（查询, 文档）的关系抽取失败
    #[error("关系抽取失败 [{query}]: {source}")]
    Extraction {
        query: String,
        #[source]
        source: anyhow::Error,
    },

    /// 某条关系的论证失败
    #[error("关系论证失败 [{relationship}]: {source}")]
    Reasoning {
        relationship: String,
        #[source]
        source: anyhow::Error,
    },
}

/// 对一个调研对象执行完整的图谱研究
///
/// 将LLM后端接入流水线、执行并行抽取，再做去重聚合。
/// 部分失败的批次仍返回尽力而为的图谱；空图谱由调用方解读为「证据不足」。
pub async fn study(
    context: &ResearchContext,
    retriever: &dyn EvidenceRetriever,
    specification: &str,
    triple_types: &[TripleType],
) -> Result<AggregatedCitedGraph> {
    let query_generator = LlmQueryGenerator::new(context.clone());
    let extraction_backend = LlmExtractionBackend::new(context.clone());
    let reasoning_backend = LlmReasoningBackend::new(context.clone());

    let pipeline = GraphExtractionPipeline::new(
        &query_generator,
        retriever,
        RelationshipExtractor::new(&extraction_backend, context.config.verbose),
        RelationshipReasoner::new(&reasoning_backend),
        context.config.llm.max_parallels,
    );

    let candidates = pipeline.extract_parallel(specification, triple_types).await?;

    println!("🧩 候选关系 {} 条，开始去重聚合...", candidates.len());
    let graph = create_deduplicated_graph(&candidates);
    println!(
        "✅ 图谱构建完成: {} 个实体, {} 条关系",
        graph.entities.len(),
        graph.relationships.len()
    );

    Ok(graph)
}
