use anyhow::Result;
use futures::stream::{self, StreamExt};

use crate::graph::GraphError;
use crate::graph::extractor::RelationshipExtractor;
use crate::graph::model::{
    CitedRelationship, DocumentWithCredibility, Relationship, TripleType,
};
use crate::graph::query::QueryGenerator;
use crate::graph::reasoner::RelationshipReasoner;
use crate::retrieval::{EvidenceRetriever, RetrievedAnswer};

/// 第一阶段产物：一个三元组类型的检索单元
///
/// 每个三元组类型持有独立的单元。两个三元组类型即使生成了
/// 相同的查询串，各自的检索回答也互不覆盖。
struct RetrievalUnit {
    triple_type: TripleType,
    query: String,
    answer: RetrievedAnswer,
}

/// 第二阶段产物：一个（检索单元, 文档）的抽取结果
struct ExtractionUnit<'u> {
    unit: &'u RetrievalUnit,
    doc_index: usize,
    relationships: Vec<Relationship>,
}

/// 并行抽取流水线
///
/// 三个阶段依次执行，阶段内有界并发扇出、阶段间汇合：
/// 下一阶段的工作清单只有在上一阶段完全结束后才可知，不做跨阶段流水。
/// 阶段内结果按完成顺序收集，次序不保证稳定。
pub struct GraphExtractionPipeline<'a> {
    query_generator: &'a dyn QueryGenerator,
    retriever: &'a dyn EvidenceRetriever,
    extractor: RelationshipExtractor<'a>,
    reasoner: RelationshipReasoner<'a>,
    max_parallels: usize,
}

impl<'a> GraphExtractionPipeline<'a> {
    pub fn new(
        query_generator: &'a dyn QueryGenerator,
        retriever: &'a dyn EvidenceRetriever,
        extractor: RelationshipExtractor<'a>,
        reasoner: RelationshipReasoner<'a>,
        max_parallels: usize,
    ) -> Self {
        Self {
            query_generator,
            retriever,
            extractor,
            reasoner,
            max_parallels: max_parallels.max(1),
        }
    }

    /// 对一批三元组类型执行完整的「查询-检索-抽取-论证」流程
    ///
    /// 单元级失败被就地吸收（记录日志后丢弃该单元），不会中断批次；
    /// 只有空的三元组类型列表会向调用方报错。
    pub async fn extract_parallel(
        &self,
        specification: &str,
        triple_types: &[TripleType],
    ) -> Result<Vec<CitedRelationship>> {
        if triple_types.is_empty() {
            return Err(GraphError::EmptyTripleTypes.into());
        }

        println!(
            "🔍 阶段1: 查询生成与证据检索（{} 个关系模式）...",
            triple_types.len()
        );
        let retrievals = self.run_retrieval_phase(specification, triple_types).await;

        let document_count: usize = retrievals
            .iter()
            .map(|unit| unit.answer.documents.len())
            .sum();
        println!(
            "🧪 阶段2: 关系抽取（{} 个查询, {} 份文档）...",
            retrievals.len(),
            document_count
        );
        let extractions = self.run_extraction_phase(&retrievals).await;

        let relationship_count: usize = extractions
            .iter()
            .map(|unit| unit.relationships.len())
            .sum();
        println!("📎 阶段3: 关系论证与溯源组装（{} 条候选）...", relationship_count);
        let cited = self.run_reasoning_phase(&extractions).await;

        Ok(cited)
    }

    /// 阶段1：对每个三元组类型并发地生成查询并检索证据
    ///
    /// 查询生成失败或检索失败都会使该三元组类型整体退出本次批次。
    async fn run_retrieval_phase(
        &self,
        specification: &str,
        triple_types: &[TripleType],
    ) -> Vec<RetrievalUnit> {
        stream::iter(triple_types.iter().map(|triple_type| async move {
            let query = match self
                .query_generator
                .generate(specification, triple_type)
                .await
            {
                Ok(query) if !query.trim().is_empty() => query,
                Ok(_) => {
                    eprintln!(
                        "⚠️ 查询生成结果为空 [{}]，该关系模式退出本次批次",
                        triple_type.describe()
                    );
                    return None;
                }
                Err(e) => {
                    let err = GraphError::QueryGeneration {
                        triple: triple_type.describe(),
                        source: e,
                    };
                    eprintln!("⚠️ {}，该关系模式退出本次批次", err);
                    return None;
                }
            };

            match self.retriever.retrieve(&query).await {
                Ok(answer) => Some(RetrievalUnit {
                    triple_type: *triple_type,
                    query,
                    answer,
                }),
                Err(e) => {
                    let err = GraphError::Retrieval { query, source: e };
                    eprintln!("⚠️ {}，该关系模式退出本次批次", err);
                    None
                }
            }
        }))
        .buffer_unordered(self.max_parallels)
        .filter_map(|unit| async move { unit })
        .collect()
        .await
    }

    /// 阶段2：对每个（查询, 文档）并发执行关系抽取
    ///
    /// 单个文档抽取失败只损失该文档的贡献。
    async fn run_extraction_phase<'u>(
        &self,
        retrievals: &'u [RetrievalUnit],
    ) -> Vec<ExtractionUnit<'u>> {
        let work: Vec<(usize, usize)> = retrievals
            .iter()
            .enumerate()
            .flat_map(|(unit_index, unit)| {
                (0..unit.answer.documents.len()).map(move |doc_index| (unit_index, doc_index))
            })
            .collect();

        stream::iter(work.into_iter().map(|(unit_index, doc_index)| async move {
            let unit = &retrievals[unit_index];
            let document = &unit.answer.documents[doc_index];

            match self
                .extractor
                .extract(&unit.query, document, &unit.triple_type)
                .await
            {
                Ok(relationships) => Some(ExtractionUnit {
                    unit,
                    doc_index,
                    relationships,
                }),
                Err(e) => {
                    eprintln!("⚠️ {}，该文档贡献零关系", e);
                    None
                }
            }
        }))
        .buffer_unordered(self.max_parallels)
        .filter_map(|unit| async move { unit })
        .collect()
        .await
    }

    /// 阶段3：对每个（查询, 文档, 关系）并发论证，并组装完整溯源记录
    async fn run_reasoning_phase(&self, extractions: &[ExtractionUnit<'_>]) -> Vec<CitedRelationship> {
        let work: Vec<(&ExtractionUnit<'_>, &Relationship)> = extractions
            .iter()
            .flat_map(|extraction| {
                extraction
                    .relationships
                    .iter()
                    .map(move |relationship| (extraction, relationship))
            })
            .collect();

        stream::iter(work.into_iter().map(|(extraction, relationship)| async move {
            let unit = extraction.unit;
            let document = &unit.answer.documents[extraction.doc_index];

            let reasoning = self.reasoner.reason(&unit.query, document, relationship).await;

            CitedRelationship {
                relationship: relationship.clone(),
                relationship_reasoning: reasoning,
                relationships_query: unit.query.clone(),
                document: Self::document_with_credibility(&unit.answer, extraction.doc_index),
                answer: unit.answer.clone(),
            }
        }))
        .buffer_unordered(self.max_parallels)
        .collect()
        .await
    }

    /// 将检索回答中第`doc_index`份文档与其引用、信源评估按下标对齐打包
    fn document_with_credibility(
        answer: &RetrievedAnswer,
        doc_index: usize,
    ) -> DocumentWithCredibility {
        DocumentWithCredibility {
            document: answer.documents[doc_index].clone(),
            citation: answer.citations.get(doc_index).cloned(),
            credibility: answer
                .source_credibility
                .get(doc_index)
                .map(|sc| sc.credibility),
            credibility_reasoning: answer
                .source_credibility_reasoning
                .get(doc_index)
                .cloned(),
        }
    }
}
