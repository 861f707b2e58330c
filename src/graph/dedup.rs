use std::collections::HashMap;
use std::collections::hash_map::Entry;

use crate::graph::model::{
    AggregatedCitedEntity, AggregatedCitedGraph, AggregatedCitedRelationship, CitedRelationship,
    DocumentWithCredibility, EntityType, Relationship, RelationshipType,
};

/// 关系的标准化分组键
///
/// 键相同的两条候选被视为同一真实关系——无论它们来自哪个查询、
/// 哪份文档，评分与论证是否一致。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct GroupKey {
    source_type: EntityType,
    source_name: String,
    relationship_type: RelationshipType,
    target_type: EntityType,
    target_name: String,
}

impl GroupKey {
    fn of(relationship: &Relationship) -> Self {
        Self {
            source_type: relationship.source.entity_type,
            source_name: relationship.source.normalized_name(),
            relationship_type: relationship.relationship_type,
            target_type: relationship.target.entity_type,
            target_name: relationship.target.normalized_name(),
        }
    }
}

/// 将候选关系去重聚合为一致的关系图谱
///
/// - 分组：O(n)哈希分组，保留键的首见顺序与组内的输入顺序
/// - 代表候选：组内首个成员，其论证、评分与查询原样进入聚合边，不做平均
/// - 聚合边证据：组内全部成员证据文档的按序拼接（每个成员恰好贡献一份）
/// - 实体注册：按标准化名称首见注册，展示名称取首见候选的原始大小写；
///   实体证据为「首次发现该实体的分组」的完整文档列表，之后出现在
///   其他分组中也不再追加
///
/// 输入顺序决定代表候选的归属；输入本身来自并行收集、次序不稳定，
/// 调用方需要稳定结果时应先自行排序。
pub fn create_deduplicated_graph(candidates: &[CitedRelationship]) -> AggregatedCitedGraph {
    let mut groups: HashMap<GroupKey, Vec<usize>> = HashMap::new();
    let mut key_order: Vec<GroupKey> = Vec::new();

    for (index, candidate) in candidates.iter().enumerate() {
        let key = GroupKey::of(&candidate.relationship);
        match groups.entry(key.clone()) {
            Entry::Occupied(mut occupied) => occupied.get_mut().push(index),
            Entry::Vacant(vacant) => {
                vacant.insert(vec![index]);
                key_order.push(key);
            }
        }
    }

    let mut entities: Vec<AggregatedCitedEntity> = Vec::new();
    let mut registered: HashMap<String, usize> = HashMap::new();
    let mut relationships: Vec<AggregatedCitedRelationship> = Vec::new();

    for key in &key_order {
        let members = &groups[key];
        let representative = &candidates[members[0]];

        let documents: Vec<DocumentWithCredibility> = members
            .iter()
            .map(|&index| candidates[index].document.clone())
            .collect();

        relationships.push(AggregatedCitedRelationship {
            source: representative.relationship.source.clone(),
            target: representative.relationship.target.clone(),
            relationship_type: representative.relationship.relationship_type,
            relationship_reasoning: representative.relationship_reasoning.clone(),
            relationship_faithfulness: representative.relationship.faithfulness,
            relationship_factual_correctness: representative.relationship.factual_correctness,
            relationship_confidence: representative.relationship.confidence,
            relationships_query: representative.relationships_query.clone(),
            documents: documents.clone(),
        });

        for &index in members {
            let relationship = &candidates[index].relationship;
            for entity in [&relationship.source, &relationship.target] {
                let normalized = entity.normalized_name();
                if let Entry::Vacant(vacant) = registered.entry(normalized) {
                    vacant.insert(entities.len());
                    entities.push(AggregatedCitedEntity {
                        entity: entity.clone(),
                        documents: documents.clone(),
                    });
                }
            }
        }
    }

    // 不变式：每条聚合边引用的实体都已按标准化身份注册
    debug_assert!(relationships.iter().all(|relationship| {
        registered.contains_key(&relationship.source.normalized_name())
            && registered.contains_key(&relationship.target.normalized_name())
    }));

    AggregatedCitedGraph {
        entities,
        relationships,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::model::Entity;
    use crate::retrieval::RetrievedAnswer;

    fn document(text: &str) -> DocumentWithCredibility {
        DocumentWithCredibility {
            document: text.to_string(),
            citation: Some(format!("https://example.com/{}", text)),
            credibility: None,
            credibility_reasoning: None,
        }
    }

    fn cited(
        source: &str,
        relationship_type: RelationshipType,
        target: &str,
        target_type: EntityType,
        doc: &str,
        reasoning: &str,
        confidence: u8,
    ) -> CitedRelationship {
        CitedRelationship {
            relationship: Relationship {
                source: Entity::new(EntityType::Company, source),
                target: Entity::new(target_type, target),
                relationship_type,
                faithfulness: 4,
                factual_correctness: 4,
                confidence,
            },
            relationship_reasoning: reasoning.to_string(),
            relationships_query: format!("query-{}", relationship_type.as_str()),
            document: document(doc),
            answer: RetrievedAnswer::empty("q"),
        }
    }

    fn employee(source: &str, target: &str, doc: &str) -> CitedRelationship {
        cited(
            source,
            RelationshipType::Employee,
            target,
            EntityType::Person,
            doc,
            "reasoning",
            4,
        )
    }

    #[test]
    fn test_empty_input_yields_empty_graph() {
        let graph = create_deduplicated_graph(&[]);
        assert!(graph.is_empty());
        assert!(graph.entities.is_empty());
    }

    #[test]
    fn test_grouping_ignores_case_and_whitespace() {
        let candidates = vec![
            employee("Acme Corp", "John Doe", "d1"),
            employee("acme corp ", "john doe", "d2"),
        ];

        let graph = create_deduplicated_graph(&candidates);

        assert_eq!(graph.relationships.len(), 1);
        assert_eq!(graph.relationships[0].documents.len(), 2);
    }

    #[test]
    fn test_scenario_case_differing_duplicates() {
        // (COMPANY:"Acme", EMPLOYEE, PERSON:"John Doe") 来自 D1
        // (COMPANY:"acme", EMPLOYEE, PERSON:"john doe") 来自 D2
        let candidates = vec![
            employee("Acme", "John Doe", "D1"),
            employee("acme", "john doe", "D2"),
        ];

        let graph = create_deduplicated_graph(&candidates);

        assert_eq!(graph.relationships.len(), 1);
        let relationship = &graph.relationships[0];
        let cited_docs: Vec<&str> = relationship
            .documents
            .iter()
            .map(|d| d.document.as_str())
            .collect();
        assert_eq!(cited_docs, vec!["D1", "D2"]);

        // 恰好2个实体，展示名称取首个候选的大小写
        assert_eq!(graph.entities.len(), 2);
        assert_eq!(graph.entities[0].entity.name, "Acme");
        assert_eq!(graph.entities[1].entity.name, "John Doe");
    }

    #[test]
    fn test_representative_is_first_in_input_order() {
        let candidates = vec![
            cited(
                "Acme",
                RelationshipType::Employee,
                "John Doe",
                EntityType::Person,
                "dA",
                "reasoning A",
                5,
            ),
            cited(
                "acme",
                RelationshipType::Employee,
                "JOHN DOE",
                EntityType::Person,
                "dB",
                "reasoning B",
                2,
            ),
            cited(
                "ACME",
                RelationshipType::Employee,
                "john doe",
                EntityType::Person,
                "dC",
                "reasoning C",
                1,
            ),
        ];

        let graph = create_deduplicated_graph(&candidates);

        assert_eq!(graph.relationships.len(), 1);
        let relationship = &graph.relationships[0];
        assert_eq!(relationship.relationship_reasoning, "reasoning A");
        assert_eq!(relationship.relationship_confidence, 5);
        assert_eq!(relationship.source.name, "Acme");
        assert_eq!(relationship.documents.len(), 3);
    }

    #[test]
    fn test_entity_names_are_unique() {
        let candidates = vec![
            employee("Acme", "John Doe", "d1"),
            employee("ACME", "Jane Roe", "d2"),
            cited(
                "acme",
                RelationshipType::Founder,
                "Jane Roe",
                EntityType::Person,
                "d3",
                "r",
                3,
            ),
        ];

        let graph = create_deduplicated_graph(&candidates);

        let mut names: Vec<&str> = graph
            .entities
            .iter()
            .map(|e| e.entity.name.as_str())
            .collect();
        let total = names.len();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), total);

        // 标准化后相同的名称只注册一次
        assert_eq!(graph.entities.len(), 3);
    }

    #[test]
    fn test_distinct_relationship_types_do_not_merge() {
        let candidates = vec![
            employee("Acme", "John Doe", "d1"),
            cited(
                "Acme",
                RelationshipType::Founder,
                "John Doe",
                EntityType::Person,
                "d2",
                "r",
                3,
            ),
        ];

        let graph = create_deduplicated_graph(&candidates);
        assert_eq!(graph.relationships.len(), 2);
    }

    #[test]
    fn test_entity_keeps_documents_of_first_discovery_group() {
        // Acme先出现在employee组（证据d1、d2），再出现在founder组（证据d3）：
        // 实体证据保持首次发现分组的文档列表，不再追加
        let candidates = vec![
            employee("Acme", "John Doe", "d1"),
            employee("acme", "john doe", "d2"),
            cited(
                "Acme",
                RelationshipType::Founder,
                "Jane Roe",
                EntityType::Person,
                "d3",
                "r",
                3,
            ),
        ];

        let graph = create_deduplicated_graph(&candidates);

        let acme = graph
            .entities
            .iter()
            .find(|e| e.entity.normalized_name() == "acme")
            .unwrap();
        let acme_docs: Vec<&str> = acme.documents.iter().map(|d| d.document.as_str()).collect();
        assert_eq!(acme_docs, vec!["d1", "d2"]);

        // 后发现的实体取其自身分组的证据
        let jane = graph
            .entities
            .iter()
            .find(|e| e.entity.normalized_name() == "jane roe")
            .unwrap();
        let jane_docs: Vec<&str> = jane.documents.iter().map(|d| d.document.as_str()).collect();
        assert_eq!(jane_docs, vec!["d3"]);
    }

    #[test]
    fn test_dedup_is_idempotent() {
        let candidates = vec![
            employee("Acme", "John Doe", "d1"),
            employee("acme", "john doe", "d2"),
            cited(
                "Acme",
                RelationshipType::Founder,
                "Jane Roe",
                EntityType::Person,
                "d3",
                "r",
                3,
            ),
        ];

        let first = create_deduplicated_graph(&candidates);

        // 将聚合结果还原为候选形态（每组一条，保留代表字段与首份证据）
        let as_candidates: Vec<CitedRelationship> = first
            .relationships
            .iter()
            .map(|relationship| CitedRelationship {
                relationship: Relationship {
                    source: relationship.source.clone(),
                    target: relationship.target.clone(),
                    relationship_type: relationship.relationship_type,
                    faithfulness: relationship.relationship_faithfulness,
                    factual_correctness: relationship.relationship_factual_correctness,
                    confidence: relationship.relationship_confidence,
                },
                relationship_reasoning: relationship.relationship_reasoning.clone(),
                relationships_query: relationship.relationships_query.clone(),
                document: relationship.documents[0].clone(),
                answer: RetrievedAnswer::empty("q"),
            })
            .collect();

        let second = create_deduplicated_graph(&as_candidates);

        // 不再发生任何合并
        assert_eq!(second.relationships.len(), first.relationships.len());
        assert_eq!(second.entities.len(), first.entities.len());
        for (a, b) in first.relationships.iter().zip(second.relationships.iter()) {
            assert_eq!(a.source.name, b.source.name);
            assert_eq!(a.target.name, b.target.name);
            assert_eq!(a.relationship_type, b.relationship_type);
            assert_eq!(a.relationship_reasoning, b.relationship_reasoning);
            assert_eq!(a.relationship_confidence, b.relationship_confidence);
        }
    }
}
