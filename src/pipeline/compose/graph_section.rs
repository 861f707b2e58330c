use std::collections::HashMap;

use crate::graph::model::AggregatedCitedGraph;
use crate::i18n::TargetLanguage;

/// 将关系图谱渲染为报告分节（mermaid图 + 实体表 + 证据明细）
///
/// 纯文本组装，不经过LLM，保证图谱数据与报告严格一致。
pub fn render(
    graph: &AggregatedCitedGraph,
    company_name: &str,
    target_language: &TargetLanguage,
) -> String {
    let labels = SectionLabels::for_language(target_language);
    let mut section = format!("# {} - {}\n\n", company_name, labels.title);

    if graph.is_empty() {
        section.push_str(labels.empty_notice);
        section.push('\n');
        return section;
    }

    // mermaid关系图
    section.push_str(&format!("## {}\n\n", labels.diagram));
    section.push_str("```mermaid\nflowchart LR\n");
    let node_ids = node_ids_by_normalized_name(graph);
    for entity in &graph.entities {
        if let Some(id) = node_ids.get(&entity.entity.normalized_name()) {
            section.push_str(&format!(
                "    {}[\"{}\"]\n",
                id,
                mermaid_escape(&entity.entity.name)
            ));
        }
    }
    for relationship in &graph.relationships {
        let (Some(source_id), Some(target_id)) = (
            node_ids.get(&relationship.source.normalized_name()),
            node_ids.get(&relationship.target.normalized_name()),
        ) else {
            continue;
        };
        section.push_str(&format!(
            "    {} -->|{}| {}\n",
            source_id,
            relationship.relationship_type.as_str(),
            target_id
        ));
    }
    section.push_str("```\n\n");

    // 实体清单
    section.push_str(&format!("## {}\n\n", labels.entities));
    section.push_str(&format!(
        "| {} | {} | {} |\n|---|---|---|\n",
        labels.entity_name, labels.entity_type, labels.evidence_count
    ));
    for entity in &graph.entities {
        section.push_str(&format!(
            "| {} | {} | {} |\n",
            entity.entity.name,
            entity.entity.entity_type.as_str(),
            entity.documents.len()
        ));
    }
    section.push('\n');

    // 关系与证据明细
    section.push_str(&format!("## {}\n\n", labels.relationships));
    for relationship in &graph.relationships {
        section.push_str(&format!(
            "### {} -[{}]-> {}\n\n",
            relationship.source.name,
            relationship.relationship_type.as_str(),
            relationship.target.name
        ));
        section.push_str(&format!(
            "- {}: {}/5 · {}: {}/5 · {}: {}/5\n",
            labels.faithfulness,
            relationship.relationship_faithfulness,
            labels.factual_correctness,
            relationship.relationship_factual_correctness,
            labels.confidence,
            relationship.relationship_confidence
        ));
        if !relationship.relationship_reasoning.trim().is_empty() {
            section.push_str(&format!(
                "\n> {}\n",
                relationship.relationship_reasoning.trim().replace('\n', "\n> ")
            ));
        }
        let citations: Vec<String> = relationship
            .documents
            .iter()
            .filter_map(|document| document.citation.clone())
            .collect();
        if !citations.is_empty() {
            section.push_str(&format!("\n{}:\n", labels.citations));
            for citation in citations {
                section.push_str(&format!("- <{}>\n", citation));
            }
        }
        section.push('\n');
    }

    section
}

/// 为每个实体分配稳定的mermaid节点id
fn node_ids_by_normalized_name(graph: &AggregatedCitedGraph) -> HashMap<String, String> {
    graph
        .entities
        .iter()
        .enumerate()
        .map(|(index, entity)| (entity.entity.normalized_name(), format!("E{}", index)))
        .collect()
}

/// 清理会破坏mermaid语法的字符
fn mermaid_escape(name: &str) -> String {
    name.replace('"', "'")
        .replace('[', "(")
        .replace(']', ")")
        .replace('|', "/")
}

struct SectionLabels {
    title: &'static str,
    empty_notice: &'static str,
    diagram: &'static str,
    entities: &'static str,
    entity_name: &'static str,
    entity_type: &'static str,
    evidence_count: &'static str,
    relationships: &'static str,
    faithfulness: &'static str,
    factual_correctness: &'static str,
    confidence: &'static str,
    citations: &'static str,
}

impl SectionLabels {
    fn for_language(target_language: &TargetLanguage) -> Self {
        match target_language {
            TargetLanguage::Chinese => Self {
                title: "关系图谱",
                empty_notice: "本次调研未能确认任何实体关系，证据不足。",
                diagram: "关系图",
                entities: "实体清单",
                entity_name: "名称",
                entity_type: "类型",
                evidence_count: "证据数",
                relationships: "关系与证据",
                faithfulness: "忠实度",
                factual_correctness: "事实正确性",
                confidence: "置信度",
                citations: "引用",
            },
            _ => Self {
                title: "Relationship Graph",
                empty_notice: "No entity relationships could be confirmed in this run; evidence was inconclusive.",
                diagram: "Diagram",
                entities: "Entities",
                entity_name: "Name",
                entity_type: "Type",
                evidence_count: "Evidence",
                relationships: "Relationships & Evidence",
                faithfulness: "Faithfulness",
                factual_correctness: "Factual correctness",
                confidence: "Confidence",
                citations: "Citations",
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::model::{
        AggregatedCitedEntity, AggregatedCitedRelationship, DocumentWithCredibility, Entity,
        EntityType, RelationshipType,
    };

    fn sample_graph() -> AggregatedCitedGraph {
        let acme = Entity::new(EntityType::Company, "Acme");
        let john = Entity::new(EntityType::Person, "John Doe");

        AggregatedCitedGraph {
            entities: vec![
                AggregatedCitedEntity {
                    entity: acme.clone(),
                    documents: vec![],
                },
                AggregatedCitedEntity {
                    entity: john.clone(),
                    documents: vec![],
                },
            ],
            relationships: vec![AggregatedCitedRelationship {
                source: acme,
                target: john,
                relationship_type: RelationshipType::Employee,
                relationship_reasoning: "The team page lists John Doe.".to_string(),
                relationship_faithfulness: 5,
                relationship_factual_correctness: 4,
                relationship_confidence: 4,
                relationships_query: "who works at acme?".to_string(),
                documents: vec![DocumentWithCredibility {
                    document: "John Doe is an engineer at Acme.".to_string(),
                    citation: Some("https://acme.com/team".to_string()),
                    credibility: None,
                    credibility_reasoning: None,
                }],
            }],
        }
    }

    #[test]
    fn test_render_contains_mermaid_edge_and_citation() {
        let section = render(&sample_graph(), "Acme", &TargetLanguage::English);

        assert!(section.contains("```mermaid"));
        assert!(section.contains("E0[\"Acme\"]"));
        assert!(section.contains("E0 -->|employee| E1"));
        assert!(section.contains("https://acme.com/team"));
        assert!(section.contains("The team page lists John Doe."));
    }

    #[test]
    fn test_render_empty_graph_mentions_inconclusive_evidence() {
        let graph = AggregatedCitedGraph::default();
        let section = render(&graph, "Acme", &TargetLanguage::English);

        assert!(section.contains("inconclusive"));
        assert!(!section.contains("```mermaid"));
    }

    #[test]
    fn test_mermaid_escape_removes_breaking_characters() {
        assert_eq!(mermaid_escape(r#"Acme "Labs" [EU]"#), "Acme 'Labs' (EU)");
    }
}
