use serde::{Deserialize, Serialize};

use crate::retrieval::{CredibilityLevel, RetrievedAnswer};

/// 实体类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityType {
    /// 人物
    Person,
    /// 公司
    Company,
    /// 地点
    Location,
    /// 产品
    Product,
}

impl EntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Person => "person",
            EntityType::Company => "company",
            EntityType::Location => "location",
            EntityType::Product => "product",
        }
    }
}

/// 关系类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelationshipType {
    /// 雇佣（公司 -> 人物）
    Employee,
    /// 创立（公司 -> 人物）
    Founder,
    /// 子公司（公司 -> 公司）
    Subsidiary,
    /// 母公司（公司 -> 公司）
    ParentCompany,
    /// 收购（公司 -> 公司）
    Acquired,
    /// 投资方（公司 -> 公司）
    Investor,
    /// 竞争对手（公司 -> 公司）
    Competitor,
    /// 合作伙伴（公司 -> 公司）
    Partner,
    /// 所在地（公司 -> 地点）
    LocatedIn,
    /// 提供的产品（公司 -> 产品）
    Offers,
}

impl RelationshipType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationshipType::Employee => "employee",
            RelationshipType::Founder => "founder",
            RelationshipType::Subsidiary => "subsidiary",
            RelationshipType::ParentCompany => "parent_company",
            RelationshipType::Acquired => "acquired",
            RelationshipType::Investor => "investor",
            RelationshipType::Competitor => "competitor",
            RelationshipType::Partner => "partner",
            RelationshipType::LocatedIn => "located_in",
            RelationshipType::Offers => "offers",
        }
    }

    /// 该关系类型的调研语义说明，用于构建检索与抽取的prompt
    pub fn query_hint(&self) -> &'static str {
        match self {
            RelationshipType::Employee => "公司雇佣了哪些员工或高管",
            RelationshipType::Founder => "公司由哪些人创立",
            RelationshipType::Subsidiary => "公司拥有哪些子公司",
            RelationshipType::ParentCompany => "公司的母公司或控股方是谁",
            RelationshipType::Acquired => "公司收购了哪些公司",
            RelationshipType::Investor => "哪些机构投资了公司，或公司投资了谁",
            RelationshipType::Competitor => "公司的竞争对手有哪些",
            RelationshipType::Partner => "公司与哪些公司建立了合作关系",
            RelationshipType::LocatedIn => "公司的总部或主要办公地在哪里",
            RelationshipType::Offers => "公司提供哪些产品或服务",
        }
    }
}

/// 实体：类型 + 名称
///
/// 名称保留原始大小写用于展示；身份比较时按小写并去除首尾空白。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Entity {
    pub entity_type: EntityType,
    pub name: String,
}

impl Entity {
    pub fn new(entity_type: EntityType, name: impl Into<String>) -> Self {
        Self {
            entity_type,
            name: name.into(),
        }
    }

    /// 身份比较用的标准化名称
    pub fn normalized_name(&self) -> String {
        self.name.trim().to_lowercase()
    }

    /// 两个实体是否为同一实体（类型相同且标准化名称相同）
    pub fn is_same(&self, other: &Entity) -> bool {
        self.entity_type == other.entity_type && self.normalized_name() == other.normalized_name()
    }
}

/// 候选关系（未聚合形态）
///
/// 三项评分均由抽取步骤独立给出，取值范围[1,5]。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Relationship {
    pub source: Entity,
    pub target: Entity,
    pub relationship_type: RelationshipType,
    pub faithfulness: u8,
    pub factual_correctness: u8,
    pub confidence: u8,
}

/// 三元组类型：抽取的文法约束
///
/// 「寻找`source`类型实体对`target`类型实体的`relationship_type`关系」。
/// 在抽取开始前由调用方构造，之后不可变。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripleType {
    pub source: EntityType,
    pub relationship_type: RelationshipType,
    pub target: EntityType,
}

impl TripleType {
    pub fn new(
        source: EntityType,
        relationship_type: RelationshipType,
        target: EntityType,
    ) -> Self {
        Self {
            source,
            relationship_type,
            target,
        }
    }

    /// 简洁的模式描述，用于日志
    pub fn describe(&self) -> String {
        format!(
            "{} -[{}]-> {}",
            self.source.as_str(),
            self.relationship_type.as_str(),
            self.target.as_str()
        )
    }
}

/// 公司调研的默认三元组类型目录
pub fn default_triple_types() -> Vec<TripleType> {
    use EntityType::*;
    use RelationshipType::*;

    vec![
        TripleType::new(Company, Employee, Person),
        TripleType::new(Company, Founder, Person),
        TripleType::new(Company, Subsidiary, Company),
        TripleType::new(Company, ParentCompany, Company),
        TripleType::new(Company, Acquired, Company),
        TripleType::new(Company, Investor, Company),
        TripleType::new(Company, Competitor, Company),
        TripleType::new(Company, Partner, Company),
        TripleType::new(Company, LocatedIn, Location),
        TripleType::new(Company, Offers, Product),
    ]
}

/// 单份证据文档及其信源可信度
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DocumentWithCredibility {
    /// 文档正文
    pub document: String,

    /// 引用来源（URL）
    pub citation: Option<String>,

    /// 信源可信度等级
    pub credibility: Option<CredibilityLevel>,

    /// 可信度评估理由
    pub credibility_reasoning: Option<String>,
}

/// 带完整溯源的候选关系（去重前形态）
///
/// 每个（三元组类型, 文档, 抽取出的关系）组合对应一条记录——
/// 同一真实关系在去重前可能出现多次。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CitedRelationship {
    /// 关系本体（含关系级评分）
    pub relationship: Relationship,

    /// 关系成立与否的推理说明
    pub relationship_reasoning: String,

    /// 检索该证据文档时使用的查询
    pub relationships_query: String,

    /// 该关系抽取自的唯一证据文档
    pub document: DocumentWithCredibility,

    /// 从检索步骤继承的完整回答溯源包
    /// （回答级评分独立于关系级评分）
    pub answer: RetrievedAnswer,
}

/// 聚合后的实体及其证据文档
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregatedCitedEntity {
    pub entity: Entity,
    pub documents: Vec<DocumentWithCredibility>,
}

/// 聚合后的关系边
///
/// 推理说明与各评分取自代表候选（分组内首个成员），不做平均；
/// `documents`为组内全部成员证据文档的按序拼接。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregatedCitedRelationship {
    pub source: Entity,
    pub target: Entity,
    pub relationship_type: RelationshipType,
    pub relationship_reasoning: String,
    pub relationship_faithfulness: u8,
    pub relationship_factual_correctness: u8,
    pub relationship_confidence: u8,
    pub relationships_query: String,
    pub documents: Vec<DocumentWithCredibility>,
}

/// 去重聚合后的关系图谱
///
/// 不变式：任何关系边引用的实体（按标准化身份）在`entities`中恰好出现一次。
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AggregatedCitedGraph {
    pub entities: Vec<AggregatedCitedEntity>,
    pub relationships: Vec<AggregatedCitedRelationship>,
}

impl AggregatedCitedGraph {
    pub fn is_empty(&self) -> bool {
        self.relationships.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_identity_ignores_case_and_whitespace() {
        let a = Entity::new(EntityType::Company, "Acme Corp");
        let b = Entity::new(EntityType::Company, "  acme corp ");
        let c = Entity::new(EntityType::Person, "Acme Corp");

        assert!(a.is_same(&b));
        assert!(!a.is_same(&c));
    }

    #[test]
    fn test_normalized_name() {
        let entity = Entity::new(EntityType::Person, " John Doe ");
        assert_eq!(entity.normalized_name(), "john doe");
        // 展示名称保留原始大小写
        assert_eq!(entity.name, " John Doe ");
    }

    #[test]
    fn test_triple_type_describe() {
        let triple = TripleType::new(
            EntityType::Company,
            RelationshipType::Employee,
            EntityType::Person,
        );
        assert_eq!(triple.describe(), "company -[employee]-> person");
    }

    #[test]
    fn test_default_triple_types_catalog() {
        let catalog = default_triple_types();

        assert!(!catalog.is_empty());
        // 目录内模式唯一
        for (i, a) in catalog.iter().enumerate() {
            for b in catalog.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
        // 公司调研目录的源实体均为公司
        assert!(catalog.iter().all(|t| t.source == EntityType::Company));
    }
}
