use crate::pipeline::context::ResearchContext;
use serde_json::Value;

pub struct MemoryScope;

impl MemoryScope {
    pub const RESEARCH: &'static str = "company_research";
}

pub struct ScopedKeys;

impl ScopedKeys {
    pub const COMPANY_PROFILE: &'static str = "company_profile";
    pub const KNOWLEDGE_GRAPH: &'static str = "knowledge_graph";
}

pub trait ResearchMemory {
    async fn store_research(&self, key: &str, result: Value) -> anyhow::Result<()>;

    async fn get_research(&self, key: &str) -> Option<Value>;
}

impl ResearchMemory for ResearchContext {
    /// 存储调研结果
    async fn store_research(&self, key: &str, result: Value) -> anyhow::Result<()> {
        self.store_to_memory(MemoryScope::RESEARCH, key, result).await
    }

    /// 获取调研结果
    async fn get_research(&self, key: &str) -> Option<Value> {
        self.get_from_memory(MemoryScope::RESEARCH, key).await
    }
}
