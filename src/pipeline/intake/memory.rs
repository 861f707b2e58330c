use crate::pipeline::context::ResearchContext;
use crate::types::source_document::SourceDocument;

pub struct MemoryScope;

impl MemoryScope {
    pub const INTAKE: &'static str = "intake";
}

pub struct ScopedKeys;

impl ScopedKeys {
    pub const SOURCE_DOCUMENTS: &'static str = "source_documents";
}

pub trait IntakeMemory {
    async fn store_source_documents(
        &self,
        documents: &[SourceDocument],
    ) -> anyhow::Result<()>;

    async fn get_source_documents(&self) -> Vec<SourceDocument>;
}

impl IntakeMemory for ResearchContext {
    /// 存储采集到的资料文档
    async fn store_source_documents(&self, documents: &[SourceDocument]) -> anyhow::Result<()> {
        self.store_to_memory(MemoryScope::INTAKE, ScopedKeys::SOURCE_DOCUMENTS, documents)
            .await
    }

    /// 获取采集到的资料文档
    async fn get_source_documents(&self) -> Vec<SourceDocument> {
        self.get_from_memory(MemoryScope::INTAKE, ScopedKeys::SOURCE_DOCUMENTS)
            .await
            .unwrap_or_default()
    }
}
