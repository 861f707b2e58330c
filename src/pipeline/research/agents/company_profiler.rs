use anyhow::Result;
use async_trait::async_trait;

use crate::pipeline::agent::ResearchAgent;
use crate::pipeline::context::ResearchContext;
use crate::pipeline::intake::memory::IntakeMemory;
use crate::pipeline::research::memory::{MemoryScope, ScopedKeys};
use crate::types::company::CompanyProfile;
use crate::utils::text::truncate_chars;

/// 公司画像调研员 - 从采集资料中提取公司的基本面信息
#[derive(Default)]
pub struct CompanyProfiler;

/// 汇入画像prompt的单份资料长度上限
const MATERIAL_CHARS_PER_DOCUMENT: usize = 6000;

#[async_trait]
impl ResearchAgent for CompanyProfiler {
    type Output = CompanyProfile;

    fn agent_type(&self) -> String {
        ScopedKeys::COMPANY_PROFILE.to_string()
    }

    fn memory_scope(&self) -> String {
        MemoryScope::RESEARCH.to_string()
    }

    fn system_prompt(&self) -> String {
        r#"你是一个专业的企业情报分析师，专注于公司基本面画像。

你的任务是基于提供的公开网页资料，提取并确定：
1. 公司的正式名称与官网
2. 所属行业与一句话定位
3. 公司简介、总部所在地、成立时间
4. 主要产品或服务
5. 关键人物（创始人、高管等）

资料中没有的信息留空，不要推测。请以结构化的JSON格式返回分析结果。"#
            .to_string()
    }

    fn closing_instruction(&self) -> String {
        r#"
## 分析要求：
- 只使用资料中明确出现的信息
- 名称、人名保留资料中的原始写法"#
            .to_string()
    }

    async fn gather_material(&self, context: &ResearchContext) -> Result<String> {
        let documents = context.get_source_documents().await;

        let mut material = format!(
            "### 调研对象\n公司: {}\n官网: {}\n\n",
            context.config.get_company_name(),
            context.config.normalized_company_url()
        );

        for (i, document) in documents.iter().enumerate() {
            material.push_str(&format!(
                "### 资料{} 来源: {}\n{}\n\n",
                i + 1,
                document.url,
                truncate_chars(&document.text, MATERIAL_CHARS_PER_DOCUMENT)
            ));
        }

        Ok(material)
    }
}
