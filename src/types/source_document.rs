use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 采集到的单个资料文档（一个网页对应一条）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceDocument {
    /// 文档唯一标识
    pub id: Uuid,

    /// 来源URL
    pub url: String,

    /// 页面标题
    pub title: Option<String>,

    /// 清洗后的正文文本
    pub text: String,
}

impl SourceDocument {
    pub fn new(url: String, title: Option<String>, text: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            url,
            title,
            text,
        }
    }
}
