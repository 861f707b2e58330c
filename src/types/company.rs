use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// 公司画像调研结果
#[derive(Debug, Serialize, Deserialize, Clone, JsonSchema, Default)]
pub struct CompanyProfile {
    /// 公司正式名称
    pub name: String,

    /// 官网地址
    #[serde(default)]
    pub website: String,

    /// 所属行业
    #[serde(default)]
    pub industry: String,

    /// 一句话定位
    #[serde(default)]
    pub tagline: String,

    /// 公司简介
    #[serde(default)]
    pub description: String,

    /// 总部所在地
    #[serde(default)]
    pub headquarters: String,

    /// 成立时间（如可确定）
    #[serde(default)]
    pub founded: String,

    /// 主要产品或服务
    #[serde(default)]
    pub products: Vec<String>,

    /// 关键人物（创始人、高管等）
    #[serde(default)]
    pub key_people: Vec<String>,
}
