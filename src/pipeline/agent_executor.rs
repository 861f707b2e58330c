use anyhow::Result;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::pipeline::context::ResearchContext;

/// 一次LLM调用的标准参数
pub struct AgentExecuteParams {
    /// 系统提示词
    pub prompt_sys: String,
    /// 用户提示词
    pub prompt_user: String,
    /// 缓存作用域（对应缓存目录下的分类）
    pub cache_scope: String,
    /// 日志标签
    pub log_tag: String,
}

/// 带缓存的结构化提取调用
///
/// 缓存键为系统与用户提示词拼接后的哈希；
/// `force_regenerate`只绕过读取，结果仍会写入缓存。
pub async fn extract<T>(context: &ResearchContext, params: AgentExecuteParams) -> Result<T>
where
    T: JsonSchema + for<'a> Deserialize<'a> + Serialize + Send + Sync + 'static,
{
    let cache_key = format!("{}\n---\n{}", params.prompt_sys, params.prompt_user);

    if !context.config.force_regenerate {
        let cache = context.cache_manager.read().await;
        if let Some(cached) = cache.get::<T>(&params.cache_scope, &cache_key).await? {
            if context.config.verbose {
                println!("   💾 [{}] 命中缓存", params.log_tag);
            }
            return Ok(cached);
        }
    }

    if context.config.verbose {
        println!("   🤖 [{}] 调用模型...", params.log_tag);
    }

    let result: T = context
        .llm_client
        .extract(&params.prompt_sys, &params.prompt_user)
        .await?;

    let cache = context.cache_manager.read().await;
    if let Err(e) = cache.set(&params.cache_scope, &cache_key, &result).await {
        eprintln!("⚠️ [{}] 缓存写入失败: {}", params.log_tag, e);
    }

    Ok(result)
}

/// 带缓存的泛化推理调用
pub async fn prompt(context: &ResearchContext, params: AgentExecuteParams) -> Result<String> {
    let cache_key = format!("{}\n---\n{}", params.prompt_sys, params.prompt_user);

    if !context.config.force_regenerate {
        let cache = context.cache_manager.read().await;
        if let Some(cached) = cache
            .get::<String>(&params.cache_scope, &cache_key)
            .await?
        {
            if context.config.verbose {
                println!("   💾 [{}] 命中缓存", params.log_tag);
            }
            return Ok(cached);
        }
    }

    if context.config.verbose {
        println!("   🤖 [{}] 调用模型...", params.log_tag);
    }

    let result = context
        .llm_client
        .prompt(&params.prompt_sys, &params.prompt_user)
        .await?;

    let cache = context.cache_manager.read().await;
    if let Err(e) = cache.set(&params.cache_scope, &cache_key, &result).await {
        eprintln!("⚠️ [{}] 缓存写入失败: {}", params.log_tag, e);
    }

    Ok(result)
}
