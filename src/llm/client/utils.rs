use crate::config::LLMConfig;

/// 根据prompt规模选择合适的模型
///
/// 常规规模的任务优先使用高能效模型，并保留高质量模型作为失败兜底；
/// 超长prompt直接使用高质量模型（无兜底）。
pub fn evaluate_befitting_model(
    llm_config: &LLMConfig,
    system_prompt: &str,
    user_prompt: &str,
) -> (String, Option<String>) {
    if system_prompt.len() + user_prompt.len() <= 32 * 1024 {
        return (
            llm_config.model_efficient.clone(),
            Some(llm_config.model_powerful.clone()),
        );
    }
    (llm_config.model_powerful.clone(), None)
}
