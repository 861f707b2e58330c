use anyhow::Result;
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::pipeline::agent_executor::{AgentExecuteParams, extract, prompt};
use crate::pipeline::context::ResearchContext;

/// LLM调用方式
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AgentCallMode {
    /// 使用extract方法，返回特定要求的结构化数据
    Extract,
    /// 使用prompt方法，返回泛化推理文本
    Prompt,
}

/// 极简研究Agent trait
///
/// 实现方只声明自己的身份、提示词与调研材料来源，
/// 执行、缓存与结果入库由默认实现统一完成。
#[async_trait]
pub trait ResearchAgent: Send + Sync {
    /// Agent的输出类型 - 必须支持JSON序列化
    type Output: JsonSchema + for<'a> Deserialize<'a> + Serialize + Send + Sync + 'static;

    /// Agent类型标识
    fn agent_type(&self) -> String;

    /// 结果存储的Memory作用域
    fn memory_scope(&self) -> String;

    /// LLM调用方式
    fn call_mode(&self) -> AgentCallMode {
        AgentCallMode::Extract
    }

    /// 系统提示词
    fn system_prompt(&self) -> String;

    /// 结尾的强调性指令
    fn closing_instruction(&self) -> String {
        String::new()
    }

    /// 从上下文收集调研材料，构成用户提示词的主体
    async fn gather_material(&self, context: &ResearchContext) -> Result<String>;

    /// 默认实现的execute方法 - 构建prompt、调用模型、结果入库
    async fn execute(&self, context: &ResearchContext) -> Result<Self::Output> {
        let material = self.gather_material(context).await?;

        // 根据配置的目标语言添加语言指令
        let language_instruction = context.config.target_language.prompt_instruction();
        let prompt_sys = format!("{}\n\n{}", self.system_prompt(), language_instruction);
        let prompt_user = format!(
            "## 调研材料参考\n{}\n{}",
            material,
            self.closing_instruction()
        );

        let params = AgentExecuteParams {
            prompt_sys,
            prompt_user,
            cache_scope: format!("{}/{}", self.memory_scope(), self.agent_type()),
            log_tag: self.agent_type(),
        };

        let result_value = match self.call_mode() {
            AgentCallMode::Extract => {
                let result: Self::Output = extract(context, params).await?;
                serde_json::to_value(&result)?
            }
            AgentCallMode::Prompt => {
                let result_text = prompt(context, params).await?;
                serde_json::to_value(&result_text)?
            }
        };

        context
            .store_to_memory(&self.memory_scope(), &self.agent_type(), result_value.clone())
            .await?;

        let typed_result = serde_json::from_value::<Self::Output>(result_value)?;
        println!("✅ Sub-Agent [{}] 执行完成", self.agent_type());
        Ok(typed_result)
    }
}
