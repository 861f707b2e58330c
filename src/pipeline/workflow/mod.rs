use crate::config::Config;
use crate::pipeline::context::ResearchContext;

use anyhow::Result;

/// 启动公司调研工作流
pub async fn launch(config: &Config) -> Result<()> {
    let started = std::time::Instant::now();
    let context = ResearchContext::new(config.clone())?;

    // 仅当存在需要LLM的阶段时，启动时检查模型连接
    if !(config.skip_research && config.skip_report) {
        context.llm_client.check_connection().await?;
    }

    // 执行工作流
    if !config.skip_intake {
        crate::pipeline::intake::execute(&context).await?;
    }

    if !config.skip_research {
        crate::pipeline::research::execute(&context).await?;
    }

    if !config.skip_report {
        crate::pipeline::compose::execute(&context).await?;
    }

    crate::pipeline::outlet::save(&context).await?;

    if config.verbose {
        let stats = context.get_memory_stats().await;
        println!("📊 内存使用统计（字节）: {:?}", stats);
    }
    println!("🎉 调研完成，总耗时 {:.1} 秒", started.elapsed().as_secs_f64());

    Ok(())
}

// Include tests
#[cfg(test)]
mod tests;
