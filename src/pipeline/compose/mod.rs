use anyhow::Result;

use crate::graph::model::AggregatedCitedGraph;
use crate::pipeline::agent::ResearchAgent;
use crate::pipeline::compose::agents::overview_editor::OverviewEditor;
use crate::pipeline::compose::memory::{MemoryScope, SectionKeys};
use crate::pipeline::context::ResearchContext;
use crate::pipeline::research::memory::{MemoryScope as ResearchScope, ScopedKeys};

mod agents;
pub mod graph_section;
pub mod memory;

/// 执行报告生成阶段
///
/// 概览分节由LLM撰写；图谱分节由图谱数据确定性渲染。
/// 缺少对应调研结果的分节跳过并告警，不中断流程。
pub async fn execute(context: &ResearchContext) -> Result<()> {
    println!("\n🤖 执行报告生成流程...");
    println!(
        "📝 目标语言: {}",
        context.config.target_language.display_name()
    );

    // 概览分节
    if context
        .has_memory_data(ResearchScope::RESEARCH, ScopedKeys::COMPANY_PROFILE)
        .await
    {
        OverviewEditor.execute(context).await?;
    } else {
        eprintln!("⚠️ 缺少公司画像调研结果，跳过概览分节");
    }

    // 图谱分节
    if let Some(graph) = context
        .get_from_memory::<AggregatedCitedGraph>(
            ResearchScope::RESEARCH,
            ScopedKeys::KNOWLEDGE_GRAPH,
        )
        .await
    {
        let section = graph_section::render(
            &graph,
            &context.config.get_company_name(),
            &context.config.target_language,
        );
        context
            .store_to_memory(MemoryScope::REPORT, SectionKeys::GRAPH, section)
            .await?;
        println!("✅ 图谱分节渲染完成");
    } else {
        eprintln!("⚠️ 缺少关系图谱调研结果，跳过图谱分节");
    }

    Ok(())
}
