// 公司深度调研阶段
// A：CompanyProfiler 这家公司是做什么的、基本面画像 = 采集资料
// B：关系图谱研究 公司与人物/公司/地点/产品之间的典型关系 = 采集资料 + 三元组类型目录
//    （查询生成 - 证据检索 - 关系抽取 - 关系论证 - 去重聚合）

use anyhow::Result;

use crate::graph;
use crate::graph::model::default_triple_types;
use crate::pipeline::agent::ResearchAgent;
use crate::pipeline::context::ResearchContext;
use crate::pipeline::research::agents::company_profiler::CompanyProfiler;
use crate::pipeline::research::memory::{MemoryScope, ScopedKeys};
use crate::retrieval::MemoryEvidenceRetriever;

pub mod agents;
pub mod memory;

/// 执行调研阶段
pub async fn execute(context: &ResearchContext) -> Result<()> {
    println!("\n🔬 执行公司调研流程...");

    // 第一步：公司画像
    println!("🤖 执行 CompanyProfiler 画像分析...");
    let profile = CompanyProfiler.execute(context).await?;

    // 第二步：关系图谱研究
    let company_name = if profile.name.trim().is_empty() {
        context.config.get_company_name()
    } else {
        profile.name.clone()
    };
    let specification = format!(
        "调研对象公司是 {}（官网: {}）",
        company_name,
        context.config.normalized_company_url()
    );

    println!("🤖 执行关系图谱研究...");
    let retriever = MemoryEvidenceRetriever::new(context.clone());
    let triple_types = default_triple_types();
    let graph = graph::study(context, &retriever, &specification, &triple_types).await?;

    if graph.is_empty() {
        // 空图谱按「证据不足」处理，不视为错误
        eprintln!("⚠️ 本次调研未能确认任何关系，图谱为空");
    }

    context
        .store_to_memory(MemoryScope::RESEARCH, ScopedKeys::KNOWLEDGE_GRAPH, &graph)
        .await?;

    println!("✓ 公司调研流程执行完毕");
    Ok(())
}
