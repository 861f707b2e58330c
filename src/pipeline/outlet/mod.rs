use anyhow::Result;
use std::collections::HashMap;
use std::fs;

use crate::i18n::TargetLanguage;
use crate::pipeline::compose::memory::{MemoryScope, SectionKeys};
use crate::pipeline::context::ResearchContext;

/// 保存报告
pub async fn save(context: &ResearchContext) -> Result<()> {
    let report_tree = ReportTree::new(&context.config.target_language);
    let outlet = DiskOutlet::new(report_tree);
    outlet.save(context).await
}

pub trait Outlet {
    async fn save(&self, context: &ResearchContext) -> Result<()>;
}

/// 报告结构：Memory中分节键到输出相对路径的映射
pub struct ReportTree {
    structure: HashMap<String, String>,
}

impl ReportTree {
    pub fn new(target_language: &TargetLanguage) -> Self {
        let structure = HashMap::from([
            (
                SectionKeys::OVERVIEW.to_string(),
                target_language.get_report_filename(SectionKeys::OVERVIEW),
            ),
            (
                SectionKeys::GRAPH.to_string(),
                target_language.get_report_filename(SectionKeys::GRAPH),
            ),
        ]);
        Self { structure }
    }
}

impl Default for ReportTree {
    fn default() -> Self {
        Self::new(&TargetLanguage::English)
    }
}

pub struct DiskOutlet {
    report_tree: ReportTree,
}

impl DiskOutlet {
    pub fn new(report_tree: ReportTree) -> Self {
        Self { report_tree }
    }
}

impl Outlet for DiskOutlet {
    async fn save(&self, context: &ResearchContext) -> Result<()> {
        println!("\n🖊️ 报告存储中...");
        // 创建输出目录
        let output_dir = &context.config.output_path;
        if output_dir.exists() {
            fs::remove_dir_all(output_dir)?;
        }
        fs::create_dir_all(output_dir)?;

        // 遍历报告结构，保存每个分节
        for (section_key, relative_path) in &self.report_tree.structure {
            if let Some(section_markdown) = context
                .get_from_memory::<String>(MemoryScope::REPORT, section_key)
                .await
            {
                let output_file_path = output_dir.join(relative_path);

                if let Some(parent_dir) = output_file_path.parent()
                    && !parent_dir.exists()
                {
                    fs::create_dir_all(parent_dir)?;
                }

                fs::write(&output_file_path, section_markdown)?;

                println!("💾 已保存分节: {}", output_file_path.display());
            } else {
                // 分节缺失时记录警告但不中断流程
                eprintln!("⚠️ 警告: 未找到分节内容，键: {}", section_key);
            }
        }

        println!("💾 报告保存完成，输出目录: {}", output_dir.display());

        Ok(())
    }
}
