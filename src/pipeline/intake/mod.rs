use std::collections::HashSet;
use std::time::Duration;

use anyhow::Result;

use crate::config::Config;
use crate::pipeline::context::ResearchContext;
use crate::pipeline::intake::memory::IntakeMemory;
use crate::types::source_document::SourceDocument;
use crate::utils::text::{extract_html_title, html_to_text, truncate_chars};

pub mod memory;

/// 执行资料采集阶段
///
/// 抓取公司官网、常见子页面与配置的种子URL，清洗为纯文本后入库。
/// 单个页面失败只记录日志，不影响其余页面。
pub async fn execute(context: &ResearchContext) -> Result<()> {
    println!("\n🌐 执行资料采集流程...");

    let urls = collect_urls(&context.config);
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .user_agent(format!("dossier-rs/{}", env!("CARGO_PKG_VERSION")))
        .build()?;

    let max_pages = context.config.research.max_pages;
    let max_chars = context.config.research.max_document_chars;
    let mut documents: Vec<SourceDocument> = Vec::new();

    for url in urls {
        if documents.len() >= max_pages {
            println!("   ⏹️ 已达到采集页面上限（{}），停止采集", max_pages);
            break;
        }

        match fetch_page(&client, &url, max_chars).await {
            Ok(Some(document)) => {
                println!(
                    "   📄 已采集: {} ({} 字符)",
                    url,
                    document.text.chars().count()
                );
                documents.push(document);
            }
            Ok(None) => {
                if context.config.verbose {
                    println!("   ⏭️ 跳过空页面: {}", url);
                }
            }
            Err(e) => {
                eprintln!("⚠️ 页面采集失败 [{}]: {}", url, e);
            }
        }
    }

    if documents.is_empty() {
        eprintln!("⚠️ 未采集到任何资料，后续调研将缺乏证据支撑");
    }

    println!("✓ 资料采集完成，共入库 {} 份文档", documents.len());
    context.store_source_documents(&documents).await
}

/// 汇总待采集的URL清单：官网、常见子路径、种子URL，按序去重
fn collect_urls(config: &Config) -> Vec<String> {
    let base = config.normalized_company_url();

    let mut urls = vec![base.clone()];
    for path in &config.research.well_known_paths {
        urls.push(format!("{}/{}", base, path.trim_matches('/')));
    }
    urls.extend(config.research.seed_urls.iter().cloned());

    let mut seen = HashSet::new();
    urls.retain(|url| seen.insert(url.clone()));
    urls
}

/// 抓取并清洗单个页面，正文为空时返回None
async fn fetch_page(
    client: &reqwest::Client,
    url: &str,
    max_chars: usize,
) -> Result<Option<SourceDocument>> {
    let response = client.get(url).send().await?;
    if !response.status().is_success() {
        anyhow::bail!("HTTP {}", response.status());
    }

    let html = response.text().await?;
    let title = extract_html_title(&html);
    let text = html_to_text(&html);
    if text.trim().is_empty() {
        return Ok(None);
    }

    let text = truncate_chars(&text, max_chars);
    Ok(Some(SourceDocument::new(url.to_string(), title, text)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn test_collect_urls_contains_base_and_well_known_paths() {
        let mut config = Config::default();
        config.company_url = "https://acme.com".to_string();

        let urls = collect_urls(&config);

        assert_eq!(urls[0], "https://acme.com");
        assert!(urls.contains(&"https://acme.com/about".to_string()));
        assert!(urls.contains(&"https://acme.com/team".to_string()));
    }

    #[test]
    fn test_collect_urls_appends_seed_urls_and_dedups() {
        let mut config = Config::default();
        config.company_url = "https://acme.com".to_string();
        config.research.seed_urls = vec![
            "https://acme.com/blog".to_string(),
            // 与官网重复，应被去重
            "https://acme.com".to_string(),
        ];

        let urls = collect_urls(&config);

        assert!(urls.contains(&"https://acme.com/blog".to_string()));
        assert_eq!(
            urls.iter().filter(|u| u.as_str() == "https://acme.com").count(),
            1
        );
    }

    #[test]
    fn test_collect_urls_normalizes_missing_scheme() {
        let mut config = Config::default();
        config.company_url = "acme.com/".to_string();

        let urls = collect_urls(&config);
        assert_eq!(urls[0], "https://acme.com");
    }
}
