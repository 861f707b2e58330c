use anyhow::Result;
use clap::Parser;
use dossier_rs::{cli, pipeline::workflow::launch};

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Args::parse();
    let config = args.into_config();

    if config.company_url.trim().is_empty() {
        anyhow::bail!("未指定公司URL，请使用 --url 或配置文件中的 company_url");
    }

    launch(&config).await
}
