use crate::config::Config;
use crate::startup::startup::Application;
use crate::utils::logger::init_logger;
use anyhow::Context;

mod config;
mod errors;
mod infrastructure;
mod models;
mod services;
mod startup;
mod utils;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env 可选，不存在时忽略
    let _ = dotenvy::dotenv();

    // 初始化日志（全局只需调用一次）
    init_logger();

    log_info!("Starting mint sniper initialization...");

    // 1. 加载配置
    let config = Config::load().context("Failed to load application configuration")?;

    // 2. 构建应用实例（RPC 不可达/链ID不符/私钥不匹配时直接以非零状态退出）
    let application = Application::build(config)
        .await
        .context("Application building failed (RPC/wallet initialization)")?;

    log_info!("Application build complete. Starting polling loop.");

    // 3. 运行轮询直到 Ctrl+C
    application
        .run()
        .await
        .context("Mint polling failed during runtime")?;

    Ok(())
}
