//! OPD服务器主程序

mod config;

use clap::Parser;
use config::AppConfig;
use opd_core::{OpdError, Result};
use opd_database::{schema::DatabaseSchema, DatabasePool};
use opd_web::WebServer;
use std::net::SocketAddr;
use tracing::{error, info};

/// OPD服务器命令行参数
#[derive(Parser, Debug)]
#[command(name = "opd-server")]
#[command(about = "HIMS OPD (门诊收费与班次结算) 服务器")]
struct Args {
    /// 配置文件路径
    #[arg(short, long)]
    config: Option<String>,

    /// 监听端口（覆盖配置文件）
    #[arg(short, long)]
    port: Option<u16>,

    /// 日志级别（覆盖配置文件）
    #[arg(short, long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut app_config = AppConfig::load(args.config.as_deref())?;
    if let Some(port) = args.port {
        app_config.server.port = port;
    }

    // 初始化日志，级别来自配置文件，命令行参数优先
    tracing_subscriber::fmt()
        .with_env_filter(app_config.logging.effective_level(args.log_level.as_deref()))
        .init();

    info!("启动OPD服务器...");

    info!("OPD服务器配置:");
    info!("  监听地址: {}:{}", app_config.server.host, app_config.server.port);
    info!("  数据库最大连接数: {}", app_config.database.max_connections);

    // 连接数据库，连不上直接拒绝启动
    let db = DatabasePool::connect(&app_config.database).await?;
    if let Err(e) = db.ping().await {
        error!("数据库连通性检查失败: {}", e);
        return Err(e);
    }

    // 初始化表结构与索引（全部IF NOT EXISTS，可重复执行）
    DatabaseSchema::new(&db).create_tables().await?;

    let addr: SocketAddr = format!("{}:{}", app_config.server.host, app_config.server.port)
        .parse()
        .map_err(|e| OpdError::Config(format!("Invalid listen address: {}", e)))?;

    let server = WebServer::new(addr, db);
    if let Err(e) = server.run().await {
        error!("服务器启动失败: {}", e);
        return Err(e);
    }

    Ok(())
}
