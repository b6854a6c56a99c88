//! BookChat CLI 客户端（测试版）
//!
//! 非交互式 CLI，用于测试和展示消息同步功能
//! 启动时通过命令行参数指定用户与会话，自动连接，展示接收到的信息

use anyhow::Result;
use bookchat_sdk_core_rust::chat::client::{ChatClient, ClientConfig};
use bookchat_sdk_core_rust::chat::listener::ChatListener;
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, info, warn};

/// BookChat CLI 客户端
#[derive(Parser, Debug)]
#[command(name = "bookchat-cli")]
#[command(about = "BookChat CLI 客户端 - 用于测试和展示消息同步功能", long_about = None)]
struct Args {
    /// 本地用户 ID
    #[arg(short, long, default_value = "u_demo")]
    user_id: String,

    /// 认证 token
    #[arg(short, long, default_value = "demo_token")]
    token: String,

    /// 会话 ID
    #[arg(short, long, default_value = "conv_demo")]
    conversation_id: String,

    /// WebSocket 服务器 URL
    #[arg(long, default_value = "ws://localhost:4001")]
    ws_url: String,

    /// HTTP API 基础地址
    #[arg(long, default_value = "http://localhost:4000/api")]
    api_base_url: String,

    /// 连接后发送的测试消息（留空则只收不发）
    #[arg(short, long, default_value = "")]
    message: String,

    /// 运行时长（秒），0 表示持续运行
    #[arg(short, long, default_value = "0")]
    duration: u64,

    /// 日志级别（默认: info,bookchat_sdk_core_rust=debug）
    #[arg(long, default_value = "info,bookchat_sdk_core_rust=debug")]
    log_level: String,
}

/// 初始化日志（同时输出到 stdout 和文件）
fn init_logger(log_level: &str) -> Result<()> {
    use std::fs::OpenOptions;
    use std::io;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    // 优先使用环境变量 RUST_LOG（如果设置了），否则使用命令行参数
    let filter_layer =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    // 创建日志文件（追加模式）
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open("debug.log")?;

    // 输出到 stdout（控制台），保留 ANSI 颜色代码用于终端显示
    let stdout_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stdout)
        .with_file(true)
        .with_line_number(true)
        .with_target(false)
        .with_ansi(true);

    // 输出到文件，禁用 ANSI 颜色代码（文件不需要颜色）
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(log_file)
        .with_file(true)
        .with_line_number(true)
        .with_target(false)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    info!("[CLI] 📝 日志已同时输出到控制台和文件: debug.log");
    Ok(())
}

/// 监听器：输出所有接收到的信息
struct CliChatListener;

#[async_trait::async_trait]
impl ChatListener for CliChatListener {
    async fn on_recv_new_message(&self, message: String) {
        info!("[CLI/Message] 📨 收到新消息: {}", message);
    }

    async fn on_history_merged(&self, page: u32, total: usize) {
        info!("[CLI/Message] 📋 历史页合并: page={}, 共 {} 条", page, total);
    }

    async fn on_connection_status_changed(&self, connected: bool, message: String) {
        if connected {
            info!("[CLI/Message] 🔗 已连接: {}", message);
        } else {
            warn!("[CLI/Message] 🔗 断开连接: {}", message);
        }
    }

    async fn on_joined_conversation(&self, conversation_id: String) {
        info!("[CLI/Message] 🙋 已加入会话: {}", conversation_id);
    }

    async fn on_send_failed(&self, reason: String) {
        error!("[CLI/Message] ❌ 发送失败（输入已保留可重试）: {}", reason);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // 初始化日志
    init_logger(&args.log_level)?;

    info!("[CLI] 🚀 BookChat CLI 客户端（测试模式）");
    info!("[CLI] 👤 用户: {}", args.user_id);
    info!("[CLI] 💬 会话: {}", args.conversation_id);
    info!("[CLI] ⏱️  运行时长: {} 秒（0=持续运行）", args.duration);

    // 创建客户端
    let mut config = ClientConfig::new(args.user_id.clone(), args.token.clone());
    config.ws_url = args.ws_url.clone();
    config.api_base_url = args.api_base_url.clone();

    let mut client = ChatClient::new(config)?;
    client.set_listener(Arc::new(CliChatListener));

    // 打开会话（内部建立推送通道并拉取第 1 页历史）
    info!("[CLI] 🔗 正在打开会话...");
    if let Err(e) = client.open_conversation(&args.conversation_id).await {
        // 历史拉取失败不致命：推送通道仍在后台重连
        error!("[CLI] ⚠️ 打开会话时历史拉取失败: {}", e);
    }

    // 展示当前视图
    let groups = client.day_groups();
    info!("[CLI] 📋 当前视图（{} 个分组）:", groups.len());
    for group in &groups {
        info!("[CLI]   == {} ==", group.label);
        for msg in group.messages.iter().take(5) {
            info!(
                "[CLI]   - {} | {}",
                msg.sender.party_id(),
                if msg.text.chars().count() > 30 {
                    msg.text.chars().take(30).collect::<String>()
                } else {
                    msg.text.clone()
                }
            );
        }
    }
    info!(
        "[CLI] 📄 hasMore={}, 参与者缓存 {} 条",
        client.has_more(),
        client.participants().len()
    );

    // 发送测试消息
    if !args.message.is_empty() {
        info!("[CLI] 📤 3 秒后发送测试消息...");
        let client_for_send = client.clone();
        let text = args.message.clone();
        tokio::spawn(async move {
            sleep(Duration::from_secs(3)).await;
            match client_for_send.send(&text, vec![]).await {
                Ok(_) => info!("[CLI] ✅ 消息发送成功！"),
                Err(e) => error!("[CLI] 消息发送失败: {}", e),
            }
        });
    }

    info!("[CLI] 📥 开始监听消息...");
    if args.duration > 0 {
        info!("[CLI] ⏰ {} 秒后自动退出", args.duration);
        sleep(Duration::from_secs(args.duration)).await;
        client.close_conversation().await;
        info!("[CLI] 👋 程序退出");
    } else {
        info!("[CLI] ⏰ 持续运行中，按 Ctrl+C 退出");
        tokio::signal::ctrl_c().await?;
        client.close_conversation().await;
        info!("[CLI] 👋 程序退出");
    }

    Ok(())
}
