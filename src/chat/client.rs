//! 消息同步客户端核心实现模块
//!
//! 维护单个会话的有序去重消息视图：历史分页走 HTTP 拉取，
//! 实时消息走推送通道（WebSocket），发送按可用通道择优路由。

use crate::chat::api::{AttachmentFile, ChatApi};
use crate::chat::listener::{ChatListener, EmptyChatListener};
use crate::chat::message::grouping::DayGroup;
use crate::chat::message::types::{ChatMessage, ParticipantProfile};
use crate::chat::message::view::ConversationView;
use crate::chat::serialization::{compress_gzip, decompress_gzip, is_gzip};
use crate::chat::types::{event, JoinConversationData, SendMessageData, SocketEnvelope};
use anyhow::{Context, Result};
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::interval;
use tokio_tungstenite::MaybeTlsStream;
use tokio_tungstenite::WebSocketStream;
use tokio_tungstenite::{connect_async, tungstenite::Message as WsMessage};
use tracing::{debug, error, info, warn};

/// WebSocket 写入端类型别名
pub type WsWriter = SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, WsMessage>;

/// WebSocket 读取端类型别名
pub type WsReader = SplitStream<WebSocketStream<MaybeTlsStream<TcpStream>>>;

/// 推送通道连接状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
}

/// 客户端配置
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// 本地用户 ID
    pub user_id: String,
    /// 本地用户昵称（参与者缓存用）
    pub user_name: String,
    /// 本地用户头像（参与者缓存用）
    pub user_avatar: String,
    /// 认证 token
    pub token: String,
    /// 推送通道 WebSocket 服务器 URL
    pub ws_url: String,
    /// HTTP API 基础地址（历史拉取 + 附件提交）
    pub api_base_url: String,
    /// 帧压缩方式，例如 "gzip" 或空字符串表示不压缩
    pub compression: String,
    /// 历史消息每页条数
    pub page_size: u32,
    /// 推送通道单次连接超时
    pub connect_timeout: Duration,
    /// 重连预算（用尽后进入仅 API 发送的降级模式）
    pub max_reconnect_attempts: u32,
    /// 重连间隔
    pub reconnect_delay: Duration,
}

impl ClientConfig {
    /// 创建默认配置
    pub fn new(user_id: String, token: String) -> Self {
        Self {
            user_id,
            user_name: String::new(),
            user_avatar: String::new(),
            token,
            ws_url: "ws://localhost:4001".to_string(),
            api_base_url: "http://localhost:4000/api".to_string(),
            compression: "gzip".to_string(),
            page_size: 20,
            connect_timeout: Duration::from_secs(10),
            max_reconnect_attempts: 3,
            reconnect_delay: Duration::from_secs(2),
        }
    }
}

/// 发送路径
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SendRoute {
    /// 纯文本且通道已连接：只走推送通道
    Push,
    /// 带附件，或通道不可用时的兜底：只走 API
    Api,
    /// 空输入：不发送
    Skip,
}

/// 选择发送路径
fn choose_send_route(text: &str, attachment_count: usize, connected: bool) -> SendRoute {
    if text.trim().is_empty() && attachment_count == 0 {
        return SendRoute::Skip;
    }
    if attachment_count == 0 && connected {
        SendRoute::Push
    } else {
        SendRoute::Api
    }
}

/// 消息同步客户端
///
/// 核心同步逻辑实现
#[derive(Clone)]
pub struct ChatClient {
    pub(crate) config: ClientConfig,
    api: Arc<ChatApi>,
    // 当前会话视图（合并算法的唯一可变状态）
    view: Arc<std::sync::Mutex<ConversationView>>,
    writer: Arc<Mutex<Option<WsWriter>>>,
    state: Arc<std::sync::Mutex<ConnectionState>>,
    // 会话代数：每次切换/关闭会话自增，过期的拉取响应和推送事件据此丢弃
    generation: Arc<AtomicU64>,
    // 消息监听器（可由调用方注册）
    listener: Arc<dyn ChatListener>,
    // 当前推送通道会话任务
    session: Arc<std::sync::Mutex<Option<JoinHandle<()>>>>,
}

impl ChatClient {
    /// 创建新的客户端
    /// - `config`: 客户端配置
    pub fn new(config: ClientConfig) -> Result<Self> {
        // 创建带认证拦截器的 HTTP 客户端（token 通过 default_headers 自动添加）
        let http_client = reqwest::ClientBuilder::new()
            .default_headers({
                let mut headers = reqwest::header::HeaderMap::new();
                headers.insert(
                    reqwest::header::HeaderName::from_static("token"),
                    reqwest::header::HeaderValue::from_str(&config.token)
                        .context("无效的 token")?,
                );
                headers
            })
            .build()
            .context("创建 HTTP 客户端失败")?;

        let api = Arc::new(ChatApi::new(http_client, config.api_base_url.clone()));

        Ok(Self {
            config,
            api,
            view: Arc::new(std::sync::Mutex::new(ConversationView::default())),
            writer: Arc::new(Mutex::new(None)),
            state: Arc::new(std::sync::Mutex::new(ConnectionState::Disconnected)),
            generation: Arc::new(AtomicU64::new(0)),
            listener: Arc::new(EmptyChatListener),
            session: Arc::new(std::sync::Mutex::new(None)),
        })
    }

    /// 注册消息监听器
    pub fn set_listener(&mut self, listener: Arc<dyn ChatListener>) {
        self.listener = listener;
    }

    /// 当前连接状态
    pub fn connection_state(&self) -> ConnectionState {
        *self.state.lock().unwrap()
    }

    /// 当前视图的消息快照（升序）
    pub fn messages(&self) -> Vec<ChatMessage> {
        self.view.lock().unwrap().messages().to_vec()
    }

    /// 按天分组投影
    pub fn day_groups(&self) -> Vec<DayGroup> {
        self.view.lock().unwrap().day_groups()
    }

    /// 是否还有更早的历史页
    pub fn has_more(&self) -> bool {
        self.view.lock().unwrap().has_more()
    }

    /// 参与者缓存（消息列表 + 本地用户记录的纯投影）
    pub fn participants(&self) -> HashMap<String, ParticipantProfile> {
        self.view.lock().unwrap().participants()
    }

    /// 打开会话：重置视图、建立推送通道、拉取第 1 页历史
    ///
    /// 切换会话时先确定性地终止上一个会话的连接与在途请求，
    /// 避免跨会话消息串台。
    pub async fn open_conversation(&self, conversation_id: &str) -> Result<()> {
        if conversation_id.is_empty() {
            return Err(anyhow::anyhow!("会话 ID 为空"));
        }

        // 终止上一个会话
        self.close_conversation().await;

        info!("[Client] 📂 打开会话: conversationId={}", conversation_id);
        {
            let mut view = self.view.lock().unwrap();
            view.switch_conversation(conversation_id);
            view.set_local_user(ParticipantProfile {
                id: self.config.user_id.clone(),
                name: self.config.user_name.clone(),
                avatar: self.config.user_avatar.clone(),
            });
        }

        // 启动推送通道会话任务
        let generation = self.generation.load(Ordering::SeqCst);
        let client = self.clone();
        let conv_id = conversation_id.to_string();
        let handle = tokio::spawn(async move {
            client.run_session(conv_id, generation).await;
        });
        *self.session.lock().unwrap() = Some(handle);

        // 拉取第 1 页历史（失败只影响加载状态，不污染视图）
        self.fetch_page(1).await
    }

    /// 关闭当前会话：此后不再有任何回调被触发
    pub async fn close_conversation(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);

        let handle = self.session.lock().unwrap().take();
        if let Some(handle) = handle {
            handle.abort();
        }

        let mut guard = self.writer.lock().await;
        if let Some(mut writer) = guard.take() {
            let _ = writer.send(WsMessage::Close(None)).await;
        }
        drop(guard);

        self.set_state(ConnectionState::Disconnected);
    }

    /// 加载更早的历史消息（前插）
    pub async fn load_older(&self) -> Result<()> {
        let (page, has_more) = {
            let view = self.view.lock().unwrap();
            (view.page(), view.has_more())
        };
        if !has_more {
            debug!("[Client] 没有更早的历史页，跳过");
            return Ok(());
        }
        self.fetch_page(page + 1).await
    }

    /// 变更搜索词：重置视图并重新拉取第 1 页
    pub async fn set_search(&self, search: &str) -> Result<()> {
        let changed = self.view.lock().unwrap().set_search(search);
        if !changed {
            return Ok(());
        }
        info!("[Client] 🔍 搜索词变更: {:?}", search);
        self.fetch_page(1).await
    }

    /// 拉取一页历史并合并进视图（带过期响应保护）
    async fn fetch_page(&self, page: u32) -> Result<()> {
        let generation = self.generation.load(Ordering::SeqCst);
        let (conversation_id, search) = {
            let view = self.view.lock().unwrap();
            (view.conversation_id().to_string(), view.search().to_string())
        };
        if conversation_id.is_empty() {
            return Err(anyhow::anyhow!("未打开会话"));
        }

        let resp = self
            .api
            .get_messages(&conversation_id, page, self.config.page_size, &search)
            .await?;

        // 响应返回时会话可能已经切换，过期结果直接丢弃
        if self.generation.load(Ordering::SeqCst) != generation {
            debug!(
                "[Client] 忽略过期历史响应: conversationId={}, page={}",
                conversation_id, page
            );
            return Ok(());
        }

        let total = {
            let mut view = self.view.lock().unwrap();
            view.apply_history_page(page, resp.data, resp.meta.page, resp.meta.total_page);
            view.messages().len()
        };

        info!(
            "[Client] ✅ 历史页已合并: page={}, 视图共 {} 条",
            page, total
        );
        let listener = self.listener.clone();
        tokio::spawn(async move {
            listener.on_history_merged(page, total).await;
        });
        Ok(())
    }

    /// 发送消息
    ///
    /// - 纯文本且通道已连接：只通过推送通道发出，不调用 API，
    ///   消息由服务端广播回来后经去重合并进入视图（不做本地乐观插入）。
    /// - 带附件，或通道不可用：走 multipart API 提交兜底。
    /// - 文本为空白且无附件：不发送。
    /// - API 路径失败会返回错误，调用方保留输入以便重试。
    pub async fn send(&self, text: &str, attachments: Vec<AttachmentFile>) -> Result<()> {
        let conversation_id = self.view.lock().unwrap().conversation_id().to_string();
        if conversation_id.is_empty() {
            debug!("[Client] 未打开会话，忽略发送");
            return Ok(());
        }

        let connected = self.connection_state() == ConnectionState::Connected;
        match choose_send_route(text, attachments.len(), connected) {
            SendRoute::Skip => {
                debug!("[Client] 空消息，忽略发送");
                Ok(())
            }
            SendRoute::Push => {
                match self.emit_send_message(&conversation_id, text).await {
                    Ok(()) => {
                        info!("[Client] 📤 文本消息已通过推送通道发出");
                        Ok(())
                    }
                    Err(e) => {
                        // 状态与写入端之间的竞态：通道刚断开，转走 API 兜底
                        warn!("[Client] ⚠️ 推送通道发送失败，转 API 兜底: {}", e);
                        self.send_via_api(&conversation_id, text, attachments).await
                    }
                }
            }
            SendRoute::Api => self.send_via_api(&conversation_id, text, attachments).await,
        }
    }

    async fn send_via_api(
        &self,
        conversation_id: &str,
        text: &str,
        attachments: Vec<AttachmentFile>,
    ) -> Result<()> {
        match self
            .api
            .create_message(conversation_id, text, attachments)
            .await
        {
            Ok(_) => {
                info!("[Client] 📤 消息已通过 API 提交，等待推送广播");
                Ok(())
            }
            Err(e) => {
                error!("[Client] ❌ API 发送失败: {}", e);
                let listener = self.listener.clone();
                let reason = e.to_string();
                tokio::spawn(async move {
                    listener.on_send_failed(reason).await;
                });
                Err(e)
            }
        }
    }

    /// 构建 WebSocket 连接 URL
    fn build_url(&self, operation_id: &str) -> String {
        let compression_param = if self.config.compression.is_empty() {
            String::new()
        } else {
            format!("&compression={}", self.config.compression)
        };

        format!(
            "{}/?token={}&participantId={}&operationID={}{}",
            self.config.ws_url, self.config.token, self.config.user_id, operation_id,
            compression_param
        )
    }

    fn set_state(&self, state: ConnectionState) {
        *self.state.lock().unwrap() = state;
    }

    fn notify_connection_status(&self, connected: bool, message: String) {
        let listener = self.listener.clone();
        tokio::spawn(async move {
            listener.on_connection_status_changed(connected, message).await;
        });
    }

    /// 推送通道会话主循环：连接（带超时）、加入会话、心跳、读循环、有界重连
    async fn run_session(self, conversation_id: String, generation: u64) {
        let mut attempts: u32 = 0;
        loop {
            if self.generation.load(Ordering::SeqCst) != generation {
                break;
            }
            self.set_state(ConnectionState::Connecting);

            let operation_id = format!("{}", chrono::Utc::now().timestamp_millis());
            let url = self.build_url(&operation_id);
            info!(
                "[Client] 🔗 连接推送通道 (user={}, attempt={})",
                self.config.user_id,
                attempts + 1
            );

            match tokio::time::timeout(self.config.connect_timeout, connect_async(&url)).await {
                Ok(Ok((ws_stream, response))) => {
                    info!("[Client] ✅ 推送通道连接成功, 状态: {}", response.status());
                    let (write, read) = ws_stream.split();
                    {
                        *self.writer.lock().await = Some(write);
                    }
                    if self.generation.load(Ordering::SeqCst) != generation {
                        // 连接建立期间会话已关闭
                        let _ = self.writer.lock().await.take();
                        break;
                    }
                    self.set_state(ConnectionState::Connected);
                    attempts = 0;
                    self.notify_connection_status(true, "连接成功".to_string());

                    // 每次（重）连后必须重新宣告加入会话，无确认事件，fire-and-forget
                    if let Err(e) = self.emit_join(&conversation_id).await {
                        warn!("[Client] ⚠️ 加入会话宣告失败: {}", e);
                    } else {
                        info!(
                            "[Client] 🙋 已宣告加入会话: conversationId={}",
                            conversation_id
                        );
                        let listener = self.listener.clone();
                        let conv_id = conversation_id.clone();
                        tokio::spawn(async move {
                            listener.on_joined_conversation(conv_id).await;
                        });
                    }

                    // 启动心跳
                    let writer_for_heartbeat = self.writer.clone();
                    let heartbeat = tokio::spawn(async move {
                        let mut ticker = interval(Duration::from_secs(25));
                        loop {
                            ticker.tick().await;
                            let mut guard = writer_for_heartbeat.lock().await;
                            match guard.as_mut() {
                                Some(w) => {
                                    if w.send(WsMessage::Ping(vec![])).await.is_err() {
                                        break;
                                    }
                                }
                                None => break,
                            }
                        }
                    });

                    // 读循环，阻塞到连接断开
                    self.read_until_closed(read, generation).await;
                    heartbeat.abort();
                    {
                        let _ = self.writer.lock().await.take();
                    }

                    if self.generation.load(Ordering::SeqCst) != generation {
                        break;
                    }
                    self.set_state(ConnectionState::Disconnected);
                    self.notify_connection_status(false, "连接断开".to_string());
                }
                Ok(Err(e)) => {
                    error!("[Client] ❌ 推送通道连接失败: {}", e);
                    self.set_state(ConnectionState::Disconnected);
                }
                Err(_) => {
                    warn!(
                        "[Client] ⏰ 推送通道连接超时 ({:?})",
                        self.config.connect_timeout
                    );
                    self.set_state(ConnectionState::Disconnected);
                }
            }

            attempts += 1;
            if attempts > self.config.max_reconnect_attempts {
                error!(
                    "[Client] ❌ 重连预算用尽 ({} 次)，进入降级模式（仅 API 发送）",
                    self.config.max_reconnect_attempts
                );
                self.set_state(ConnectionState::Disconnected);
                self.notify_connection_status(false, "重连预算用尽，降级为 API 发送".to_string());
                break;
            }
            tokio::time::sleep(self.config.reconnect_delay).await;
        }
    }

    /// 处理接收消息（事件循环）
    async fn read_until_closed(&self, mut read: WsReader, generation: u64) {
        while let Some(msg_result) = read.next().await {
            // 会话关闭后不再处理任何事件
            if self.generation.load(Ordering::SeqCst) != generation {
                break;
            }
            match msg_result {
                Ok(WsMessage::Text(text)) => {
                    self.handle_frame(text.as_bytes());
                }
                Ok(WsMessage::Binary(data)) => {
                    // 解压
                    let payload = if is_gzip(&data) {
                        match decompress_gzip(&data) {
                            Ok(d) => d,
                            Err(e) => {
                                error!("[Client] 解压失败: {}", e);
                                continue;
                            }
                        }
                    } else {
                        data
                    };
                    self.handle_frame(&payload);
                }
                Ok(WsMessage::Ping(_)) | Ok(WsMessage::Pong(_)) => {}
                Ok(WsMessage::Close(frame)) => {
                    warn!("[Client] 👋 连接关闭: {:?}", frame);
                    break;
                }
                Err(e) => {
                    error!("[Client] WebSocket 错误: {}", e);
                    break;
                }
                _ => {}
            }
        }
    }

    /// 解析并分发一帧事件
    fn handle_frame(&self, payload: &[u8]) {
        let envelope = match serde_json::from_slice::<SocketEnvelope>(payload) {
            Ok(env) => env,
            Err(e) => {
                error!(
                    "[Client] 事件解析失败: {}, 原始数据: {:?}",
                    e,
                    String::from_utf8_lossy(payload)
                );
                return;
            }
        };

        match envelope.event.as_str() {
            event::RECEIVE_MESSAGE => {
                // 字段齐不齐都宽松解析：丢一条真实消息比偶尔重复显示更糟
                let message = match serde_json::from_value::<ChatMessage>(envelope.data) {
                    Ok(m) => m,
                    Err(e) => {
                        error!("[Client] 消息事件载荷无效: {}", e);
                        return;
                    }
                };
                let appended = self.view.lock().unwrap().apply_push(message.clone());
                if appended {
                    debug!(
                        "[Client] 📨 推送消息已追加: id={:?}, text={}",
                        message.id, message.text
                    );
                    let json = serde_json::to_string(&message).unwrap_or_default();
                    let listener = self.listener.clone();
                    tokio::spawn(async move {
                        listener.on_recv_new_message(json).await;
                    });
                }
            }
            other => {
                debug!("[Client] 未知事件类型: {}", other);
            }
        }
    }

    async fn emit_join(&self, conversation_id: &str) -> Result<()> {
        let data = JoinConversationData {
            conversation_id: conversation_id.to_string(),
            participant_id: self.config.user_id.clone(),
        };
        self.emit_envelope(&SocketEnvelope::new(
            event::JOIN_CONVERSATION,
            serde_json::to_value(data)?,
        ))
        .await
    }

    async fn emit_send_message(&self, conversation_id: &str, text: &str) -> Result<()> {
        let data = SendMessageData {
            conversation_id: conversation_id.to_string(),
            sender_id: self.config.user_id.clone(),
            text: text.to_string(),
        };
        self.emit_envelope(&SocketEnvelope::new(
            event::SEND_MESSAGE,
            serde_json::to_value(data)?,
        ))
        .await
    }

    /// 发送一帧事件（按配置压缩）
    async fn emit_envelope(&self, envelope: &SocketEnvelope) -> Result<()> {
        let json = serde_json::to_vec(envelope)?;

        let mut guard = self.writer.lock().await;
        let writer = guard.as_mut().ok_or_else(|| anyhow::anyhow!("未连接"))?;

        if self.config.compression == "gzip" {
            let compressed = compress_gzip(&json)?;
            writer.send(WsMessage::Binary(compressed)).await?;
        } else {
            writer
                .send(WsMessage::Text(String::from_utf8(json)?))
                .await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Once;
    use tracing::info;

    static INIT_LOGGER: Once = Once::new();

    fn init_test_logger() {
        INIT_LOGGER.call_once(|| {
            use tracing_subscriber::prelude::*;
            use tracing_subscriber::EnvFilter;

            // 测试中默认打开当前 crate 的 debug，关闭底层 HTTP 客户端的 debug 噪音
            let filter_layer = EnvFilter::new(
                "info,bookchat_sdk_core_rust=debug,hyper_util::client=info,reqwest=info",
            );

            let fmt_layer = tracing_subscriber::fmt::layer()
                .with_file(true)
                .with_line_number(true)
                .with_target(false)
                .with_test_writer();

            tracing_subscriber::registry()
                .with(filter_layer)
                .with(fmt_layer)
                .init();
        });
    }

    #[test]
    fn route_text_only_connected_goes_push() {
        assert_eq!(choose_send_route("hi", 0, true), SendRoute::Push);
    }

    #[test]
    fn route_attachments_go_api_even_when_connected() {
        assert_eq!(choose_send_route("", 1, true), SendRoute::Api);
        assert_eq!(choose_send_route("带图", 2, true), SendRoute::Api);
    }

    #[test]
    fn route_text_only_disconnected_falls_back_to_api() {
        // 通道断开时纯文本不允许被丢，走 API 兜底
        assert_eq!(choose_send_route("hi", 0, false), SendRoute::Api);
    }

    #[test]
    fn route_empty_input_is_skipped() {
        assert_eq!(choose_send_route("", 0, true), SendRoute::Skip);
        assert_eq!(choose_send_route("   \n", 0, false), SendRoute::Skip);
    }

    #[test]
    fn build_url_carries_auth_and_compression() {
        let config = ClientConfig::new("u_1".to_string(), "tok_abc".to_string());
        let client = ChatClient::new(config).unwrap();
        let url = client.build_url("op_1");
        assert!(url.starts_with("ws://localhost:4001/?"));
        assert!(url.contains("token=tok_abc"));
        assert!(url.contains("participantId=u_1"));
        assert!(url.contains("compression=gzip"));
    }

    #[test]
    fn build_url_without_compression() {
        let mut config = ClientConfig::new("u_1".to_string(), "tok".to_string());
        config.compression = String::new();
        let client = ChatClient::new(config).unwrap();
        assert!(!client.build_url("op_1").contains("compression"));
    }

    #[tokio::test]
    async fn frame_dispatch_appends_and_dedups() {
        init_test_logger();
        let client = ChatClient::new(ClientConfig::new(
            "u_1".to_string(),
            "tok".to_string(),
        ))
        .unwrap();
        client
            .view
            .lock()
            .unwrap()
            .switch_conversation("conv_1");

        let frame = br#"{"event":"receive_message","data":{"id":"m1","senderId":"u_2","text":"hi","createdAt":"2026-08-27T10:00:00Z"}}"#;
        client.handle_frame(frame);
        client.handle_frame(frame); // 重复事件幂等
        assert_eq!(client.messages().len(), 1);

        // 非 JSON 帧不崩溃、不入列表
        client.handle_frame(b"not json");
        assert_eq!(client.messages().len(), 1);

        // 缺字段事件宽松追加
        client.handle_frame(br#"{"event":"receive_message","data":{"text":"orphan"}}"#);
        assert_eq!(client.messages().len(), 2);
    }

    #[tokio::test]
    async fn close_conversation_resets_state() {
        init_test_logger();
        let client = ChatClient::new(ClientConfig::new(
            "u_1".to_string(),
            "tok".to_string(),
        ))
        .unwrap();
        client
            .view
            .lock()
            .unwrap()
            .switch_conversation("conv_1");
        client.close_conversation().await;
        assert_eq!(client.connection_state(), ConnectionState::Disconnected);
    }

    #[tokio::test]
    #[ignore]
    async fn run_chat_client() {
        // 需要本地后端：ws://localhost:4001 + http://localhost:4000/api
        init_test_logger();

        struct TestChatListener;
        #[async_trait::async_trait]
        impl crate::chat::listener::ChatListener for TestChatListener {
            async fn on_recv_new_message(&self, message: String) {
                info!("[回调/消息] 📨 收到新消息: {}", message);
            }
            async fn on_history_merged(&self, page: u32, total: usize) {
                info!("[回调/消息] 📋 历史页合并: page={}, 共 {} 条", page, total);
            }
            async fn on_connection_status_changed(&self, connected: bool, message: String) {
                info!(
                    "[回调/消息] 🔗 连接状态: connected={} - {}",
                    connected, message
                );
            }
            async fn on_joined_conversation(&self, conversation_id: String) {
                info!("[回调/消息] 🙋 已加入会话: {}", conversation_id);
            }
            async fn on_send_failed(&self, reason: String) {
                info!("[回调/消息] ❌ 发送失败: {}", reason);
            }
        }

        let config = ClientConfig::new("u_test".to_string(), "test_token".to_string());
        let mut client = ChatClient::new(config).unwrap();
        client.set_listener(Arc::new(TestChatListener));

        client
            .open_conversation("conv_test")
            .await
            .expect("打开会话失败");

        tokio::time::sleep(Duration::from_secs(3)).await;
        client
            .send("Hello from Rust client!", vec![])
            .await
            .expect("发送失败");

        tokio::time::sleep(Duration::from_secs(30)).await;
        client.close_conversation().await;
    }
}
