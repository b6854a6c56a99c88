//! 消息同步监听器
//!
//! 此模块定义了消息同步相关的回调接口，由上层 UI 注册。
//! 回调载荷统一为 JSON 字符串表示。

use async_trait::async_trait;

/// 消息同步监听器
#[async_trait]
pub trait ChatListener: Send + Sync {
    /// 收到新消息并已追加到视图
    ///
    /// 参数 `message` 是消息的 JSON 字符串表示
    async fn on_recv_new_message(&self, message: String);

    /// 一页历史消息已合并进视图
    ///
    /// 参数 `page` 是本次合并的页码，`total` 是合并后视图中的消息总数
    async fn on_history_merged(&self, page: u32, total: usize);

    /// 连接状态变化
    ///
    /// 参数 `connected` 表示是否已连接
    /// 参数 `message` 是状态消息
    async fn on_connection_status_changed(&self, connected: bool, message: String);

    /// 已向服务端宣告加入会话
    async fn on_joined_conversation(&self, conversation_id: String);

    /// 发送失败（API 路径），输入由上层保留以便重试
    ///
    /// 参数 `reason` 是失败原因描述
    async fn on_send_failed(&self, reason: String);
}

/// 空的监听器实现（默认实现）
pub struct EmptyChatListener;

#[async_trait]
impl ChatListener for EmptyChatListener {
    async fn on_recv_new_message(&self, _message: String) {}
    async fn on_history_merged(&self, _page: u32, _total: usize) {}
    async fn on_connection_status_changed(&self, _connected: bool, _message: String) {}
    async fn on_joined_conversation(&self, _conversation_id: String) {}
    async fn on_send_failed(&self, _reason: String) {}
}
