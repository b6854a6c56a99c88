use crate::chat::message::types::ChatMessage;
use serde::{Deserialize, Serialize};

/// 推送通道事件名称
pub mod event {
    /// 客户端 -> 服务端：加入会话
    pub const JOIN_CONVERSATION: &str = "join_conversation";
    /// 客户端 -> 服务端：发送消息
    pub const SEND_MESSAGE: &str = "send_message";
    /// 服务端 -> 客户端：收到新消息
    pub const RECEIVE_MESSAGE: &str = "receive_message";
}

/// 推送通道统一信封结构：`{ "event": ..., "data": ... }`
#[derive(Debug, Serialize, Deserialize)]
pub struct SocketEnvelope {
    pub event: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

impl SocketEnvelope {
    pub fn new(event: &str, data: serde_json::Value) -> Self {
        Self {
            event: event.to_string(),
            data,
        }
    }
}

/// 加入会话事件载荷
#[derive(Debug, Serialize, Deserialize)]
pub struct JoinConversationData {
    #[serde(rename = "conversationId")]
    pub conversation_id: String,
    #[serde(rename = "participantId")]
    pub participant_id: String,
}

/// 发送消息事件载荷（纯文本路径）
#[derive(Debug, Serialize, Deserialize)]
pub struct SendMessageData {
    #[serde(rename = "conversationId")]
    pub conversation_id: String,
    #[serde(rename = "senderId")]
    pub sender_id: String,
    pub text: String,
}

/// 历史消息分页元信息
#[derive(Debug, Clone, Deserialize)]
pub struct PageMeta {
    #[serde(default)]
    pub page: u32,
    #[serde(rename = "totalPage", default)]
    pub total_page: u32,
}

/// 历史消息分页响应：`{ data: [消息，页内新消息在前], meta: { page, totalPage } }`
#[derive(Debug, Deserialize)]
pub struct PagedMessagesResp {
    #[serde(default)]
    pub data: Vec<ChatMessage>,
    pub meta: PageMeta,
}

/// 通用 HTTP 响应处理函数：校验 HTTP 状态后直接反序列化 body
/// 所有 API 都可以共用此方法
pub async fn handle_http_response<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
    operation_name: &str,
) -> anyhow::Result<T> {
    use anyhow::Context;
    use tracing::{debug, error};

    let status = response.status();

    // 读取 body bytes（只能读取一次）
    let body_bytes = response.bytes().await.context("读取响应 body 失败")?;
    let body_str = String::from_utf8_lossy(&body_bytes);

    if !status.is_success() {
        error!(
            "[HTTP] {}请求失败，HTTP状态: {}, 响应: {}",
            operation_name, status, body_str
        );
        return Err(anyhow::anyhow!("HTTP 错误 {}: {}", status, body_str));
    }
    debug!("[HTTP] {}请求成功，HTTP状态: {}", operation_name, status);

    // 从 bytes 反序列化（因为 body 已经被消费了）
    let parsed: T = serde_json::from_slice(&body_bytes).map_err(|e| {
        error!(
            "[HTTP] {}反序列化失败: {:?}\n原始响应: {}",
            operation_name, e, body_str
        );
        anyhow::anyhow!("反序列化响应失败: {:?}", e)
    })?;

    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_roundtrip() {
        let env = SocketEnvelope::new(
            event::SEND_MESSAGE,
            serde_json::json!({
                "conversationId": "conv_1",
                "senderId": "u_1",
                "text": "你好",
            }),
        );
        let json = serde_json::to_string(&env).unwrap();
        let back: SocketEnvelope = serde_json::from_str(&json).unwrap();
        assert_eq!(back.event, event::SEND_MESSAGE);
        assert_eq!(back.data["text"], "你好");
    }

    #[test]
    fn envelope_missing_data_defaults_to_null() {
        let back: SocketEnvelope =
            serde_json::from_str(r#"{"event":"receive_message"}"#).unwrap();
        assert_eq!(back.event, event::RECEIVE_MESSAGE);
        assert!(back.data.is_null());
    }

    #[test]
    fn paged_resp_parses_meta() {
        let json = r#"{
            "data": [
                {"id":"m2","senderId":"u1","text":"second","createdAt":"2026-08-27T10:01:00Z"},
                {"id":"m1","senderId":"u2","text":"first","createdAt":"2026-08-27T10:00:00Z"}
            ],
            "meta": {"page": 1, "totalPage": 3}
        }"#;
        let resp: PagedMessagesResp = serde_json::from_str(json).unwrap();
        assert_eq!(resp.data.len(), 2);
        assert_eq!(resp.meta.page, 1);
        assert_eq!(resp.meta.total_page, 3);
    }
}
