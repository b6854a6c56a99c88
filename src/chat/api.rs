//! 会话消息 HTTP API 客户端
//!
//! 负责历史消息分页拉取和带附件的消息创建（multipart）

use crate::chat::message::types::ChatMessage;
use crate::chat::types::{handle_http_response, PagedMessagesResp};
use anyhow::{Context, Result};
use reqwest::multipart;
use tracing::{debug, info};
use uuid::Uuid;

/// 待上传的附件文件
#[derive(Debug, Clone)]
pub struct AttachmentFile {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// 会话消息相关的 HTTP API 客户端
pub struct ChatApi {
    client: reqwest::Client,
    api_base_url: String,
}

impl ChatApi {
    /// 创建新的消息 API 客户端
    ///
    /// `client` 应该已经在外部配置好认证拦截器（token 通过 default_headers 自动添加）
    pub fn new(client: reqwest::Client, api_base_url: String) -> Self {
        Self {
            client,
            api_base_url,
        }
    }

    /// 拉取一页历史消息
    ///
    /// 服务端按页内新消息在前返回，合并进视图前由调用方反转。
    pub async fn get_messages(
        &self,
        conversation_id: &str,
        page: u32,
        limit: u32,
        search: &str,
    ) -> Result<PagedMessagesResp> {
        let operation_id = Uuid::new_v4().to_string();
        let url = format!("{}/chat/messages", self.api_base_url);

        info!(
            "[ChatAPI] 📡 拉取历史消息: conversationId={}, page={}, limit={}",
            conversation_id, page, limit
        );
        debug!(
            "[ChatAPI]   请求URL: {}, 搜索词: {:?}, 操作ID: {}",
            url, search, operation_id
        );

        let mut query: Vec<(&str, String)> = vec![
            ("conversationId", conversation_id.to_string()),
            ("page", page.to_string()),
            ("limit", limit.to_string()),
        ];
        if !search.is_empty() {
            query.push(("search", search.to_string()));
        }

        let response = self
            .client
            .get(&url)
            .header("operationID", &operation_id)
            .query(&query)
            .send()
            .await
            .context("请求失败")?;

        let resp = handle_http_response::<PagedMessagesResp>(response, "历史消息拉取").await?;

        info!(
            "[ChatAPI] ✅ 历史消息响应: {} 条, page={}/{}",
            resp.data.len(),
            resp.meta.page,
            resp.meta.total_page
        );

        Ok(resp)
    }

    /// 创建带附件的消息（multipart 提交）
    ///
    /// 字段：`data` 为 `{"text": ...}` JSON，附件按顺序以 `attachments` 字段上传。
    /// 创建成功的消息通过推送通道广播回来进入视图，不依赖本响应。
    pub async fn create_message(
        &self,
        conversation_id: &str,
        text: &str,
        attachments: Vec<AttachmentFile>,
    ) -> Result<ChatMessage> {
        let operation_id = Uuid::new_v4().to_string();
        let url = format!("{}/chat/messages/{}", self.api_base_url, conversation_id);

        info!(
            "[ChatAPI] 📡 提交消息: conversationId={}, 附件数={}",
            conversation_id,
            attachments.len()
        );

        let meta = serde_json::json!({ "text": text });
        let mut form = multipart::Form::new().text("data", meta.to_string());
        for attachment in attachments {
            let part = multipart::Part::bytes(attachment.bytes)
                .mime_str(&attachment.mime_type)
                .context("附件 MIME 类型无效")?
                .file_name(attachment.file_name);
            form = form.part("attachments", part);
        }

        let response = self
            .client
            .post(&url)
            .header("operationID", &operation_id)
            .multipart(form)
            .send()
            .await
            .context("请求失败")?;

        let created = handle_http_response::<ChatMessage>(response, "消息创建").await?;

        info!("[ChatAPI] ✅ 消息创建成功: id={:?}", created.id);
        Ok(created)
    }
}
