//! 消息数据结构定义
//!
//! 服务端返回的消息字段并不稳定：sender/receiver 可能是裸 ID 字符串，
//! 也可能是展开后的参与者对象；推送事件还可能缺字段。
//! 因此所有字段都带 `#[serde(default)]`，缺失时宽松处理而不是解析失败。

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// 参与者展开记录（ID + 昵称 + 头像）
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ParticipantProfile {
    #[serde(rename = "id", alias = "_id", default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub avatar: String,
}

/// 参与者引用：裸 ID 或展开对象二选一
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum PartyRef {
    /// 展开的参与者记录
    Profile(ParticipantProfile),
    /// 裸参与者 ID
    Id(String),
}

impl PartyRef {
    /// 取参与者 ID（两种表示统一）
    pub fn party_id(&self) -> &str {
        match self {
            PartyRef::Id(id) => id,
            PartyRef::Profile(p) => &p.id,
        }
    }

    /// 取展开记录（仅展开表示有）
    pub fn profile(&self) -> Option<&ParticipantProfile> {
        match self {
            PartyRef::Id(_) => None,
            PartyRef::Profile(p) => Some(p),
        }
    }
}

impl Default for PartyRef {
    fn default() -> Self {
        PartyRef::Id(String::new())
    }
}

/// 单条会话消息
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    /// 消息 ID（本地发出、尚未确认的消息没有 ID）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// 发送方
    #[serde(rename = "senderId", default)]
    pub sender: PartyRef,
    /// 接收方（可能缺失）
    #[serde(rename = "receiverId", default, skip_serializing_if = "Option::is_none")]
    pub receiver: Option<PartyRef>,
    /// 文本内容（纯附件消息可以为空）
    #[serde(default)]
    pub text: String,
    /// 附件引用列表（例如图片 URL）
    #[serde(default)]
    pub attachments: Vec<String>,
    /// 创建时间字符串，用于排序和按天分组
    #[serde(default)]
    pub created_at: String,
}

impl ChatMessage {
    /// 解析创建时间（优先 RFC3339，兼容 `YYYY-MM-DD HH:MM:SS`）
    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        parse_created_at(&self.created_at)
    }
}

/// 解析消息时间戳字符串
pub fn parse_created_at(raw: &str) -> Option<DateTime<Utc>> {
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(naive.and_utc());
    }
    None
}
