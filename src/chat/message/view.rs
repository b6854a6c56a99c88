//! 会话消息视图维护
//!
//! 单个会话的有序、去重消息列表，由两个异步来源共同喂入：
//! 分页的历史拉取（页内新消息在前，合并前需反转）和实时推送流。
//! 本模块是纯状态机，不做任何 I/O，锁由上层 `ChatClient` 持有。

use crate::chat::message::grouping::{group_by_day, DayGroup};
use crate::chat::message::types::{ChatMessage, ParticipantProfile};
use std::collections::HashMap;
use tracing::{debug, warn};

/// 单个会话的消息视图
///
/// 生命周期与会话页面一致：打开会话时创建，切换会话或关闭时丢弃，
/// 不做任何本地持久化。
#[derive(Debug, Default)]
pub struct ConversationView {
    /// 会话 ID
    conversation_id: String,
    /// 按 createdAt 升序维护的消息列表
    messages: Vec<ChatMessage>,
    /// 已合并的历史页码（1 起始）
    page: u32,
    /// 是否还有更早的历史页
    has_more: bool,
    /// 搜索词（变更时强制回到第 1 页）
    search: String,
    /// 本地登录用户的展开记录（参与者缓存的一部分）
    local_user: Option<ParticipantProfile>,
}

impl ConversationView {
    /// 创建指定会话的空视图
    pub fn new(conversation_id: impl Into<String>) -> Self {
        Self {
            conversation_id: conversation_id.into(),
            ..Default::default()
        }
    }

    pub fn conversation_id(&self) -> &str {
        &self.conversation_id
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    /// 注册本地用户记录（用于参与者缓存解析自己发的裸 ID 消息）
    pub fn set_local_user(&mut self, profile: ParticipantProfile) {
        self.local_user = Some(profile);
    }

    /// 切换会话：清空列表与分页游标
    pub fn switch_conversation(&mut self, conversation_id: impl Into<String>) {
        self.conversation_id = conversation_id.into();
        self.messages.clear();
        self.page = 0;
        self.has_more = false;
        self.search.clear();
    }

    /// 变更搜索词：返回是否需要重新拉取第 1 页
    ///
    /// 搜索词变化会清空当前列表并把分页游标重置回第 1 页。
    pub fn set_search(&mut self, search: impl Into<String>) -> bool {
        let search = search.into();
        if search == self.search {
            return false;
        }
        self.search = search;
        self.messages.clear();
        self.page = 0;
        self.has_more = false;
        true
    }

    /// 合并一页历史拉取结果
    ///
    /// - `fetched_page`: 本次请求的页码（1 起始），决定替换还是前插
    /// - `newest_first`: 页内消息，服务端按新消息在前返回
    /// - `current_page` / `total_pages`: 服务端报告的分页元信息，
    ///   `has_more` 按 `current_page < total_pages` 重新计算
    ///
    /// 第 1 页整体替换列表；后续页（加载更早消息）反转后前插，绝不替换。
    /// 拉取失败不会调用本方法，视图不会被部分合并污染。
    pub fn apply_history_page(
        &mut self,
        fetched_page: u32,
        newest_first: Vec<ChatMessage>,
        current_page: u32,
        total_pages: u32,
    ) {
        let mut chronological = newest_first;
        chronological.reverse();

        if fetched_page <= 1 {
            debug!(
                "[View] 第 1 页替换列表: {} 条 (conversationId={})",
                chronological.len(),
                self.conversation_id
            );
            self.messages = chronological;
        } else {
            debug!(
                "[View] 第 {} 页前插: {} 条 (conversationId={})",
                fetched_page,
                chronological.len(),
                self.conversation_id
            );
            chronological.extend(self.messages.drain(..));
            self.messages = chronological;
        }

        self.page = fetched_page.max(1);
        // 服务端报告的当前页缺失时按请求页兜底
        let current = if current_page > 0 { current_page } else { self.page };
        self.has_more = current < total_pages;
    }

    /// 合并一条推送事件消息
    ///
    /// 返回 `true` 表示已追加，`false` 表示判定为重复被静默丢弃。
    /// 重复判定规则：
    /// - 双方都有非空 ID 时比较 ID；
    /// - 无法比较 ID 时，text 和 createdAt 完全一致才算重复。
    /// 推送事件默认比现有列表中的任何消息都新，直接追加到末尾，
    /// 即使历史拉取尚未完成（空列表）也同样适用。
    pub fn apply_push(&mut self, message: ChatMessage) -> bool {
        if self.is_duplicate(&message) {
            debug!(
                "[View] 推送消息重复，丢弃: id={:?} text={}",
                message.id, message.text
            );
            return false;
        }
        self.messages.push(message);
        true
    }

    fn is_duplicate(&self, incoming: &ChatMessage) -> bool {
        self.messages
            .iter()
            .any(|existing| same_message(existing, incoming))
    }

    /// 按天分组投影（纯派生，不是独立状态）
    pub fn day_groups(&self) -> Vec<DayGroup> {
        group_by_day(&self.messages, chrono::Utc::now())
    }

    /// 参与者缓存：从当前消息列表（含展开的 sender/receiver 记录）
    /// 加上本地用户记录重新计算，而不是增量维护的全局表，
    /// 避免切换会话后残留过期条目。
    pub fn participants(&self) -> HashMap<String, ParticipantProfile> {
        let mut cache = HashMap::new();
        if let Some(local) = &self.local_user {
            if !local.id.is_empty() {
                cache.insert(local.id.clone(), local.clone());
            }
        }
        for msg in &self.messages {
            for party in std::iter::once(&msg.sender).chain(msg.receiver.iter()) {
                if let Some(profile) = party.profile() {
                    if profile.id.is_empty() {
                        warn!("[View] 跳过无 ID 的参与者记录: name={}", profile.name);
                        continue;
                    }
                    cache.insert(profile.id.clone(), profile.clone());
                }
            }
        }
        cache
    }

    /// 按 ID 解析参与者展示信息
    pub fn resolve_participant(&self, id: &str) -> Option<ParticipantProfile> {
        self.participants().remove(id)
    }
}

/// 判定两条消息是否指向同一条逻辑消息
fn same_message(a: &ChatMessage, b: &ChatMessage) -> bool {
    match (&a.id, &b.id) {
        (Some(x), Some(y)) if !x.is_empty() && !y.is_empty() => x == y,
        // 任一方缺 ID 时退化为 text + createdAt 精确比较
        _ => a.text == b.text && a.created_at == b.created_at,
    }
}
