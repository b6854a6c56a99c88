//! 消息按天分组投影
//!
//! 对按时间升序的消息列表做纯投影，不持有独立状态。
//! 分组标签：今天 / 昨天 / 具体日期。

use crate::chat::message::types::ChatMessage;
use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};

/// 分组标签
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayLabel {
    Today,
    Yesterday,
    Date(NaiveDate),
}

impl std::fmt::Display for DayLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DayLabel::Today => write!(f, "今天"),
            DayLabel::Yesterday => write!(f, "昨天"),
            DayLabel::Date(d) => write!(f, "{}年{}月{}日", d.year(), d.month(), d.day()),
        }
    }
}

/// 一个自然日的消息分组
#[derive(Debug, Clone)]
pub struct DayGroup {
    pub day: NaiveDate,
    pub label: DayLabel,
    pub messages: Vec<ChatMessage>,
}

/// 把升序消息列表按自然日切分
///
/// 保持输入顺序，不排序、不丢条目：createdAt 无法解析的消息
/// 归入前一条消息所在的组；若是首条则按 `now` 当天处理。
pub fn group_by_day(messages: &[ChatMessage], now: DateTime<Utc>) -> Vec<DayGroup> {
    let today = now.date_naive();
    let yesterday = today - Duration::days(1);
    let label_of = |day: NaiveDate| {
        if day == today {
            DayLabel::Today
        } else if day == yesterday {
            DayLabel::Yesterday
        } else {
            DayLabel::Date(day)
        }
    };

    let mut groups: Vec<DayGroup> = Vec::new();
    for msg in messages {
        let day = msg
            .created_at_utc()
            .map(|dt| dt.date_naive())
            .or_else(|| groups.last().map(|g| g.day))
            .unwrap_or(today);

        match groups.last_mut() {
            Some(group) if group.day == day => group.messages.push(msg.clone()),
            _ => groups.push(DayGroup {
                day,
                label: label_of(day),
                messages: vec![msg.clone()],
            }),
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::message::types::PartyRef;

    fn msg(text: &str, created_at: &str) -> ChatMessage {
        ChatMessage {
            id: Some(text.to_string()),
            sender: PartyRef::Id("u_1".to_string()),
            receiver: None,
            text: text.to_string(),
            attachments: vec![],
            created_at: created_at.to_string(),
        }
    }

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-08-27T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn two_days_give_two_ordered_groups() {
        let msgs = vec![
            msg("A", "2026-08-26T09:00:00Z"),
            msg("B", "2026-08-26T10:00:00Z"),
            msg("C", "2026-08-27T08:00:00Z"),
        ];
        let groups = group_by_day(&msgs, now());
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].label, DayLabel::Yesterday);
        assert_eq!(groups[0].messages.len(), 2);
        assert_eq!(groups[1].label, DayLabel::Today);
        assert_eq!(groups[1].messages[0].text, "C");
        // 组内保持升序
        assert!(groups[0].messages[0].created_at <= groups[0].messages[1].created_at);
    }

    #[test]
    fn older_day_gets_absolute_date_label() {
        let msgs = vec![msg("A", "2026-01-05T09:00:00Z")];
        let groups = group_by_day(&msgs, now());
        assert_eq!(
            groups[0].label,
            DayLabel::Date(NaiveDate::from_ymd_opt(2026, 1, 5).unwrap())
        );
        assert_eq!(groups[0].label.to_string(), "2026年1月5日");
    }

    #[test]
    fn unparseable_timestamp_inherits_previous_group() {
        let msgs = vec![msg("A", "2026-08-26T09:00:00Z"), msg("B", "")];
        let groups = group_by_day(&msgs, now());
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].messages.len(), 2);
    }

    #[test]
    fn empty_list_gives_no_groups() {
        assert!(group_by_day(&[], now()).is_empty());
    }

    #[test]
    fn groups_recompute_from_list() {
        // 纯投影：同一列表两次计算结果一致
        let msgs = vec![msg("A", "2026-08-27T08:00:00Z")];
        let a = group_by_day(&msgs, now());
        let b = group_by_day(&msgs, now());
        assert_eq!(a.len(), b.len());
        assert_eq!(a[0].day, b[0].day);
    }
}
