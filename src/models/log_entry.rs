//! 出入日志记录

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::models::Record;
use crate::models::student::Student;

/// 出入类型
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MovementKind {
    /// 进入
    #[serde(alias = "Entry")]
    Entry,
    /// 离开
    #[serde(alias = "Exit")]
    Exit,
}

impl fmt::Display for MovementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MovementKind::Entry => write!(f, "entry"),
            MovementKind::Exit => write!(f, "exit"),
        }
    }
}

/// 日志实体
///
/// 日志可能由外部写入方产生，除 `student_id` 外的字段都不做解释，按原样读写。
/// 本服务写入的日志带有 `id`、`student_id`、`name`、`register_no`
/// 以及进入侧和离开侧各自的时间与状态。
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct LogEntry {
    fields: Map<String, Value>,
}

impl LogEntry {
    /// 为学生创建一条空日志
    pub fn for_student(id: u64, student: &Student) -> Self {
        let mut fields = Map::new();
        fields.insert("id".to_string(), Value::from(id));
        fields.insert(
            "student_id".to_string(),
            student.get("id").cloned().unwrap_or(Value::Null),
        );
        for key in ["name", "register_no"] {
            if let Some(value) = student.get(key) {
                fields.insert(key.to_string(), value.clone());
            }
        }
        Self { fields }
    }

    /// 日志 ID，缺失或不是非负整数时为 `None`
    pub fn id(&self) -> Option<u64> {
        self.fields.get("id").and_then(Value::as_u64)
    }

    /// 按原样读取字段
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// 是否属于该学生
    ///
    /// 按 JSON 数值相等判断：`1`、`1.0` 和 `true` 都等于 1，字符串 `"1"` 不等于 1。
    pub fn belongs_to(&self, student_id: u64) -> bool {
        match self.fields.get("student_id") {
            Some(Value::Number(n)) => match n.as_u64() {
                Some(v) => v == student_id,
                None => n.is_f64() && n.as_f64() == Some(student_id as f64),
            },
            Some(Value::Bool(b)) => u64::from(*b) == student_id,
            _ => false,
        }
    }

    /// 记录进入
    pub fn mark_entry(&mut self, at: DateTime<Utc>, status: Option<String>) {
        self.mark("entry_time", "entry_status", at, status);
    }

    /// 记录离开
    pub fn mark_exit(&mut self, at: DateTime<Utc>, status: Option<String>) {
        self.mark("exit_time", "exit_status", at, status);
    }

    fn mark(&mut self, time_key: &str, status_key: &str, at: DateTime<Utc>, status: Option<String>) {
        self.fields
            .insert(time_key.to_string(), Value::String(format_time(at)));
        if let Some(status) = status {
            self.fields
                .insert(status_key.to_string(), Value::String(status));
        }
    }

    /// 已进入且尚未离开
    pub fn is_open(&self) -> bool {
        let present = |key: &str| self.fields.get(key).is_some_and(|v| !v.is_null());
        present("entry_time") && !present("exit_time")
    }
}

impl Record for LogEntry {
    fn id(&self) -> Option<u64> {
        LogEntry::id(self)
    }

    fn set_id(&mut self, id: u64) {
        self.fields.insert("id".to_string(), Value::from(id));
    }
}

fn format_time(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn student() -> Student {
        serde_json::from_value(json!({
            "id": 3, "name": "A", "register_no": 1, "room_no": "101", "course": "CS"
        }))
        .unwrap()
    }

    fn log(value: Value) -> LogEntry {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_entry_then_exit_closes_log() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 21, 30, 0).unwrap();
        let mut entry = LogEntry::for_student(1, &student());
        entry.mark_entry(at, Some("On Time".into()));
        assert!(entry.is_open());
        assert_eq!(entry.get("entry_time"), Some(&json!("2024-05-01T21:30:00Z")));

        entry.mark_exit(at + chrono::Duration::hours(1), None);
        assert!(!entry.is_open());
        assert_eq!(
            serde_json::to_string(&entry).unwrap(),
            r#"{"id":1,"student_id":3,"name":"A","register_no":1,"entry_time":"2024-05-01T21:30:00Z","entry_status":"On Time","exit_time":"2024-05-01T22:30:00Z"}"#
        );
    }

    #[test]
    fn test_external_shapes_round_trip_unchanged() {
        for raw in [
            r#"{"student_id":1,"action":"in"}"#,
            r#"{"student_id":1,"entry_time":1714597800}"#,
            r#"{"action":"heartbeat"}"#,
            r#"{"student_id":"1"}"#,
        ] {
            let entry: LogEntry = serde_json::from_str(raw).unwrap();
            assert_eq!(entry.id(), None);
            assert_eq!(serde_json::to_string(&entry).unwrap(), raw);
        }
    }

    #[test]
    fn test_belongs_to_uses_numeric_equality() {
        assert!(log(json!({"student_id": 1})).belongs_to(1));
        assert!(log(json!({"student_id": 1.0})).belongs_to(1));
        assert!(log(json!({"student_id": true})).belongs_to(1));
        assert!(!log(json!({"student_id": "1"})).belongs_to(1));
        assert!(!log(json!({"student_id": 1.5})).belongs_to(1));
        assert!(!log(json!({"student_id": -1})).belongs_to(1));
        assert!(!log(json!({"action": "heartbeat"})).belongs_to(1));
    }

    #[test]
    fn test_numeric_entry_time_still_counts_as_open() {
        assert!(log(json!({"student_id": 1, "entry_time": 1714597800})).is_open());
        assert!(!log(json!({"student_id": 1, "entry_time": null})).is_open());
    }

    #[test]
    fn test_movement_kind_accepts_client_casing() {
        let kind: MovementKind = serde_json::from_str("\"Entry\"").unwrap();
        assert_eq!(kind, MovementKind::Entry);
        let kind: MovementKind = serde_json::from_str("\"exit\"").unwrap();
        assert_eq!(kind, MovementKind::Exit);
    }
}
