//! 学生记录

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::models::Record;
use crate::models::text::{deserialize_opt_text, text_of};

/// 学生实体
///
/// 记录按原样保存为 JSON 对象：字段的类型、顺序以及未知字段都不做改写，
/// 只有被显式修改的字段才会变化。已知字段通过访问器读成文本。
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Student {
    fields: Map<String, Value>,
}

/// 新建学生的字段
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct StudentDraft {
    #[serde(deserialize_with = "deserialize_opt_text")]
    pub name: Option<String>,
    #[serde(deserialize_with = "deserialize_opt_text")]
    pub register_no: Option<String>,
    #[serde(deserialize_with = "deserialize_opt_text")]
    pub room_no: Option<String>,
    #[serde(deserialize_with = "deserialize_opt_text")]
    pub course: Option<String>,
}

/// 学生字段更新
///
/// `Some` 表示调用方显式提供了该字段（空字符串也算提供），`None` 表示保持原值。
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct StudentUpdate {
    #[serde(deserialize_with = "deserialize_opt_text")]
    pub name: Option<String>,
    #[serde(deserialize_with = "deserialize_opt_text")]
    pub register_no: Option<String>,
    #[serde(deserialize_with = "deserialize_opt_text")]
    pub room_no: Option<String>,
    #[serde(deserialize_with = "deserialize_opt_text")]
    pub course: Option<String>,
}

impl StudentUpdate {
    /// 是否没有任何字段
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.register_no.is_none()
            && self.room_no.is_none()
            && self.course.is_none()
    }
}

fn text_or_null(value: Option<String>) -> Value {
    value.map_or(Value::Null, Value::String)
}

impl Student {
    /// 用草稿创建学生，`id` 由存储层分配，未提供的字段写成 `null`
    pub fn from_draft(draft: StudentDraft) -> Self {
        let mut fields = Map::new();
        fields.insert("id".to_string(), Value::Null);
        fields.insert("name".to_string(), text_or_null(draft.name));
        fields.insert("register_no".to_string(), text_or_null(draft.register_no));
        fields.insert("room_no".to_string(), text_or_null(draft.room_no));
        fields.insert("course".to_string(), text_or_null(draft.course));
        Self { fields }
    }

    /// 学生 ID，不是非负整数时为 `None`
    pub fn id(&self) -> Option<u64> {
        self.fields.get("id").and_then(Value::as_u64)
    }

    /// 按原样读取字段
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// 字段的文本视图
    pub fn text(&self, key: &str) -> Option<String> {
        self.fields.get(key).and_then(text_of)
    }

    pub fn name(&self) -> Option<String> {
        self.text("name")
    }

    /// 学号，总是按文本比较
    pub fn register_no(&self) -> Option<String> {
        self.text("register_no")
    }

    pub fn room_no(&self) -> Option<String> {
        self.text("room_no")
    }

    pub fn course(&self) -> Option<String> {
        self.text("course")
    }

    /// 应用字段更新，未提供的字段和未知字段保持不变
    pub fn apply(&mut self, update: StudentUpdate) {
        let supplied = [
            ("name", update.name),
            ("register_no", update.register_no),
            ("room_no", update.room_no),
            ("course", update.course),
        ];
        for (key, value) in supplied {
            if let Some(value) = value {
                self.fields.insert(key.to_string(), Value::String(value));
            }
        }
    }

    /// 姓名与学号是否同时匹配
    pub fn matches_credentials(&self, name: Option<&str>, register_no: Option<&str>) -> bool {
        self.name().as_deref() == name && self.register_no().as_deref() == register_no
    }
}

impl Record for Student {
    fn id(&self) -> Option<u64> {
        Student::id(self)
    }

    fn set_id(&mut self, id: u64) {
        self.fields.insert("id".to_string(), Value::from(id));
    }
}
