//! 表单提取器
//!
//! 新增与修改学生接口接收表单：multipart 与 urlencoded 是客户端实际使用的格式，
//! 另外也接受 JSON 对象。没有请求体时视为空表单。

use axum::{
    Form, Json, async_trait,
    extract::{FromRequest, Multipart, Request},
    http::header::CONTENT_TYPE,
};
use serde_json::Value;
use std::collections::HashMap;

use crate::error::AppError;
use crate::models::{StudentDraft, StudentUpdate};

/// 表单字段，同名字段只保留第一个值
#[derive(Debug, Default, Clone, PartialEq)]
pub struct FormFields(pub HashMap<String, String>);

impl FormFields {
    fn insert_first(&mut self, name: String, value: String) {
        self.0.entry(name).or_insert(value);
    }

    /// 取出字段
    pub fn take(&mut self, name: &str) -> Option<String> {
        self.0.remove(name)
    }

    /// 转成新建学生草稿
    pub fn into_draft(mut self) -> StudentDraft {
        StudentDraft {
            name: self.take("name"),
            register_no: self.take("register_no"),
            room_no: self.take("room_no"),
            course: self.take("course"),
        }
    }

    /// 转成学生字段更新
    pub fn into_update(mut self) -> StudentUpdate {
        StudentUpdate {
            name: self.take("name"),
            register_no: self.take("register_no"),
            room_no: self.take("room_no"),
            course: self.take("course"),
        }
    }
}

#[async_trait]
impl<S> FromRequest<S> for FormFields
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        let mut fields = FormFields::default();

        if content_type.starts_with("multipart/form-data") {
            let mut multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| AppError::Validation(e.body_text()))?;
            while let Some(field) = multipart
                .next_field()
                .await
                .map_err(|e| AppError::Validation(e.body_text()))?
            {
                let Some(name) = field.name().map(str::to_string) else {
                    continue;
                };
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(e.body_text()))?;
                fields.insert_first(name, value);
            }
        } else if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(pairs) = Form::<Vec<(String, String)>>::from_request(req, state)
                .await
                .map_err(|e| AppError::Validation(e.body_text()))?;
            for (name, value) in pairs {
                fields.insert_first(name, value);
            }
        } else if content_type.starts_with("application/json") {
            let Json(object) = Json::<serde_json::Map<String, Value>>::from_request(req, state)
                .await
                .map_err(|e| AppError::Validation(e.body_text()))?;
            for (name, value) in object {
                match value {
                    Value::Null => {}
                    Value::String(s) => fields.insert_first(name, s),
                    Value::Number(n) => fields.insert_first(name, n.to_string()),
                    Value::Bool(b) => fields.insert_first(name, b.to_string()),
                    Value::Array(_) | Value::Object(_) => {
                        return Err(AppError::Validation(format!(
                            "Field {} must be text",
                            name
                        )));
                    }
                }
            }
        }

        Ok(fields)
    }
}
