// src/domain/feedback.rs
use crate::errors::ServerError;
use serde::{Deserialize, Serialize};

pub const STATUS_NEW: &str = "Mới";
pub const STATUS_HANDLED: &str = "Đã xử lý";
const FALLBACK_TYPE_NAME: &str = "Tin báo khác";
const ANONYMOUS_NAME: &str = "Người dân";

#[derive(Debug, Clone, Copy, Serialize)]
pub struct FeedbackType {
    pub id: u32,
    pub title: &'static str,
    pub order: u32,
}

const FEEDBACK_TYPES: [(u32, &str); 12] = [
    (1, "An ninh trật tự đô thị"),
    (2, "An toàn giao thông"),
    (3, "Hạ tầng đô thị, đất đai, xây dựng"),
    (4, "Ô nhiễm môi trường"),
    (5, "An toàn thực phẩm"),
    (6, "Y tế, sức khỏe"),
    (7, "Công vụ, công chức, hành chính"),
    (8, "Vướng mắc doanh nghiệp"),
    (9, "Hàng hóa, tiêu dùng, dịch vụ"),
    (10, "Phản hồi thông tin báo chí"),
    (11, "Trẻ em, giáo dục"),
    (12, "Các vấn đề khác"),
];

pub fn feedback_types() -> Vec<FeedbackType> {
    FEEDBACK_TYPES
        .iter()
        .map(|&(id, title)| FeedbackType { id, title, order: id })
        .collect()
}

pub fn feedback_type_name(id: u32) -> &'static str {
    FEEDBACK_TYPES
        .iter()
        .find(|(tid, _)| *tid == id)
        .map(|(_, title)| *title)
        .unwrap_or(FALLBACK_TYPE_NAME)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: String,
    pub longitude: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    pub id: String,
    pub title: String,
    pub content: String,
    pub full_name: String,
    pub address: String,
    pub phone_number: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub image_urls: Vec<String>,
    pub location: Option<Location>,
    pub response: String,
    pub status: String,
    pub creation_time: i64,
    pub response_time: Option<i64>,
}

/// Form input from a citizen.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFeedback {
    pub content: String,
    #[serde(alias = "feedBackTypeId")]
    pub feedback_type_id: u32,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub image_urls: Vec<String>,
    #[serde(default)]
    pub location: Option<Location>,
}

impl NewFeedback {
    pub fn validate(&self) -> Result<(), ServerError> {
        if self.content.trim().is_empty() {
            return Err(ServerError::BadRequest("feedback content is required".into()));
        }
        if self.feedback_type_id == 0 {
            return Err(ServerError::BadRequest("feedback type is required".into()));
        }
        Ok(())
    }

    pub fn title(&self) -> String {
        let name = self.full_name.trim();
        let name = if name.is_empty() { ANONYMOUS_NAME } else { name };
        format!("Phản ánh từ {name}")
    }

    /// Key the rate limiter counts against.
    pub fn submitter_key(&self, caller_id: Option<&str>) -> String {
        match caller_id {
            Some(id) => id.to_string(),
            None => format!("phone:{}", self.phone_number.trim()),
        }
    }

    pub fn into_feedback(self, id: String, now: i64) -> Feedback {
        Feedback {
            id,
            title: self.title(),
            kind: feedback_type_name(self.feedback_type_id).to_string(),
            content: self.content,
            full_name: self.full_name,
            address: self.address,
            phone_number: self.phone_number,
            image_urls: self.image_urls,
            location: self.location,
            response: String::new(),
            status: STATUS_NEW.to_string(),
            creation_time: now,
            response_time: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeedbackReply {
    pub response: String,
}
