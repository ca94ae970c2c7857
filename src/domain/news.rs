// src/domain/news.rs
use crate::errors::ServerError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct News {
    pub id: String,
    pub title: String,
    pub thumbnail: String,
    pub content: String,
    pub images: Vec<String>,
    pub created_at: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewsData {
    pub title: String,
    #[serde(default)]
    pub thumbnail: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub images: Vec<String>,
}

impl NewsData {
    pub fn validate(&self) -> Result<(), ServerError> {
        if self.title.trim().is_empty() {
            return Err(ServerError::BadRequest("news title is required".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewsPatch {
    pub title: Option<String>,
    pub thumbnail: Option<String>,
    pub content: Option<String>,
    pub images: Option<Vec<String>>,
}

impl NewsPatch {
    pub fn apply(self, news: &mut News) -> Result<(), ServerError> {
        if let Some(title) = self.title {
            if title.trim().is_empty() {
                return Err(ServerError::BadRequest("news title is required".into()));
            }
            news.title = title;
        }
        if let Some(v) = self.thumbnail {
            news.thumbnail = v;
        }
        if let Some(v) = self.content {
            news.content = v;
        }
        if let Some(v) = self.images {
            news.images = v;
        }
        Ok(())
    }
}
