// src/domain/report.rs
use crate::errors::ServerError;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

pub const ACTION_CREATED: &str = "created";
pub const OVERDUE: &str = "overdue";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Pending,
    InProgress,
    Submitted,
    Approved,
    Rejected,
}

impl ReportStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ReportStatus::Pending => "pending",
            ReportStatus::InProgress => "in_progress",
            ReportStatus::Submitted => "submitted",
            ReportStatus::Approved => "approved",
            ReportStatus::Rejected => "rejected",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "pending" => Some(ReportStatus::Pending),
            "in_progress" => Some(ReportStatus::InProgress),
            "submitted" => Some(ReportStatus::Submitted),
            "approved" => Some(ReportStatus::Approved),
            "rejected" => Some(ReportStatus::Rejected),
            _ => None,
        }
    }

    /// Display label used in exports.
    pub fn label(self) -> &'static str {
        match self {
            ReportStatus::Pending => "Chờ làm",
            ReportStatus::InProgress => "Đang làm",
            ReportStatus::Submitted => "Chờ duyệt",
            ReportStatus::Approved => "Đã duyệt",
            ReportStatus::Rejected => "Bị từ chối",
        }
    }

    /// History action recorded when a report enters this status.
    pub fn history_action(self) -> &'static str {
        match self {
            ReportStatus::Pending => "Chờ làm",
            ReportStatus::InProgress => "Bắt đầu thực hiện",
            ReportStatus::Submitted => "Nộp báo cáo",
            ReportStatus::Approved => "Đã duyệt",
            ReportStatus::Rejected => "Đã từ chối",
        }
    }

    /// Transitions reachable through a plain status update.
    /// Submission carries answers and goes through [`ReportStatus::accepts_submission`].
    pub fn can_update_to(self, next: ReportStatus) -> bool {
        use ReportStatus::*;
        matches!(
            (self, next),
            (Pending, InProgress)
                | (Rejected, InProgress)
                | (Submitted, Approved)
                | (Submitted, Rejected)
        )
    }

    pub fn accepts_submission(self) -> bool {
        matches!(
            self,
            ReportStatus::Pending | ReportStatus::InProgress | ReportStatus::Rejected
        )
    }

    /// Review decisions stamp the completion time.
    pub fn is_review_outcome(self) -> bool {
        matches!(self, ReportStatus::Approved | ReportStatus::Rejected)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "low" => Some(Priority::Low),
            "medium" => Some(Priority::Medium),
            "high" => Some(Priority::High),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Priority::Low => "Thấp",
            Priority::Medium => "Trung bình",
            Priority::High => "Cao",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    ShortAnswer,
    SingleChoice,
    MultipleChoice,
}

impl QuestionType {
    pub fn label(self) -> &'static str {
        match self {
            QuestionType::ShortAnswer => "Trả lời ngắn",
            QuestionType::SingleChoice => "Trắc nghiệm (chọn 1)",
            QuestionType::MultipleChoice => "Trắc nghiệm (chọn nhiều)",
        }
    }

    pub fn is_choice(self) -> bool {
        !matches!(self, QuestionType::ShortAnswer)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionOption {
    pub id: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    pub text: String,
    #[serde(rename = "type")]
    pub kind: QuestionType,
    #[serde(default)]
    pub is_required: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<QuestionOption>,
}

impl Question {
    pub fn option_label(&self, option_id: &str) -> Option<&str> {
        self.options
            .iter()
            .find(|o| o.id == option_id)
            .map(|o| o.value.as_str())
    }

    fn has_option(&self, option_id: &str) -> bool {
        self.options.iter().any(|o| o.id == option_id)
    }
}

/// One submitted answer. The tag is stored explicitly instead of being
/// inferred from the question type at read time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Answer {
    Text {
        #[serde(rename = "questionId")]
        question_id: String,
        value: String,
    },
    Multi {
        #[serde(rename = "questionId")]
        question_id: String,
        value: Vec<String>,
    },
}

impl Answer {
    pub fn question_id(&self) -> &str {
        match self {
            Answer::Text { question_id, .. } | Answer::Multi { question_id, .. } => question_id,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Answer::Text { value, .. } => value.trim().is_empty(),
            Answer::Multi { value, .. } => value.is_empty(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub identity: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub action: String,
    pub actor: Actor,
    pub timestamp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub tdp_id: String,
    pub leader_identity: String,
    pub tdp_name: String,
    pub leader_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: String,
    pub title: String,
    pub priority: Priority,
    pub due_date: i64,
    pub questions: Vec<Question>,
    pub assigned_to: Assignment,
    pub assigned_by: Actor,
    pub status: ReportStatus,
    pub submitted_answers: Vec<Answer>,
    pub submitted_at: Option<i64>,
    pub completed_at: Option<i64>,
    pub history: Vec<HistoryEntry>,
    pub created_at: i64,
    pub version: i64,
}

impl Report {
    /// Derived, never persisted.
    pub fn is_overdue(&self, now: i64) -> bool {
        self.status != ReportStatus::Approved && now > self.due_date
    }

    pub fn display_status(&self, now: i64) -> &'static str {
        if self.is_overdue(now) {
            OVERDUE
        } else {
            self.status.as_str()
        }
    }

    pub fn answer_for(&self, question_id: &str) -> Option<&Answer> {
        self.submitted_answers
            .iter()
            .find(|a| a.question_id() == question_id)
    }
}

/// The part of a report request that is copied verbatim into every
/// per-TDP report.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportTemplate {
    pub title: String,
    #[serde(default)]
    pub priority: Priority,
    pub due_date: i64,
    #[serde(default)]
    pub questions: Vec<Question>,
}

impl ReportTemplate {
    pub fn validate(&self) -> Result<(), ServerError> {
        if self.title.trim().is_empty() {
            return Err(ServerError::BadRequest("report title is required".into()));
        }

        let mut seen = HashSet::new();
        for q in &self.questions {
            if q.id.trim().is_empty() {
                return Err(ServerError::BadRequest("question id is required".into()));
            }
            if !seen.insert(q.id.as_str()) {
                return Err(ServerError::BadRequest(format!("duplicate question id '{}'", q.id)));
            }
            if q.text.trim().is_empty() {
                return Err(ServerError::BadRequest(format!("question '{}' has no text", q.id)));
            }
            if q.kind.is_choice() && q.options.is_empty() {
                return Err(ServerError::BadRequest(format!(
                    "choice question '{}' needs at least one option",
                    q.id
                )));
            }
        }
        Ok(())
    }
}

/// Check a submission against the report's questions.
pub fn validate_answers(questions: &[Question], answers: &[Answer]) -> Result<(), ServerError> {
    let by_id: HashMap<&str, &Question> = questions.iter().map(|q| (q.id.as_str(), q)).collect();
    let mut answered = HashSet::new();

    for answer in answers {
        let qid = answer.question_id();
        let question = by_id
            .get(qid)
            .ok_or_else(|| ServerError::BadRequest(format!("unknown question '{qid}'")))?;

        if !answered.insert(qid) {
            return Err(ServerError::BadRequest(format!("question '{qid}' answered twice")));
        }

        match (question.kind, answer) {
            (QuestionType::ShortAnswer, Answer::Text { .. }) => {}
            (QuestionType::SingleChoice, Answer::Text { value, .. }) => {
                if !value.is_empty() && !question.has_option(value) {
                    return Err(ServerError::BadRequest(format!(
                        "'{value}' is not an option of question '{qid}'"
                    )));
                }
            }
            (QuestionType::MultipleChoice, Answer::Multi { value, .. }) => {
                if let Some(bad) = value.iter().find(|v| !question.has_option(v)) {
                    return Err(ServerError::BadRequest(format!(
                        "'{bad}' is not an option of question '{qid}'"
                    )));
                }
            }
            _ => {
                return Err(ServerError::BadRequest(format!(
                    "answer kind does not match type of question '{qid}'"
                )));
            }
        }
    }

    for q in questions.iter().filter(|q| q.is_required) {
        let filled = answers
            .iter()
            .any(|a| a.question_id() == q.id && !a.is_empty());
        if !filled {
            return Err(ServerError::BadRequest(format!(
                "required question '{}' is not answered",
                q.id
            )));
        }
    }

    Ok(())
}
