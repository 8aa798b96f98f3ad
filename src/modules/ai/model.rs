use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use examguard_core::serde::deserialize_optional_trimmed;

pub const DEFAULT_TOPIC: &str = "General";
pub const DEFAULT_DIFFICULTY: &str = "medium";
pub const DEFAULT_COUNT: i64 = 10;
pub const MAX_COUNT: i64 = 50;

const CHOICES: [&str; 4] = ["A", "B", "C", "D"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct QuizQuestion {
    pub id: String,
    pub q: String,
    pub choices: Vec<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AiQuiz {
    pub id: Uuid,
    pub topic: String,
    pub difficulty: String,
    pub count: i32,
    #[schema(value_type = Vec<QuizQuestion>)]
    pub questions: Json<Vec<QuizQuestion>>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct GenerateQuizRequest {
    #[serde(default, deserialize_with = "deserialize_optional_trimmed")]
    pub topic: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_trimmed")]
    pub difficulty: Option<String>,
    /// Clamped to 1..=50.
    #[serde(default)]
    pub count: Option<i64>,
}

impl GenerateQuizRequest {
    pub fn topic(&self) -> &str {
        self.topic.as_deref().unwrap_or(DEFAULT_TOPIC)
    }

    pub fn difficulty(&self) -> &str {
        self.difficulty.as_deref().unwrap_or(DEFAULT_DIFFICULTY)
    }

    pub fn count(&self) -> usize {
        self.count.unwrap_or(DEFAULT_COUNT).clamp(1, MAX_COUNT) as usize
    }
}

/// Placeholder questions; no model is consulted.
pub fn placeholder_questions(topic: &str, difficulty: &str, count: usize) -> Vec<QuizQuestion> {
    let stamp = Utc::now().timestamp_millis();
    (1..=count)
        .map(|i| QuizQuestion {
            id: format!("AI-{}-{}", stamp, i),
            q: format!("{} - AI generated question {} ({})", topic, i, difficulty),
            choices: CHOICES.iter().map(|c| c.to_string()).collect(),
        })
        .collect()
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GeneratedQuizResponse {
    pub ok: bool,
    pub id: Uuid,
    pub topic: String,
    pub difficulty: String,
    pub count: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct QuizResponse {
    pub ok: bool,
    pub quiz: AiQuiz,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let dto: GenerateQuizRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(dto.topic(), "General");
        assert_eq!(dto.difficulty(), "medium");
        assert_eq!(dto.count(), 10);
    }

    #[test]
    fn test_count_is_clamped() {
        let many = GenerateQuizRequest {
            count: Some(500),
            ..Default::default()
        };
        assert_eq!(many.count(), 50);

        let none = GenerateQuizRequest {
            count: Some(-4),
            ..Default::default()
        };
        assert_eq!(none.count(), 1);
    }

    #[test]
    fn test_placeholder_question_shape() {
        let questions = placeholder_questions("Biology", "hard", 3);
        assert_eq!(questions.len(), 3);
        assert_eq!(questions[0].q, "Biology - AI generated question 1 (hard)");
        assert!(questions[2].id.starts_with("AI-"));
        assert!(questions[2].id.ends_with("-3"));
        assert_eq!(questions[1].choices, vec!["A", "B", "C", "D"]);
    }
}
