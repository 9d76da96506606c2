use serde::{Deserialize, Serialize};

/// A trivia question in its public, formatted shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Question {
    pub id: i64,
    pub question: String,
    pub answer: String,
    /// Category id, stored as text.
    pub category: String,
    pub difficulty: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Category {
    pub id: i64,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub kind: String,
}

/// A JSON value that clients send either as a number or as a string.
///
/// Front-ends are inconsistent about category ids and difficulties (`1` vs `"1"`),
/// so both are accepted. Zero and blank strings count as absent.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Number(i64),
    Text(String),
}

impl Scalar {
    /// Text form as stored in `questions.category`.
    pub fn as_category(&self) -> Option<String> {
        match self {
            Scalar::Number(0) => None,
            Scalar::Number(n) => Some(n.to_string()),
            Scalar::Text(s) => {
                let s = s.trim();
                if s.is_empty() || s == "0" {
                    None
                } else {
                    Some(s.to_string())
                }
            }
        }
    }

    pub fn as_difficulty(&self) -> Option<i64> {
        let value = match self {
            Scalar::Number(n) => *n,
            Scalar::Text(s) => s.trim().parse().ok()?,
        };
        (value != 0).then_some(value)
    }
}

/// Body of `POST /questions`: either a search (`searchTerm`) or a new question.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct QuestionRequest {
    #[serde(rename = "searchTerm")]
    pub search_term: Option<String>,
    pub question: Option<String>,
    pub answer: Option<String>,
    pub difficulty: Option<Scalar>,
    pub category: Option<Scalar>,
}

/// Validated insert payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewQuestion {
    pub question: String,
    pub answer: String,
    pub category: String,
    pub difficulty: i64,
}

impl QuestionRequest {
    pub fn is_empty(&self) -> bool {
        self.search_term.is_none()
            && self.question.is_none()
            && self.answer.is_none()
            && self.difficulty.is_none()
            && self.category.is_none()
    }

    /// Non-blank search term, if the request is a search.
    pub fn search_term(&self) -> Option<&str> {
        self.search_term
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Returns `None` unless all four fields are present and non-empty.
    pub fn into_new_question(self) -> Option<NewQuestion> {
        let question = self.question.filter(|s| !s.trim().is_empty())?;
        let answer = self.answer.filter(|s| !s.trim().is_empty())?;
        let difficulty = self.difficulty.as_ref().and_then(Scalar::as_difficulty)?;
        let category = self.category.as_ref().and_then(Scalar::as_category)?;
        Some(NewQuestion {
            question,
            answer,
            category,
            difficulty,
        })
    }
}

/// Only the id selects questions; the `type` label clients send is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct QuizCategory {
    pub id: Scalar,
}

/// Body of `POST /quizzes`.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct QuizRequest {
    pub previous_questions: Option<Vec<i64>>,
    pub quiz_category: Option<QuizCategory>,
}

impl QuizRequest {
    pub fn previous_ids(&self) -> &[i64] {
        self.previous_questions.as_deref().unwrap_or(&[])
    }

    /// Category filter for the round; id `0` means every category.
    pub fn category(&self) -> Option<String> {
        self.quiz_category
            .as_ref()
            .and_then(|c| c.id.as_category())
    }
}
