use serde::{Deserialize, Serialize};

// Request bodies. Every field is optional at the wire level; whether a missing
// value is rejected up front or by storage depends on api.strict_validation.

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateUserRequest {
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateExerciseRequest {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub duration: Option<IntOrString>,
    #[serde(default)]
    pub date: Option<String>,
}

/// An integer that may arrive as a JSON number or as text (form posts).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum IntOrString {
    Int(i64),
    Str(String),
}

impl IntOrString {
    pub fn to_i64(&self) -> Option<i64> {
        match self {
            IntOrString::Int(v) => Some(*v),
            IntOrString::Str(s) => s.trim().parse().ok(),
        }
    }
}

impl std::fmt::Display for IntOrString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IntOrString::Int(v) => write!(f, "{}", v),
            IntOrString::Str(s) => write!(f, "{}", s),
        }
    }
}

/// Query string of `GET /api/users/{id}/logs`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogQuery {
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    pub limit: Option<String>,
}

// Responses

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
}

/// Response of `POST /api/users/{id}/exercises`. `id` is the owning user's id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExerciseResponse {
    pub id: String,
    pub username: String,
    pub description: String,
    pub duration: i64,
    pub date: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub description: String,
    pub duration: i64,
    pub date: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogResponse {
    pub id: String,
    pub username: String,
    pub count: usize,
    pub log: Vec<LogEntry>,
}
