use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of questions that make up one assessment round per language.
pub const QUESTIONS_PER_ASSESSMENT: i64 = 15;

/// Supported language tracks. Fixed set; adding a track is a code change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Python,
    JavaScript,
    Java,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::Python, Language::JavaScript, Language::Java];

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Python => "python",
            Language::JavaScript => "javascript",
            Language::Java => "java",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Language::Python => "Python",
            Language::JavaScript => "JavaScript",
            Language::Java => "Java",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Language::Python => "🐍",
            Language::JavaScript => "🟨",
            Language::Java => "☕",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = UnsupportedLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "python" => Ok(Language::Python),
            "javascript" => Ok(Language::JavaScript),
            "java" => Ok(Language::Java),
            other => Err(UnsupportedLanguage(other.to_string())),
        }
    }
}

#[derive(Debug)]
pub struct UnsupportedLanguage(pub String);

impl fmt::Display for UnsupportedLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unsupported language: {}", self.0)
    }
}

/// Entry in the static language listing exposed to clients.
#[derive(Debug, Clone, Serialize)]
pub struct LanguageInfo {
    pub id: Language,
    pub display_name: &'static str,
    pub icon: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    MultipleChoice,
    CodeOutput,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// Full question record as stored in the "questions" collection.
/// Includes the answer key; never serialized to learners directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    #[serde(rename = "_id")]
    pub id: String,
    pub language: Language,
    pub order_index: i32,
    pub kind: QuestionKind,
    pub topic: String,
    pub difficulty: Difficulty,
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_snippet: Option<String>,
    pub options: Vec<String>,
    pub correct_answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

/// Display-safe question: same record with the answer key and
/// explanation stripped before it leaves the service. Deserialize is
/// needed for the Redis cache-read path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayQuestion {
    pub id: String,
    pub language: Language,
    pub order_index: i32,
    pub kind: QuestionKind,
    pub topic: String,
    pub difficulty: Difficulty,
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_snippet: Option<String>,
    pub options: Vec<String>,
}

impl From<Question> for DisplayQuestion {
    fn from(q: Question) -> Self {
        DisplayQuestion {
            id: q.id,
            language: q.language,
            order_index: q.order_index,
            kind: q.kind,
            topic: q.topic,
            difficulty: q.difficulty,
            prompt: q.prompt,
            code_snippet: q.code_snippet,
            options: q.options,
        }
    }
}
