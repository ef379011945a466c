//! Canned `TextGenerator` for pipeline tests.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::llm_client::{LlmError, TextGenerator};
use crate::matching::prompts::{EXPERIENCE_QUERY, MATCH_QUERY, SKILLS_QUERY};

/// Answers each of the three pipeline queries with a fixed string and records
/// every context it was shown.
pub struct ScriptedGenerator {
    pub skills: String,
    pub experience: String,
    pub analysis: String,
    /// When set, the match query fails with an API error.
    pub fail_match: bool,
    pub contexts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    pub fn new(skills: &str, experience: &str, analysis: &str) -> Self {
        Self {
            skills: skills.to_string(),
            experience: experience.to_string(),
            analysis: analysis.to_string(),
            fail_match: false,
            contexts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_match() -> Self {
        Self {
            fail_match: true,
            ..Self::new("Rust, SQL", "Five years of backend work.", "")
        }
    }

    pub fn calls(&self) -> usize {
        self.contexts.lock().unwrap().len()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, query: &str, context: &str) -> Result<String, LlmError> {
        self.contexts.lock().unwrap().push(context.to_string());
        if query == SKILLS_QUERY {
            Ok(self.skills.clone())
        } else if query == EXPERIENCE_QUERY {
            Ok(self.experience.clone())
        } else if query == MATCH_QUERY {
            if self.fail_match {
                Err(LlmError::Api {
                    status: 400,
                    message: "prompt too long".to_string(),
                })
            } else {
                Ok(self.analysis.clone())
            }
        } else {
            Err(LlmError::EmptyContent)
        }
    }
}
