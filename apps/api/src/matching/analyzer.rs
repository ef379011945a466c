//! Analyzer: runs the three model queries for one resume against one job.
//!
//! extract skills → extract experience → (section-scan fallback) → match → parse score

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::errors::AppError;
use crate::llm_client::TextGenerator;
use crate::matching::prompts::{EXPERIENCE_QUERY, MATCH_QUERY, SKILLS_QUERY};
use crate::matching::score::{parse_match_output, MatchResult, ScoreBand};
use crate::matching::skills::fallback_skills;

/// Skill answers shorter than this are treated as empty and replaced by the section scan.
const MIN_SKILLS_LEN: usize = 3;

/// Fields derived from the resume alone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeInfo {
    pub skills: String,
    pub experience: String,
}

/// Everything the pipeline derives for one resume/job pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumeAnalysis {
    pub skills: String,
    pub experience: String,
    pub match_score: f64,
    pub match_feedback: String,
    pub band: ScoreBand,
}

pub async fn extract_resume_info(
    generator: &dyn TextGenerator,
    resume_text: &str,
) -> Result<ResumeInfo, AppError> {
    let skills = generator
        .generate(SKILLS_QUERY, resume_text)
        .await
        .map_err(|e| AppError::Llm(format!("Skills extraction failed: {e}")))?;
    let experience = generator
        .generate(EXPERIENCE_QUERY, resume_text)
        .await
        .map_err(|e| AppError::Llm(format!("Experience summary failed: {e}")))?;

    let mut skills = skills.trim().to_string();
    if skills.len() < MIN_SKILLS_LEN {
        let scanned = fallback_skills(resume_text);
        if !scanned.is_empty() {
            debug!(
                "Model returned no usable skills, using {} from resume section scan",
                scanned.len()
            );
            skills = scanned.join(", ");
        }
    }

    Ok(ResumeInfo {
        skills,
        experience: experience.trim().to_string(),
    })
}

pub async fn match_resume_to_job(
    generator: &dyn TextGenerator,
    resume_text: &str,
    job_description: &str,
    job_requirements: &str,
) -> Result<MatchResult, AppError> {
    let context = build_match_context(resume_text, job_description, job_requirements);
    let analysis = generator
        .generate(MATCH_QUERY, &context)
        .await
        .map_err(|e| AppError::Llm(format!("Match analysis failed: {e}")))?;

    Ok(parse_match_output(&analysis))
}

/// Full pipeline for one resume: extraction followed by matching.
pub async fn analyze_resume(
    generator: &dyn TextGenerator,
    resume_text: &str,
    job_description: &str,
    job_requirements: &str,
) -> Result<ResumeAnalysis, AppError> {
    let info = extract_resume_info(generator, resume_text).await?;
    let matched =
        match_resume_to_job(generator, resume_text, job_description, job_requirements).await?;

    info!(score = matched.score, "Resume analyzed");

    Ok(ResumeAnalysis {
        skills: info.skills,
        experience: info.experience,
        band: ScoreBand::from_score(matched.score),
        match_score: matched.score,
        match_feedback: matched.feedback,
    })
}

fn build_match_context(resume_text: &str, description: &str, requirements: &str) -> String {
    format!(
        "Here is the candidate's resume:\n{}\n\nAnd here is the job posting:\n\
         Job Description: {}\n\nJob Requirements: {}",
        resume_text.trim(),
        description.trim(),
        requirements.trim()
    )
}
