//! Bulk analysis: scores a stack of uploaded resumes against one job.
//!
//! Items run one after another with a fixed pause between them so the text generator
//! is not flooded. A failing item is recorded with its error and the batch moves on.

pub mod cache;
pub mod handlers;

use std::cmp::Ordering;
use std::time::Duration;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::documents::decode_resume;
use crate::errors::AppError;
use crate::llm_client::TextGenerator;
use crate::matching::analyzer::{analyze_resume, ResumeAnalysis};
use crate::matching::score::ScoreBand;
use crate::models::job::Job;

/// One uploaded file awaiting analysis.
#[derive(Debug, Clone)]
pub struct BulkFile {
    pub file_name: String,
    pub data: Bytes,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum BulkItem {
    Analyzed {
        file_name: String,
        resume_text: String,
        analysis: ResumeAnalysis,
    },
    Failed {
        file_name: String,
        error: String,
    },
}

impl BulkItem {
    pub fn file_name(&self) -> &str {
        match self {
            BulkItem::Analyzed { file_name, .. } | BulkItem::Failed { file_name, .. } => file_name,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedResume {
    /// Position of the item in the uploaded batch.
    pub index: usize,
    pub file_name: String,
    pub match_score: f64,
    pub band: ScoreBand,
}

/// A finished bulk analysis, as cached and returned to the employer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub batch_id: Uuid,
    pub job_id: Uuid,
    pub job_title: String,
    pub employer_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub items: Vec<BulkItem>,
    pub ranking: Vec<RankedResume>,
}

impl BatchReport {
    pub fn new(job: &Job, items: Vec<BulkItem>) -> Self {
        Self {
            batch_id: Uuid::new_v4(),
            job_id: job.id,
            job_title: job.title.clone(),
            employer_id: job.posted_by,
            created_at: Utc::now(),
            ranking: rank(&items),
            items,
        }
    }

    /// The analyzed item at `index`, as `(file_name, resume_text, analysis)`.
    /// Failed items and positions past the end cannot be saved.
    pub fn saveable_item(&self, index: usize) -> Result<(&str, &str, &ResumeAnalysis), AppError> {
        match self.items.get(index) {
            Some(BulkItem::Analyzed {
                file_name,
                resume_text,
                analysis,
            }) => Ok((file_name.as_str(), resume_text.as_str(), analysis)),
            Some(failed) => Err(AppError::Validation(format!(
                "'{}' failed analysis and cannot be saved",
                failed.file_name()
            ))),
            None => Err(AppError::Validation(format!(
                "Batch has {} item(s); index {index} is out of range",
                self.items.len()
            ))),
        }
    }
}

/// Settings for one bulk run.
#[derive(Debug, Clone, Copy)]
pub struct BulkOptions {
    pub item_delay: Duration,
    pub max_bytes: usize,
}

/// Decodes, extracts and matches every file in order. Output order equals input order.
pub async fn process_bulk_resumes(
    generator: &dyn TextGenerator,
    job: &Job,
    files: Vec<BulkFile>,
    options: BulkOptions,
) -> Vec<BulkItem> {
    let total = files.len();
    let mut items = Vec::with_capacity(total);

    for (idx, BulkFile { file_name, data }) in files.into_iter().enumerate() {
        if idx > 0 {
            tokio::time::sleep(options.item_delay).await;
        }
        info!(
            "Processing {} of {}: {} (job {})",
            idx + 1,
            total,
            file_name,
            job.id
        );

        let outcome = async {
            let resume_text = decode_resume(&file_name, data, options.max_bytes).await?;
            let analysis =
                analyze_resume(generator, &resume_text, &job.description, &job.requirements)
                    .await?;
            Ok::<_, AppError>((resume_text, analysis))
        }
        .await;

        let item = match outcome {
            Ok((resume_text, analysis)) => BulkItem::Analyzed {
                file_name,
                resume_text,
                analysis,
            },
            Err(e) => {
                warn!("Bulk item '{file_name}' failed: {e}");
                BulkItem::Failed {
                    file_name,
                    error: e.public_message(),
                }
            }
        };
        items.push(item);
    }

    info!("Bulk analysis complete: {} item(s) for job {}", total, job.id);
    items
}

/// Successful items ordered by score, best first. Ties keep upload order.
pub fn rank(items: &[BulkItem]) -> Vec<RankedResume> {
    let mut ranking: Vec<RankedResume> = items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| match item {
            BulkItem::Analyzed {
                file_name,
                analysis,
                ..
            } => Some(RankedResume {
                index,
                file_name: file_name.clone(),
                match_score: analysis.match_score,
                band: analysis.band,
            }),
            BulkItem::Failed { .. } => None,
        })
        .collect();

    ranking.sort_by(|a, b| {
        b.match_score
            .partial_cmp(&a.match_score)
            .unwrap_or(Ordering::Equal)
    });
    ranking
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::testing::ScriptedGenerator;

    fn job() -> Job {
        Job {
            id: Uuid::new_v4(),
            posted_by: Uuid::new_v4(),
            title: "Backend Engineer".to_string(),
            description: "Build APIs".to_string(),
            requirements: "Rust, SQL".to_string(),
            salary_range: String::new(),
            location: String::new(),
            job_type: String::new(),
            created_at: Utc::now(),
        }
    }

    fn file(name: &str, body: &'static [u8]) -> BulkFile {
        BulkFile {
            file_name: name.to_string(),
            data: Bytes::from_static(body),
        }
    }

    fn options(delay_ms: u64) -> BulkOptions {
        BulkOptions {
            item_delay: Duration::from_millis(delay_ms),
            max_bytes: 1024,
        }
    }

    fn analyzed(file_name: &str, score: f64) -> BulkItem {
        BulkItem::Analyzed {
            file_name: file_name.to_string(),
            resume_text: "text".to_string(),
            analysis: ResumeAnalysis {
                skills: "Rust".to_string(),
                experience: "Five years.".to_string(),
                match_score: score,
                match_feedback: "ok".to_string(),
                band: ScoreBand::from_score(score),
            },
        }
    }

    #[tokio::test]
    async fn test_bulk_keeps_order_and_records_failures() {
        let generator = ScriptedGenerator::new("Rust, SQL", "Backend dev.", "77\nGood.");
        let files = vec![
            file("alice.txt", b"Alice\nRust"),
            file("broken.docx", b"PK\x03\x04"),
            file("bob.txt", b"Bob\nSQL"),
        ];

        let items = process_bulk_resumes(&generator, &job(), files, options(0)).await;

        let names: Vec<&str> = items.iter().map(BulkItem::file_name).collect();
        assert_eq!(names, vec!["alice.txt", "broken.docx", "bob.txt"]);
        assert!(matches!(&items[0], BulkItem::Analyzed { analysis, .. } if analysis.match_score == 77.0));
        assert!(matches!(&items[1], BulkItem::Failed { error, .. } if error.contains("docx")));
        assert!(matches!(&items[2], BulkItem::Analyzed { resume_text, .. } if resume_text == "Bob\nSQL"));
    }

    #[tokio::test]
    async fn test_bulk_model_failure_does_not_stop_batch() {
        let generator = ScriptedGenerator::failing_match();
        let files = vec![file("a.txt", b"A"), file("b.txt", b"B")];

        let items = process_bulk_resumes(&generator, &job(), files, options(0)).await;

        assert_eq!(items.len(), 2);
        assert!(items.iter().all(|i| matches!(i, BulkItem::Failed { .. })));
        assert_eq!(generator.calls(), 6);

        let value = serde_json::to_value(&items[0]).unwrap();
        let error = value["error"].as_str().unwrap();
        assert_eq!(error, "An AI processing error occurred. Please try again.");
        assert!(!error.contains("prompt too long"));
        assert!(!error.contains("status 400"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_bulk_pauses_between_items() {
        let generator = ScriptedGenerator::new("Rust", "Dev.", "60\nok");
        let files = vec![file("a.txt", b"A"), file("b.txt", b"B"), file("c.txt", b"C")];

        let started = tokio::time::Instant::now();
        process_bulk_resumes(&generator, &job(), files, options(500)).await;

        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_millis(1000), "elapsed {elapsed:?}");
        assert!(elapsed < Duration::from_millis(1500), "elapsed {elapsed:?}");
    }

    #[tokio::test]
    async fn test_bulk_empty_input() {
        let generator = ScriptedGenerator::new("Rust", "Dev.", "60\nok");
        let items = process_bulk_resumes(&generator, &job(), vec![], options(500)).await;
        assert!(items.is_empty());
        assert_eq!(generator.calls(), 0);
    }

    #[test]
    fn test_rank_sorts_desc_and_skips_failures() {
        let items = vec![
            analyzed("low.txt", 40.0),
            BulkItem::Failed {
                file_name: "bad.txt".to_string(),
                error: "empty".to_string(),
            },
            analyzed("high.txt", 91.0),
            analyzed("tie.txt", 40.0),
        ];

        let ranking = rank(&items);
        let order: Vec<(&str, usize)> = ranking
            .iter()
            .map(|r| (r.file_name.as_str(), r.index))
            .collect();
        assert_eq!(order, vec![("high.txt", 2), ("low.txt", 0), ("tie.txt", 3)]);
        assert_eq!(ranking[0].band, ScoreBand::High);
    }

    fn report() -> BatchReport {
        BatchReport::new(
            &job(),
            vec![
                analyzed("alice.txt", 81.0),
                BulkItem::Failed {
                    file_name: "broken.docx".to_string(),
                    error: "unsupported".to_string(),
                },
            ],
        )
    }

    #[test]
    fn test_saveable_item_returns_analyzed_entry() {
        let report = report();
        let (file_name, resume_text, analysis) = report.saveable_item(0).unwrap();
        assert_eq!(file_name, "alice.txt");
        assert_eq!(resume_text, "text");
        assert_eq!(analysis.match_score, 81.0);
    }

    #[test]
    fn test_saveable_item_rejects_failed_item() {
        let err = report().saveable_item(1).unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg.contains("broken.docx")));
    }

    #[test]
    fn test_saveable_item_rejects_out_of_range_index() {
        let err = report().saveable_item(2).unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg.contains("out of range")));
    }

    #[test]
    fn test_bulk_item_serializes_with_outcome_tag() {
        let value = serde_json::to_value(BulkItem::Failed {
            file_name: "x.txt".to_string(),
            error: "boom".to_string(),
        })
        .unwrap();
        assert_eq!(value["outcome"], "failed");
        assert_eq!(value["file_name"], "x.txt");
    }
}
