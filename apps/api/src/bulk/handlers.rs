use axum::{
    extract::{multipart::MultipartError, Multipart, Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::accounts::require_employer;
use crate::applications::{insert_application, NewApplication};
use crate::bulk::{process_bulk_resumes, BatchReport, BulkFile, BulkOptions};
use crate::documents::candidate_name_from_file;
use crate::errors::AppError;
use crate::jobs::{get_job, get_owned_job};
use crate::models::application::Application;
use crate::state::AppState;
use crate::storage::archive_resume_best_effort;

/// Most files accepted in one bulk upload.
pub const MAX_BULK_FILES: usize = 50;

#[derive(Debug, Deserialize)]
pub struct SaveItemRequest {
    pub employer_id: Uuid,
}

struct BulkUpload {
    employer_id: Uuid,
    files: Vec<BulkFile>,
}

/// POST /api/v1/jobs/:id/bulk
///
/// Multipart form: `employer_id` (text) and one or more `resumes` file fields.
pub async fn handle_bulk_analysis(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<BatchReport>), AppError> {
    let upload = read_upload(multipart).await?;

    require_employer(&state.db, upload.employer_id).await?;
    let job = get_owned_job(&state.db, job_id, upload.employer_id).await?;

    for file in &upload.files {
        archive_resume_best_effort(
            &state.s3,
            &state.config.s3_bucket,
            job.id,
            &file.file_name,
            file.data.clone(),
        )
        .await;
    }

    let options = BulkOptions {
        item_delay: state.config.bulk_item_delay,
        max_bytes: state.config.max_upload_bytes,
    };
    let items =
        process_bulk_resumes(state.generator.as_ref(), &job, upload.files, options).await;

    let report = BatchReport::new(&job, items);
    state.batches.store(&report).await?;

    Ok((StatusCode::CREATED, Json(report)))
}

/// GET /api/v1/bulk/:batch_id
pub async fn handle_get_batch(
    State(state): State<AppState>,
    Path(batch_id): Path<Uuid>,
) -> Result<Json<BatchReport>, AppError> {
    let report = state
        .batches
        .load(batch_id)
        .await?
        .ok_or_else(|| batch_not_found(batch_id))?;
    Ok(Json(report))
}

/// POST /api/v1/bulk/:batch_id/items/:index/save
///
/// Turns one analyzed resume from a cached batch into an application.
pub async fn handle_save_item(
    State(state): State<AppState>,
    Path((batch_id, index)): Path<(Uuid, usize)>,
    Json(req): Json<SaveItemRequest>,
) -> Result<(StatusCode, Json<Application>), AppError> {
    let report = state
        .batches
        .load(batch_id)
        .await?
        .ok_or_else(|| batch_not_found(batch_id))?;

    if report.employer_id != req.employer_id {
        return Err(AppError::Forbidden(
            "This batch belongs to another employer".to_string(),
        ));
    }

    let (file_name, resume_text, analysis) = report.saveable_item(index)?;

    // The job may have been removed since the batch ran.
    get_job(&state.db, report.job_id).await?;

    let candidate_name = candidate_name_from_file(file_name);
    let application = insert_application(
        &state.db,
        NewApplication {
            job_id: report.job_id,
            user_id: None,
            candidate_name: &candidate_name,
            resume: resume_text,
            analysis,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(application)))
}

async fn read_upload(mut multipart: Multipart) -> Result<BulkUpload, AppError> {
    let mut employer_id: Option<Uuid> = None;
    let mut files = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(upload_error)?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "employer_id" => {
                let raw = field
                    .text()
                    .await
                    .map_err(upload_error)?;
                employer_id = Some(raw.trim().parse().map_err(|_| {
                    AppError::Validation(format!("employer_id '{raw}' is not a valid id"))
                })?);
            }
            "resumes" => {
                if files.len() == MAX_BULK_FILES {
                    return Err(AppError::Validation(format!(
                        "At most {MAX_BULK_FILES} resumes can be analyzed at once"
                    )));
                }
                let file_name = field.file_name().unwrap_or("resume.txt").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(upload_error)?;
                files.push(BulkFile { file_name, data });
            }
            _ => {}
        }
    }

    let employer_id =
        employer_id.ok_or_else(|| AppError::Validation("employer_id is required".to_string()))?;
    if files.is_empty() {
        return Err(AppError::Validation(
            "Upload at least one resume in the 'resumes' field".to_string(),
        ));
    }
    Ok(BulkUpload { employer_id, files })
}

/// Body-limit overruns surface from the multipart stream; they map to 413, anything else to 400.
fn upload_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(format!(
            "Upload is too large: at most {MAX_BULK_FILES} resumes within the per-file size limit"
        ))
    } else {
        AppError::Validation(format!("Malformed upload: {}", e.body_text()))
    }
}

fn batch_not_found(batch_id: Uuid) -> AppError {
    AppError::NotFound(format!("Batch {batch_id} not found or expired"))
}
