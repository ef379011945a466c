use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;

/// Uploads a raw resume file to `resumes/{job_id}/{uuid}-{file_name}` and returns the key.
pub async fn archive_resume(
    s3: &aws_sdk_s3::Client,
    bucket: &str,
    job_id: Uuid,
    file_name: &str,
    data: Bytes,
) -> Result<String, AppError> {
    let key = resume_key(job_id, Uuid::new_v4(), file_name);

    s3.put_object()
        .bucket(bucket)
        .key(&key)
        .body(ByteStream::from(data))
        .content_type(content_type_for(file_name))
        .send()
        .await
        .map_err(|e| AppError::S3(format!("Upload of {key} failed: {e}")))?;

    info!("Archived resume to s3://{}/{}", bucket, key);
    Ok(key)
}

/// Archives without failing the caller; the analysis matters more than the copy.
pub async fn archive_resume_best_effort(
    s3: &aws_sdk_s3::Client,
    bucket: &str,
    job_id: Uuid,
    file_name: &str,
    data: Bytes,
) -> Option<String> {
    match archive_resume(s3, bucket, job_id, file_name, data).await {
        Ok(key) => Some(key),
        Err(e) => {
            warn!("Resume archive skipped for '{file_name}': {e}");
            None
        }
    }
}

fn resume_key(job_id: Uuid, object_id: Uuid, file_name: &str) -> String {
    let safe_name: String = file_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("resumes/{job_id}/{object_id}-{safe_name}")
}

fn content_type_for(file_name: &str) -> &'static str {
    if file_name.to_lowercase().ends_with(".pdf") {
        "application/pdf"
    } else {
        "text/plain; charset=utf-8"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resume_key_layout_and_sanitizing() {
        let job_id = Uuid::nil();
        let object_id = Uuid::nil();
        assert_eq!(
            resume_key(job_id, object_id, "Jane Doe/../cv.txt"),
            format!("resumes/{job_id}/{object_id}-Jane_Doe_.._cv.txt")
        );
    }

    #[test]
    fn test_content_type_for_pdf_and_text() {
        assert_eq!(content_type_for("CV.PDF"), "application/pdf");
        assert_eq!(content_type_for("cv.txt"), "text/plain; charset=utf-8");
    }
}
