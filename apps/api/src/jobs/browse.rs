//! In-memory narrowing and ordering of job listings for the browse view.

use serde::Deserialize;

use crate::models::job::Job;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobSort {
    #[default]
    Newest,
    SalaryDesc,
    SalaryAsc,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BrowseQuery {
    /// Free-text search over title, description and requirements.
    pub q: Option<String>,
    pub location: Option<String>,
    pub job_type: Option<String>,
    #[serde(default)]
    pub sort: JobSort,
}

impl BrowseQuery {
    pub fn search_text(&self) -> Option<&str> {
        self.q.as_deref().map(str::trim).filter(|q| !q.is_empty())
    }
}

/// Applies the location/type filters and the requested ordering.
///
/// Input is expected newest first, so `Newest` keeps it as is. Salary orderings are
/// stable: jobs with equal salary keys keep their relative order.
pub fn apply_browse(jobs: Vec<Job>, query: &BrowseQuery) -> Vec<Job> {
    let location = non_empty(query.location.as_deref());
    let job_type = non_empty(query.job_type.as_deref());

    let mut jobs: Vec<Job> = jobs
        .into_iter()
        .filter(|job| location.map_or(true, |l| job.location == l))
        .filter(|job| job_type.map_or(true, |t| job.job_type == t))
        .collect();

    match query.sort {
        JobSort::Newest => {}
        JobSort::SalaryAsc => jobs.sort_by_key(|job| salary_key(&job.salary_range)),
        JobSort::SalaryDesc => {
            jobs.sort_by(|a, b| salary_key(&b.salary_range).cmp(&salary_key(&a.salary_range)))
        }
    }
    jobs
}

/// The first integer in a free-form salary range, or 0. "$60K-80K" sorts as 60.
pub fn salary_key(salary_range: &str) -> u64 {
    salary_range
        .split(|c: char| !c.is_ascii_digit())
        .find(|digits| !digits.is_empty())
        .and_then(|digits| digits.parse().ok())
        .unwrap_or(0)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
