use serde::{Deserialize, Serialize};

/// Most items the section scan will return.
pub const MAX_FALLBACK_SKILLS: usize = 10;

/// Pulls skill items out of a resume's "Skills" / "Technologies" section.
///
/// Used when the model's skill list comes back (nearly) empty. Lines after a heading
/// that mentions skills or technologies are collected until the next line ending
/// in `:`. A line is split on commas; otherwise a leading bullet is stripped and the
/// rest taken as one item.
pub fn fallback_skills(resume_text: &str) -> Vec<String> {
    let mut skills = Vec::new();
    let mut in_section = false;

    for line in resume_text.lines() {
        let trimmed = line.trim();
        let lower = trimmed.to_lowercase();

        if lower.contains("skills") || lower.contains("technologies") {
            in_section = true;
            continue;
        }
        if !in_section || trimmed.is_empty() {
            continue;
        }
        if trimmed.ends_with(':') {
            in_section = false;
            continue;
        }

        if trimmed.contains(',') {
            skills.extend(
                trimmed
                    .split(',')
                    .map(|s| strip_bullet(s).to_string())
                    .filter(|s| !s.is_empty()),
            );
        } else {
            let item = strip_bullet(trimmed);
            if !item.is_empty() {
                skills.push(item.to_string());
            }
        }

        if skills.len() >= MAX_FALLBACK_SKILLS {
            break;
        }
    }

    skills.truncate(MAX_FALLBACK_SKILLS);
    skills
}

fn strip_bullet(item: &str) -> &str {
    item.trim()
        .trim_start_matches(['•', '-', '*', '·'])
        .trim()
}

/// Required skills split into those the candidate covers and those they lack.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillOverlap {
    pub matched: Vec<String>,
    pub missing: Vec<String>,
}

/// Compares a comma-separated requirement list with a comma-separated skill list.
///
/// A required skill counts as matched when any candidate skill occurs inside it,
/// so "python" covers "python 3". Comparison is case-insensitive.
pub fn skill_overlap(required: &str, candidate: &str) -> SkillOverlap {
    let candidate: Vec<String> = split_skills(candidate);
    let mut overlap = SkillOverlap::default();

    for skill in split_skills(required) {
        if candidate.iter().any(|c| skill.contains(c.as_str())) {
            overlap.matched.push(skill);
        } else {
            overlap.missing.push(skill);
        }
    }
    overlap
}

fn split_skills(list: &str) -> Vec<String> {
    list.split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESUME: &str = "\
Jane Doe
Backend Engineer

Technical Skills
Rust, PostgreSQL, Docker
• Kubernetes
- Terraform

Experience:
Acme Corp, 2019-2024";

    #[test]
    fn test_fallback_collects_section_items() {
        let skills = fallback_skills(RESUME);
        assert_eq!(
            skills,
            vec!["Rust", "PostgreSQL", "Docker", "Kubernetes", "Terraform"]
        );
    }

    #[test]
    fn test_fallback_stops_at_next_heading() {
        let skills = fallback_skills(RESUME);
        assert!(!skills.iter().any(|s| s.contains("Acme")));
        assert!(!skills.iter().any(|s| s.ends_with(':')));
    }

    #[test]
    fn test_fallback_caps_at_ten() {
        let resume = "Skills\na, b, c, d, e, f\ng, h, i, j, k, l";
        assert_eq!(fallback_skills(resume).len(), MAX_FALLBACK_SKILLS);
    }

    #[test]
    fn test_fallback_without_section_is_empty() {
        assert!(fallback_skills("John Smith\nSales manager, 10 years").is_empty());
    }

    #[test]
    fn test_overlap_substring_match() {
        let overlap = skill_overlap("Python 3, SQL, Kubernetes", "python, sql");
        assert_eq!(overlap.matched, vec!["python 3", "sql"]);
        assert_eq!(overlap.missing, vec!["kubernetes"]);
    }

    #[test]
    fn test_overlap_ignores_empty_tokens() {
        let overlap = skill_overlap("Rust,, ,Go", "rust,");
        assert_eq!(overlap.matched, vec!["rust"]);
        assert_eq!(overlap.missing, vec!["go"]);
    }

    #[test]
    fn test_overlap_empty_candidate_everything_missing() {
        let overlap = skill_overlap("Rust, Go", "");
        assert!(overlap.matched.is_empty());
        assert_eq!(overlap.missing.len(), 2);
    }
}
