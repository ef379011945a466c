// Queries sent to the text generator by the matching pipeline.
// Each query is paired with a context block built by `analyzer`.

/// Skills extraction. The answer is stored verbatim in `extracted_skills`.
pub const SKILLS_QUERY: &str = "\
Extract a comprehensive list of skills from this resume.
Include technical skills, soft skills, and domain expertise.
Format the answer as a single comma-separated list.";

/// Experience summary. The answer is stored verbatim in `extracted_experience`.
pub const EXPERIENCE_QUERY: &str = "\
Provide a concise professional summary from this resume.
Include key information about:
- Years of experience
- Industries worked in
- Major accomplishments
- Leadership roles (if any)
- Educational background
Limit the summary to 3-4 sentences.";

/// Match analysis. The first line of the answer must carry the score.
pub const MATCH_QUERY: &str = "\
Analyze how well this candidate's resume matches the job requirements.

Part 1: Provide a match score from 0-100 as a single number on the first line, just the number.

Part 2: Provide a detailed analysis including:
- Key matching skills and qualifications
- Missing or mismatched requirements
- Overall suitability assessment
- Recommendations for the hiring manager

Format your response with the score on the first line, followed by your analysis.";
