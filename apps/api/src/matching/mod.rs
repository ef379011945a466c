// Resume-to-job matching: the skills/experience extraction queries, the match query,
// and the parsing of the model's "score line + feedback" answer.
// All model access goes through the `TextGenerator` trait.

pub mod analyzer;
pub mod handlers;
pub mod prompts;
pub mod score;
pub mod skills;

#[cfg(test)]
pub mod testing;
