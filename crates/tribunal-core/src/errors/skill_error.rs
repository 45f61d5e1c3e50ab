/// Skill tracking errors.
#[derive(Debug, thiserror::Error)]
pub enum SkillError {
    #[error("non-finite error {value} recorded for {persona}")]
    NonFiniteError { persona: String, value: f64 },
}
