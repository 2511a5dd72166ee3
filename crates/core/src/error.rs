use thiserror::Error;

/// Rejected plan input. Every variant is an invalid-input condition raised
/// before any state is touched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PlanError {
    #[error("no subjects selected")]
    NoSubjects,

    #[error("subject name cannot be empty")]
    BlankSubject,

    #[error("subject {subject} has no topics selected")]
    EmptySubject { subject: String },

    #[error("subject {subject} has {ids} topic ids but {names} topic names")]
    MismatchedTopics {
        subject: String,
        ids: usize,
        names: usize,
    },

    #[error("an exam must be selected")]
    MissingExam,
}
