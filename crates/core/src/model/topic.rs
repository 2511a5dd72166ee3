use serde::{Deserialize, Serialize};

use crate::error::PlanError;

/// One subject's weak topics, as picked on the topic-selection screen.
///
/// `topic_ids` and `topic_names` are parallel and ordered.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedTopic {
    pub subject: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject_icon: Option<String>,
    pub topic_ids: Vec<String>,
    pub topic_names: Vec<String>,
}

impl SelectedTopic {
    #[must_use]
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.subject_icon = Some(icon.into());
        self
    }

    #[must_use]
    pub fn with_topic(mut self, id: impl Into<String>, name: impl Into<String>) -> Self {
        self.topic_ids.push(id.into());
        self.topic_names.push(name.into());
        self
    }

    /// Number of topics selected for the subject.
    #[must_use]
    pub fn len(&self) -> usize {
        self.topic_ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.topic_ids.is_empty()
    }

    /// `(id, name)` of the topic at `index`, if present.
    #[must_use]
    pub fn topic(&self, index: usize) -> Option<(&str, &str)> {
        let id = self.topic_ids.get(index)?;
        let name = self.topic_names.get(index)?;
        Some((id.as_str(), name.as_str()))
    }

    /// Checks the entry can seed a plan.
    ///
    /// # Errors
    ///
    /// Returns `PlanError` if the subject is blank, has no topics, or its id and
    /// name lists differ in length.
    pub fn validate(&self) -> Result<(), PlanError> {
        if self.subject.trim().is_empty() {
            return Err(PlanError::BlankSubject);
        }
        if self.topic_ids.is_empty() {
            return Err(PlanError::EmptySubject {
                subject: self.subject.clone(),
            });
        }
        if self.topic_ids.len() != self.topic_names.len() {
            return Err(PlanError::MismatchedTopics {
                subject: self.subject.clone(),
                ids: self.topic_ids.len(),
                names: self.topic_names.len(),
            });
        }
        Ok(())
    }
}

/// Validates a whole selection.
///
/// # Errors
///
/// Returns `PlanError::NoSubjects` for an empty selection, or the first
/// per-subject error.
pub fn validate_selection(topics: &[SelectedTopic]) -> Result<(), PlanError> {
    if topics.is_empty() {
        return Err(PlanError::NoSubjects);
    }
    topics.iter().try_for_each(SelectedTopic::validate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_keeps_lists_parallel() {
        let topic = SelectedTopic::new("Quant")
            .with_icon("calculator")
            .with_topic("q1", "Algebra")
            .with_topic("q2", "Geometry");
        assert_eq!(topic.len(), 2);
        assert_eq!(topic.topic(1), Some(("q2", "Geometry")));
        assert_eq!(topic.topic(2), None);
        assert!(topic.validate().is_ok());
    }

    #[test]
    fn rejects_degenerate_entries() {
        assert_eq!(validate_selection(&[]), Err(PlanError::NoSubjects));
        assert_eq!(
            SelectedTopic::new("  ").with_topic("a", "A").validate(),
            Err(PlanError::BlankSubject)
        );
        assert!(matches!(
            SelectedTopic::new("English").validate(),
            Err(PlanError::EmptySubject { .. })
        ));

        let mut uneven = SelectedTopic::new("Reasoning").with_topic("r1", "Puzzles");
        uneven.topic_names.push("Extra".into());
        assert_eq!(
            uneven.validate(),
            Err(PlanError::MismatchedTopics {
                subject: "Reasoning".into(),
                ids: 1,
                names: 2,
            })
        );
    }
}
