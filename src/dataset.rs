//! The column-aligned table handed to the scoring backend.

use crate::error::{EvalError, Result};
use serde::{Deserialize, Serialize};

/// A four-column table pairing each question with the RAG answer, its
/// supporting contexts, and the expected answer.
///
/// All four columns always have identical length; [`EvaluationDataset::assemble`]
/// is the only constructor and enforces it. A mismatch means the caller lost
/// the correlation between success indices and the ground-truth subset, which
/// must fail loudly rather than silently truncate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationDataset {
    questions: Vec<String>,
    answers: Vec<String>,
    contexts: Vec<Vec<String>>,
    ground_truth: Vec<String>,
}

/// One row of the table, borrowed.
#[derive(Debug, Clone, Copy)]
pub struct EvaluationRow<'a> {
    pub question: &'a str,
    pub answer: &'a str,
    pub contexts: &'a [String],
    pub ground_truth: &'a str,
}

impl EvaluationDataset {
    /// Merge the four parallel sequences into one table.
    ///
    /// Fails with [`EvalError::Validation`] when the lengths differ.
    pub fn assemble(
        questions: Vec<String>,
        answers: Vec<String>,
        contexts: Vec<Vec<String>>,
        ground_truth: Vec<String>,
    ) -> Result<Self> {
        let n = questions.len();
        if answers.len() != n || contexts.len() != n || ground_truth.len() != n {
            return Err(EvalError::Validation {
                questions: n,
                answers: answers.len(),
                contexts: contexts.len(),
                ground_truth: ground_truth.len(),
            });
        }

        Ok(Self {
            questions,
            answers,
            contexts,
            ground_truth,
        })
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Check if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Get one row by position.
    pub fn row(&self, index: usize) -> Option<EvaluationRow<'_>> {
        if index >= self.len() {
            return None;
        }
        Some(EvaluationRow {
            question: &self.questions[index],
            answer: &self.answers[index],
            contexts: &self.contexts[index],
            ground_truth: &self.ground_truth[index],
        })
    }

    /// Iterate the rows in order.
    pub fn rows(&self) -> impl Iterator<Item = EvaluationRow<'_>> {
        self.questions
            .iter()
            .zip(&self.answers)
            .zip(&self.contexts)
            .zip(&self.ground_truth)
            .map(|(((question, answer), contexts), ground_truth)| EvaluationRow {
                question,
                answer,
                contexts,
                ground_truth,
            })
    }

    /// The question column.
    pub fn questions(&self) -> &[String] {
        &self.questions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_assemble_matching_lengths() {
        let dataset = EvaluationDataset::assemble(
            strings(&["q1", "q2"]),
            strings(&["a1", "a2"]),
            vec![strings(&["c1"]), strings(&["c2a", "c2b"])],
            strings(&["g1", "g2"]),
        )
        .unwrap();

        assert_eq!(dataset.len(), 2);

        let row = dataset.row(1).unwrap();
        assert_eq!(row.question, "q2");
        assert_eq!(row.answer, "a2");
        assert_eq!(row.contexts, &["c2a".to_string(), "c2b".to_string()]);
        assert_eq!(row.ground_truth, "g2");
    }

    #[test]
    fn test_assemble_rejects_mismatched_lengths() {
        let result = EvaluationDataset::assemble(
            strings(&["q1", "q2", "q3"]),
            strings(&["a1", "a2"]),
            vec![strings(&["c1"]), strings(&["c2"])],
            strings(&["g1", "g2"]),
        );

        match result {
            Err(EvalError::Validation {
                questions,
                answers,
                contexts,
                ground_truth,
            }) => {
                assert_eq!(questions, 3);
                assert_eq!(answers, 2);
                assert_eq!(contexts, 2);
                assert_eq!(ground_truth, 2);
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_table_is_valid() {
        let dataset =
            EvaluationDataset::assemble(vec![], vec![], vec![], vec![]).unwrap();
        assert!(dataset.is_empty());
        assert_eq!(dataset.rows().count(), 0);
    }

    #[test]
    fn test_rows_iterate_in_order() {
        let dataset = EvaluationDataset::assemble(
            strings(&["q1", "q2", "q3"]),
            strings(&["a1", "a2", "a3"]),
            vec![strings(&["c"]), strings(&["c"]), strings(&["c"])],
            strings(&["g1", "g2", "g3"]),
        )
        .unwrap();

        let questions: Vec<&str> = dataset.rows().map(|r| r.question).collect();
        assert_eq!(questions, vec!["q1", "q2", "q3"]);
    }
}
