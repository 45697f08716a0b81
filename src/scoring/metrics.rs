//! The evaluated metrics and their judge prompts.

use crate::dataset::EvaluationRow;
use serde::{Deserialize, Serialize};

/// A quality metric computed over the evaluation dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// How relevant the retrieved chunks are to the question.
    ContextPrecision,
    /// Whether everything needed for the expected answer was retrieved.
    ContextRecall,
    /// Whether the answer's claims are supported by the retrieved context.
    Faithfulness,
    /// How well the answer agrees with the expected answer.
    AnswerCorrectness,
}

impl Metric {
    /// Every metric, in reporting order.
    pub const ALL: [Metric; 4] = [
        Metric::ContextPrecision,
        Metric::ContextRecall,
        Metric::Faithfulness,
        Metric::AnswerCorrectness,
    ];

    /// Column name in the score table and in result file names.
    pub fn name(&self) -> &'static str {
        match self {
            Metric::ContextPrecision => "context_precision",
            Metric::ContextRecall => "context_recall",
            Metric::Faithfulness => "faithfulness",
            Metric::AnswerCorrectness => "answer_correctness",
        }
    }

    /// Short human-readable description for run banners.
    pub fn description(&self) -> &'static str {
        match self {
            Metric::ContextPrecision => "how relevant retrieved chunks are to questions",
            Metric::ContextRecall => "whether all necessary context was retrieved",
            Metric::Faithfulness => "how factually accurate generated answers are",
            Metric::AnswerCorrectness => "how well answers match the expected answers",
        }
    }

    /// Passage budget used for this metric when the caller does not
    /// override it.
    pub fn default_top_k(&self) -> usize {
        match self {
            Metric::ContextPrecision => 2,
            Metric::ContextRecall => 3,
            Metric::Faithfulness => 5,
            Metric::AnswerCorrectness => 3,
        }
    }

    /// Build the judge prompt for one dataset row.
    ///
    /// Every prompt requests the same response shape:
    /// `{"score": <float 0-1>, "explanation": "..."}`.
    pub fn judge_prompt(&self, row: &EvaluationRow<'_>) -> String {
        let contexts = format_contexts(row.contexts);

        match self {
            Metric::ContextPrecision => format!(
                r#"You are an expert judge evaluating a retrieval system.

Question: {question}

Retrieved context chunks (in retrieval order):
{contexts}

For each chunk, consider whether it is relevant to answering the question.
The score is the fraction of retrieval effort that was well spent: 1.0 when
every chunk is relevant and ranked sensibly, 0.0 when none are.

Respond in JSON format:
{{
    "score": <float between 0 and 1>,
    "explanation": "<brief explanation>"
}}

Respond with only the JSON, no other text."#,
                question = row.question,
                contexts = contexts
            ),

            Metric::ContextRecall => format!(
                r#"You are an expert judge evaluating a retrieval system.

Question: {question}

Retrieved context chunks:
{contexts}

Expected answer: {ground_truth}

Determine what fraction of the expected answer can be attributed to the
retrieved chunks. The score is 1.0 when every statement in the expected
answer is supported by some chunk, 0.0 when none are.

Respond in JSON format:
{{
    "score": <float between 0 and 1>,
    "explanation": "<brief explanation>"
}}

Respond with only the JSON, no other text."#,
                question = row.question,
                contexts = contexts,
                ground_truth = row.ground_truth
            ),

            Metric::Faithfulness => format!(
                r#"You are an expert judge checking an answer for hallucinations.

Context:
{contexts}

Answer: {answer}

Extract the factual claims made in the answer and verify each one against
the context. The score is the fraction of claims the context supports:
1.0 when every claim is supported, 0.0 when none are.

Respond in JSON format:
{{
    "score": <float between 0 and 1>,
    "explanation": "<brief explanation>"
}}

Respond with only the JSON, no other text."#,
                contexts = contexts,
                answer = row.answer
            ),

            Metric::AnswerCorrectness => format!(
                r#"You are an expert judge comparing a generated answer to the expected answer.

Question: {question}

Generated answer: {answer}

Expected answer: {ground_truth}

Judge how well the generated answer agrees with the expected answer,
considering both factual overlap and contradictions. The score is 1.0 for
a fully correct answer and 0.0 for a fully incorrect one.

Respond in JSON format:
{{
    "score": <float between 0 and 1>,
    "explanation": "<brief explanation>"
}}

Respond with only the JSON, no other text."#,
                question = row.question,
                answer = row.answer,
                ground_truth = row.ground_truth
            ),
        }
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

fn format_contexts(contexts: &[String]) -> String {
    contexts
        .iter()
        .enumerate()
        .map(|(i, c)| format!("[Chunk {}]: {}", i, c))
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::EvaluationDataset;

    fn sample_dataset() -> EvaluationDataset {
        EvaluationDataset::assemble(
            vec!["What happened?".to_string()],
            vec!["A breach.".to_string()],
            vec![vec!["chunk a".to_string(), "chunk b".to_string()]],
            vec!["A data breach.".to_string()],
        )
        .unwrap()
    }

    #[test]
    fn test_names_match_result_file_convention() {
        assert_eq!(Metric::ContextPrecision.name(), "context_precision");
        assert_eq!(Metric::AnswerCorrectness.name(), "answer_correctness");
        assert_eq!(Metric::ALL.len(), 4);
    }

    #[test]
    fn test_prompts_embed_row_fields() {
        let dataset = sample_dataset();
        let row = dataset.row(0).unwrap();

        for metric in Metric::ALL {
            let prompt = metric.judge_prompt(&row);
            assert!(prompt.contains(r#""score""#), "{} prompt", metric);
        }

        let recall = Metric::ContextRecall.judge_prompt(&row);
        assert!(recall.contains("A data breach."));
        assert!(recall.contains("[Chunk 0]: chunk a"));

        let faithfulness = Metric::Faithfulness.judge_prompt(&row);
        assert!(faithfulness.contains("A breach."));
    }

    #[test]
    fn test_default_top_k_per_metric() {
        assert_eq!(Metric::ContextPrecision.default_top_k(), 2);
        assert_eq!(Metric::Faithfulness.default_top_k(), 5);
    }
}
