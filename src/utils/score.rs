// src/utils/score.rs

use serde::{Deserialize, Serialize};

use crate::models::catalog::Question;

/// Outcome of a finished quiz, shared by the server and the offline client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizResults {
    /// Rounded percentage of correct answers (0..=100).
    #[serde(rename = "score", alias = "percentage")]
    pub percentage: u32,
    pub correct: usize,
    pub total: usize,
    pub message: String,
}

impl QuizResults {
    /// Motivational line for the results screen.
    pub fn performance_message(&self) -> &'static str {
        match self.percentage {
            90.. => "Outstanding! You're a master!",
            70..=89 => "Great job! You passed with flying colors.",
            50..=69 => "Good effort! Keep practicing to improve.",
            _ => "Keep practicing! Let's review the answers.",
        }
    }
}

/// Scores recorded answers against the answer key.
///
/// `answers` is indexed by question position and may be sparse or shorter
/// than `questions`; a missing entry counts as wrong.
pub fn calculate_score(questions: &[Question], answers: &[Option<String>]) -> QuizResults {
    let total = questions.len();
    let correct = questions
        .iter()
        .enumerate()
        .filter(|(index, question)| {
            let answer = answers.get(*index).and_then(|a| a.as_deref());
            question.is_correct(answer)
        })
        .count();

    let percentage = rounded_percentage(correct, total);

    QuizResults {
        percentage,
        correct,
        total,
        message: format!("You scored {}% ({}/{} correct)", percentage, correct, total),
    }
}

/// `round(100 * correct / total)` with halves rounded up, in integer arithmetic.
fn rounded_percentage(correct: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((200 * correct + total) / (2 * total)) as u32
}
