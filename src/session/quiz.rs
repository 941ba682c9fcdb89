use crate::catalog::PartOfSpeech;
use crate::client::QuizQuestion;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuizPhase {
    /// Generation request is in flight.
    Loading,
    /// Questions arrived and can be answered.
    Ready,
    /// Generation produced nothing usable; rendered as a placeholder, not as
    /// an empty quiz.
    Unavailable,
    /// Answers were graded. Terminal until an explicit reset.
    Submitted,
}

/// Live state for one quiz attempt on one category. Selections mirror the
/// question list one-to-one; `None` marks an unanswered question. Each load
/// carries an epoch so results for a superseded attempt can be dropped.
pub struct QuizSession {
    pub category: PartOfSpeech,
    pub phase: QuizPhase,
    pub questions: Vec<QuizQuestion>,
    pub selections: Vec<Option<usize>>,
    pub focused: usize,
    epoch: u64,
}

impl QuizSession {
    pub fn new(category: PartOfSpeech, epoch: u64) -> Self {
        Self {
            category,
            phase: QuizPhase::Loading,
            questions: Vec::new(),
            selections: Vec::new(),
            focused: 0,
            epoch,
        }
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Apply a completed fetch. Stale epochs are the caller's problem; this
    /// only transitions out of `Loading`.
    pub fn finish_loading(&mut self, questions: Vec<QuizQuestion>) {
        if self.phase != QuizPhase::Loading {
            return;
        }
        self.selections = vec![None; questions.len()];
        self.phase = if questions.is_empty() {
            QuizPhase::Unavailable
        } else {
            QuizPhase::Ready
        };
        self.questions = questions;
        self.focused = 0;
    }

    /// Record a selection for the focused question. Last write wins; ignored
    /// once submitted.
    pub fn select(&mut self, question: usize, option: usize) {
        if self.phase != QuizPhase::Ready {
            return;
        }
        if question >= self.questions.len() || option >= 4 {
            return;
        }
        self.selections[question] = Some(option);
    }

    pub fn focus_next(&mut self) {
        if !self.questions.is_empty() {
            self.focused = (self.focused + 1).min(self.questions.len() - 1);
        }
    }

    pub fn focus_prev(&mut self) {
        self.focused = self.focused.saturating_sub(1);
    }

    /// Submission unlocks only when every question has an answer.
    pub fn can_submit(&self) -> bool {
        self.phase == QuizPhase::Ready
            && !self.questions.is_empty()
            && self.selections.iter().all(|s| s.is_some())
    }

    pub fn submit(&mut self) {
        if self.can_submit() {
            self.phase = QuizPhase::Submitted;
        }
    }

    /// Full replace: discard questions and answers, bump the epoch, and go
    /// back to `Loading` for a fresh generation.
    pub fn reset(&mut self, epoch: u64) {
        self.questions.clear();
        self.selections.clear();
        self.focused = 0;
        self.phase = QuizPhase::Loading;
        self.epoch = epoch;
    }

    /// Grading is computed, never stored.
    pub fn is_correct(&self, question: usize) -> bool {
        self.phase == QuizPhase::Submitted
            && self.selections.get(question).copied().flatten()
                == self.questions.get(question).map(|q| q.correct_answer)
    }

    pub fn score(&self) -> usize {
        (0..self.questions.len())
            .filter(|&i| self.is_correct(i))
            .count()
    }
}
