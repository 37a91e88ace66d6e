//! Level knowledge-check questions and their grading
//!
//! Each challenge kind carries exactly the data its grader needs. A challenge
//! is graded at most once per level instance; later submissions are ignored.

use serde::{Deserialize, Serialize};

use super::kinematics::{self, LaunchParameters};
use crate::error::InputError;

/// Quantity a numeric challenge asks for, derived from its own launch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Quantity {
    /// Apex height above the launch point
    MaxHeight,
    /// Time from launch to apex
    TimeToPeak,
    /// Time to fall back to launch height
    FlatFlightTime,
    /// Distance covered when landing back at launch height
    FlatRange,
}

impl Quantity {
    /// Reference value, `None` for non-positive gravity
    pub fn reference(&self, launch: LaunchParameters, gravity: f32) -> Option<f32> {
        let (_, vy) = launch.velocity();
        match self {
            Quantity::MaxHeight => kinematics::peak_height(vy, gravity),
            Quantity::TimeToPeak => kinematics::peak_time(vy, gravity),
            Quantity::FlatFlightTime => kinematics::flat_flight_time(vy, gravity),
            Quantity::FlatRange => kinematics::flat_range(launch, gravity),
        }
    }
}

/// Immutable challenge definition attached to a level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChallengeSpec {
    /// Two numbers, each within `tolerance` of its reference
    NumericPair {
        question: String,
        launch: LaunchParameters,
        gravity: f32,
        quantities: [Quantity; 2],
        tolerance: f32,
    },
    /// One answer matching any accepted answer after normalization
    ExactMatch {
        question: String,
        accepted: Vec<String>,
    },
    /// Two answers, each containing its keyword after normalization
    KeywordPair {
        question: String,
        keywords: [String; 2],
    },
    /// Depends on the player's own shot; recorded but not graded
    AttemptOnly {
        question: String,
        guidance: String,
        #[serde(default = "default_two")]
        required_inputs: u8,
    },
}

fn default_two() -> u8 {
    2
}

impl ChallengeSpec {
    pub fn question(&self) -> &str {
        match self {
            ChallengeSpec::NumericPair { question, .. }
            | ChallengeSpec::ExactMatch { question, .. }
            | ChallengeSpec::KeywordPair { question, .. }
            | ChallengeSpec::AttemptOnly { question, .. } => question,
        }
    }

    /// 1 or 2
    pub fn required_inputs(&self) -> u8 {
        match self {
            ChallengeSpec::ExactMatch { .. } => 1,
            ChallengeSpec::NumericPair { .. } | ChallengeSpec::KeywordPair { .. } => 2,
            ChallengeSpec::AttemptOnly {
                required_inputs, ..
            } => (*required_inputs).clamp(1, 2),
        }
    }

    /// Whether a pass/fail verdict can be computed at all
    pub fn is_gradable(&self) -> bool {
        !matches!(self, ChallengeSpec::AttemptOnly { .. })
    }
}

/// Result of a single grading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Verdict {
    Correct,
    Incorrect,
    /// Attempt recorded; no verdict, only advice
    Guidance(String),
}

/// What happened to a submission
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Graded(Verdict),
    /// Challenge was already answered; nothing changed
    AlreadyAnswered,
}

/// Live challenge for one level instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChallengeState {
    pub spec: ChallengeSpec,
    pub answered: bool,
    pub correct: bool,
    pub feedback: Option<String>,
}

fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

fn parse_number(s: &str) -> Result<f32, InputError> {
    s.trim()
        .parse::<f32>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| InputError::NotANumber(s.trim().to_string()))
}

impl ChallengeState {
    pub fn new(spec: ChallengeSpec) -> Self {
        Self {
            spec,
            answered: false,
            correct: false,
            feedback: None,
        }
    }

    /// Counts toward level completion: graded correct, or an attempt-only
    /// challenge that has been attempted
    pub fn is_satisfied(&self) -> bool {
        self.correct || (self.answered && !self.spec.is_gradable())
    }

    /// Grade a submission.
    ///
    /// Malformed input (blank, missing second answer, unparsable number) is
    /// rejected without consuming the attempt.
    pub fn submit(
        &mut self,
        first: &str,
        second: Option<&str>,
    ) -> Result<SubmitOutcome, InputError> {
        if self.answered {
            return Ok(SubmitOutcome::AlreadyAnswered);
        }

        let first = first.trim();
        let second = second.map(str::trim).filter(|s| !s.is_empty());
        if first.is_empty() {
            return Err(InputError::EmptyAnswer);
        }
        if self.spec.required_inputs() == 2 && second.is_none() {
            return Err(InputError::MissingSecondAnswer);
        }

        let verdict = match &self.spec {
            ChallengeSpec::NumericPair {
                launch,
                gravity,
                quantities,
                tolerance,
                ..
            } => {
                let answers = [parse_number(first)?, parse_number(second.unwrap_or_default())?];
                let pass = quantities.iter().zip(answers).all(|(q, answer)| {
                    q.reference(*launch, *gravity)
                        .is_some_and(|reference| (answer - reference).abs() <= *tolerance)
                });
                if pass { Verdict::Correct } else { Verdict::Incorrect }
            }
            ChallengeSpec::ExactMatch { accepted, .. } => {
                let answer = normalize(first);
                if accepted.iter().any(|a| normalize(a) == answer) {
                    Verdict::Correct
                } else {
                    Verdict::Incorrect
                }
            }
            ChallengeSpec::KeywordPair { keywords, .. } => {
                let answers = [normalize(first), normalize(second.unwrap_or_default())];
                let pass = keywords
                    .iter()
                    .zip(&answers)
                    .all(|(keyword, answer)| answer.contains(&normalize(keyword)));
                if pass { Verdict::Correct } else { Verdict::Incorrect }
            }
            ChallengeSpec::AttemptOnly { guidance, .. } => Verdict::Guidance(guidance.clone()),
        };

        self.answered = true;
        self.correct = verdict == Verdict::Correct;
        self.feedback = Some(match &verdict {
            Verdict::Correct => "Correct!".to_string(),
            Verdict::Incorrect => {
                "Not quite. Review the formulas, then reset the level to try again.".to_string()
            }
            Verdict::Guidance(text) => text.clone(),
        });

        Ok(SubmitOutcome::Graded(verdict))
    }
}
