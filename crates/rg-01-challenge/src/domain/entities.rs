//! Challenge entities.

use serde::{Deserialize, Serialize};
use shared_types::{AccountId, Timestamp, UnitScore};
use std::fmt;
use uuid::Uuid;

/// Challenge session identifier.
pub type SessionId = Uuid;

/// Arithmetic operator used in a challenge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operation {
    Add,
    Subtract,
    Multiply,
}

impl Operation {
    pub fn symbol(self) -> char {
        match self {
            Operation::Add => '+',
            Operation::Subtract => '-',
            Operation::Multiply => '×',
        }
    }
}

/// Two-operand expression shown to the user.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArithmeticExpression {
    pub left: i64,
    pub op: Operation,
    pub right: i64,
}

impl ArithmeticExpression {
    pub fn answer(&self) -> i64 {
        match self.op {
            Operation::Add => self.left + self.right,
            Operation::Subtract => self.left - self.right,
            Operation::Multiply => self.left * self.right,
        }
    }
}

impl fmt::Display for ArithmeticExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} = ?", self.left, self.op.symbol(), self.right)
    }
}

/// Server-side record of an issued challenge.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChallengeSession {
    pub id: SessionId,
    pub account_id: AccountId,
    /// Never leaves the server.
    pub expected_answer: i64,
    pub issued_at: Timestamp,
    pub solved: bool,
    pub solve_latency_secs: Option<f64>,
}

impl ChallengeSession {
    pub fn new(account_id: AccountId, expected_answer: i64, issued_at: Timestamp) -> Self {
        Self {
            id: Uuid::new_v4(),
            account_id,
            expected_answer,
            issued_at,
            solved: false,
            solve_latency_secs: None,
        }
    }
}

/// What the caller renders to the user.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IssuedChallenge {
    pub session_id: SessionId,
    pub expression: ArithmeticExpression,
    /// Six shuffled options, exactly one of which is correct.
    pub candidates: Vec<i64>,
}

impl IssuedChallenge {
    pub fn question(&self) -> String {
        self.expression.to_string()
    }
}

/// Result of one answer submission.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub correct: bool,
    /// Seconds since issue; zero when the session was already solved.
    pub solve_latency_secs: f64,
    /// The session had been solved before this submission.
    pub already_solved: bool,
}

impl Evaluation {
    pub(crate) fn already_solved() -> Self {
        Self {
            correct: false,
            solve_latency_secs: 0.0,
            already_solved: true,
        }
    }
}

/// Evaluation plus the quality score stored for the account on a first correct solve.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChallengeOutcome {
    pub evaluation: Evaluation,
    pub score: Option<UnitScore>,
}
