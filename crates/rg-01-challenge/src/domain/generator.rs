//! Expression and answer-candidate generation.

use rand::seq::SliceRandom;
use rand::Rng;

use super::entities::{ArithmeticExpression, Operation};

/// Operand range for addition and subtraction.
pub const ADDITIVE_OPERAND_MAX: i64 = 20;

/// Operand range for multiplication; keeps mental math bounded.
pub const MULTIPLICATIVE_OPERAND_MAX: i64 = 10;

/// Number of wrong options shown next to the correct one.
pub const DECOY_COUNT: usize = 5;

/// Decoys are drawn from `correct ± DECOY_SPREAD`.
pub const DECOY_SPREAD: i64 = 5;

const OPERATIONS: [Operation; 3] = [Operation::Add, Operation::Subtract, Operation::Multiply];

/// Build a random two-operand expression with a non-negative answer.
pub fn generate_expression<R: Rng + ?Sized>(rng: &mut R) -> ArithmeticExpression {
    let op = *OPERATIONS.choose(rng).unwrap_or(&Operation::Add);
    match op {
        Operation::Add => ArithmeticExpression {
            left: rng.gen_range(1..=ADDITIVE_OPERAND_MAX),
            op,
            right: rng.gen_range(1..=ADDITIVE_OPERAND_MAX),
        },
        Operation::Subtract => {
            let a = rng.gen_range(1..=ADDITIVE_OPERAND_MAX);
            let b = rng.gen_range(1..=ADDITIVE_OPERAND_MAX);
            ArithmeticExpression {
                left: a.max(b),
                op,
                right: a.min(b),
            }
        }
        Operation::Multiply => ArithmeticExpression {
            left: rng.gen_range(1..=MULTIPLICATIVE_OPERAND_MAX),
            op,
            right: rng.gen_range(1..=MULTIPLICATIVE_OPERAND_MAX),
        },
    }
}

/// Six shuffled, distinct options: the correct answer plus five positive decoys
/// within `±DECOY_SPREAD` of it.
///
/// The decoy pool always holds at least five values for a non-negative answer
/// (`0` yields exactly `1..=5`), so no rejection loop is needed.
pub fn answer_candidates<R: Rng + ?Sized>(correct: i64, rng: &mut R) -> Vec<i64> {
    let mut pool: Vec<i64> = (correct - DECOY_SPREAD..=correct + DECOY_SPREAD)
        .filter(|candidate| *candidate > 0 && *candidate != correct)
        .collect();
    pool.shuffle(rng);
    pool.truncate(DECOY_COUNT);
    pool.push(correct);
    pool.shuffle(rng);
    pool
}
