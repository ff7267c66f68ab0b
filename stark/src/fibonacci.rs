//! A toy AIR for the Fibonacci sequence: two columns `(a, b)`, starting at `(1, 1)`, with
//! `a' = b` and `b' = a + b`.

use primestark_field::{FieldElement, PrimeField};

use crate::air::Air;
use crate::trace::ExecutionTrace;

/// The `num_rows`-row Fibonacci trace starting from `(1, 1)`.
pub fn fibonacci_trace(field: &PrimeField, num_rows: usize) -> ExecutionTrace {
    let mut rows = Vec::with_capacity(num_rows);
    let (mut a, mut b) = (field.one(), field.one());
    for _ in 0..num_rows {
        let next_b = field.add(&a, &b);
        rows.push(vec![a, b.clone()]);
        a = b;
        b = next_b;
    }
    ExecutionTrace::from_rows(rows).expect("all rows have width 2")
}

/// The second column of the last row of the Fibonacci trace.
pub fn fibonacci_result(field: &PrimeField, num_rows: usize) -> FieldElement {
    let (mut a, mut b) = (field.one(), field.one());
    for _ in 1..num_rows {
        let next_b = field.add(&a, &b);
        a = b;
        b = next_b;
    }
    b
}

/// Constrains the trace to start at `(1, 1)`, follow the Fibonacci recurrence, and end with
/// `b = result` in row `num_rows - 1`.
pub fn fibonacci_air(field: &PrimeField, num_rows: usize, result: &FieldElement) -> Air {
    let mut air = Air::new(field.clone(), 2);
    air.add_boundary_constraint(0, 0, field.one());
    air.add_boundary_constraint(0, 1, field.one());
    air.add_boundary_constraint(num_rows.saturating_sub(1), 1, result.clone());
    air.add_transition_constraint(|f, cur, next| f.sub(&next[0], &cur[1]));
    air.add_transition_constraint(|f, cur, next| f.sub(&next[1], &f.add(&cur[0], &cur[1])));
    air
}
