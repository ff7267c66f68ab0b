//! Zerofiers: polynomials vanishing exactly where a constraint must hold.

use primestark_field::{FieldElement, MathError, PrimeField};

/// `x - omega^row`, vanishing on the trace row a boundary constraint pins.
pub fn eval_boundary_zerofier(
    field: &PrimeField,
    x: &FieldElement,
    trace_generator: &FieldElement,
    row: usize,
) -> FieldElement {
    field.sub(x, &field.pow(trace_generator, row as u64))
}

/// `(x^n - 1) / (x - omega^(n - 1))`, vanishing on every trace row except the last, where `n` is
/// the trace length.
pub fn eval_transition_zerofier(
    field: &PrimeField,
    x: &FieldElement,
    trace_generator: &FieldElement,
    trace_len: usize,
) -> Result<FieldElement, MathError> {
    let numerator = field.sub(&field.pow(x, trace_len as u64), &field.one());
    let last_row = field.pow(trace_generator, (trace_len - 1) as u64);
    field.div(&numerator, &field.sub(x, &last_row))
}

#[cfg(test)]
mod tests {
    use primestark_field::Domain;

    use super::*;

    #[test]
    fn transition_zerofier_vanishes_on_all_but_last_row() {
        let field = PrimeField::goldilocks();
        let n = 8;
        let trace_domain = Domain::subgroup(&field, n).unwrap();
        let omega = trace_domain.generator();
        for (row, x) in trace_domain.points().iter().enumerate() {
            if row == n - 1 {
                // 0/0 at the last row.
                assert!(eval_transition_zerofier(&field, x, omega, n).is_err());
            } else {
                assert!(eval_transition_zerofier(&field, x, omega, n)
                    .unwrap()
                    .is_zero());
            }
        }

        let x = field.element(12345);
        let z = eval_transition_zerofier(&field, &x, omega, n).unwrap();
        let expected = trace_domain.points()[..n - 1]
            .iter()
            .fold(field.one(), |acc, p| field.mul(&acc, &field.sub(&x, p)));
        assert_eq!(z, expected);
    }

    #[test]
    fn boundary_zerofier_vanishes_on_its_row() {
        let field = PrimeField::goldilocks();
        let trace_domain = Domain::subgroup(&field, 4).unwrap();
        let omega = trace_domain.generator();
        for row in 0..4 {
            for (i, x) in trace_domain.points().iter().enumerate() {
                let value = eval_boundary_zerofier(&field, x, omega, row);
                assert_eq!(value.is_zero(), i == row);
            }
        }
    }
}
