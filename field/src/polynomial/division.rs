use crate::error::MathError;
use crate::polynomial::Polynomial;
use crate::prime_field::PrimeField;
use crate::types::FieldElement;

impl Polynomial {
    /// Polynomial long division.
    /// Returns `(q, r)`, the quotient and remainder of the division of `self` by `divisor`.
    pub fn div_rem(
        &self,
        field: &PrimeField,
        divisor: &Self,
    ) -> Result<(Self, Self), MathError> {
        if divisor.is_zero() {
            return Err(MathError::NoInverse);
        }
        if self.is_zero() || self.degree() < divisor.degree() {
            return Ok((Self::zero(), self.clone()));
        }

        let divisor_degree = divisor.degree();
        let divisor_leading_inv = field.inv(divisor.lead())?;
        let mut quotient = vec![FieldElement::zero(); self.degree() - divisor_degree + 1];
        let mut remainder = self.coeffs.clone();

        for cur_q_degree in (0..quotient.len()).rev() {
            let lead = &remainder[cur_q_degree + divisor_degree];
            if lead.is_zero() {
                continue;
            }
            let cur_q_coeff = field.mul(lead, &divisor_leading_inv);
            for (i, div_coeff) in divisor.coeffs.iter().enumerate() {
                let idx = cur_q_degree + i;
                remainder[idx] = field.sub(&remainder[idx], &field.mul(&cur_q_coeff, div_coeff));
            }
            quotient[cur_q_degree] = cur_q_coeff;
        }

        remainder.truncate(divisor_degree.max(1));
        Ok((Self::new(quotient), Self::new(remainder)))
    }

    /// Let `self = p(x)`, this returns `(p(x) - p(z)) / (x - z)`, by synthetic division.
    pub fn divide_by_linear(&self, field: &PrimeField, z: &FieldElement) -> Self {
        let mut bs = self
            .coeffs
            .iter()
            .rev()
            .scan(FieldElement::zero(), |acc, c| {
                *acc = field.add(&field.mul(acc, z), c);
                Some(acc.clone())
            })
            .collect::<Vec<_>>();
        // The last partial sum is `p(z)`.
        bs.pop();
        bs.reverse();
        Self::new(bs)
    }
}

#[cfg(test)]
mod tests {
    use rand::{thread_rng, Rng};

    use super::*;

    #[test]
    fn division_by_linear() {
        let mut rng = thread_rng();
        let field = PrimeField::stark252();
        let n = rng.gen_range(1..40);
        let poly = Polynomial::new(field.sample_vec(&mut rng, n));
        let z = field.sample(&mut rng);
        let ev = poly.evaluate(&field, &z);

        let quotient = poly.divide_by_linear(&field, &z);
        // `quotient * (x - z) + ev`
        let rebuilt = quotient
            .multiply(&field, &Polynomial::linear(&field, &z))
            .add(&field, &Polynomial::constant(ev));
        assert_eq!(poly, rebuilt);
    }

    #[test]
    fn division_by_linear_of_constant() {
        let field = PrimeField::goldilocks();
        let c = Polynomial::constant(field.element(5));
        assert!(c.divide_by_linear(&field, &field.element(3)).is_zero());
    }

    #[test]
    fn long_division() {
        let mut rng = thread_rng();
        let field = PrimeField::goldilocks();
        for _ in 0..10 {
            let (a_len, b_len) = (rng.gen_range(1..30), rng.gen_range(1..30));
            let a = Polynomial::new(field.sample_vec(&mut rng, a_len));
            let b = Polynomial::new(field.sample_vec(&mut rng, b_len));
            if b.is_zero() {
                continue;
            }
            let (q, r) = a.div_rem(&field, &b).unwrap();
            assert!(r.is_zero() || r.degree() < b.degree() || b.degree() == 0);
            for _ in 0..5 {
                let x = field.sample(&mut rng);
                assert_eq!(
                    a.evaluate(&field, &x),
                    field.add(
                        &field.mul(&b.evaluate(&field, &x), &q.evaluate(&field, &x)),
                        &r.evaluate(&field, &x)
                    )
                );
            }
        }
    }

    #[test]
    fn exact_division() {
        let field = PrimeField::goldilocks();
        // (x^4 - 1) / (x - 1) = x^3 + x^2 + x + 1
        let x4_minus_one = Polynomial::new(vec![
            field.neg(&field.one()),
            field.zero(),
            field.zero(),
            field.zero(),
            field.one(),
        ]);
        let (q, r) = x4_minus_one
            .div_rem(&field, &Polynomial::linear(&field, &field.one()))
            .unwrap();
        assert_eq!(q, Polynomial::new(vec![field.one(); 4]));
        assert!(r.is_zero());
    }

    #[test]
    fn division_by_zero_fails() {
        let field = PrimeField::goldilocks();
        let a = Polynomial::constant(field.one());
        assert_eq!(
            a.div_rem(&field, &Polynomial::zero()),
            Err(MathError::NoInverse)
        );
    }
}
