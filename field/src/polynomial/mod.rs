pub(crate) mod division;

use std::cmp::max;

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::domain::Domain;
use crate::prime_field::PrimeField;
use crate::types::FieldElement;

/// Evaluations of a polynomial over the points of a [`Domain`], in domain order.
pub type Codeword = Vec<FieldElement>;

/// A polynomial in coefficient form: `coeffs[i]` is the coefficient of `x^i`.
///
/// Trailing zero coefficients are always trimmed, so two polynomials are equal iff their
/// coefficient vectors are. The zero polynomial is stored as `[0]`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<FieldElement>", into = "Vec<FieldElement>")]
pub struct Polynomial {
    coeffs: Vec<FieldElement>,
}

impl Polynomial {
    pub fn new(mut coeffs: Vec<FieldElement>) -> Self {
        while coeffs.len() > 1 && coeffs.last().map_or(false, FieldElement::is_zero) {
            coeffs.pop();
        }
        if coeffs.is_empty() {
            coeffs.push(FieldElement::zero());
        }
        Self { coeffs }
    }

    pub fn zero() -> Self {
        Self::new(Vec::new())
    }

    pub fn constant(c: FieldElement) -> Self {
        Self::new(vec![c])
    }

    /// The monic linear polynomial `x - root`.
    pub fn linear(field: &PrimeField, root: &FieldElement) -> Self {
        Self::new(vec![field.neg(root), field.one()])
    }

    pub fn coeffs(&self) -> &[FieldElement] {
        &self.coeffs
    }

    pub fn into_coeffs(self) -> Vec<FieldElement> {
        self.coeffs
    }

    pub fn is_zero(&self) -> bool {
        self.coeffs.len() == 1 && self.coeffs[0].is_zero()
    }

    /// The index of the highest non-zero coefficient. By convention the zero polynomial has
    /// degree 0, like a non-zero constant.
    pub fn degree(&self) -> usize {
        self.coeffs.len() - 1
    }

    /// The leading coefficient.
    pub fn lead(&self) -> &FieldElement {
        &self.coeffs[self.degree()]
    }

    /// Horner evaluation at `x`.
    pub fn evaluate(&self, field: &PrimeField, x: &FieldElement) -> FieldElement {
        self.coeffs
            .iter()
            .rev()
            .fold(FieldElement::zero(), |acc, c| field.add(&field.mul(&acc, x), c))
    }

    /// Evaluates at every point of `domain`.
    pub fn evaluate_on_domain(&self, field: &PrimeField, domain: &Domain) -> Codeword {
        #[cfg(feature = "parallel")]
        let iter = domain.points().par_iter();
        #[cfg(not(feature = "parallel"))]
        let iter = domain.points().iter();

        iter.map(|x| self.evaluate(field, x)).collect()
    }

    pub fn add(&self, field: &PrimeField, other: &Self) -> Self {
        let len = max(self.coeffs.len(), other.coeffs.len());
        let zero = FieldElement::zero();
        let coeffs = (0..len)
            .map(|i| {
                let a = self.coeffs.get(i).unwrap_or(&zero);
                let b = other.coeffs.get(i).unwrap_or(&zero);
                field.add(a, b)
            })
            .collect();
        Self::new(coeffs)
    }

    pub fn sub(&self, field: &PrimeField, other: &Self) -> Self {
        let len = max(self.coeffs.len(), other.coeffs.len());
        let zero = FieldElement::zero();
        let coeffs = (0..len)
            .map(|i| {
                let a = self.coeffs.get(i).unwrap_or(&zero);
                let b = other.coeffs.get(i).unwrap_or(&zero);
                field.sub(a, b)
            })
            .collect();
        Self::new(coeffs)
    }

    /// Schoolbook multiplication.
    pub fn multiply(&self, field: &PrimeField, other: &Self) -> Self {
        if self.is_zero() || other.is_zero() {
            return Self::zero();
        }
        let mut coeffs = vec![FieldElement::zero(); self.coeffs.len() + other.coeffs.len() - 1];
        for (i, a) in self.coeffs.iter().enumerate() {
            if a.is_zero() {
                continue;
            }
            for (j, b) in other.coeffs.iter().enumerate() {
                coeffs[i + j] = field.add(&coeffs[i + j], &field.mul(a, b));
            }
        }
        Self::new(coeffs)
    }

    pub fn scale(&self, field: &PrimeField, c: &FieldElement) -> Self {
        Self::new(self.coeffs.iter().map(|x| field.mul(x, c)).collect())
    }

    /// Splits `f(x) = f_e(x^2) + x * f_o(x^2)` into `(f_e, f_o)`.
    pub fn split_even_odd(&self) -> (Self, Self) {
        let even = self.coeffs.iter().step_by(2).cloned().collect();
        let odd = self.coeffs.iter().skip(1).step_by(2).cloned().collect();
        (Self::new(even), Self::new(odd))
    }

    /// The FRI fold `f_e(y) + alpha * f_o(y)`, of degree at most `floor(deg(f) / 2)`.
    pub fn fold(&self, field: &PrimeField, alpha: &FieldElement) -> Self {
        let (even, odd) = self.split_even_odd();
        even.add(field, &odd.scale(field, alpha))
    }
}

impl From<Vec<FieldElement>> for Polynomial {
    fn from(coeffs: Vec<FieldElement>) -> Self {
        Self::new(coeffs)
    }
}

impl From<Polynomial> for Vec<FieldElement> {
    fn from(poly: Polynomial) -> Self {
        poly.coeffs
    }
}
