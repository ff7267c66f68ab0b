use crate::domain::Domain;
use crate::error::{MathError, ValidationError};
use crate::polynomial::Polynomial;
use crate::prime_field::PrimeField;
use crate::types::FieldElement;

/// Computes the unique degree < n interpolant of an arbitrary list of n (point, value) pairs, in
/// Lagrange form: `sum_i y_i * prod_{j != i} (x - x_j) / (x_i - x_j)`.
///
/// Each numerator is the master product `prod_j (x - x_j)` divided by `(x - x_i)`. Returns
/// [`MathError::DuplicatePoint`] if two points share an x-coordinate.
pub fn interpolant(
    field: &PrimeField,
    points: &[(FieldElement, FieldElement)],
) -> Result<Polynomial, MathError> {
    if points.is_empty() {
        return Ok(Polynomial::zero());
    }

    let master = points.iter().fold(Polynomial::constant(field.one()), |acc, (x, _)| {
        acc.multiply(field, &Polynomial::linear(field, x))
    });

    let numerators: Vec<Polynomial> = points
        .iter()
        .map(|(x_i, _)| master.divide_by_linear(field, x_i))
        .collect();
    let denominators: Vec<FieldElement> = numerators
        .iter()
        .zip(points)
        .map(|(numerator, (x_i, _))| numerator.evaluate(field, x_i))
        .collect();
    let weights = field
        .batch_inv(&denominators)
        .map_err(|_| MathError::DuplicatePoint)?;

    let mut coeffs = vec![FieldElement::zero(); points.len()];
    for ((numerator, weight), (_, y_i)) in numerators.iter().zip(&weights).zip(points) {
        let scale = field.mul(weight, y_i);
        if scale.is_zero() {
            continue;
        }
        for (c, n) in coeffs.iter_mut().zip(numerator.coeffs()) {
            *c = field.add(c, &field.mul(n, &scale));
        }
    }
    Ok(Polynomial::new(coeffs))
}

/// Interpolates `values[i]` at the `i`-th point of `domain`, which must have exactly one point per
/// value.
pub fn interpolate_on_domain(
    field: &PrimeField,
    domain: &Domain,
    values: &[FieldElement],
) -> Result<Polynomial, ValidationError> {
    if values.len() != domain.size() {
        return Err(ValidationError::LengthMismatch {
            expected: domain.size(),
            actual: values.len(),
        });
    }
    let points: Vec<_> = domain
        .points()
        .iter()
        .cloned()
        .zip(values.iter().cloned())
        .collect();
    // Domain points are distinct powers of a root of unity.
    interpolant(field, &points).map_err(|e| ValidationError::Malformed(e.to_string()))
}

/// Interpolate the linear polynomial passing through `points` on `x`.
pub fn interpolate2(
    field: &PrimeField,
    points: [(&FieldElement, &FieldElement); 2],
    x: &FieldElement,
) -> Result<FieldElement, MathError> {
    // a0 -> a1
    // b0 -> b1
    // x  -> a1 + (x-a0)*(b1-a1)/(b0-a0)
    let (a0, a1) = points[0];
    let (b0, b1) = points[1];
    let slope = field
        .div(&field.sub(b1, a1), &field.sub(b0, a0))
        .map_err(|_| MathError::DuplicatePoint)?;
    Ok(field.add(a1, &field.mul(&field.sub(x, a0), &slope)))
}
