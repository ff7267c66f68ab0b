use crate::error::ConfigError;
use crate::prime_field::PrimeField;
use crate::types::FieldElement;

/// An ordered evaluation domain `offset * omega^i` for `i` in `[0, size)`.
///
/// `omega` generates a multiplicative subgroup of order `order`. Usually `size == order`; a
/// truncated domain keeps only the first `size` points of a larger subgroup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Domain {
    offset: FieldElement,
    generator: FieldElement,
    order: usize,
    points: Vec<FieldElement>,
}

impl Domain {
    /// The subgroup of order `size`.
    pub fn subgroup(field: &PrimeField, size: usize) -> Result<Self, ConfigError> {
        Self::coset(field, size, field.one())
    }

    /// The coset `offset * H` of the subgroup `H` of order `size`.
    pub fn coset(
        field: &PrimeField,
        size: usize,
        offset: FieldElement,
    ) -> Result<Self, ConfigError> {
        let generator = field.get_nth_root_of_unity(size)?;
        let points = field.shifted_powers(&offset, &generator, size);
        Ok(Self {
            offset,
            generator,
            order: size,
            points,
        })
    }

    /// The first `size` points of the subgroup of order `order`.
    pub fn truncated(field: &PrimeField, order: usize, size: usize) -> Result<Self, ConfigError> {
        if size > order {
            return Err(ConfigError::DomainSizeInvalid { size });
        }
        let mut domain = Self::subgroup(field, order)?;
        domain.points.truncate(size);
        Ok(domain)
    }

    /// The image of this domain under `x -> x^2`, which for an even-order coset is a coset of half
    /// the size.
    pub fn squared(&self, field: &PrimeField) -> Result<Self, ConfigError> {
        if self.order % 2 != 0 || self.points.len() != self.order {
            return Err(ConfigError::DomainSizeInvalid { size: self.order });
        }
        let half = self.order / 2;
        let offset = field.square(&self.offset);
        let generator = field.square(&self.generator);
        let points = field.shifted_powers(&offset, &generator, half);
        Ok(Self {
            offset,
            generator,
            order: half,
            points,
        })
    }

    pub fn offset(&self) -> &FieldElement {
        &self.offset
    }

    /// The generator `omega` of the underlying subgroup.
    pub fn generator(&self) -> &FieldElement {
        &self.generator
    }

    pub fn order(&self) -> usize {
        self.order
    }

    pub fn size(&self) -> usize {
        self.points.len()
    }

    pub fn points(&self) -> &[FieldElement] {
        &self.points
    }

    pub fn point(&self, i: usize) -> &FieldElement {
        &self.points[i]
    }
}
