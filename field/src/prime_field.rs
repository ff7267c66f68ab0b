use log::debug;
use num::bigint::{BigUint, RandBigInt};
use num::{Num, One, Zero};
use rand::Rng;

use crate::error::{ConfigError, MathError};
use crate::factor::{distinct_prime_factors, is_probable_prime};
use crate::types::FieldElement;

/// The prime field `Z/pZ` for an arbitrary-precision prime `p`.
///
/// All arithmetic returns canonical representatives in `[0, p)`. The multiplicative generator is
/// located once, at construction, by factoring `p - 1`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrimeField {
    modulus: BigUint,
    generator: FieldElement,
    two_adicity: usize,
}

impl PrimeField {
    /// Builds the field of integers modulo `modulus`, which must be an odd prime.
    pub fn new(modulus: BigUint) -> Result<Self, ConfigError> {
        if modulus < BigUint::from(3u32) || !is_probable_prime(&modulus) {
            return Err(ConfigError::NotPrime(modulus.to_string()));
        }

        let p_minus_one = &modulus - 1u32;
        let two_adicity = p_minus_one.trailing_zeros().unwrap_or(0) as usize;
        let generator = find_primitive_root(&modulus);
        debug!(
            "Constructed a {}-bit prime field with generator {} and two-adicity {}",
            modulus.bits(),
            generator,
            two_adicity
        );

        Ok(Self {
            modulus,
            generator,
            two_adicity,
        })
    }

    /// The STARK-friendly prime `p = 2^251 + 17 * 2^192 + 1`.
    ///
    /// `p - 1` is divisible by `2^192`, so every practical power-of-two domain size is available.
    pub fn stark252() -> Self {
        let modulus = BigUint::from_str_radix(
            "800000000000011000000000000000000000000000000000000000000000001",
            16,
        )
        .expect("valid hex literal");
        Self::new(modulus).expect("2^251 + 17 * 2^192 + 1 is prime")
    }

    /// The Goldilocks prime `p = 2^64 - 2^32 + 1`.
    pub fn goldilocks() -> Self {
        Self::new(BigUint::from(0xFFFF_FFFF_0000_0001u64)).expect("Goldilocks is prime")
    }

    pub fn modulus(&self) -> &BigUint {
        &self.modulus
    }

    /// A generator of the multiplicative group of the field.
    pub fn generator(&self) -> &FieldElement {
        &self.generator
    }

    /// The largest `k` such that `2^k` divides `p - 1`.
    pub fn two_adicity(&self) -> usize {
        self.two_adicity
    }

    pub fn bits(&self) -> usize {
        self.modulus.bits() as usize
    }

    pub fn zero(&self) -> FieldElement {
        FieldElement::zero()
    }

    pub fn one(&self) -> FieldElement {
        FieldElement::one()
    }

    pub fn element(&self, n: u64) -> FieldElement {
        self.element_from_biguint(BigUint::from(n))
    }

    pub fn element_from_biguint(&self, n: BigUint) -> FieldElement {
        FieldElement(n % &self.modulus)
    }

    /// Reduces an arbitrary byte string, read as a little-endian integer, into the field.
    pub fn element_from_bytes_le(&self, bytes: &[u8]) -> FieldElement {
        self.element_from_biguint(BigUint::from_bytes_le(bytes))
    }

    /// Whether `x` is a canonical representative, i.e. lies in `[0, p)`.
    pub fn is_canonical(&self, x: &FieldElement) -> bool {
        x.0 < self.modulus
    }

    pub fn add(&self, a: &FieldElement, b: &FieldElement) -> FieldElement {
        let mut result = &a.0 + &b.0;
        if result >= self.modulus {
            result -= &self.modulus;
        }
        FieldElement(result)
    }

    pub fn sub(&self, a: &FieldElement, b: &FieldElement) -> FieldElement {
        // Adding `p` first keeps the unsigned intermediate non-negative.
        FieldElement((&a.0 + &self.modulus - &b.0) % &self.modulus)
    }

    pub fn neg(&self, a: &FieldElement) -> FieldElement {
        if a.is_zero() {
            FieldElement::zero()
        } else {
            FieldElement(&self.modulus - &a.0)
        }
    }

    pub fn mul(&self, a: &FieldElement, b: &FieldElement) -> FieldElement {
        FieldElement((&a.0 * &b.0) % &self.modulus)
    }

    pub fn square(&self, a: &FieldElement) -> FieldElement {
        self.mul(a, a)
    }

    pub fn double(&self, a: &FieldElement) -> FieldElement {
        self.add(a, a)
    }

    pub fn pow(&self, a: &FieldElement, exponent: u64) -> FieldElement {
        let mut current = a.clone();
        let mut product = FieldElement::one();

        for j in 0..(64 - exponent.leading_zeros()) {
            if (exponent >> j) & 1 != 0 {
                product = self.mul(&product, &current);
            }
            current = self.square(&current);
        }
        product
    }

    pub fn pow_biguint(&self, a: &FieldElement, exponent: &BigUint) -> FieldElement {
        FieldElement(a.0.modpow(exponent, &self.modulus))
    }

    /// Multiplicative inverse via Fermat's little theorem, `a^(p - 2)`.
    pub fn inv(&self, a: &FieldElement) -> Result<FieldElement, MathError> {
        if a.0.is_zero() || (&a.0 % &self.modulus).is_zero() {
            return Err(MathError::NoInverse);
        }
        Ok(self.pow_biguint(a, &(&self.modulus - 2u32)))
    }

    pub fn div(&self, a: &FieldElement, b: &FieldElement) -> Result<FieldElement, MathError> {
        Ok(self.mul(a, &self.inv(b)?))
    }

    /// Inverts every element of `values` with a single field inversion (Montgomery's trick).
    pub fn batch_inv(&self, values: &[FieldElement]) -> Result<Vec<FieldElement>, MathError> {
        if values.is_empty() {
            return Ok(Vec::new());
        }

        let mut prefix_products = Vec::with_capacity(values.len());
        let mut acc = FieldElement::one();
        for value in values {
            if value.is_zero() {
                return Err(MathError::NoInverse);
            }
            prefix_products.push(acc.clone());
            acc = self.mul(&acc, value);
        }

        let mut acc_inv = self.inv(&acc)?;
        let mut result = vec![FieldElement::zero(); values.len()];
        for i in (0..values.len()).rev() {
            result[i] = self.mul(&acc_inv, &prefix_products[i]);
            acc_inv = self.mul(&acc_inv, &values[i]);
        }
        Ok(result)
    }

    pub fn sum<'a, I: IntoIterator<Item = &'a FieldElement>>(&self, iter: I) -> FieldElement {
        iter.into_iter()
            .fold(FieldElement::zero(), |acc, x| self.add(&acc, x))
    }

    pub fn product<'a, I: IntoIterator<Item = &'a FieldElement>>(&self, iter: I) -> FieldElement {
        iter.into_iter()
            .fold(FieldElement::one(), |acc, x| self.mul(&acc, x))
    }

    /// Searches for a generator of the multiplicative group: the smallest `g >= 2` such that
    /// `g^((p - 1) / q) != 1` for every prime factor `q` of `p - 1`.
    pub fn find_primitive_root(&self) -> FieldElement {
        find_primitive_root(&self.modulus)
    }

    /// Returns `g^((p - 1) / n)`, an element of multiplicative order exactly `n`.
    pub fn get_nth_root_of_unity(&self, n: usize) -> Result<FieldElement, ConfigError> {
        let p_minus_one = &self.modulus - 1u32;
        let n_big = BigUint::from(n);
        if n == 0 || !(&p_minus_one % &n_big).is_zero() {
            return Err(ConfigError::DomainSizeInvalid { size: n });
        }
        Ok(self.pow_biguint(&self.generator, &(p_minus_one / n_big)))
    }

    /// `[1, base, base^2, ..., base^(count - 1)]`.
    pub fn powers(&self, base: &FieldElement, count: usize) -> Vec<FieldElement> {
        self.shifted_powers(&FieldElement::one(), base, count)
    }

    /// `[shift, shift * base, ..., shift * base^(count - 1)]`.
    pub fn shifted_powers(
        &self,
        shift: &FieldElement,
        base: &FieldElement,
        count: usize,
    ) -> Vec<FieldElement> {
        let mut result = Vec::with_capacity(count);
        let mut current = shift.clone();
        for _ in 0..count {
            let next = self.mul(&current, base);
            result.push(current);
            current = next;
        }
        result
    }

    /// A uniformly random element.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> FieldElement {
        FieldElement(rng.gen_biguint_below(&self.modulus))
    }

    pub fn sample_vec<R: Rng + ?Sized>(&self, rng: &mut R, n: usize) -> Vec<FieldElement> {
        (0..n).map(|_| self.sample(rng)).collect()
    }
}

fn find_primitive_root(modulus: &BigUint) -> FieldElement {
    let p_minus_one = modulus - 1u32;
    let cofactors: Vec<BigUint> = distinct_prime_factors(&p_minus_one)
        .iter()
        .map(|q| &p_minus_one / q)
        .collect();

    let mut candidate = BigUint::from(2u32);
    loop {
        if cofactors
            .iter()
            .all(|e| !candidate.modpow(e, modulus).is_one())
        {
            return FieldElement(candidate);
        }
        candidate += 1u32;
    }
}
