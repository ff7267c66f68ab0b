//! Reed-Solomon codes over a multiplicative subgroup.
//!
//! A message of `k` symbols is read as the coefficients of a polynomial of degree `< k`, which is
//! evaluated on `n > k` distinct points. Validation here is exact agreement: a received word is
//! accepted iff it is itself the evaluation of a polynomial of degree `< k`. No error correction is
//! attempted; a decoder that tolerates corrupted symbols would need Berlekamp-Welch or list
//! decoding on top of this.

use log::trace;
use primestark_field::interpolation::interpolate_on_domain;
use primestark_field::{
    Codeword, ConfigError, Domain, FieldElement, Polynomial, PrimeField, ValidationError,
};

use crate::error::StarkError;

#[derive(Clone, Debug)]
pub struct ReedSolomon {
    field: PrimeField,
    k: usize,
    n: usize,
    domain: Domain,
}

/// The result of encoding a message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Encoding {
    pub polynomial: Polynomial,
    pub codeword: Codeword,
    pub domain: Domain,
}

impl ReedSolomon {
    pub fn new(field: PrimeField, k: usize, n: usize) -> Result<Self, ConfigError> {
        if k == 0 || n <= k {
            return Err(ConfigError::InvalidRate { k, n });
        }
        let domain = generate_domain(&field, n)?;
        Ok(Self {
            field,
            k,
            n,
            domain,
        })
    }

    pub fn field(&self) -> &PrimeField {
        &self.field
    }

    /// Message length.
    pub fn k(&self) -> usize {
        self.k
    }

    /// Codeword length.
    pub fn n(&self) -> usize {
        self.n
    }

    pub fn rate(&self) -> f64 {
        self.k as f64 / self.n as f64
    }

    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    pub fn generate_domain(&self, size: usize) -> Result<Domain, ConfigError> {
        generate_domain(&self.field, size)
    }

    /// Encodes `data`, read as polynomial coefficients, into a codeword of length `n`.
    pub fn encode(&self, data: &[FieldElement]) -> Result<Encoding, StarkError> {
        if data.len() != self.k {
            return Err(ValidationError::LengthMismatch {
                expected: self.k,
                actual: data.len(),
            }
            .into());
        }
        if let Some(x) = data.iter().find(|x| !self.field.is_canonical(x)) {
            return Err(ValidationError::Malformed(format!("{} is not a field element", x)).into());
        }

        let polynomial = Polynomial::new(data.to_vec());
        let codeword = polynomial.evaluate_on_domain(&self.field, &self.domain);
        Ok(Encoding {
            polynomial,
            codeword,
            domain: self.domain.clone(),
        })
    }

    /// Whether `received` is exactly the evaluation of some polynomial of degree `< k`.
    pub fn is_valid_codeword(&self, received: &[FieldElement]) -> bool {
        if received.len() != self.n || !received.iter().all(|x| self.field.is_canonical(x)) {
            return false;
        }
        let polynomial = match interpolate_on_domain(&self.field, &self.domain, received) {
            Ok(p) => p,
            Err(_) => return false,
        };
        if polynomial.degree() >= self.k {
            trace!(
                "Rejecting word: interpolant has degree {} >= {}",
                polynomial.degree(),
                self.k
            );
            return false;
        }
        polynomial.evaluate_on_domain(&self.field, &self.domain) == received
    }
}

/// The first `size` powers of a root of unity whose order is `size` rounded up to a power of two.
pub fn generate_domain(field: &PrimeField, size: usize) -> Result<Domain, ConfigError> {
    if size == 0 {
        return Err(ConfigError::DomainSizeInvalid { size });
    }
    Domain::truncated(field, size.next_power_of_two(), size)
}
