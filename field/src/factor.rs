//! Primality testing and factoring of `p - 1`, needed to certify a multiplicative generator.

use num::bigint::BigUint;
use num::{Integer, One, Zero};

/// Miller-Rabin bases. Deterministic for inputs below `3.3 * 10^24`; beyond that each base that
/// passes divides the probability of a composite slipping through by at least four.
const WITNESSES: [u32; 16] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53];

/// Upper bound for the trial-division pass of [`distinct_prime_factors`].
const TRIAL_DIVISION_BOUND: u32 = 1 << 12;

pub fn is_probable_prime(n: &BigUint) -> bool {
    let two = BigUint::from(2u32);
    if *n < two {
        return false;
    }
    for &w in &WITNESSES {
        let w = BigUint::from(w);
        if *n == w {
            return true;
        }
        if (n % &w).is_zero() {
            return false;
        }
    }

    let n_minus_one = n - 1u32;
    let s = n_minus_one.trailing_zeros().unwrap_or(0);
    let d = &n_minus_one >> s;

    'witness: for &w in &WITNESSES {
        let mut x = BigUint::from(w).modpow(&d, n);
        if x.is_one() || x == n_minus_one {
            continue;
        }
        for _ in 1..s {
            x = x.modpow(&two, n);
            if x == n_minus_one {
                continue 'witness;
            }
        }
        return false;
    }
    true
}

/// Returns the distinct prime factors of `n`, in increasing order.
pub fn distinct_prime_factors(n: &BigUint) -> Vec<BigUint> {
    let mut factors = Vec::new();
    let mut rest = n.clone();
    if rest.is_zero() {
        return factors;
    }

    // Any candidate that divides `rest` here is prime, since its own factors were removed first.
    let mut candidate = 2u32;
    while candidate < TRIAL_DIVISION_BOUND && !rest.is_one() {
        let c = BigUint::from(candidate);
        if (&rest % &c).is_zero() {
            factors.push(c.clone());
            while (&rest % &c).is_zero() {
                rest /= &c;
            }
        }
        candidate += if candidate == 2 { 1 } else { 2 };
    }

    let mut pending = vec![rest];
    while let Some(m) = pending.pop() {
        if m.is_one() {
            continue;
        }
        if is_probable_prime(&m) {
            factors.push(m);
            continue;
        }
        let d = pollard_rho(&m);
        pending.push(&m / &d);
        pending.push(d);
    }

    factors.sort();
    factors.dedup();
    factors
}

/// Finds a non-trivial factor of the odd composite `n` with Pollard's rho method.
fn pollard_rho(n: &BigUint) -> BigUint {
    if n.is_even() {
        return BigUint::from(2u32);
    }

    let mut c = BigUint::one();
    loop {
        let step = |x: &BigUint| (x * x + &c) % n;
        let mut tortoise = BigUint::from(2u32);
        let mut hare = tortoise.clone();
        let mut d = BigUint::one();
        while d.is_one() {
            tortoise = step(&tortoise);
            hare = step(&step(&hare));
            let diff = if tortoise > hare {
                &tortoise - &hare
            } else {
                &hare - &tortoise
            };
            d = diff.gcd(n);
        }
        if d != *n {
            return d;
        }
        c += 1u32;
    }
}
