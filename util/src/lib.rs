#![allow(clippy::needless_range_loop)]

/// Computes `ceil(log_2(n))`.
#[must_use]
pub fn log2_ceil(n: usize) -> usize {
    (usize::BITS - n.saturating_sub(1).leading_zeros()) as usize
}

/// Computes `log_2(n)`, panicking if `n` is not a power of two.
pub fn log2_strict(n: usize) -> usize {
    let res = n.trailing_zeros();
    assert!(n.wrapping_shr(res) == 1, "Not a power of two: {}", n);
    res as usize
}

/// Transposes a row-major matrix into a column-major one (or vice versa).
///
/// Every row must have the same length as the first one. An empty matrix transposes to an empty
/// matrix.
pub fn transpose<T: Clone>(matrix: &[Vec<T>]) -> Vec<Vec<T>> {
    let l = matrix.len();
    if l == 0 {
        return Vec::new();
    }
    let w = matrix[0].len();

    let mut transposed = vec![Vec::with_capacity(l); w];
    for j in 0..l {
        debug_assert_eq!(matrix[j].len(), w, "ragged matrix row {}", j);
        for i in 0..w {
            transposed[i].push(matrix[j][i].clone());
        }
    }
    transposed
}

#[cfg(test)]
mod tests {
    use rand::{thread_rng, Rng};

    use super::*;

    #[test]
    fn test_log2_ceil() {
        assert_eq!(log2_ceil(0), 0);
        assert_eq!(log2_ceil(1), 0);
        assert_eq!(log2_ceil(2), 1);
        assert_eq!(log2_ceil(3), 2);
        assert_eq!(log2_ceil(8), 3);
        assert_eq!(log2_ceil(9), 4);
        assert_eq!(log2_ceil(usize::MAX), usize::BITS as usize);
    }

    #[test]
    fn test_log2_strict() {
        assert_eq!(log2_strict(1), 0);
        assert_eq!(log2_strict(2), 1);
        assert_eq!(log2_strict(1 << 18), 18);
        assert_eq!(log2_strict(1 << 31), 31);
    }

    #[test]
    #[should_panic]
    fn test_log2_strict_zero() {
        log2_strict(0);
    }

    #[test]
    #[should_panic]
    fn test_log2_strict_nonpower_2() {
        log2_strict(0x78c341c65ae6d262);
    }

    #[test]
    fn test_transpose_twice_is_identity() {
        let mut rng = thread_rng();
        let (rows, cols) = (rng.gen_range(1..20), rng.gen_range(1..20));
        let matrix: Vec<Vec<u64>> = (0..rows)
            .map(|_| (0..cols).map(|_| rng.gen()).collect())
            .collect();

        let transposed = transpose(&matrix);
        assert_eq!(transposed.len(), cols);
        assert!(transposed.iter().all(|column| column.len() == rows));
        for i in 0..rows {
            for j in 0..cols {
                assert_eq!(matrix[i][j], transposed[j][i]);
            }
        }
        assert_eq!(transpose(&transposed), matrix);
    }

    #[test]
    fn test_transpose_empty() {
        assert!(transpose::<u64>(&[]).is_empty());
    }
}
