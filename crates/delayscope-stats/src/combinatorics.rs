//! Exact permutation and combination counts.
//!
//! All results are computed in `u128` using multiplicative formulas, so
//! intermediate values never exceed the final result by more than one factor.
//! Anything that does not fit in `u128` is reported as
//! [`CombinatoricsError::Overflow`] rather than wrapping.
//!
//! | Function | Formula |
//! |---|---|
//! | [`permutation`] | `n! / (n-r)!` |
//! | [`combination`] | `n! / (r!(n-r)!)` |
//! | [`permutation_with_repetition`] | `n^r` |
//! | [`combination_with_repetition`] | `(n+r-1)! / (r!(n-1)!)` |
//! | [`circular_permutation`] | `(n-1)!` |
//! | [`permutation_from_frequencies`] | `(Σf)! / Π(f_i!)` |

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum CombinatoricsError {
    #[display("n must be greater than or equal to r (n={n}, r={r})")]
    RExceedsN { n: u64, r: u64 },
    #[display("n must be at least 1 (n={n})")]
    NTooSmall { n: u64 },
    #[display("Frequency list is empty")]
    EmptyFrequencies,
    #[display("Result of {operation} does not fit in a 128-bit integer")]
    Overflow { operation: &'static str },
}

fn overflow(operation: &'static str) -> CombinatoricsError {
    CombinatoricsError::Overflow { operation }
}

fn gcd(mut a: u128, mut b: u128) -> u128 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// `n!`
///
/// ```
/// # use delayscope_stats::combinatorics::factorial;
/// assert_eq!(factorial(0).unwrap(), 1);
/// assert_eq!(factorial(5).unwrap(), 120);
/// assert!(factorial(35).is_err());
/// ```
pub fn factorial(n: u64) -> Result<u128, CombinatoricsError> {
    (2..=u128::from(n)).try_fold(1u128, |acc, k| {
        acc.checked_mul(k).ok_or(overflow("factorial"))
    })
}

/// Ordered selections of `r` items out of `n`.
///
/// ```
/// # use delayscope_stats::combinatorics::permutation;
/// assert_eq!(permutation(5, 2).unwrap(), 20);
/// ```
pub fn permutation(n: u64, r: u64) -> Result<u128, CombinatoricsError> {
    if n < r {
        return Err(CombinatoricsError::RExceedsN { n, r });
    }
    (u128::from(n - r) + 1..=u128::from(n)).try_fold(1u128, |acc, k| {
        acc.checked_mul(k).ok_or(overflow("permutation"))
    })
}

/// Unordered selections of `r` items out of `n`.
///
/// ```
/// # use delayscope_stats::combinatorics::combination;
/// assert_eq!(combination(5, 2).unwrap(), 10);
/// assert_eq!(combination(5, 0).unwrap(), 1);
/// ```
pub fn combination(n: u64, r: u64) -> Result<u128, CombinatoricsError> {
    if n < r {
        return Err(CombinatoricsError::RExceedsN { n, r });
    }
    binomial(n, r.min(n - r), "combination")
}

/// `C(n, k)` for `k <= n`, reducing by the gcd at each step so the running
/// product stays exact.
fn binomial(n: u64, k: u64, operation: &'static str) -> Result<u128, CombinatoricsError> {
    let mut acc = 1u128;
    for i in 0..k {
        let numerator = u128::from(n - i);
        let denominator = u128::from(i + 1);
        let g = gcd(acc, denominator);
        // `denominator / g` is coprime with `acc / g`, so it divides `numerator`.
        acc = (acc / g)
            .checked_mul(numerator / (denominator / g))
            .ok_or(overflow(operation))?;
    }
    Ok(acc)
}

/// Sequences of length `r` drawn from `n` symbols with repetition (`n^r`).
///
/// ```
/// # use delayscope_stats::combinatorics::permutation_with_repetition;
/// assert_eq!(permutation_with_repetition(3, 2).unwrap(), 9);
/// assert_eq!(permutation_with_repetition(0, 0).unwrap(), 1);
/// ```
pub fn permutation_with_repetition(n: u64, r: u64) -> Result<u128, CombinatoricsError> {
    match n {
        0 => Ok(u128::from(r == 0)),
        1 => Ok(1),
        _ => {
            let exp = u32::try_from(r).map_err(|_| overflow("permutation_with_repetition"))?;
            u128::from(n)
                .checked_pow(exp)
                .ok_or(overflow("permutation_with_repetition"))
        }
    }
}

/// Multisets of size `r` drawn from `n` kinds (`C(n+r-1, r)`).
///
/// ```
/// # use delayscope_stats::combinatorics::combination_with_repetition;
/// assert_eq!(combination_with_repetition(5, 2).unwrap(), 15);
/// ```
pub fn combination_with_repetition(n: u64, r: u64) -> Result<u128, CombinatoricsError> {
    if n < 1 {
        return Err(CombinatoricsError::NTooSmall { n });
    }
    let top = (n - 1)
        .checked_add(r)
        .ok_or(overflow("combination_with_repetition"))?;
    binomial(top, r.min(n - 1), "combination_with_repetition")
}

/// Arrangements of `n` items around a circle (`(n-1)!`).
///
/// ```
/// # use delayscope_stats::combinatorics::circular_permutation;
/// assert_eq!(circular_permutation(4).unwrap(), 6);
/// ```
pub fn circular_permutation(n: u64) -> Result<u128, CombinatoricsError> {
    if n < 1 {
        return Err(CombinatoricsError::NTooSmall { n });
    }
    factorial(n - 1).map_err(|_| overflow("circular_permutation"))
}

/// Distinct orderings of a multiset with the given item frequencies.
///
/// ```
/// # use delayscope_stats::combinatorics::permutation_from_frequencies;
/// // "AAB": 3! / (2! * 1!)
/// assert_eq!(permutation_from_frequencies(&[2, 1]).unwrap(), 3);
/// ```
pub fn permutation_from_frequencies(frequencies: &[u64]) -> Result<u128, CombinatoricsError> {
    if frequencies.is_empty() {
        return Err(CombinatoricsError::EmptyFrequencies);
    }
    // Multinomial as a product of binomials: C(f1, f1) * C(f1+f2, f2) * ...
    let mut total = 0u64;
    let mut acc = 1u128;
    for &freq in frequencies {
        total = total
            .checked_add(freq)
            .ok_or(overflow("permutation_from_frequencies"))?;
        let term = binomial(total, freq.min(total - freq), "permutation_from_frequencies")?;
        acc = acc
            .checked_mul(term)
            .ok_or(overflow("permutation_from_frequencies"))?;
    }
    Ok(acc)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_values() {
        assert_eq!(permutation(5, 2).unwrap(), 20);
        assert_eq!(combination(5, 2).unwrap(), 10);
        assert_eq!(combination_with_repetition(5, 2).unwrap(), 15);
        assert_eq!(circular_permutation(1).unwrap(), 1);
        assert_eq!(circular_permutation(4).unwrap(), 6);
        assert_eq!(factorial(20).unwrap(), 2_432_902_008_176_640_000);
    }

    #[test]
    fn test_combination_symmetry() {
        for n in 0..=30 {
            for r in 0..=n {
                assert_eq!(
                    combination(n, r).unwrap(),
                    combination(n, n - r).unwrap(),
                    "C({n},{r})"
                );
            }
        }
    }

    #[test]
    fn test_permutation_is_combination_times_r_factorial() {
        for n in 0..=25 {
            for r in 0..=n {
                assert_eq!(
                    permutation(n, r).unwrap(),
                    combination(n, r).unwrap() * factorial(r).unwrap(),
                    "P({n},{r})"
                );
            }
        }
    }

    #[test]
    fn test_permutation_with_repetition_zero_exponent() {
        for n in 0..50 {
            assert_eq!(permutation_with_repetition(n, 0).unwrap(), 1);
        }
        assert_eq!(permutation_with_repetition(0, 3).unwrap(), 0);
        assert_eq!(permutation_with_repetition(1, u64::MAX).unwrap(), 1);
    }

    #[test]
    fn test_r_exceeds_n() {
        assert_eq!(
            permutation(2, 3),
            Err(CombinatoricsError::RExceedsN { n: 2, r: 3 })
        );
        assert_eq!(
            combination(0, 1),
            Err(CombinatoricsError::RExceedsN { n: 0, r: 1 })
        );
    }

    #[test]
    fn test_n_too_small() {
        assert_eq!(
            combination_with_repetition(0, 2),
            Err(CombinatoricsError::NTooSmall { n: 0 })
        );
        assert_eq!(
            circular_permutation(0),
            Err(CombinatoricsError::NTooSmall { n: 0 })
        );
    }

    #[test]
    fn test_large_combination_stays_exact() {
        // Intermediate factorials would overflow; the multiplicative form does not.
        assert_eq!(
            combination(100, 50).unwrap(),
            100_891_344_545_564_193_334_812_497_256
        );
        assert_eq!(
            combination(360, 2).unwrap(),
            64_620
        );
    }

    #[test]
    fn test_overflow_is_reported() {
        assert_eq!(
            factorial(35),
            Err(CombinatoricsError::Overflow {
                operation: "factorial"
            })
        );
        assert!(permutation(200, 100).is_err());
        assert!(permutation_with_repetition(2, 128).is_err());
        assert_eq!(permutation_with_repetition(2, 127).unwrap(), 1u128 << 127);
    }

    #[test]
    fn test_frequencies() {
        // "MISSISSIPPI": 11! / (1! 4! 4! 2!)
        assert_eq!(permutation_from_frequencies(&[1, 4, 4, 2]).unwrap(), 34_650);
        assert_eq!(permutation_from_frequencies(&[0, 0]).unwrap(), 1);
        assert_eq!(
            permutation_from_frequencies(&[]),
            Err(CombinatoricsError::EmptyFrequencies)
        );
    }
}
