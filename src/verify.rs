//! Sort verification helpers.

/// Check if a slice is sorted in ascending order.
#[inline]
pub fn is_sorted(data: &[u32]) -> bool {
    data.windows(2).all(|w| w[0] <= w[1])
}

/// Check that `data` holds every value in `1..=data.len()` exactly once.
pub fn is_permutation(data: &[u32]) -> bool {
    let n = data.len();
    let mut seen = vec![false; n];
    for &value in data {
        let value = value as usize;
        if value == 0 || value > n || seen[value - 1] {
            return false;
        }
        seen[value - 1] = true;
    }
    true
}

/// A finished run is valid when it is exactly `1..=N` in order.
pub fn is_sorted_permutation(data: &[u32]) -> bool {
    data.iter().enumerate().all(|(i, &v)| v as usize == i + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_sorted() {
        assert!(is_sorted(&[1, 2, 3, 4, 5]));
        assert!(is_sorted(&[1, 1, 1, 1]));
        assert!(is_sorted(&[1]));
        assert!(is_sorted(&[]));
        assert!(!is_sorted(&[5, 4, 3, 2, 1]));
        assert!(!is_sorted(&[1, 3, 2]));
    }

    #[test]
    fn test_is_permutation() {
        assert!(is_permutation(&[]));
        assert!(is_permutation(&[1]));
        assert!(is_permutation(&[3, 1, 2]));
        assert!(!is_permutation(&[0, 1, 2]));
        assert!(!is_permutation(&[1, 1, 2]));
        assert!(!is_permutation(&[1, 2, 4]));
    }

    #[test]
    fn test_is_sorted_permutation() {
        assert!(is_sorted_permutation(&[]));
        assert!(is_sorted_permutation(&[1, 2, 3]));
        assert!(!is_sorted_permutation(&[2, 1, 3]));
        assert!(!is_sorted_permutation(&[2, 3, 4]));
    }
}
