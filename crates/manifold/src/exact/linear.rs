//! Exact determinants, orthogonal complements and dot-product signs.
//!
//! All matrices here are tiny (at most 6×6), so determinants use plain
//! cofactor expansion over explicit row/column index lists. Nothing in this
//! module rounds: the only floating-point exit is in the callers.

use super::scalar::ExactScalar;

/// Vector of differences `to - from`, lifted into the compute scalar.
#[inline]
pub fn to_exact_vector<C: ExactScalar, const N: usize>(to: &[i64; N], from: &[i64; N]) -> [C; N] {
    std::array::from_fn(|i| C::from_i64(to[i] - from[i]))
}

/// Determinant of the square submatrix of `vectors` selected by `rows` and
/// `cols` (`rows.len() == cols.len()`).
pub fn determinant<C: ExactScalar, const N: usize>(
    vectors: &[[C; N]],
    rows: &[usize],
    cols: &[usize],
) -> C {
    debug_assert_eq!(rows.len(), cols.len());
    debug_assert!(!rows.is_empty());

    if rows.len() == 1 {
        return vectors[rows[0]][cols[0]].clone();
    }

    let mut res = C::zero();
    let sub_rows = &rows[1..];
    let mut sub_cols = Vec::with_capacity(cols.len() - 1);
    for (j, &col) in cols.iter().enumerate() {
        let entry = &vectors[rows[0]][col];
        if entry.is_zero() {
            continue;
        }
        sub_cols.clear();
        sub_cols.extend(cols.iter().copied().filter(|&c| c != col));
        let minor = determinant(vectors, sub_rows, &sub_cols);
        let term = entry.mul(&minor);
        res = if j % 2 == 0 { res.add(&term) } else { res.sub(&term) };
    }
    res
}

/// True if the first `count` vectors are linearly independent, established by
/// finding a nonzero `count`-minor over some column combination.
pub fn linearly_independent<C: ExactScalar, const N: usize>(
    vectors: &[[C; N]],
    count: usize,
) -> bool {
    debug_assert!(count >= 1 && count <= N);
    let rows: Vec<usize> = (0..count).collect();
    any_combination(N, count, |cols| !determinant(vectors, &rows, cols).is_zero())
}

/// Orthogonal complement of `N - 1` vectors in `N` dimensions by the
/// generalized cross-product formula: component `i` is `(-1)^i` times the
/// minor that drops column `i`.
pub fn orthogonal_complement<C: ExactScalar, const N: usize>(vectors: &[[C; N]]) -> [C; N] {
    debug_assert_eq!(vectors.len(), N - 1);
    let rows: Vec<usize> = (0..N - 1).collect();
    let mut cols = Vec::with_capacity(N - 1);
    std::array::from_fn(|i| {
        cols.clear();
        cols.extend((0..N).filter(|&c| c != i));
        let minor = determinant(vectors, &rows, &cols);
        if i % 2 == 0 {
            minor
        } else {
            minor.neg()
        }
    })
}

/// Sign of `ortho · (points[to] - points[from])`.
pub fn dot_product_sign<C: ExactScalar, const N: usize>(
    ortho: &[C; N],
    points: &[[i64; N]],
    from: usize,
    to: usize,
) -> i32 {
    let (from, to) = (&points[from], &points[to]);
    let mut acc = C::zero();
    for i in 0..N {
        acc.add_mul_assign(&ortho[i], &C::from_i64(to[i] - from[i]));
    }
    acc.signum()
}

/// Visit `k`-combinations of `0..n` in lexicographic order until `f` returns
/// true; reports whether any did.
fn any_combination<F: FnMut(&[usize]) -> bool>(n: usize, k: usize, mut f: F) -> bool {
    let mut idx: Vec<usize> = (0..k).collect();
    loop {
        if f(&idx) {
            return true;
        }
        // Advance the rightmost index that can still move.
        let mut i = k;
        loop {
            if i == 0 {
                return false;
            }
            i -= 1;
            if idx[i] + (k - i) < n {
                idx[i] += 1;
                for j in i + 1..k {
                    idx[j] = idx[j - 1] + 1;
                }
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigInt;

    fn vecs3(rows: [[i64; 3]; 2]) -> Vec<[i128; 3]> {
        rows.iter()
            .map(|r| std::array::from_fn(|i| r[i] as i128))
            .collect()
    }

    #[test]
    fn determinant_2x2_and_3x3() {
        let v: Vec<[i128; 3]> = vec![[1, 2, 3], [4, 5, 6], [7, 8, 10]];
        assert_eq!(determinant(&v, &[0, 1], &[0, 1]), -3);
        assert_eq!(determinant(&v, &[0, 1, 2], &[0, 1, 2]), -3);
        let b: Vec<[BigInt; 3]> = v
            .iter()
            .map(|r| std::array::from_fn(|i| BigInt::from(r[i])))
            .collect();
        assert_eq!(determinant(&b, &[0, 1, 2], &[0, 1, 2]), BigInt::from(-3));
    }

    #[test]
    fn complement_is_orthogonal() {
        let v = vecs3([[1, 2, 3], [-4, 5, 0]]);
        let c = orthogonal_complement(&v);
        for row in &v {
            let mut acc: i128 = 0;
            for i in 0..3 {
                acc += c[i] * row[i];
            }
            assert_eq!(acc, 0);
        }
        // 3D cross product sanity: (1,0,0) x (0,1,0) = ±(0,0,1).
        let axes = vecs3([[1, 0, 0], [0, 1, 0]]);
        let c = orthogonal_complement(&axes);
        assert_eq!([c[0], c[1], c[2].abs()], [0, 0, 1]);
    }

    #[test]
    fn independence_detects_rank() {
        let v = vecs3([[1, 2, 3], [2, 4, 6]]);
        assert!(linearly_independent(&v, 1));
        assert!(!linearly_independent(&v, 2));
        let w = vecs3([[1, 2, 3], [-4, 5, 0]]);
        assert!(linearly_independent(&w, 2));
    }

    #[test]
    fn combinations_cover_all() {
        let mut seen = Vec::new();
        any_combination(4, 2, |c| {
            seen.push(c.to_vec());
            false
        });
        assert_eq!(
            seen,
            vec![
                vec![0, 1],
                vec![0, 2],
                vec![0, 3],
                vec![1, 2],
                vec![1, 3],
                vec![2, 3]
            ]
        );
    }
}
