//! Small floating-point numerical kernels shared by the geometry passes.
//!
//! The exact integer counterparts live in `exact`; these are the `f64`
//! routines used where the results are floating point anyway (ridge
//! complements, circumcentres, cone intersections).

use nalgebra::SVector;

/// Orthogonal complement of `N - 1` vectors in `N` dimensions (generalized
/// cross product, cofactor expansion).
pub fn orthogonal_complement<const N: usize>(vectors: &[SVector<f64, N>]) -> SVector<f64, N> {
    assert_eq!(vectors.len(), N - 1);
    let rows: Vec<usize> = (0..N - 1).collect();
    let mut res = SVector::<f64, N>::zeros();
    let mut cols = Vec::with_capacity(N - 1);
    for i in 0..N {
        cols.clear();
        cols.extend((0..N).filter(|&c| c != i));
        let minor = determinant(vectors, &rows, &cols);
        res[i] = if i % 2 == 0 { minor } else { -minor };
    }
    res
}

fn determinant<const N: usize>(
    vectors: &[SVector<f64, N>],
    rows: &[usize],
    cols: &[usize],
) -> f64 {
    if rows.len() == 1 {
        return vectors[rows[0]][cols[0]];
    }
    let mut res = 0.0;
    let sub_rows = &rows[1..];
    let mut sub_cols = Vec::with_capacity(cols.len() - 1);
    for (j, &col) in cols.iter().enumerate() {
        let entry = vectors[rows[0]][col];
        if entry == 0.0 {
            continue;
        }
        sub_cols.clear();
        sub_cols.extend(cols.iter().copied().filter(|&c| c != col));
        let minor = determinant(vectors, sub_rows, &sub_cols);
        res += if j % 2 == 0 { entry * minor } else { -entry * minor };
    }
    res
}

/// Solve `A x = b` by Gaussian elimination with partial pivoting.
/// Returns `None` for a singular (or non-finite) system.
pub fn solve_linear<const N: usize>(
    mut a: [[f64; N]; N],
    mut b: [f64; N],
) -> Option<SVector<f64, N>> {
    for col in 0..N {
        let pivot_row = (col..N).max_by(|&r1, &r2| {
            a[r1][col]
                .abs()
                .partial_cmp(&a[r2][col].abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        })?;
        if a[pivot_row][col] == 0.0 || !a[pivot_row][col].is_finite() {
            return None;
        }
        a.swap(col, pivot_row);
        b.swap(col, pivot_row);
        for row in col + 1..N {
            let factor = a[row][col] / a[col][col];
            for k in col..N {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }
    let mut x = [0.0; N];
    for col in (0..N).rev() {
        let mut acc = b[col];
        for k in col + 1..N {
            acc -= a[col][k] * x[k];
        }
        x[col] = acc / a[col][col];
        if !x[col].is_finite() {
            return None;
        }
    }
    Some(SVector::from(x))
}

/// Real roots of `a t² + b t + c = 0`, numerically stable form.
/// A linear equation (`a == 0`) yields its single root twice.
pub fn quadratic_equation(a: f64, b: f64, c: f64) -> Option<(f64, f64)> {
    if a == 0.0 {
        if b == 0.0 {
            return None;
        }
        let t = -c / b;
        return Some((t, t));
    }
    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 || !discriminant.is_finite() {
        return None;
    }
    let q = -0.5 * (b + b.signum() * discriminant.sqrt());
    if q == 0.0 {
        // b == 0 and discriminant == 0: double root at the vertex.
        return Some((0.0, 0.0));
    }
    Some((q / a, c / q))
}
