//! Initial-simplex search for the incremental hull.
//!
//! Picks the first point, then scans forward once per rank for a point whose
//! edge vector keeps the growing edge matrix at full rank, tested exactly over
//! every k×k minor.

use crate::error::{Error, Result};
use crate::exact::{linearly_independent, to_exact_vector, ExactScalar};

/// Indices of `N + 1` affinely independent points, or `SimplexNotFound` with
/// the rank at which the scan exhausted the input.
pub fn find_simplex_points<C: ExactScalar, const N: usize>(points: &[[i64; N]]) -> Result<Vec<u32>> {
    if points.is_empty() {
        return Err(Error::SimplexNotFound {
            rank: 0,
            dimension: N,
        });
    }

    let mut simplex: Vec<u32> = Vec::with_capacity(N + 1);
    simplex.push(0);
    let origin = &points[0];

    let mut vectors: Vec<[C; N]> = Vec::with_capacity(N);
    let mut point_i = 1;
    for rank in 1..=N {
        loop {
            if point_i == points.len() {
                return Err(Error::SimplexNotFound {
                    rank,
                    dimension: N,
                });
            }
            vectors.truncate(rank - 1);
            vectors.push(to_exact_vector(&points[point_i], origin));
            if linearly_independent(&vectors, rank) {
                break;
            }
            point_i += 1;
        }
        simplex.push(point_i as u32);
        point_i += 1;
    }

    Ok(simplex)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_the_standard_simplex() {
        let points: Vec<[i64; 3]> = vec![
            [0, 0, 0],
            [1, 1, 1],
            [2, 2, 2], // collinear with the previous two
            [0, 1, 0],
            [0, 0, 1],
        ];
        let simplex = find_simplex_points::<i128, 3>(&points).unwrap();
        assert_eq!(simplex, vec![0, 1, 3, 4]);
    }

    #[test]
    fn collinear_input_fails_at_rank_two() {
        let points: Vec<[i64; 3]> = (0..4).map(|i| [i, i, i]).collect();
        let err = find_simplex_points::<i128, 3>(&points).unwrap_err();
        assert_eq!(
            err,
            Error::SimplexNotFound {
                rank: 2,
                dimension: 3
            }
        );
    }
}
