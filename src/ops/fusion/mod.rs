use rayon::prelude::*;

use crate::ops::wavelet::CoefMatrix;

/// First quadrant of the symmetric 5x5 Gaussian kernel; weights mirror
/// across both axes, with the center weight at `KERNEL[2][2]`.
const KERNEL: [[f64; 3]; 3] = [
    [0.0019, 0.0201, 0.0439],
    [0.0201, 0.2096, 0.4578],
    [0.0439, 0.4578, 1.0],
];

/// Half-open region of a coefficient matrix, in matrix coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Region {
    pub row_start: usize,
    pub col_start: usize,
    pub row_end: usize,
    pub col_end: usize,
}

impl Region {
    pub fn new(row_start: usize, col_start: usize, row_end: usize, col_end: usize) -> Self {
        Self {
            row_start,
            col_start,
            row_end,
            col_end,
        }
    }

    pub fn rows(&self) -> usize {
        self.row_end - self.row_start
    }

    pub fn cols(&self) -> usize {
        self.col_end - self.col_start
    }
}

/// Kernel weight at neighborhood offset (dx, dy), |dx|, |dy| <= 2.
fn weight(dx: isize, dy: isize) -> f64 {
    KERNEL[2 - dx.unsigned_abs()][2 - dy.unsigned_abs()]
}

/// Total kernel mass for a given number of in-bounds neighbors. Only these
/// six counts occur for a rectangular region and this symmetric kernel.
fn weights_sum(neighbors: usize) -> f64 {
    match neighbors {
        9 => 1.0 + 2.0 * 0.4578 + 2.0 * 0.0439 + 0.2096 + 2.0 * 0.0201 + 0.0019,
        12 => 1.0 + 3.0 * 0.4578 + 2.0 * 0.0439 + 2.0 * 0.2096 + 3.0 * 0.0201 + 0.0019,
        15 => 1.0 + 3.0 * 0.4578 + 3.0 * 0.0439 + 2.0 * 0.2096 + 4.0 * 0.0201 + 2.0 * 0.0019,
        16 => 1.0 + 4.0 * 0.4578 + 2.0 * 0.0439 + 4.0 * 0.2096 + 4.0 * 0.0201 + 0.0019,
        20 => 1.0 + 4.0 * 0.4578 + 3.0 * 0.0439 + 4.0 * 0.2096 + 6.0 * 0.0201 + 2.0 * 0.0019,
        _ => 1.0 + 4.0 * 0.4578 + 4.0 * 0.0439 + 4.0 * 0.2096 + 8.0 * 0.0201 + 4.0 * 0.0019,
    }
}

/// Fuses one region of two coefficient matrices with the Gaussian weighted
/// mean. For each position the summed pair values over the in-bounds 5x5
/// neighborhood are divided by twice the kernel mass actually applied, so
/// the kernel renormalizes at the region boundary instead of zero-padding.
///
/// Returns a region-sized matrix.
pub fn fuse_quadrant(data1: &CoefMatrix, data2: &CoefMatrix, region: Region) -> CoefMatrix {
    assert_eq!(data1.rows(), data2.rows(), "matrix row mismatch");
    assert_eq!(data1.cols(), data2.cols(), "matrix col mismatch");

    let mut result = CoefMatrix::new(region.rows(), region.cols());
    let out_cols = region.cols();

    result
        .data_mut()
        .par_chunks_mut(out_cols)
        .enumerate()
        .for_each(|(out_i, out_row)| {
            let i = region.row_start + out_i;

            for (out_j, out) in out_row.iter_mut().enumerate() {
                let j = region.col_start + out_j;

                let mut sum = 0.0;
                let mut neighbors = 0usize;
                for dx in -2isize..=2 {
                    for dy in -2isize..=2 {
                        let x = i as isize + dx;
                        let y = j as isize + dy;
                        if x >= region.row_start as isize
                            && x < region.row_end as isize
                            && y >= region.col_start as isize
                            && y < region.col_end as isize
                        {
                            neighbors += 1;
                            sum += (data1.at(x as usize, y as usize)
                                + data2.at(x as usize, y as usize))
                                * weight(dx, dy);
                        }
                    }
                }

                *out = sum / (2.0 * weights_sum(neighbors));
            }
        });

    result
}

/// Plain elementwise mean over a region, used for the approximation band.
pub fn fuse_mean(data1: &CoefMatrix, data2: &CoefMatrix, region: Region) -> CoefMatrix {
    assert_eq!(data1.rows(), data2.rows(), "matrix row mismatch");
    assert_eq!(data1.cols(), data2.cols(), "matrix col mismatch");

    let mut result = CoefMatrix::new(region.rows(), region.cols());
    for i in 0..region.rows() {
        for j in 0..region.cols() {
            let x = region.row_start + i;
            let y = region.col_start + j;
            result.set(i, j, (data1.at(x, y) + data2.at(x, y)) / 2.0);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::test_utils::assert_approx_eq;

    fn constant_matrix(rows: usize, cols: usize, value: f64) -> CoefMatrix {
        let mut m = CoefMatrix::new(rows, cols);
        m.data_mut().fill(value);
        m
    }

    #[test]
    fn weight_mirrors_across_both_axes() {
        assert_eq!(weight(0, 0), 1.0);
        assert_eq!(weight(2, 2), 0.0019);
        assert_eq!(weight(-2, -2), 0.0019);
        assert_eq!(weight(1, 0), 0.4578);
        assert_eq!(weight(0, -1), 0.4578);
        assert_eq!(weight(-1, 2), 0.0201);
        assert_eq!(weight(2, 1), 0.0201);
    }

    #[test]
    fn weights_sum_matches_applied_kernel_mass() {
        // Positions inside a 6x6 region exercise all six neighbor counts.
        let region = Region::new(0, 0, 6, 6);
        let positions = [(0, 0), (0, 1), (0, 2), (1, 1), (1, 2), (2, 2)];
        let expected_counts = [9, 12, 15, 16, 20, 25];

        for ((i, j), count) in positions.iter().zip(expected_counts.iter()) {
            let mut neighbors = 0usize;
            let mut mass = 0.0;
            for dx in -2isize..=2 {
                for dy in -2isize..=2 {
                    let x = *i as isize + dx;
                    let y = *j as isize + dy;
                    if x >= 0 && x < region.row_end as isize && y >= 0 && y < region.col_end as isize
                    {
                        neighbors += 1;
                        mass += weight(dx, dy);
                    }
                }
            }

            assert_eq!(neighbors, *count, "position ({}, {})", i, j);
            assert_approx_eq(mass, weights_sum(neighbors), 1e-12);
        }
    }

    #[test]
    fn constant_inputs_fuse_to_their_mean() {
        // The boundary renormalization makes the fused value exactly the
        // pair mean everywhere, including corners and edges.
        let a = constant_matrix(8, 8, 40.0);
        let b = constant_matrix(8, 8, 100.0);

        let fused = fuse_quadrant(&a, &b, Region::new(0, 0, 8, 8));
        for &v in fused.data() {
            assert_approx_eq(v, 70.0, 1e-9);
        }
    }

    #[test]
    fn fuse_quadrant_respects_region_bounds() {
        // Values outside the region must not leak into the sum: fill the
        // outside with a huge value and fuse only the inner quadrant.
        let mut a = constant_matrix(8, 8, 1e9);
        let mut b = constant_matrix(8, 8, 1e9);
        for i in 4..8 {
            for j in 4..8 {
                a.set(i, j, 10.0);
                b.set(i, j, 30.0);
            }
        }

        let fused = fuse_quadrant(&a, &b, Region::new(4, 4, 8, 8));
        assert_eq!(fused.rows(), 4);
        assert_eq!(fused.cols(), 4);
        for &v in fused.data() {
            assert_approx_eq(v, 20.0, 1e-9);
        }
    }

    #[test]
    fn fuse_mean_is_elementwise() {
        let mut a = CoefMatrix::new(2, 4);
        let mut b = CoefMatrix::new(2, 4);
        for j in 0..4 {
            a.set(0, j, j as f64);
            b.set(0, j, (j * 3) as f64);
        }

        let fused = fuse_mean(&a, &b, Region::new(0, 0, 2, 4));
        for j in 0..4 {
            assert_approx_eq(fused.at(0, j), (j * 2) as f64, 1e-12);
        }
        assert_eq!(fused.at(1, 0), 0.0);
    }
}
