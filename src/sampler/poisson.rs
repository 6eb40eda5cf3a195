//! Poisson-disk sampling via Bridson's algorithm.
//!
//! Guarantees a minimum distance of `r` between all samples. A background
//! acceleration grid with cells of side r/sqrt(2) holds at most one point
//! per cell, so a candidate only has to check its 5x5 neighbourhood - the
//! whole run is O(n) amortized, never a pairwise scan.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::buffer::PixelBuffer;
use crate::types::Sample;

/// Candidate attempts per active point before it is retired.
const K_ATTEMPTS: usize = 30;

pub(crate) fn sample_poisson(buffer: &PixelBuffer, r: f32, seed: u64) -> Vec<Sample> {
    let width = buffer.width() as f32;
    let height = buffer.height() as f32;
    let mut rng = StdRng::seed_from_u64(seed);

    let cell_size = r / std::f32::consts::SQRT_2;
    let grid_cols = (width / cell_size).ceil() as usize + 1;
    let grid_rows = (height / cell_size).ceil() as usize + 1;
    let mut grid: Vec<Option<usize>> = vec![None; grid_cols * grid_rows];

    let cell_of = |x: f32, y: f32| -> (usize, usize) {
        ((x / cell_size) as usize, (y / cell_size) as usize)
    };

    let mut points: Vec<(f32, f32)> = Vec::new();
    let mut active: Vec<usize> = Vec::new();

    // Seed with one random point
    let first = (rng.gen_range(0.0..width), rng.gen_range(0.0..height));
    points.push(first);
    active.push(0);
    let (cx, cy) = cell_of(first.0, first.1);
    grid[cy * grid_cols + cx] = Some(0);

    while !active.is_empty() {
        let pick = rng.gen_range(0..active.len());
        let (bx, by) = points[active[pick]];

        let mut found = false;
        for _ in 0..K_ATTEMPTS {
            // Candidate in the annulus [r, 2r) around the active point
            let angle = rng.gen_range(0.0..std::f32::consts::TAU);
            let dist = rng.gen_range(r..r * 2.0);
            let x = bx + dist * angle.cos();
            let y = by + dist * angle.sin();

            if x < 0.0 || x >= width || y < 0.0 || y >= height {
                continue;
            }

            let (cx, cy) = cell_of(x, y);
            if !neighbourhood_clear(&grid, &points, grid_cols, grid_rows, cx, cy, x, y, r) {
                continue;
            }

            let index = points.len();
            points.push((x, y));
            active.push(index);
            grid[cy * grid_cols + cx] = Some(index);
            found = true;
            break;
        }

        if !found {
            active.swap_remove(pick);
        }
    }

    points
        .into_iter()
        .map(|(x, y)| Sample::from_buffer(buffer, x, y, None))
        .collect()
}

/// Check the 5x5 cell neighbourhood around (cx, cy) for a point closer
/// than `r` to (x, y).
#[allow(clippy::too_many_arguments)]
fn neighbourhood_clear(
    grid: &[Option<usize>],
    points: &[(f32, f32)],
    grid_cols: usize,
    grid_rows: usize,
    cx: usize,
    cy: usize,
    x: f32,
    y: f32,
    r: f32,
) -> bool {
    for dy in -2i32..=2 {
        for dx in -2i32..=2 {
            let nx = cx as i32 + dx;
            let ny = cy as i32 + dy;
            if nx < 0 || ny < 0 || nx >= grid_cols as i32 || ny >= grid_rows as i32 {
                continue;
            }

            if let Some(index) = grid[ny as usize * grid_cols + nx as usize] {
                let (px, py) = points[index];
                let dist2 = (x - px) * (x - px) + (y - py) * (y - py);
                if dist2 < r * r {
                    return false;
                }
            }
        }
    }
    true
}
