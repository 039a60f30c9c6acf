// ============================================================================
// FLOOD FILL: paint bucket region search
// ============================================================================

use crate::canvas::{Layer, Pixel, PixelGrid};

/// Stack-based 4-connected flood fill over one layer of `grid`.
///
/// The pixel at `seed` (grid space, row 0 = top) is the target value; every
/// connected cell whose stored pixel equals it is returned exactly once.
/// Empty cells are a colour like any other, so filling a blank region returns
/// the whole region. Out-of-range seeds return nothing.
pub fn flood_fill(grid: &PixelGrid, layer: Layer, seed: (u32, u32)) -> Vec<(u32, u32)> {
    let width = grid.width();
    let height = grid.height();
    if seed.0 >= width || seed.1 >= height {
        return Vec::new();
    }

    // Scratch copy of the layer. `None` marks a visited cell; it can never
    // equal the target, so a cell is matched at most once whatever colour is
    // later painted over the region.
    let mut scratch: Vec<Option<Pixel>> = grid.pixels(layer).iter().copied().map(Some).collect();
    let w = width as usize;
    let target = scratch[seed.1 as usize * w + seed.0 as usize];

    let mut area = Vec::new();
    let mut stack: Vec<(u32, u32)> = Vec::with_capacity(256);
    stack.push(seed);

    while let Some((x, y)) = stack.pop() {
        let idx = y as usize * w + x as usize;
        if scratch[idx] != target {
            continue;
        }
        scratch[idx] = None;
        area.push((x, y));

        // Up, down, left, right
        if y > 0 && scratch[idx - w] == target {
            stack.push((x, y - 1));
        }
        if y + 1 < height && scratch[idx + w] == target {
            stack.push((x, y + 1));
        }
        if x > 0 && scratch[idx - 1] == target {
            stack.push((x - 1, y));
        }
        if x + 1 < width && scratch[idx + 1] == target {
            stack.push((x + 1, y));
        }
    }

    area
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use std::collections::HashSet;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);

    #[test]
    fn test_fill_blank_grid_covers_everything_once() {
        let grid = PixelGrid::new(4, 4);
        let area = flood_fill(&grid, Layer::Committed, (0, 0));
        assert_eq!(area.len(), 16);
        let unique: HashSet<_> = area.iter().collect();
        assert_eq!(unique.len(), 16);
    }

    #[test]
    fn test_fill_uniform_colour() {
        let mut grid = PixelGrid::new(5, 3);
        for y in 0..3 {
            for x in 0..5 {
                grid.set(x, y, Layer::Committed, RED);
            }
        }
        let area = flood_fill(&grid, Layer::Committed, (2, 1));
        assert_eq!(area.len(), 15);
    }

    #[test]
    fn test_fill_stops_at_barrier() {
        let mut grid = PixelGrid::new(5, 5);
        for y in 0..5 {
            grid.set(2, y, Layer::Committed, BLUE);
        }
        let area: HashSet<_> = flood_fill(&grid, Layer::Committed, (0, 0)).into_iter().collect();
        assert_eq!(area.len(), 10);
        assert!(area.iter().all(|&(x, _)| x < 2));
    }

    #[test]
    fn test_fill_is_four_connected() {
        let mut grid = PixelGrid::new(3, 3);
        // Diagonal wall: cells touching only at corners are not connected.
        grid.set(1, 0, Layer::Committed, BLUE);
        grid.set(0, 1, Layer::Committed, BLUE);
        let area = flood_fill(&grid, Layer::Committed, (0, 0));
        assert_eq!(area, vec![(0, 0)]);
    }

    #[test]
    fn test_fill_matches_seed_colour_only() {
        let mut grid = PixelGrid::new(4, 1);
        grid.set(0, 0, Layer::Committed, RED);
        grid.set(1, 0, Layer::Committed, RED);
        grid.set(3, 0, Layer::Committed, RED);
        let area: HashSet<_> = flood_fill(&grid, Layer::Committed, (1, 0)).into_iter().collect();
        assert_eq!(area, HashSet::from([(0, 0), (1, 0)]));
    }

    #[test]
    fn test_fill_out_of_range_seed() {
        let grid = PixelGrid::new(4, 4);
        assert!(flood_fill(&grid, Layer::Committed, (4, 0)).is_empty());
        assert!(flood_fill(&grid, Layer::Committed, (0, 9)).is_empty());
    }

    #[test]
    fn test_fill_reads_requested_layer() {
        let mut grid = PixelGrid::new(3, 1);
        grid.set(1, 0, Layer::Preview, RED);
        assert_eq!(flood_fill(&grid, Layer::Committed, (0, 0)).len(), 3);
        assert_eq!(flood_fill(&grid, Layer::Preview, (0, 0)).len(), 1);
    }
}
