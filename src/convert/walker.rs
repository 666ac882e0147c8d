//! Tiled layout traversal.

use crate::bif::{Layout, TreeIndex};

/// Lazy, restartable walk over every tile coordinate of a layout in
/// depth-major, tile-minor order.
///
/// This order is the iteration contract downstream consumers rely on for
/// deterministic output. The walker does not filter empty tiles; whether a
/// tile has payload for a given channel is a per-channel fact the consumer
/// checks itself.
pub struct TileWalk<'a> {
    layout: &'a Layout,
    depth: usize,
    tile: usize,
}

impl<'a> TileWalk<'a> {
    pub fn new(layout: &'a Layout) -> Self {
        Self {
            layout,
            depth: 0,
            tile: 0,
        }
    }
}

impl Iterator for TileWalk<'_> {
    type Item = TreeIndex;

    fn next(&mut self) -> Option<TreeIndex> {
        while self.depth < self.layout.depth_count() {
            if self.tile < self.layout.tile_count(self.depth) {
                let index = TreeIndex::new(self.tile, self.depth);
                self.tile += 1;
                return Some(index);
            }
            self.depth += 1;
            self.tile = 0;
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_depth_major_tile_minor_order() {
        let layout = Layout::with_tile_counts(&[2, 3]);
        let visited: Vec<_> = TileWalk::new(&layout).map(|t| (t.depth, t.tile)).collect();
        assert_eq!(visited, vec![(0, 0), (0, 1), (1, 0), (1, 1), (1, 2)]);
    }

    #[test]
    fn test_walk_skips_empty_depths() {
        let layout = Layout::with_tile_counts(&[0, 2, 0, 1]);
        let visited: Vec<_> = TileWalk::new(&layout).map(|t| (t.depth, t.tile)).collect();
        assert_eq!(visited, vec![(1, 0), (1, 1), (3, 0)]);
    }

    #[test]
    fn test_walk_is_restartable_and_deterministic() {
        let layout = Layout::with_tile_counts(&[1, 4, 2]);
        let first: Vec<_> = TileWalk::new(&layout).collect();
        let second: Vec<_> = TileWalk::new(&layout).collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), layout.total_tile_count());
    }

    #[test]
    fn test_empty_layout() {
        let layout = Layout::with_tile_counts(&[]);
        assert_eq!(TileWalk::new(&layout).count(), 0);
    }
}
