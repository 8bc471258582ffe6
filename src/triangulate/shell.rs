use tracing::trace;

use crate::math::predicates::is_collinear;
use crate::math::Point2;

/// Marker for a removed vertex in the successor table.
const REMOVED: usize = usize::MAX;

/// The shrinking boundary of the region still to be triangulated.
///
/// Coordinates never move; removal relinks the successor table. A window of
/// three consecutive available vertices, the *corner*, walks the ring.
#[derive(Debug, Clone)]
pub struct PolygonShell {
    coords: Vec<Point2>,
    next: Vec<usize>,
    corner: [usize; 3],
    len: usize,
}

impl PolygonShell {
    /// Creates a shell over an open ring. The corner starts at vertices
    /// 0, 1 and 2.
    #[must_use]
    pub fn new(coords: Vec<Point2>) -> Self {
        let len = coords.len();
        let next = (0..len).map(|i| (i + 1) % len).collect();
        let corner = if len == 0 {
            [0; 3]
        } else {
            [0, 1 % len, 2 % len]
        };
        Self {
            coords,
            next,
            corner,
            len,
        }
    }

    /// Number of vertices still available.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Ring positions of the current corner.
    #[must_use]
    pub fn corner_indices(&self) -> [usize; 3] {
        self.corner
    }

    /// Coordinates of the current corner. The shell must not be empty.
    #[must_use]
    pub fn corner(&self) -> [Point2; 3] {
        self.corner.map(|i| self.coords[i])
    }

    #[must_use]
    pub fn coordinate(&self, index: usize) -> Point2 {
        self.coords[index]
    }

    /// Successor of an available vertex.
    #[must_use]
    pub fn successor(&self, index: usize) -> usize {
        self.next[index]
    }

    /// Moves the corner window one vertex forward.
    ///
    /// With `move_first` the window slides so the old middle becomes the new
    /// first vertex. Without it the first vertex stays and the middle and last
    /// are recomputed from it. Does nothing when fewer than three vertices
    /// remain.
    pub fn advance(&mut self, move_first: bool) {
        if self.len < 3 {
            return;
        }
        if move_first {
            self.corner[0] = self.corner[1];
        }
        self.corner[1] = self.next[self.corner[0]];
        self.corner[2] = self.next[self.corner[1]];
    }

    /// Removes the middle vertex of the corner and refreshes the window,
    /// keeping its first vertex.
    pub fn remove(&mut self) {
        let [first, middle, _] = self.corner;
        self.next[first] = self.next[middle];
        self.next[middle] = REMOVED;
        self.len -= 1;
        self.advance(false);
    }

    /// Walks the available vertices once, starting after the corner's first
    /// vertex. Yields `(predecessor, vertex)` position pairs.
    #[must_use]
    pub fn walk(&self) -> Walk<'_> {
        let start = self.corner[0];
        Walk {
            shell: self,
            prev: start,
            cur: self.next.get(start).copied().unwrap_or(REMOVED),
            remaining: self.len,
        }
    }

    /// Remaining vertices in ring order, starting at the corner's first vertex.
    #[must_use]
    pub fn to_ring(&self) -> Vec<Point2> {
        let mut ring: Vec<Point2> = self.walk().map(|(_, i)| self.coords[i]).collect();
        ring.rotate_right(1);
        ring
    }

    /// Removes middle vertices of collinear corners until a full lap finds
    /// none. Returns the number of vertices removed.
    pub fn prune_collinear(&mut self, tolerance: f64) -> usize {
        let mut removed = 0;
        let mut clean_run = 0;
        while self.len >= 3 && clean_run < self.len {
            let [a, b, c] = self.corner();
            if is_collinear(&a, &b, &c, tolerance) {
                trace!(x = b.x, y = b.y, "pruned collinear vertex");
                self.remove();
                removed += 1;
                clean_run = 0;
            } else {
                self.advance(true);
                clean_run += 1;
            }
        }
        removed
    }
}

/// Iterator returned by [`PolygonShell::walk`].
#[derive(Debug)]
pub struct Walk<'a> {
    shell: &'a PolygonShell,
    prev: usize,
    cur: usize,
    remaining: usize,
}

impl Iterator for Walk<'_> {
    type Item = (usize, usize);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 || self.cur == REMOVED {
            return None;
        }
        self.remaining -= 1;
        let item = (self.prev, self.cur);
        self.prev = self.cur;
        self.cur = self.shell.next[self.cur];
        Some(item)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::TOLERANCE;

    fn shell(coords: &[(f64, f64)]) -> PolygonShell {
        PolygonShell::new(coords.iter().map(|&(x, y)| Point2::new(x, y)).collect())
    }

    #[test]
    fn corner_starts_at_front() {
        let s = shell(&[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)]);
        assert_eq!(s.corner_indices(), [0, 1, 2]);
        assert_eq!(s.len(), 4);
    }

    #[test]
    fn advance_wraps_around() {
        let mut s = shell(&[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)]);
        s.advance(true);
        assert_eq!(s.corner_indices(), [1, 2, 3]);
        s.advance(true);
        assert_eq!(s.corner_indices(), [2, 3, 0]);
        s.advance(true);
        assert_eq!(s.corner_indices(), [3, 0, 1]);
    }

    #[test]
    fn remove_keeps_first_vertex() {
        let mut s = shell(&[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)]);
        s.remove();
        assert_eq!(s.len(), 3);
        assert_eq!(s.corner_indices(), [0, 2, 3]);
        assert_eq!(
            s.to_ring(),
            vec![Point2::new(0.0, 0.0), Point2::new(1.0, 1.0), Point2::new(1.0, 0.0)]
        );
    }

    #[test]
    fn advance_is_noop_below_three() {
        let mut s = shell(&[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0)]);
        s.remove();
        let before = s.corner_indices();
        s.advance(true);
        assert_eq!(s.corner_indices(), before);
    }

    #[test]
    fn walk_visits_every_available_vertex_once() {
        let mut s = shell(&[(0.0, 0.0), (0.0, 1.0), (0.0, 2.0), (2.0, 2.0), (2.0, 0.0)]);
        s.remove();
        let visited: Vec<usize> = s.walk().map(|(_, i)| i).collect();
        assert_eq!(visited, vec![2, 3, 4, 0]);
        let pairs: Vec<(usize, usize)> = s.walk().collect();
        assert_eq!(pairs[0], (0, 2));
    }

    #[test]
    fn pruning_removes_collinear_vertices() {
        let mut s = shell(&[
            (0.0, 0.0),
            (0.0, 1.0),
            (0.0, 2.0),
            (1.0, 2.0),
            (2.0, 2.0),
            (2.0, 0.0),
            (1.0, 0.0),
        ]);
        assert_eq!(s.prune_collinear(TOLERANCE), 3);
        assert_eq!(s.len(), 4);
    }

    #[test]
    fn pruning_is_idempotent() {
        let mut s = shell(&[
            (0.0, 0.0),
            (0.0, 1.0),
            (0.0, 2.0),
            (3.0, 2.0),
            (3.0, 2.0),
            (2.0, 0.0),
        ]);
        let first = s.prune_collinear(TOLERANCE);
        assert!(first > 0);
        let ring = s.to_ring();
        assert_eq!(s.prune_collinear(TOLERANCE), 0);
        assert_eq!(s.to_ring(), ring);
    }
}
