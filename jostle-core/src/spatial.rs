//! Broad-phase spatial indexing
//!
//! The physics world keeps one index per collision layer and rebuilds it
//! from scratch every step, so implementations only need to be fast at
//! bulk insert, clear and rectangle queries. Incremental update is not part
//! of the contract.

use crate::geometry::Rect;

/// Maximum number of items a node holds before it splits
const MAX_ITEMS_PER_NODE: usize = 5;

/// Nodes at this depth never split, which bounds the tree when many items
/// share the same spot
const MAX_DEPTH: usize = 8;

/// Region-partitioning index over items with rectangular bounds
pub trait SpatialIndex<T> {
    /// Remove every item. Allocations may be kept for reuse.
    fn clear(&mut self);

    /// Insert an item keyed by its bounding rectangle
    fn insert(&mut self, item: T, bounds: Rect);

    /// Append every item whose bounds overlap `query` to `out`.
    /// Result order is unspecified.
    fn intersect(&self, query: &Rect, out: &mut Vec<T>);
}

/// Region quadtree storing items in the deepest node that fully contains them
#[derive(Debug)]
pub struct QuadTree<T> {
    bounds: Rect,
    depth: usize,
    items: Vec<(T, Rect)>,
    children: Option<Box<[QuadTree<T>; 4]>>,
    /// Whether this node or any descendant holds items; lets queries skip
    /// empty subtrees that were kept around after `clear`
    occupied: bool,
}

impl<T: Copy> QuadTree<T> {
    pub fn new(bounds: Rect) -> Self {
        Self::with_depth(bounds, 0)
    }

    fn with_depth(bounds: Rect, depth: usize) -> Self {
        Self {
            bounds,
            depth,
            items: Vec::new(),
            children: None,
            occupied: false,
        }
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Number of items stored in this node and its descendants
    pub fn len(&self) -> usize {
        let below = self
            .children
            .as_ref()
            .map_or(0, |children| children.iter().map(QuadTree::len).sum());
        self.items.len() + below
    }

    pub fn is_empty(&self) -> bool {
        !self.occupied
    }

    /// Index of the child quadrant that fully contains `rect`, if any
    fn child_index(&self, rect: &Rect) -> Option<usize> {
        (0..4).find(|&i| self.bounds.quadrant(i).contains(rect))
    }

    fn split(&mut self) {
        let depth = self.depth + 1;
        let b = self.bounds;
        self.children = Some(Box::new([
            QuadTree::with_depth(b.quadrant(0), depth),
            QuadTree::with_depth(b.quadrant(1), depth),
            QuadTree::with_depth(b.quadrant(2), depth),
            QuadTree::with_depth(b.quadrant(3), depth),
        ]));

        // Push down whatever now fits in a single quadrant
        let items = std::mem::take(&mut self.items);
        for (item, rect) in items {
            self.place(item, rect);
        }
    }

    /// Store an item in the deepest existing node able to hold it
    fn place(&mut self, item: T, rect: Rect) {
        self.occupied = true;
        if let Some(index) = self.child_index(&rect) {
            if let Some(children) = self.children.as_mut() {
                children[index].insert_inner(item, rect);
                return;
            }
        }
        self.items.push((item, rect));
    }

    fn insert_inner(&mut self, item: T, rect: Rect) {
        if self.children.is_none()
            && self.items.len() >= MAX_ITEMS_PER_NODE
            && self.depth < MAX_DEPTH
        {
            self.split();
        }
        self.place(item, rect);
    }
}

impl<T: Copy> SpatialIndex<T> for QuadTree<T> {
    fn clear(&mut self) {
        if !self.occupied {
            return;
        }
        self.items.clear();
        self.occupied = false;
        if let Some(children) = self.children.as_mut() {
            for child in children.iter_mut() {
                child.clear();
            }
        }
    }

    fn insert(&mut self, item: T, bounds: Rect) {
        // Items outside the root bounds stay in the root so they are still
        // found by queries
        if self.depth == 0 && !self.bounds.contains(&bounds) {
            self.occupied = true;
            self.items.push((item, bounds));
            return;
        }
        self.insert_inner(item, bounds);
    }

    fn intersect(&self, query: &Rect, out: &mut Vec<T>) {
        if !self.occupied {
            return;
        }

        for (item, rect) in &self.items {
            if rect.overlaps(query) {
                out.push(*item);
            }
        }

        if let Some(children) = self.children.as_ref() {
            for child in children.iter() {
                if child.bounds.overlaps(query) {
                    child.intersect(query, out);
                }
            }
        }
    }
}
