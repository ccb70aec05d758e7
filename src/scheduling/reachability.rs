//! Radius queries over the static responder constellation
//!
//! A balanced kd-tree built once over the responder positions answers
//! "which responders lie within the search radius of this point" as the
//! platform moves. The point set never changes after construction.

use nalgebra::Vector3;

struct KdNode {
    point_index: usize,
    axis: usize,
    left: Option<usize>,
    right: Option<usize>,
}

/// Static spatial index over responder positions with a fixed search
/// radius.
///
/// [`find`](Self::find) returns indices sorted ascending so downstream
/// cursor arithmetic over the selected set stays deterministic, and reuses
/// an internal buffer so steady-state queries do not allocate.
pub struct ReachabilityIndex {
    points: Vec<Vector3<f64>>,
    nodes: Vec<KdNode>,
    root: Option<usize>,
    squared_radius: f64,
    found: Vec<usize>,
}

impl ReachabilityIndex {
    pub fn new(points: &[Vector3<f64>], radius: f64) -> Self {
        let mut index = Self {
            points: points.to_vec(),
            nodes: Vec::with_capacity(points.len()),
            root: None,
            squared_radius: radius * radius,
            found: Vec::with_capacity(points.len()),
        };
        let mut ordering: Vec<usize> = (0..points.len()).collect();
        index.root = index.build(&mut ordering, 0);
        index
    }

    fn build(&mut self, ordering: &mut [usize], depth: usize) -> Option<usize> {
        if ordering.is_empty() {
            return None;
        }

        let axis = depth % 3;
        ordering.sort_unstable_by(|&a, &b| {
            self.points[a][axis]
                .partial_cmp(&self.points[b][axis])
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let median = ordering.len() / 2;
        let point_index = ordering[median];

        let node_index = self.nodes.len();
        self.nodes.push(KdNode {
            point_index,
            axis,
            left: None,
            right: None,
        });

        let (before, after) = ordering.split_at_mut(median);
        let left = self.build(before, depth + 1);
        let right = self.build(&mut after[1..], depth + 1);
        self.nodes[node_index].left = left;
        self.nodes[node_index].right = right;

        Some(node_index)
    }

    /// Indices of all points within the search radius of `position`,
    /// sorted ascending. The returned slice is valid until the next call.
    pub fn find(&mut self, position: &Vector3<f64>) -> &[usize] {
        let mut found = std::mem::take(&mut self.found);
        found.clear();
        if let Some(root) = self.root {
            self.search(root, position, &mut found);
        }
        found.sort_unstable();
        self.found = found;
        &self.found
    }

    fn search(&self, node_index: usize, position: &Vector3<f64>, found: &mut Vec<usize>) {
        let node = &self.nodes[node_index];
        let point = &self.points[node.point_index];

        if (point - position).norm_squared() <= self.squared_radius {
            found.push(node.point_index);
        }

        let delta = position[node.axis] - point[node.axis];
        let (near, far) = if delta < 0.0 {
            (node.left, node.right)
        } else {
            (node.right, node.left)
        };

        if let Some(near) = near {
            self.search(near, position, found);
        }
        if delta * delta <= self.squared_radius {
            if let Some(far) = far {
                self.search(far, position, found);
            }
        }
    }

    pub fn number_of_points(&self) -> usize {
        self.points.len()
    }
}
