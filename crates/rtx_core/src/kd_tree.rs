//! k-d tree over bounding boxes.
//!
//! The tree indexes opaque payload handles by their [`Aabb`]. Leaves keep
//! indices into the tree's own entry store, so a box that straddles a split
//! plane simply appears in both subtrees and queries de-duplicate the result.

use rtx_math::{Aabb, Ray};

/// Depth never drops below this, however few entries there are.
const MIN_MAX_DEPTH: u32 = 2;

/// Tree node - a leaf holding entry indices or a split into two halves.
#[derive(Debug)]
enum KdNode {
    Leaf {
        region: Aabb,
        members: Vec<usize>,
    },
    Internal {
        region: Aabb,
        left: Box<KdNode>,
        right: Box<KdNode>,
    },
}

/// Capacity limits shared by every node of one tree.
#[derive(Debug, Clone, Copy)]
struct Limits {
    threshold: usize,
    max_depth: u32,
}

impl KdNode {
    fn leaf(region: Aabb) -> Self {
        KdNode::Leaf {
            region,
            members: Vec::new(),
        }
    }

    fn region(&self) -> &Aabb {
        match self {
            KdNode::Leaf { region, .. } | KdNode::Internal { region, .. } => region,
        }
    }

    /// Add entry `index` to every leaf whose region overlaps its box.
    fn insert(&mut self, index: usize, boxes: &[Aabb], limits: Limits, depth: u32) {
        if !self.region().overlaps(&boxes[index]) {
            return;
        }

        match self {
            KdNode::Internal { left, right, .. } => {
                left.insert(index, boxes, limits, depth + 1);
                right.insert(index, boxes, limits, depth + 1);
            }
            KdNode::Leaf { members, .. } => {
                members.push(index);
                if members.len() > limits.threshold && depth < limits.max_depth {
                    self.split(boxes, limits, depth);
                }
            }
        }
    }

    /// Turn a full leaf into an internal node, cutting its region at the mean
    /// member center along the axis where the centers spread the most.
    fn split(&mut self, boxes: &[Aabb], limits: Limits, depth: u32) {
        let KdNode::Leaf { region, members } = self else {
            return;
        };
        let region = *region;
        let members = std::mem::take(members);

        let (axis, value) = split_plane(members.iter().map(|&i| &boxes[i]));
        let interval = region.axis_interval(axis);
        let (lower, upper) = region.split(value.clamp(interval.min, interval.max), axis);

        let mut left = Box::new(KdNode::leaf(lower));
        let mut right = Box::new(KdNode::leaf(upper));
        for index in members {
            left.insert(index, boxes, limits, depth + 1);
            right.insert(index, boxes, limits, depth + 1);
        }

        *self = KdNode::Internal { region, left, right };
    }

    fn query(&self, ray: &Ray, found: &mut Vec<usize>) {
        if !self.region().hit(ray) {
            return;
        }

        match self {
            KdNode::Leaf { members, .. } => found.extend_from_slice(members),
            KdNode::Internal { left, right, .. } => {
                left.query(ray, found);
                right.query(ray, found);
            }
        }
    }

    fn depth(&self) -> u32 {
        match self {
            KdNode::Leaf { .. } => 0,
            KdNode::Internal { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    fn leaf_count(&self) -> usize {
        match self {
            KdNode::Leaf { .. } => 1,
            KdNode::Internal { left, right, .. } => left.leaf_count() + right.leaf_count(),
        }
    }
}

/// Axis of largest center variance and the mean center along it.
///
/// Ties go to the lowest axis, so identical centers split on X.
fn split_plane<'a>(boxes: impl Iterator<Item = &'a Aabb>) -> (usize, f32) {
    let mut count = 0.0_f32;
    let mut sum = [0.0_f32; 3];
    let mut sum_sq = [0.0_f32; 3];

    for bbox in boxes {
        let c = bbox.centroid();
        count += 1.0;
        for axis in 0..3 {
            sum[axis] += c[axis];
            sum_sq[axis] += c[axis] * c[axis];
        }
    }

    if count == 0.0 {
        return (0, 0.0);
    }

    let mean = sum.map(|s| s / count);
    let mut best = 0;
    let mut best_variance = f32::NEG_INFINITY;
    for axis in 0..3 {
        let variance = sum_sq[axis] / count - mean[axis] * mean[axis];
        if variance > best_variance {
            best = axis;
            best_variance = variance;
        }
    }

    (best, mean[best])
}

/// Spatial index over `(Aabb, T)` entries answering "what might this ray hit".
#[derive(Debug)]
pub struct KdTree<T> {
    boxes: Vec<Aabb>,
    payloads: Vec<T>,
    root: KdNode,
    limits: Limits,
}

impl<T: Copy + Ord> KdTree<T> {
    /// Build a tree over `entries`, splitting leaves with more than
    /// `threshold` members.
    ///
    /// The root region is the union of all boxes; depth is capped at
    /// `log2(count / threshold)`, but never below two.
    pub fn build(entries: impl IntoIterator<Item = (Aabb, T)>, threshold: usize) -> Self {
        let (boxes, payloads): (Vec<Aabb>, Vec<T>) = entries.into_iter().unzip();

        let region = boxes
            .iter()
            .fold(Aabb::EMPTY, |acc, b| Aabb::surrounding(&acc, b));
        let threshold = threshold.max(1);
        let max_depth = ((boxes.len() as f32 / threshold as f32).log2().floor() as u32).max(MIN_MAX_DEPTH);

        let mut tree = Self {
            boxes: Vec::with_capacity(payloads.len()),
            payloads: Vec::with_capacity(payloads.len()),
            root: KdNode::leaf(region),
            limits: Limits {
                threshold,
                max_depth,
            },
        };
        for (bbox, payload) in boxes.into_iter().zip(payloads) {
            tree.insert(bbox, payload);
        }
        tree
    }

    /// An empty tree covering `region`.
    pub fn with_region(region: Aabb, threshold: usize, max_depth: u32) -> Self {
        Self {
            boxes: Vec::new(),
            payloads: Vec::new(),
            root: KdNode::leaf(region),
            limits: Limits {
                threshold: threshold.max(1),
                max_depth,
            },
        }
    }

    /// Index `payload` under `bbox`.
    ///
    /// A box entirely outside the tree's region is not indexed; returns
    /// whether the entry was accepted.
    pub fn insert(&mut self, bbox: Aabb, payload: T) -> bool {
        if !self.root.region().overlaps(&bbox) {
            return false;
        }

        self.boxes.push(bbox);
        self.payloads.push(payload);
        let index = self.boxes.len() - 1;
        self.root.insert(index, &self.boxes, self.limits, 0);
        true
    }

    /// Replace `found` with every payload whose leaf region the ray passes
    /// through, each reported once and in ascending order.
    ///
    /// The result is a superset of the entries whose boxes the ray hits.
    pub fn ray_query(&self, ray: &Ray, found: &mut Vec<T>) {
        found.clear();
        if self.boxes.is_empty() {
            return;
        }

        let mut indices = Vec::new();
        self.root.query(ray, &mut indices);
        found.extend(indices.into_iter().map(|i| self.payloads[i]));
        found.sort_unstable();
        found.dedup();
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    /// Levels below the root.
    pub fn depth(&self) -> u32 {
        self.root.depth()
    }

    pub fn leaf_count(&self) -> usize {
        self.root.leaf_count()
    }

    pub fn region(&self) -> &Aabb {
        self.root.region()
    }
}
