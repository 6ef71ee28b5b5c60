//! Activity-ordered branching candidates.

const ABSENT: usize = usize::MAX;

/// Multiplier applied to the bump increment after every conflict, so that
/// recent conflicts weigh more than old ones.
const DECAY: f64 = 0.95;

const RESCALE_LIMIT: f64 = 1e100;

/// Binary max-heap of variable indices keyed by activity.
///
/// Ties break towards the lower index.
#[derive(Debug, Clone, Default)]
pub(super) struct VarHeap {
    activity: Vec<f64>,
    heap: Vec<usize>,
    positions: Vec<usize>,
    increment: f64,
}

impl VarHeap {
    /// Heap holding every variable, keyed by the given initial activities.
    pub(super) fn new(activity: Vec<f64>) -> Self {
        let count = activity.len();
        let mut heap = Self {
            activity,
            heap: Vec::with_capacity(count),
            positions: vec![ABSENT; count],
            increment: 1.0,
        };
        for var in 0..count {
            heap.insert(var);
        }
        heap
    }

    pub(super) fn contains(&self, var: usize) -> bool {
        self.positions.get(var).is_some_and(|&p| p != ABSENT)
    }

    pub(super) fn insert(&mut self, var: usize) {
        if self.contains(var) {
            return;
        }
        self.positions[var] = self.heap.len();
        self.heap.push(var);
        self.sift_up(self.heap.len() - 1);
    }

    /// Removes and returns the most active variable.
    pub(super) fn pop(&mut self) -> Option<usize> {
        let last = self.heap.pop()?;
        if self.heap.is_empty() {
            self.positions[last] = ABSENT;
            return Some(last);
        }
        let top = std::mem::replace(&mut self.heap[0], last);
        self.positions[top] = ABSENT;
        self.positions[last] = 0;
        self.sift_down(0);
        Some(top)
    }

    /// Raises the activity of a variable taking part in a conflict.
    pub(super) fn bump(&mut self, var: usize) {
        self.activity[var] += self.increment;
        if self.activity[var] > RESCALE_LIMIT {
            for activity in &mut self.activity {
                *activity /= RESCALE_LIMIT;
            }
            self.increment /= RESCALE_LIMIT;
        }
        if self.contains(var) {
            self.sift_up(self.positions[var]);
        }
    }

    pub(super) fn decay(&mut self) {
        self.increment /= DECAY;
    }

    fn before(&self, a: usize, b: usize) -> bool {
        let (x, y) = (self.activity[a], self.activity[b]);
        x > y || (x == y && a < b)
    }

    fn sift_up(&mut self, mut pos: usize) {
        let var = self.heap[pos];
        while pos > 0 {
            let parent = (pos - 1) / 2;
            if !self.before(var, self.heap[parent]) {
                break;
            }
            self.heap[pos] = self.heap[parent];
            self.positions[self.heap[pos]] = pos;
            pos = parent;
        }
        self.heap[pos] = var;
        self.positions[var] = pos;
    }

    fn sift_down(&mut self, mut pos: usize) {
        let var = self.heap[pos];
        let len = self.heap.len();
        loop {
            let mut child = 2 * pos + 1;
            if child >= len {
                break;
            }
            if child + 1 < len && self.before(self.heap[child + 1], self.heap[child]) {
                child += 1;
            }
            if !self.before(self.heap[child], var) {
                break;
            }
            self.heap[pos] = self.heap[child];
            self.positions[self.heap[pos]] = pos;
            pos = child;
        }
        self.heap[pos] = var;
        self.positions[var] = pos;
    }
}
