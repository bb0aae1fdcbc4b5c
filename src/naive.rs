/// Reference model for cross-checking `DisjointSet`: every element stores its set's
/// representative directly, and merging relabels a whole set. O(n) per merge, size and count.
///
/// Indices are not validated; callers check them against `DisjointSet` first.
#[derive(Debug, Clone)]
pub struct NaiveDisjointSet {
    representatives: Vec<usize>,
}

impl NaiveDisjointSet {
    pub fn new(len: usize) -> NaiveDisjointSet {
        NaiveDisjointSet {
            representatives: (0..len).collect(),
        }
    }

    pub fn num_sets(&self) -> usize {
        self.representatives.iter()
            .enumerate()
            .filter(|&(i, &repr)| repr == i)
            .count()
    }

    pub fn size_of_set(&self, index: usize) -> usize {
        let repr = self.representatives[index];
        self.representatives.iter().filter(|&&r| r == repr).count()
    }

    pub fn are_in_same_set(&self, index0: usize, index1: usize) -> bool {
        self.representatives[index0] == self.representatives[index1]
    }

    pub fn merge_sets(&mut self, index0: usize, index1: usize) -> bool {
        let repr0 = self.representatives[index0];
        let repr1 = self.representatives[index1];
        for repr in self.representatives.iter_mut() {
            if *repr == repr1 {
                *repr = repr0;
            }
        }
        repr0 != repr1
    }
}
