// https://en.wikipedia.org/wiki/Disjoint-set_data_structure
use std::mem;
use crate::error::DisjointSetError;

/// Disjoint-set forest over the elements `0..len()`, using union by rank and full path
/// compression.
///
/// The three vectors are indexed by element. `rank` and `size` only mean something for a root
/// (`parent[i] == i`); a non-root always has `size == 0`.
///
/// Every lookup compresses the path it walks, so the queries `size_of_set` and
/// `are_in_same_set` take `&mut self` just like `merge_sets` does. Sharing one instance between
/// threads needs a single lock around the whole structure.
#[derive(Debug, Clone)]
pub struct DisjointSet {
	parent: Vec<usize>,
	rank: Vec<u8>,
	size: Vec<usize>,
	num_sets: usize,
}

impl DisjointSet {
	/// Creates `len` singleton sets `{0}, {1}, ..., {len - 1}`.
	pub fn new(len: usize) -> DisjointSet {
		DisjointSet {
			parent: (0..len).collect(),
			rank: vec![0; len],
			size: vec![1; len],
			num_sets: len,
		}
	}

	/// Like `new`, for sizes coming from signed input such as a workload file.
	pub fn try_new(len: i64) -> Result<DisjointSet, DisjointSetError> {
		usize::try_from(len)
			.map(DisjointSet::new)
			.map_err(|_| DisjointSetError::InvalidArgument { requested: len })
	}

	pub fn len(&self) -> usize {
		self.parent.len()
	}

	pub fn is_empty(&self) -> bool {
		self.parent.is_empty()
	}

	pub fn num_sets(&self) -> usize {
		self.num_sets
	}

	/// Number of elements in the set containing `index`. Compresses the path to its root.
	pub fn size_of_set(&mut self, index: usize) -> Result<usize, DisjointSetError> {
		self.check_index(index)?;
		let root = self.find(index);
		Ok(self.size[root])
	}

	/// Compresses the paths of both elements.
	pub fn are_in_same_set(&mut self, index0: usize, index1: usize) -> Result<bool, DisjointSetError> {
		self.check_index(index0)?;
		self.check_index(index1)?;
		Ok(self.find(index0) == self.find(index1))
	}

	/// Merges the sets containing the two elements. Returns `false` if they already shared a set,
	/// in which case nothing but path compression happens.
	pub fn merge_sets(&mut self, index0: usize, index1: usize) -> Result<bool, DisjointSetError> {
		self.check_index(index0)?;
		self.check_index(index1)?;
		let mut root0 = self.find(index0);
		let mut root1 = self.find(index1);
		if root0 == root1 {
			return Ok(false);
		}

		// root0 ends up as the surviving root
		if self.rank[root0] < self.rank[root1] {
			mem::swap(&mut root0, &mut root1);
		} else if self.rank[root0] == self.rank[root1] {
			self.rank[root0] += 1;
		}
		self.parent[root1] = root0;
		self.size[root0] += self.size[root1];
		self.size[root1] = 0;
		self.num_sets -= 1;
		Ok(true)
	}

	/// Lists every set as its sorted members, ordered by smallest member.
	pub fn sets(&mut self) -> Vec<Vec<usize>> {
		let mut slot_of_root: Vec<Option<usize>> = vec![None; self.len()];
		let mut sets: Vec<Vec<usize>> = Vec::with_capacity(self.num_sets);
		for i in 0..self.len() {
			let root = self.find(i);
			let slot = match slot_of_root[root] {
				Some(slot) => slot,
				None => {
					sets.push(Vec::with_capacity(self.size[root]));
					slot_of_root[root] = Some(sets.len() - 1);
					sets.len() - 1
				}
			};
			sets[slot].push(i);
		}
		sets
	}

	/// Re-verifies the forest from scratch in O(n). Meant for tests; no sequence of valid calls
	/// should ever make this fail.
	pub fn check_structure(&self) -> Result<(), DisjointSetError> {
		let len = self.len();
		if self.rank.len() != len || self.size.len() != len {
			return Err(corrupt(format!("{} parents, {} ranks and {} sizes",
				len, self.rank.len(), self.size.len())));
		}

		let mut num_roots = 0;
		for i in 0..len {
			let parent = self.parent[i];
			if parent >= len {
				return Err(corrupt(format!("element {} points at {}, outside the universe", i, parent)));
			}
			if parent == i {
				num_roots += 1;
				// A root of rank k was built from two roots of rank k - 1, so it holds at least 2^k elements.
				let min_size = 1usize.checked_shl(u32::from(self.rank[i])).unwrap_or(usize::MAX);
				if self.size[i] < min_size {
					return Err(corrupt(format!("root {} has rank {} but only {} elements",
						i, self.rank[i], self.size[i])));
				}
			} else {
				if self.rank[i] >= self.rank[parent] {
					return Err(corrupt(format!("element {} of rank {} sits under {} of rank {}",
						i, self.rank[i], parent, self.rank[parent])));
				}
				if self.size[i] != 0 {
					return Err(corrupt(format!("non-root {} has size {}", i, self.size[i])));
				}
			}
		}
		if num_roots != self.num_sets {
			return Err(corrupt(format!("{} roots but num_sets is {}", num_roots, self.num_sets)));
		}

		// Ranks strictly increase along parent links, so every walk below ends at a root. Each
		// element's root is resolved once and reused by everything underneath it.
		let mut root_of: Vec<Option<usize>> = vec![None; len];
		let mut path = Vec::new();
		let mut members = vec![0usize; len];
		for i in 0..len {
			let mut node = i;
			let root = loop {
				if let Some(root) = root_of[node] {
					break root;
				}
				if self.parent[node] == node {
					break node;
				}
				path.push(node);
				node = self.parent[node];
			};
			root_of[node] = Some(root);
			for visited in path.drain(..) {
				root_of[visited] = Some(root);
			}
			members[root] += 1;
		}
		for i in 0..len {
			if self.parent[i] == i && members[i] != self.size[i] {
				return Err(corrupt(format!("root {} records size {} but has {} members",
					i, self.size[i], members[i])));
			}
		}
		Ok(())
	}

	fn check_index(&self, index: usize) -> Result<(), DisjointSetError> {
		if index < self.len() {
			Ok(())
		} else {
			Err(DisjointSetError::IndexOutOfRange { index, len: self.len() })
		}
	}

	// Two passes: locate the root, then point everything on the way straight at it.
	fn find(&mut self, index: usize) -> usize {
		let mut root = index;
		while self.parent[root] != root {
			root = self.parent[root];
		}
		let mut node = index;
		while node != root {
			node = mem::replace(&mut self.parent[node], root);
		}
		root
	}
}

fn corrupt(reason: String) -> DisjointSetError {
	DisjointSetError::CorruptStructure(reason)
}


#[cfg(test)]
mod proptests {
	use super::*;
	use proptest::prelude::*;

	proptest! {
		#![proptest_config(ProptestConfig::with_cases(300))]

		#[test]
		fn size_matches_members(
			n in 1_usize..30,
			ops in proptest::collection::vec((0_usize..30, 0_usize..30), 0..60),
		) {
			let mut ds = DisjointSet::new(n);
			for &(a, b) in &ops {
				if a < n && b < n {
					ds.merge_sets(a, b).unwrap();
				}
			}
			prop_assert!(ds.check_structure().is_ok());

			for x in 0..n {
				let mut members = 0;
				for y in 0..n {
					if ds.are_in_same_set(x, y).unwrap() {
						members += 1;
					}
				}
				prop_assert_eq!(ds.size_of_set(x).unwrap(), members);
			}
			prop_assert_eq!(ds.sets().len(), ds.num_sets());
		}

		#[test]
		fn merge_reports_change(
			n in 1_usize..30,
			ops in proptest::collection::vec((0_usize..30, 0_usize..30), 0..60),
		) {
			let mut ds = DisjointSet::new(n);
			for &(a, b) in &ops {
				if a >= n || b >= n {
					continue;
				}
				let apart = !ds.are_in_same_set(a, b).unwrap();
				let before = ds.num_sets();
				prop_assert_eq!(ds.merge_sets(a, b).unwrap(), apart);
				prop_assert!(ds.are_in_same_set(a, b).unwrap());
				prop_assert_eq!(ds.num_sets(), if apart { before - 1 } else { before });
				prop_assert!(ds.check_structure().is_ok());
			}
		}

		#[test]
		fn merge_order_does_not_matter(
			pairs in proptest::collection::vec((0_usize..12, 0_usize..12), 0..20),
			seed in any::<u64>(),
		) {
			let mut forward = DisjointSet::new(12);
			for &(a, b) in &pairs {
				forward.merge_sets(a, b).unwrap();
			}

			let mut shuffled = pairs.clone();
			let len = shuffled.len();
			if len > 1 {
				shuffled.rotate_left((seed % len as u64) as usize);
				shuffled.reverse();
			}
			let mut other = DisjointSet::new(12);
			for &(a, b) in &shuffled {
				other.merge_sets(b, a).unwrap();
			}

			prop_assert_eq!(forward.sets(), other.sets());
			prop_assert_eq!(forward.num_sets(), other.num_sets());
		}
	}
}
