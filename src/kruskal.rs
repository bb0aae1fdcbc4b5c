use crate::disjoint_set::DisjointSet;
use crate::error::DisjointSetError;

/// Kruskal's algorithm: the edges of a minimum spanning forest over nodes `0..num_nodes`, in
/// ascending weight order. Equal weights keep their input order.
pub fn minimum_spanning_forest<W: Ord + Clone>(num_nodes: usize, edges: &[(usize, usize, W)])
    -> Result<Vec<(usize, usize, W)>, DisjointSetError> {
    let mut ds = DisjointSet::new(num_nodes);
    let mut order: Vec<&(usize, usize, W)> = edges.iter().collect();
    order.sort_by(|x, y| x.2.cmp(&y.2));

    let mut forest = Vec::with_capacity(num_nodes.saturating_sub(1));
    // No early exit once everything is joined, so every endpoint still gets validated.
    for (a, b, weight) in order {
        if ds.merge_sets(*a, *b)? {
            forest.push((*a, *b, weight.clone()));
        }
    }
    debug!("spanning forest over {} nodes uses {} of {} edges", num_nodes, forest.len(), edges.len());
    Ok(forest)
}

/// Groups nodes `0..num_nodes` by connectivity. Same ordering as `DisjointSet::sets`.
pub fn connected_components(num_nodes: usize, edges: &[(usize, usize)])
    -> Result<Vec<Vec<usize>>, DisjointSetError> {
    let mut ds = DisjointSet::new(num_nodes);
    for &(a, b) in edges {
        ds.merge_sets(a, b)?;
    }
    Ok(ds.sets())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use pathfinding::prelude::{connected_components as oracle_components, kruskal_indices};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn random_edges(rng: &mut StdRng, num_nodes: usize, num_edges: usize) -> Vec<(usize, usize, u64)> {
        (0..num_edges)
            .map(|_| (rng.gen_range(0..num_nodes), rng.gen_range(0..num_nodes), rng.gen_range(1..100)))
            .collect()
    }

    #[test]
    fn test_small_forest() {
        let edges = vec![(0, 1, 4), (1, 2, 1), (0, 2, 3), (3, 4, 2), (2, 3, 9), (4, 2, 7)];
        let forest = minimum_spanning_forest(5, &edges).unwrap();
        assert_eq!(forest, vec![(1, 2, 1), (3, 4, 2), (0, 2, 3), (4, 2, 7)]);
    }

    #[test]
    fn test_disconnected_forest() {
        let edges = vec![(0, 1, 5), (2, 3, 1)];
        let forest = minimum_spanning_forest(5, &edges).unwrap();
        assert_eq!(forest.len(), 2);
        assert_eq!(connected_components(5, &[(0, 1), (2, 3)]).unwrap(),
            vec![vec![0, 1], vec![2, 3], vec![4]]);
    }

    #[test]
    fn test_bad_endpoint() {
        let err = minimum_spanning_forest(3, &[(0, 1, 1), (1, 3, 2)]).unwrap_err();
        assert_eq!(err, DisjointSetError::IndexOutOfRange { index: 3, len: 3 });
        let err = connected_components(2, &[(5, 0)]).unwrap_err();
        assert_eq!(err, DisjointSetError::IndexOutOfRange { index: 5, len: 2 });
    }

    #[test]
    fn test_weight_matches_pathfinding() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..50 {
            let num_nodes = rng.gen_range(1..40);
            let num_edges = rng.gen_range(0..120);
            let edges = random_edges(&mut rng, num_nodes, num_edges);

            let ours = minimum_spanning_forest(num_nodes, &edges).unwrap();
            let theirs: Vec<_> = kruskal_indices(num_nodes, &edges).collect();
            assert_eq!(ours.len(), theirs.len());
            assert_eq!(ours.iter().map(|e| e.2).sum::<u64>(), theirs.iter().map(|e| e.2).sum::<u64>());
        }
    }

    #[test]
    fn test_components_match_pathfinding() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let num_nodes = rng.gen_range(1..40);
            let num_edges = rng.gen_range(0..60);
            let edges: Vec<(usize, usize)> = random_edges(&mut rng, num_nodes, num_edges)
                .into_iter()
                .map(|(a, b, _)| (a, b))
                .collect();

            let ours: BTreeSet<Vec<usize>> = connected_components(num_nodes, &edges).unwrap()
                .into_iter()
                .collect();

            let nodes: Vec<usize> = (0..num_nodes).collect();
            let neighbours = |&n: &usize| -> Vec<usize> {
                edges.iter()
                    .filter_map(|&(a, b)| if a == n { Some(b) } else if b == n { Some(a) } else { None })
                    .collect()
            };
            let theirs: BTreeSet<Vec<usize>> = oracle_components(&nodes, neighbours)
                .into_iter()
                .map(|set| {
                    let mut members: Vec<usize> = set.into_iter().collect();
                    members.sort_unstable();
                    members
                })
                .collect();
            assert_eq!(ours, theirs);
        }
    }
}
