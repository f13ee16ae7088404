use std::collections::{HashMap, HashSet};

use rand::seq::SliceRandom;
use rand::Rng;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    pub const ORIGIN: GridPos = GridPos { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Orthogonal neighbours in the order left, up, right, down.
    pub fn neighbors(self) -> [GridPos; 4] {
        [
            GridPos::new(self.x - 1, self.y),
            GridPos::new(self.x, self.y - 1),
            GridPos::new(self.x + 1, self.y),
            GridPos::new(self.x, self.y + 1),
        ]
    }
}

/// Index of a node inside its [`NodeTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub position: GridPos,
    /// Structural links to nodes closed before this one.
    pub children: Vec<NodeId>,
}

/// Arena of generation nodes. Node ids are indices in closing order, so every
/// child id is smaller than its parent's id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeTree {
    nodes: Vec<Node>,
}

impl NodeTree {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Every parent -> child link, parents in id order.
    pub fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        self.nodes.iter().enumerate().flat_map(|(index, node)| {
            node.children
                .iter()
                .map(move |child| (NodeId(index), *child))
        })
    }

    /// Smallest x and y over all nodes, never greater than the origin.
    pub fn min_position(&self) -> GridPos {
        self.nodes
            .iter()
            .fold(GridPos::ORIGIN, |min, node| GridPos {
                x: min.x.min(node.position.x),
                y: min.y.min(node.position.y),
            })
    }

    pub fn translate(&mut self, dx: i32, dy: i32) {
        for node in &mut self.nodes {
            node.position.x += dx;
            node.position.y += dy;
        }
    }

    pub fn scale(&mut self, factor: i32) {
        for node in &mut self.nodes {
            node.position.x *= factor;
            node.position.y *= factor;
        }
    }

    /// Shift every node so the minimum x and y become zero.
    pub fn normalize(&mut self) {
        let min = self.min_position();
        self.translate(-min.x, -min.y);
    }

    /// Maps each node to a value, then replays every parent -> child link by
    /// handing `link` the parent's value and the child's id. Values share
    /// indices with node ids.
    pub fn map_nodes<T, M, L>(&self, map: M, mut link: L) -> Vec<T>
    where
        M: FnMut(&Node) -> T,
        L: FnMut(&mut T, NodeId),
    {
        let mut values: Vec<T> = self.nodes.iter().map(map).collect();
        for (value, node) in values.iter_mut().zip(&self.nodes) {
            for child in &node.children {
                link(value, *child);
            }
        }
        values
    }
}

/// Grows a connected set of `count` grid nodes outward from the origin.
///
/// A random frontier cell is closed each step and linked to a random non-empty
/// subset of its already-closed neighbours. The frontier of a finite cell set
/// on an unbounded grid is never empty, so the loop always terminates.
pub fn create_node_tree<R>(count: usize, rng: &mut R) -> NodeTree
where
    R: Rng + ?Sized,
{
    let mut tree = NodeTree::default();
    if count == 0 {
        return tree;
    }

    let mut open = vec![GridPos::ORIGIN];
    let mut open_set = HashSet::from([GridPos::ORIGIN]);
    let mut closed: HashMap<GridPos, NodeId> = HashMap::with_capacity(count);

    while tree.nodes.len() < count && !open.is_empty() {
        let index = rng.gen_range(0..open.len());
        let position = open.remove(index);
        open_set.remove(&position);

        let mut candidates: Vec<NodeId> = position
            .neighbors()
            .iter()
            .filter_map(|neighbor| closed.get(neighbor).copied())
            .collect();
        if !candidates.is_empty() {
            let keep = rng.gen_range(1..=candidates.len());
            candidates.shuffle(rng);
            candidates.truncate(keep);
        }

        let id = NodeId(tree.nodes.len());
        tree.nodes.push(Node {
            position,
            children: candidates,
        });
        closed.insert(position, id);

        for neighbor in position.neighbors() {
            if !closed.contains_key(&neighbor) && open_set.insert(neighbor) {
                open.push(neighbor);
            }
        }
    }

    tree
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use rand::rngs::mock::StepRng;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    fn is_connected(tree: &NodeTree) -> bool {
        if tree.is_empty() {
            return true;
        }
        let mut adjacency = vec![Vec::new(); tree.len()];
        for (parent, child) in tree.edges() {
            adjacency[parent.0].push(child.0);
            adjacency[child.0].push(parent.0);
        }
        let mut seen = vec![false; tree.len()];
        let mut queue = VecDeque::from([0usize]);
        seen[0] = true;
        while let Some(current) = queue.pop_front() {
            for next in &adjacency[current] {
                if !seen[*next] {
                    seen[*next] = true;
                    queue.push_back(*next);
                }
            }
        }
        seen.into_iter().all(|visited| visited)
    }

    #[test]
    fn single_node_tree_is_origin_without_children() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let tree = create_node_tree(1, &mut rng);
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.nodes()[0].position, GridPos::ORIGIN);
        assert!(tree.nodes()[0].children.is_empty());
    }

    #[test]
    fn zero_count_yields_empty_tree() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!(create_node_tree(0, &mut rng).is_empty());
    }

    #[test]
    fn generated_trees_have_exact_count_unique_positions_and_are_connected() {
        for seed in 0..64u64 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let count = 1 + (seed as usize % 24);
            let tree = create_node_tree(count, &mut rng);

            assert_eq!(tree.len(), count, "seed={seed}");
            let unique: HashSet<GridPos> = tree.nodes().iter().map(|n| n.position).collect();
            assert_eq!(unique.len(), count, "duplicate positions for seed={seed}");
            assert!(is_connected(&tree), "disconnected tree for seed={seed}");
        }
    }

    #[test]
    fn every_node_after_the_root_links_to_an_adjacent_earlier_node() {
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        let tree = create_node_tree(32, &mut rng);
        assert!(tree.nodes()[0].children.is_empty());
        for (index, node) in tree.nodes().iter().enumerate().skip(1) {
            assert!(!node.children.is_empty(), "node {index} has no links");
            for child in &node.children {
                assert!(child.0 < index);
                let child_pos = tree.node(*child).expect("child").position;
                let manhattan =
                    (child_pos.x - node.position.x).abs() + (child_pos.y - node.position.y).abs();
                assert_eq!(manhattan, 1);
            }
        }
    }

    #[test]
    fn lowest_random_source_closes_frontier_in_insertion_order() {
        let mut rng = StepRng::new(0, 0);
        let tree = create_node_tree(3, &mut rng);
        let positions: Vec<GridPos> = tree.nodes().iter().map(|n| n.position).collect();
        assert_eq!(
            positions,
            vec![GridPos::new(0, 0), GridPos::new(-1, 0), GridPos::new(0, -1)]
        );
        assert_eq!(tree.nodes()[1].children, vec![NodeId(0)]);
        assert_eq!(tree.nodes()[2].children, vec![NodeId(0)]);
    }

    #[test]
    fn normalize_moves_minimum_to_zero() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut tree = create_node_tree(20, &mut rng);
        tree.normalize();
        let min_x = tree.nodes().iter().map(|n| n.position.x).min();
        let min_y = tree.nodes().iter().map(|n| n.position.y).min();
        assert_eq!(min_x, Some(0));
        assert_eq!(min_y, Some(0));
    }

    #[test]
    fn scale_and_translate_apply_to_every_node() {
        let mut rng = StepRng::new(0, 0);
        let mut tree = create_node_tree(3, &mut rng);
        tree.normalize();
        tree.scale(25);
        tree.translate(1, 1);
        let positions: Vec<GridPos> = tree.nodes().iter().map(|n| n.position).collect();
        assert_eq!(
            positions,
            vec![GridPos::new(26, 26), GridPos::new(1, 26), GridPos::new(26, 1)]
        );
    }

    #[test]
    fn map_nodes_replays_links_onto_mapped_values() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let tree = create_node_tree(10, &mut rng);
        let mapped: Vec<(GridPos, Vec<NodeId>)> =
            tree.map_nodes(|node| (node.position, Vec::new()), |value, child| value.1.push(child));
        for (node, value) in tree.nodes().iter().zip(&mapped) {
            assert_eq!(node.position, value.0);
            assert_eq!(node.children, value.1);
        }
    }
}
