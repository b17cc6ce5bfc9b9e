use generational_arena::Index;
use petgraph::graphmap::UnGraphMap;

/// An undirected connection between two nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cable {
    pub a: Index,
    pub b: Index,
    /// Created by selecting two nodes; removed when either end is reselected.
    pub mutable: bool,
    /// Reserved, always false.
    pub oneway: bool,
}

impl Cable {
    pub fn fixed(a: Index, b: Index) -> Self {
        Self { a, b, mutable: false, oneway: false }
    }

    pub fn transient(a: Index, b: Index) -> Self {
        Self { a, b, mutable: true, oneway: false }
    }

    pub fn touches(&self, node: Index) -> bool {
        self.a == node || self.b == node
    }

    /// The end opposite `node`. For a self-cable that is `node` again.
    pub fn other(&self, node: Index) -> Index {
        if self.b == node { self.a } else { self.b }
    }
}

/// Every cable on the panel.
///
/// The cable list is the source of truth and keeps duplicates. The graph
/// mirrors it for neighbor lookups, counting parallel cables in its edge
/// weight.
#[derive(Debug, Default)]
pub struct CableGraph {
    cables: Vec<Cable>,
    graph: UnGraphMap<Index, u32>,
}

impl CableGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, node: Index) {
        self.graph.add_node(node);
    }

    /// Permanent cables from `node` to each of its declared peers.
    pub fn add_fixed(&mut self, node: Index, peers: impl IntoIterator<Item = Index>) {
        for peer in peers {
            self.push(Cable::fixed(node, peer));
        }
    }

    pub fn add_transient(&mut self, a: Index, b: Index) {
        self.push(Cable::transient(a, b));
    }

    /// Drops every transient cable touching any of `nodes`, returns how many went.
    pub fn remove_transient_touching(&mut self, nodes: &[Index]) -> usize {
        let (gone, kept): (Vec<_>, Vec<_>) = self
            .cables
            .drain(..)
            .partition(|c| c.mutable && nodes.iter().any(|n| c.touches(*n)));
        self.cables = kept;
        for cable in &gone {
            self.unlink(cable.a, cable.b);
        }
        gone.len()
    }

    fn push(&mut self, cable: Cable) {
        match self.graph.edge_weight_mut(cable.a, cable.b) {
            Some(count) => *count += 1,
            None => {
                self.graph.add_edge(cable.a, cable.b, 1);
            }
        }
        self.cables.push(cable);
    }

    fn unlink(&mut self, a: Index, b: Index) {
        let last = match self.graph.edge_weight_mut(a, b) {
            Some(count) => {
                *count -= 1;
                *count == 0
            }
            None => false,
        };
        if last {
            self.graph.remove_edge(a, b);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Cable> {
        self.cables.iter()
    }

    /// Cables with `node` at either end, in creation order.
    pub fn touching(&self, node: Index) -> impl Iterator<Item = &Cable> {
        self.cables.iter().filter(move |c| c.touches(node))
    }

    /// Distinct neighbors of `node`.
    pub fn neighbors(&self, node: Index) -> impl Iterator<Item = Index> + '_ {
        self.graph.neighbors(node)
    }

    pub fn connected(&self, a: Index, b: Index) -> bool {
        self.graph.contains_edge(a, b)
    }

    pub fn len(&self) -> usize {
        self.cables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cables.is_empty()
    }

    pub fn transient_count(&self) -> usize {
        self.cables.iter().filter(|c| c.mutable).count()
    }
}
