use std::collections::{HashSet, VecDeque};

use generational_arena::{Arena, Index};
use log::{debug, trace};

use crate::{
    cables::CableGraph,
    config::RELAXATION_FACTOR,
    controls::Controls,
    node::Node,
    signal::SignalMap,
};

/// How signals travel from power nodes across the cables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Propagation {
    /// Breadth-first from every power node at once; each node is fed once,
    /// by whichever source reaches it in the fewest hops.
    #[default]
    Flood,
    /// Fixed number of relaxation passes, `ceil(cables * 1.5)`. Every known
    /// signal is pushed across every cable touching it on every pass, so
    /// results on cyclic or multi-source wiring depend on scan order.
    Relaxation,
}

/// Read-only view of a panel for one propagation run.
pub struct Patch<'a> {
    pub nodes: &'a Arena<Node>,
    /// Declaration order of `nodes`.
    pub order: &'a [Index],
    pub cables: &'a CableGraph,
    pub controls: &'a Controls,
}

impl Patch<'_> {
    /// Starts from nothing but the power nodes' own signals.
    fn seed(&self) -> SignalMap {
        let mut signals = SignalMap::new();
        for &i in self.order {
            let node = &self.nodes[i];
            if node.kind().generates_signal() {
                signals.insert(i, node.kind().generated_signal());
            }
        }
        signals
    }

    pub fn propagate(&self, mode: Propagation) -> SignalMap {
        let signals = match mode {
            Propagation::Flood => self.flood(),
            Propagation::Relaxation => self.relax(),
        };
        debug!("propagated {:?}: {} of {} nodes carry a signal", mode, signals.len(), self.order.len());
        signals
    }

    fn flood(&self) -> SignalMap {
        let mut signals = self.seed();
        let mut visited: HashSet<Index> = signals.iter().map(|(i, _)| i).collect();
        let mut queue: VecDeque<Index> = signals.iter().map(|(i, _)| i).collect();

        while let Some(from) = queue.pop_front() {
            let outgoing = signals.signal(from).clone();
            for to in self.cables.neighbors(from) {
                if !visited.insert(to) {
                    continue;
                }
                let fed = self.nodes[to].kind().feed(outgoing.clone(), self.controls);
                trace!("{} -> {}: {:?}", self.nodes[from].id(), self.nodes[to].id(), fed);
                signals.insert(to, fed);
                queue.push_back(to);
            }
        }
        signals
    }

    fn relax(&self) -> SignalMap {
        let mut signals = self.seed();
        for _ in 0..relaxation_passes(self.cables.len()) {
            for (from, outgoing) in signals.snapshot() {
                for cable in self.cables.touching(from) {
                    let to = cable.other(from);
                    let fed = self.nodes[to].kind().feed(outgoing.clone(), self.controls);
                    signals.insert(to, fed);
                }
            }
        }
        signals
    }
}

/// Number of passes the relaxation loop makes over `cables` cables.
pub fn relaxation_passes(cables: usize) -> usize {
    (cables as f64 * RELAXATION_FACTOR).ceil() as usize
}
