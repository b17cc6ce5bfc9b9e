use std::collections::{BTreeMap, HashMap};

use generational_arena::{Arena, Index};
use log::{debug, warn};

use crate::{
    cables::{Cable, CableGraph},
    config::PanelConfig,
    controls::Controls,
    engine::Patch,
    error::{PanelError, Result},
    markup::PanelDecl,
    node::{Kind, Node},
    render::{draw_cable, draw_display, Rect, Recording, Scene, Surface},
    signal::{Signal, SignalMap},
};

/// What a click did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interaction {
    /// The node is disabled.
    Ignored,
    Selected,
    Deselected,
    /// Two selected nodes were joined by a new transient cable.
    Connected(String, String),
}

/// The whole simulation: nodes, cables, controls and the latest signals.
///
/// Nodes are fixed at load time; only their selection, the transient cables,
/// the controls and the signals change afterwards.
#[derive(Debug)]
pub struct Panel {
    nodes: Arena<Node>,
    order: Vec<Index>,
    ids: HashMap<String, Index>,
    cables: CableGraph,
    controls: Controls,
    canvases: BTreeMap<String, Rect>,
    stage: Rect,
    signals: SignalMap,
    config: PanelConfig,
}

impl Panel {
    pub fn load(decl: PanelDecl, config: PanelConfig) -> Result<Self> {
        let mut controls = Controls::new();
        for (id, value) in decl.controls {
            controls.declare(id, value);
        }
        let canvases: BTreeMap<_, _> = decl.canvases.into_iter().collect();

        let nodes = decl
            .nodes
            .iter()
            .map(Node::from_attributes)
            .collect::<Result<Vec<_>>>()?;
        let mut panel = Self::with_nodes(nodes, controls, canvases, config)?;
        if let Some(stage) = decl.stage {
            panel.stage = stage;
        }
        panel.propagate();
        Ok(panel)
    }

    /// Loads markup straight away, see [`crate::markup`].
    pub fn from_markup(markup: &str, config: PanelConfig) -> Result<Self> {
        Self::load(crate::markup::parse(markup)?, config)
    }

    fn with_nodes(
        nodes: Vec<Node>,
        controls: Controls,
        canvases: BTreeMap<String, Rect>,
        config: PanelConfig,
    ) -> Result<Self> {
        let mut panel = Self {
            nodes: Arena::with_capacity(nodes.len()),
            order: Vec::with_capacity(nodes.len()),
            ids: HashMap::with_capacity(nodes.len()),
            cables: CableGraph::new(),
            controls,
            canvases,
            stage: Rect::sized(config.stage_size.0, config.stage_size.1),
            signals: SignalMap::new(),
            config,
        };

        for node in nodes {
            match node.kind() {
                Kind::Modifier(m) if !panel.controls.contains(&m.control) => {
                    return Err(PanelError::UnknownControl(m.control.clone()));
                }
                Kind::Display(d) if !panel.canvases.contains_key(&d.canvas) => {
                    return Err(PanelError::UnknownCanvas(d.canvas.clone()));
                }
                _ => {}
            }
            if panel.ids.contains_key(node.id()) {
                return Err(PanelError::DuplicateNode(node.id().to_owned()));
            }
            let id = node.id().to_owned();
            let i = panel.nodes.insert(node);
            panel.ids.insert(id, i);
            panel.order.push(i);
            panel.cables.add_node(i);
        }

        for &i in &panel.order {
            let node = &panel.nodes[i];
            let peers = node
                .peers()
                .iter()
                .map(|peer| {
                    panel.ids.get(peer).copied().ok_or_else(|| PanelError::UnknownPeer {
                        node: node.id().to_owned(),
                        peer: peer.clone(),
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            panel.cables.add_fixed(i, peers);
        }
        debug!("loaded {} nodes and {} cables", panel.order.len(), panel.cables.len());
        Ok(panel)
    }

    fn index(&self, id: &str) -> Result<Index> {
        self.ids.get(id).copied().ok_or_else(|| PanelError::UnknownNode(id.to_owned()))
    }

    /// Recomputes every signal from the power nodes outward.
    pub fn propagate(&mut self) {
        let patch = Patch {
            nodes: &self.nodes,
            order: &self.order,
            cables: &self.cables,
            controls: &self.controls,
        };
        self.signals = patch.propagate(self.config.propagation);
    }

    /// Toggles a node's selection and rewires transient cables accordingly.
    pub fn click(&mut self, id: &str) -> Result<Interaction> {
        let i = self.index(id)?;
        let node = &mut self.nodes[i];
        if node.is_disabled() {
            debug!("ignoring click on disabled node {}", id);
            return Ok(Interaction::Ignored);
        }
        let selected = !node.is_selected();
        node.set_selected(selected);

        let outcome = self.rewire().unwrap_or(if selected {
            Interaction::Selected
        } else {
            Interaction::Deselected
        });
        debug!("click on {}: {:?}", id, outcome);
        self.propagate();
        Ok(outcome)
    }

    fn rewire(&mut self) -> Option<Interaction> {
        let selected = self.selected_indices();
        let dropped = self.cables.remove_transient_touching(&selected);
        if dropped > 0 {
            debug!("removed {} transient cable(s)", dropped);
        }
        match selected[..] {
            [a, b, ..] => {
                self.cables.add_transient(a, b);
                self.nodes[a].set_selected(false);
                self.nodes[b].set_selected(false);
                Some(Interaction::Connected(
                    self.nodes[a].id().to_owned(),
                    self.nodes[b].id().to_owned(),
                ))
            }
            _ => None,
        }
    }

    /// Moves a control and recomputes the signals that depend on it.
    pub fn set_control(&mut self, id: &str, value: f64) -> Result<()> {
        self.controls.set(id, value)?;
        self.propagate();
        Ok(())
    }

    fn selected_indices(&self) -> Vec<Index> {
        self.order.iter().copied().filter(|i| self.nodes[*i].is_selected()).collect()
    }

    pub fn selected(&self) -> Vec<&str> {
        self.selected_indices().into_iter().map(|i| self.nodes[i].id()).collect()
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.ids.get(id).map(|i| &self.nodes[*i])
    }

    /// Nodes in declaration order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.order.iter().map(move |i| &self.nodes[*i])
    }

    /// Cables as `(a, b, mutable)` node id triples, in creation order.
    pub fn cables(&self) -> impl Iterator<Item = (&str, &str, bool)> {
        self.cables
            .iter()
            .map(move |c: &Cable| (self.nodes[c.a].id(), self.nodes[c.b].id(), c.mutable))
    }

    pub fn cable_count(&self) -> usize {
        self.cables.len()
    }

    pub fn transient_count(&self) -> usize {
        self.cables.transient_count()
    }

    /// Current signal at a node; unknown nodes and silent ones read empty.
    pub fn signal(&self, id: &str) -> &Signal {
        match self.ids.get(id) {
            Some(i) => self.signals.signal(*i),
            None => Signal::empty(),
        }
    }

    pub fn control(&self, id: &str) -> Option<f64> {
        self.controls.value(id)
    }

    /// Headless surfaces sized like the declared canvases.
    pub fn scene(&self) -> Scene<Recording> {
        let mut scene = Scene::new(Recording::new(self.stage.width, self.stage.height));
        for (id, rect) in &self.canvases {
            scene.attach(id.clone(), Recording::new(rect.width, rect.height));
        }
        scene
    }

    /// Redraws node classes, display canvases and the cable stage.
    pub fn render<S: Surface>(&self, scene: &mut Scene<S>) {
        for node in self.nodes() {
            let signal = self.signal(node.id());
            scene.classes.insert(node.id().to_owned(), node.class_name(signal));
            if let Kind::Display(display) = node.kind() {
                match scene.canvases.get_mut(&display.canvas) {
                    Some(surface) => draw_display(surface, signal),
                    None => warn!("no surface attached for canvas {}", display.canvas),
                }
            }
        }

        scene.stage.clear();
        for cable in self.cables.iter() {
            let (a, b) = (self.nodes[cable.a].rect(), self.nodes[cable.b].rect());
            draw_cable(&mut scene.stage, self.stage, a, b, cable.mutable);
        }
    }
}
