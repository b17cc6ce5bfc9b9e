use crossbeam_channel::{unbounded, Receiver, Sender};
use log::{debug, warn};

use crate::{
    error::Result,
    panel::{Interaction, Panel},
    render::{Scene, Surface},
};

/// Something the user did to the panel.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelEvent {
    Click(String),
    /// A control was released at a new value.
    ControlChanged { id: String, value: f64 },
    /// A control is being dragged.
    ControlInput { id: String, value: f64 },
}

/// Cloneable handle element callbacks post events through.
#[derive(Debug, Clone)]
pub struct EventSender(Sender<PanelEvent>);

impl EventSender {
    pub fn click(&self, id: impl Into<String>) {
        self.send(PanelEvent::Click(id.into()));
    }

    pub fn control_changed(&self, id: impl Into<String>, value: f64) {
        self.send(PanelEvent::ControlChanged { id: id.into(), value });
    }

    pub fn control_input(&self, id: impl Into<String>, value: f64) {
        self.send(PanelEvent::ControlInput { id: id.into(), value });
    }

    pub fn send(&self, event: PanelEvent) {
        // The session owns the receiver; once it is gone nobody is listening.
        if self.0.send(event).is_err() {
            warn!("event dropped, session has ended");
        }
    }
}

/// A panel wired to its scene and an event queue.
///
/// Events run one at a time, in the order they were posted, and every event
/// ends with a fresh render.
#[derive(Debug)]
pub struct Session<S> {
    panel: Panel,
    scene: Scene<S>,
    events: Receiver<PanelEvent>,
    sender: Sender<PanelEvent>,
}

impl<S: Surface> Session<S> {
    pub fn new(panel: Panel, scene: Scene<S>) -> Self {
        let (sender, events) = unbounded();
        let mut session = Self { panel, scene, events, sender };
        session.panel.render(&mut session.scene);
        session
    }

    pub fn sender(&self) -> EventSender {
        EventSender(self.sender.clone())
    }

    /// Handles one event and redraws.
    pub fn dispatch(&mut self, event: PanelEvent) -> Result<Option<Interaction>> {
        debug!("dispatching {:?}", event);
        let outcome = match event {
            PanelEvent::Click(id) => Some(self.panel.click(&id)?),
            PanelEvent::ControlChanged { id, value } | PanelEvent::ControlInput { id, value } => {
                self.panel.set_control(&id, value)?;
                None
            }
        };
        self.panel.render(&mut self.scene);
        Ok(outcome)
    }

    /// Drains every queued event, stopping at the first one that fails.
    /// Returns how many were handled.
    pub fn pump(&mut self) -> Result<usize> {
        let mut handled = 0;
        while let Ok(event) = self.events.try_recv() {
            self.dispatch(event)?;
            handled += 1;
        }
        Ok(handled)
    }

    pub fn panel(&self) -> &Panel {
        &self.panel
    }

    pub fn scene(&self) -> &Scene<S> {
        &self.scene
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::PanelConfig, markup::PanelDecl, render::Recording};

    fn session() -> Session<Recording> {
        let decl = PanelDecl::default()
            .control("gain", 1.0)
            .node(&[("id", "p"), ("type", "power")])
            .node(&[("id", "s"), ("type", "sin"), ("connectedWith", "p")])
            .node(&[
                ("id", "m"),
                ("type", "modify"),
                ("modifySignalValue", "sinAmplitude"),
                ("sliderId", "gain"),
            ]);
        let panel = Panel::load(decl, PanelConfig::default()).unwrap();
        let scene = panel.scene();
        Session::new(panel, scene)
    }

    #[test]
    fn new_session_renders_once() {
        let s = session();
        assert_eq!(s.scene().class_of("p"), Some("node power"));
        assert_eq!(s.scene().stage.visible().len(), 1);
    }

    #[test]
    fn events_are_handled_in_order() {
        let mut s = session();
        let tx = s.sender();
        tx.click("s");
        tx.control_input("gain", 3.0);
        tx.control_changed("gain", 2.0);
        tx.click("m");

        assert_eq!(s.pump().unwrap(), 4);
        assert_eq!(s.panel().control("gain"), Some(2.0));
        assert_eq!(s.panel().transient_count(), 1);
        assert_eq!(s.panel().signal("m").number("sinAmplitude"), Some(100.0));
        assert_eq!(s.scene().stage.visible().len(), 2);
        assert_eq!(s.pump().unwrap(), 0);
    }

    #[test]
    fn failing_event_stops_the_pump() {
        let mut s = session();
        let tx = s.sender();
        tx.click("ghost");
        tx.click("p");
        assert!(s.pump().is_err());
        assert_eq!(s.pump().unwrap(), 1);
    }
}
