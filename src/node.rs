use crate::{
    config::{DEFAULT_NODE_SIZE, SINE_AMPLITUDE, SINE_FREQUENCY, SINE_OFFSET},
    controls::Controls,
    error::{PanelError, Result},
    markup::Attributes,
    render::Rect,
    signal::{fields, Signal, Value},
};

/// Parameters of the waveform a sine node emits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Waveform {
    pub frequency: f64,
    pub offset: f64,
    pub amplitude: f64,
}

impl Default for Waveform {
    fn default() -> Self {
        Self {
            frequency: SINE_FREQUENCY,
            offset: SINE_OFFSET,
            amplitude: SINE_AMPLITUDE,
        }
    }
}

impl Waveform {
    pub fn signal(&self) -> Signal {
        Signal::active()
            .with(fields::SIN_FREQUENCY, self.frequency)
            .with(fields::SIN_OFFSET, self.offset)
            .with(fields::SIN_AMPLITUDE, self.amplitude)
            .with(fields::SIN, true)
    }

    pub fn sample(&self, x: f64) -> f64 {
        (x * self.frequency + self.offset).sin() * self.amplitude
    }

    /// Reads the waveform back out of a signal. `None` unless all three
    /// parameters are present.
    pub fn from_signal(signal: &Signal) -> Option<Self> {
        Some(Self {
            frequency: signal.number(fields::SIN_FREQUENCY)?,
            offset: signal.number(fields::SIN_OFFSET)?,
            amplitude: signal.number(fields::SIN_AMPLITUDE)?,
        })
    }
}

/// Scales one field of the passing signal by a control's value.
#[derive(Debug, Clone, PartialEq)]
pub struct Modifier {
    pub field: String,
    pub control: String,
}

impl Modifier {
    fn feed(&self, mut signal: Signal, controls: &Controls) -> Signal {
        // The control may have moved since the last pass; never cache it.
        let factor = controls.value(&self.control).unwrap_or(1.0);
        if let Some(value) = signal.get_mut(&self.field) {
            if value.is_truthy() {
                *value = Value::Number(value.as_f64() * factor);
            }
        }
        signal
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Display {
    pub canvas: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Kind {
    Plain,
    Power,
    Lamp,
    Sine(Waveform),
    Modifier(Modifier),
    Display(Display),
}

impl Kind {
    fn from_attributes(id: &str, attrs: &Attributes) -> Result<Self> {
        let required = |attribute: &'static str| {
            attrs
                .get(attribute)
                .map(str::to_owned)
                .ok_or_else(|| PanelError::MissingAttribute { id: id.to_owned(), attribute })
        };
        Ok(match attrs.get("type").unwrap_or("") {
            "" | "node" | "plain" => Kind::Plain,
            "power" => Kind::Power,
            "light" => Kind::Lamp,
            "sin" => Kind::Sine(Waveform::default()),
            "modify" => Kind::Modifier(Modifier {
                field: required("modifySignalValue")?,
                control: required("sliderId")?,
            }),
            "display" => Kind::Display(Display { canvas: required("canvasId")? }),
            other => {
                return Err(PanelError::UnknownKind {
                    id: id.to_owned(),
                    kind: other.to_owned(),
                })
            }
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            Kind::Plain => "node",
            Kind::Power => "power",
            Kind::Lamp => "light",
            Kind::Sine(_) => "sin",
            Kind::Modifier(_) => "modify",
            Kind::Display(_) => "display",
        }
    }

    pub fn generates_signal(&self) -> bool {
        matches!(self, Kind::Power)
    }

    pub fn generated_signal(&self) -> Signal {
        match self {
            Kind::Power => Signal::active(),
            _ => Signal::new(),
        }
    }

    /// Turns an incoming signal into the one this node passes on.
    pub fn feed(&self, input: Signal, controls: &Controls) -> Signal {
        match self {
            Kind::Plain | Kind::Lamp | Kind::Display(_) => input,
            Kind::Power => self.generated_signal(),
            Kind::Sine(waveform) if input.is_active() => waveform.signal(),
            Kind::Sine(_) => input,
            Kind::Modifier(m) => m.feed(input, controls),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Node {
    id: String,
    kind: Kind,
    selected: bool,
    disabled: bool,
    peers: Vec<String>,
    rect: Rect,
}

impl Node {
    pub fn new(id: impl Into<String>, kind: Kind) -> Self {
        Self {
            id: id.into(),
            kind,
            selected: false,
            disabled: false,
            peers: Vec::new(),
            rect: Rect::sized(DEFAULT_NODE_SIZE.0, DEFAULT_NODE_SIZE.1),
        }
    }

    /// Builds a node from the attributes of its element.
    pub fn from_attributes(attrs: &Attributes) -> Result<Self> {
        let id = match attrs.get("id") {
            Some(id) if !id.is_empty() => id.to_owned(),
            _ => return Err(PanelError::MissingId),
        };
        let kind = Kind::from_attributes(&id, attrs)?;
        let peers = attrs
            .get("connectedWith")
            .map(|list| {
                list.split(',')
                    .map(str::trim)
                    .filter(|p| !p.is_empty())
                    .map(str::to_owned)
                    .collect()
            })
            .unwrap_or_default();
        let rect = attrs.rect(DEFAULT_NODE_SIZE)?;

        Ok(Self {
            id,
            kind,
            selected: false,
            disabled: attrs.has("disabled"),
            peers,
            rect,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> &Kind {
        &self.kind
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub(crate) fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn peers(&self) -> &[String] {
        &self.peers
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Visual classes for the node given its current signal.
    pub fn classes(&self, signal: &Signal) -> Vec<&'static str> {
        let mut classes = vec!["node"];
        if self.selected {
            classes.push("selected");
        }
        match self.kind {
            Kind::Power => classes.push("power"),
            Kind::Lamp => {
                classes.push("light");
                if signal.is_active() {
                    classes.push("lightActive");
                }
            }
            _ => {}
        }
        classes
    }

    pub fn class_name(&self, signal: &Signal) -> String {
        self.classes(signal).join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs(pairs: &[(&str, &str)]) -> Attributes {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    fn gain(value: f64) -> Controls {
        let mut controls = Controls::new();
        controls.declare("gain", value);
        controls
    }

    #[test]
    fn type_attribute_selects_kind() {
        let cases = [
            ("", "node"),
            ("node", "node"),
            ("power", "power"),
            ("light", "light"),
            ("sin", "sin"),
        ];
        for (ty, name) in cases {
            let node = Node::from_attributes(&attrs(&[("id", "n"), ("type", ty)])).unwrap();
            assert_eq!(node.kind().name(), name);
        }
        let node = Node::from_attributes(&attrs(&[("id", "n")])).unwrap();
        assert_eq!(node.kind(), &Kind::Plain);
    }

    #[test]
    fn unknown_type_is_rejected() {
        let err = Node::from_attributes(&attrs(&[("id", "n"), ("type", "laser")])).unwrap_err();
        assert!(matches!(err, PanelError::UnknownKind { ref kind, .. } if kind == "laser"));
    }

    #[test]
    fn modifier_needs_its_attributes() {
        let err = Node::from_attributes(&attrs(&[("id", "m"), ("type", "modify"), ("sliderId", "gain")]))
            .unwrap_err();
        assert!(matches!(err, PanelError::MissingAttribute { attribute: "modifySignalValue", .. }));

        let err = Node::from_attributes(&attrs(&[("id", "d"), ("type", "display")])).unwrap_err();
        assert!(matches!(err, PanelError::MissingAttribute { attribute: "canvasId", .. }));
    }

    #[test]
    fn peers_and_flags_are_parsed() {
        let node = Node::from_attributes(&attrs(&[
            ("id", "a"),
            ("connectedWith", "b, c,,d"),
            ("disabled", ""),
            ("left", "10"),
            ("width", "20"),
        ]))
        .unwrap();
        assert_eq!(node.peers(), &["b", "c", "d"]);
        assert!(node.is_disabled());
        assert_eq!(node.rect().left, 10.0);
        assert_eq!(node.rect().width, 20.0);
        assert_eq!(node.rect().height, DEFAULT_NODE_SIZE.1);
    }

    #[test]
    fn power_always_generates() {
        let controls = Controls::new();
        assert!(Kind::Power.generates_signal());
        assert_eq!(Kind::Power.generated_signal(), Signal::active());
        let fed = Kind::Power.feed(Signal::new().with(fields::ACTIVE, false), &controls);
        assert_eq!(fed, Signal::active());
    }

    #[test]
    fn only_power_generates() {
        for kind in [Kind::Plain, Kind::Lamp, Kind::Sine(Waveform::default())] {
            assert!(!kind.generates_signal());
            assert!(kind.generated_signal().is_empty());
        }
    }

    #[test]
    fn sine_replaces_active_and_passes_inactive() {
        let controls = Controls::new();
        let sine = Kind::Sine(Waveform::default());

        let out = sine.feed(Signal::active(), &controls);
        assert!(out.is_sin());
        assert_eq!(out.number(fields::SIN_AMPLITUDE), Some(SINE_AMPLITUDE));

        let idle = Signal::new().with("level", 3.0);
        assert_eq!(sine.feed(idle.clone(), &controls), idle);
    }

    #[test]
    fn modifier_scales_truthy_field() {
        let kind = Kind::Modifier(Modifier { field: "sinAmplitude".into(), control: "gain".into() });
        let input = Waveform::default().signal();
        let out = kind.feed(input.clone(), &gain(2.0));
        assert_eq!(out.number(fields::SIN_AMPLITUDE), Some(100.0));
        assert_eq!(input.number(fields::SIN_AMPLITUDE), Some(50.0));
    }

    #[test]
    fn modifier_leaves_missing_or_falsy_field() {
        let kind = Kind::Modifier(Modifier { field: "sinAmplitude".into(), control: "gain".into() });
        let absent = Signal::active();
        assert_eq!(kind.feed(absent.clone(), &gain(2.0)), absent);
        let zero = Signal::active().with(fields::SIN_AMPLITUDE, 0.0);
        assert_eq!(kind.feed(zero.clone(), &gain(2.0)), zero);
    }

    #[test]
    fn lamp_classes_follow_signal() {
        let mut lamp = Node::new("l", Kind::Lamp);
        assert_eq!(lamp.class_name(&Signal::new()), "node light");
        lamp.set_selected(true);
        assert_eq!(lamp.class_name(&Signal::active()), "node selected light lightActive");
    }

    #[test]
    fn power_classes() {
        let power = Node::new("p", Kind::Power);
        assert_eq!(power.classes(&Signal::new()), vec!["node", "power"]);
    }
}
