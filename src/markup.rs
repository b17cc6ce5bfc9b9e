//! Reading a panel out of XHTML-style markup.
//!
//! Any element whose `class` contains `node` declares a node; its attributes
//! are kept verbatim for [`Node::from_attributes`](crate::node::Node::from_attributes).
//! `<canvas>` elements declare drawing surfaces, the one with id `canvas`
//! being the stage cables are drawn on. `<input type="range">` elements
//! declare the controls modifiers read.

use std::collections::BTreeMap;

use quick_xml::{
    events::{BytesStart, Event},
    Reader,
};

use crate::{
    config::{DEFAULT_CANVAS_SIZE, DEFAULT_CONTROL_VALUE, MAX_CANVAS_SIZE, STAGE_CANVAS_ID},
    error::{PanelError, Result},
    render::Rect,
};

/// Attributes of one element, by name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attributes(BTreeMap<String, String>);

impl Attributes {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Presence flag, regardless of value.
    pub fn has(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn number(&self, name: &str, default: f64) -> Result<f64> {
        match self.get(name).map(str::trim) {
            None | Some("") => Ok(default),
            Some(raw) => raw.parse().map_err(|_| PanelError::InvalidNumber {
                attribute: name.to_owned(),
                value: raw.to_owned(),
            }),
        }
    }

    /// A canvas side: whole pixels, at most `MAX_CANVAS_SIZE`.
    pub fn dimension(&self, name: &str, default: f64) -> Result<f64> {
        match self.get(name).map(str::trim) {
            None | Some("") => Ok(default),
            Some(raw) => match raw.parse::<u32>() {
                Ok(px) if px <= MAX_CANVAS_SIZE => Ok(f64::from(px)),
                _ => Err(PanelError::InvalidNumber {
                    attribute: name.to_owned(),
                    value: raw.to_owned(),
                }),
            },
        }
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    fn has_class(&self, class: &str) -> bool {
        self.get("class")
            .map_or(false, |c| c.split_whitespace().any(|t| t == class))
    }

    pub(crate) fn rect(&self, default: (f64, f64)) -> Result<Rect> {
        Ok(Rect {
            left: self.number("left", 0.0)?,
            top: self.number("top", 0.0)?,
            width: self.number("width", default.0)?,
            height: self.number("height", default.1)?,
        })
    }
}

impl FromIterator<(String, String)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Declarative description of a whole panel.
#[derive(Debug, Clone, Default)]
pub struct PanelDecl {
    pub nodes: Vec<Attributes>,
    /// Range controls and their initial value.
    pub controls: Vec<(String, f64)>,
    /// Display canvases and their boxes, stage excluded.
    pub canvases: Vec<(String, Rect)>,
    pub stage: Option<Rect>,
}

impl PanelDecl {
    pub fn node(mut self, attrs: &[(&str, &str)]) -> Self {
        self.nodes
            .push(attrs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect());
        self
    }

    pub fn control(mut self, id: &str, value: f64) -> Self {
        self.controls.push((id.to_owned(), value));
        self
    }

    pub fn canvas(mut self, id: &str, width: f64, height: f64) -> Self {
        self.canvases.push((id.to_owned(), Rect::sized(width, height)));
        self
    }
}

fn attributes(element: &BytesStart) -> Result<Attributes> {
    let mut attrs = Attributes::default();
    for attr in element.attributes() {
        let attr = attr.map_err(quick_xml::Error::InvalidAttr)?;
        let name = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value()?.into_owned();
        attrs.insert(name, value);
    }
    Ok(attrs)
}

pub fn parse(markup: &str) -> Result<PanelDecl> {
    let mut reader = Reader::from_str(markup);
    let mut decl = PanelDecl::default();

    loop {
        let element = match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) => e,
            Event::Eof => break,
            _ => continue,
        };
        let attrs = attributes(&element)?;
        let tag = element.local_name();

        if attrs.has_class("node") {
            decl.nodes.push(attrs);
        } else if tag.as_ref() == b"canvas" {
            let id = attrs.get("id").unwrap_or_default().to_owned();
            let rect = Rect {
                width: attrs.dimension("width", DEFAULT_CANVAS_SIZE.0)?,
                height: attrs.dimension("height", DEFAULT_CANVAS_SIZE.1)?,
                ..attrs.rect(DEFAULT_CANVAS_SIZE)?
            };
            if id == STAGE_CANVAS_ID {
                decl.stage = Some(rect);
            } else if !id.is_empty() {
                decl.canvases.push((id, rect));
            }
        } else if tag.as_ref() == b"input" && attrs.get("type") == Some("range") {
            if let Some(id) = attrs.get("id") {
                let value = attrs.number("value", DEFAULT_CONTROL_VALUE)?;
                decl.controls.push((id.to_owned(), value));
            }
        }
    }
    Ok(decl)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PANEL: &str = r#"
        <body>
          <canvas id="canvas" width="800" height="600" left="5" top="6"></canvas>
          <div class="row">
            <div class="node" id="p" type="power" connectedWith="s"></div>
            <div class="node big" id="s" type="sin" left="100"/>
            <div class="node" id="d" type="display" canvasId="scope" disabled=""></div>
            <div class="label">not a node</div>
          </div>
          <canvas id="scope" width="200" height="100"/>
          <input type="range" id="gain" value="2"/>
          <input type="range" id="other"/>
          <input type="text" id="name"/>
        </body>
    "#;

    #[test]
    fn collects_nodes_canvases_and_controls() {
        let decl = parse(PANEL).unwrap();

        let ids: Vec<_> = decl.nodes.iter().map(|a| a.get("id").unwrap()).collect();
        assert_eq!(ids, vec!["p", "s", "d"]);
        assert_eq!(decl.nodes[0].get("connectedWith"), Some("s"));
        assert!(decl.nodes[2].has("disabled"));

        assert_eq!(decl.stage, Some(Rect { left: 5.0, top: 6.0, width: 800.0, height: 600.0 }));
        assert_eq!(decl.canvases, vec![("scope".to_owned(), Rect::sized(200.0, 100.0))]);
        assert_eq!(
            decl.controls,
            vec![("gain".to_owned(), 2.0), ("other".to_owned(), DEFAULT_CONTROL_VALUE)]
        );
    }

    #[test]
    fn unescapes_attribute_values() {
        let decl = parse(r#"<div class="node" id="a&amp;b"/>"#).unwrap();
        assert_eq!(decl.nodes[0].get("id"), Some("a&b"));
    }

    #[test]
    fn rejects_malformed_markup() {
        assert!(matches!(parse(r#"<div class="node" id="a></div>"#), Err(PanelError::Markup(_))));
    }

    #[test]
    fn bad_numbers_are_reported() {
        let err = parse(r#"<canvas id="scope" width="wide"/>"#).unwrap_err();
        assert!(matches!(err, PanelError::InvalidNumber { ref attribute, .. } if attribute == "width"));
    }

    #[test]
    fn canvas_sides_must_be_whole_pixels() {
        for width in ["inf", "-1", "1e12", "NaN", "2.5", "40000"] {
            let markup = format!(r#"<canvas id="scope" width="{}"/>"#, width);
            let err = parse(&markup).unwrap_err();
            assert!(matches!(err, PanelError::InvalidNumber { ref value, .. } if value == width));
        }
        let err = parse(r#"<canvas id="canvas" height="inf"/>"#).unwrap_err();
        assert!(matches!(err, PanelError::InvalidNumber { ref attribute, .. } if attribute == "height"));

        let decl = parse(r#"<canvas id="scope" width="0" height="32767"/>"#).unwrap();
        assert_eq!(decl.canvases[0].1, Rect::sized(0.0, 32767.0));
    }
}
