use std::collections::HashMap;

use crate::error::{PanelError, Result};

/// Adjustable inputs (sliders) that modifiers read from.
#[derive(Debug, Clone, Default)]
pub struct Controls {
    values: HashMap<String, f64>,
}

impl Controls {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn declare(&mut self, id: impl Into<String>, value: f64) {
        self.values.insert(id.into(), value);
    }

    pub fn contains(&self, id: &str) -> bool {
        self.values.contains_key(id)
    }

    pub fn value(&self, id: &str) -> Option<f64> {
        self.values.get(id).copied()
    }

    /// Only declared controls can be set.
    pub fn set(&mut self, id: &str, value: f64) -> Result<()> {
        match self.values.get_mut(id) {
            Some(v) => {
                *v = value;
                Ok(())
            }
            None => Err(PanelError::UnknownControl(id.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_requires_declaration() {
        let mut controls = Controls::new();
        assert!(matches!(controls.set("gain", 2.0), Err(PanelError::UnknownControl(_))));

        controls.declare("gain", 1.0);
        controls.set("gain", 2.0).unwrap();
        assert_eq!(controls.value("gain"), Some(2.0));
    }
}
