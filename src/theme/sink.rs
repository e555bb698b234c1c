use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

/// Receiver of theme broadcasts (the document root in a browser).
///
/// There is one writer, the theme controller; consumers read whatever was
/// written last.
pub trait ThemeSink {
    fn set_property(&mut self, name: &str, value: &str);

    fn set_attribute(&mut self, _name: &str, _value: &str) {}
}

/// In-memory document root: custom properties plus root attributes.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct CssVariables {
    properties: BTreeMap<String, String>,
    attributes: BTreeMap<String, String>,
    writes: u64,
}

impl CssVariables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.properties.get(name).map(String::as_str)
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn properties(&self) -> &BTreeMap<String, String> {
        &self.properties
    }

    /// Number of property writes seen so far.
    pub fn writes(&self) -> u64 {
        self.writes
    }
}

impl ThemeSink for CssVariables {
    fn set_property(&mut self, name: &str, value: &str) {
        self.writes += 1;
        self.properties.insert(name.to_string(), value.to_string());
    }

    fn set_attribute(&mut self, name: &str, value: &str) {
        self.attributes.insert(name.to_string(), value.to_string());
    }
}

impl<T: ThemeSink> ThemeSink for Rc<RefCell<T>> {
    fn set_property(&mut self, name: &str, value: &str) {
        self.borrow_mut().set_property(name, value);
    }

    fn set_attribute(&mut self, name: &str, value: &str) {
        self.borrow_mut().set_attribute(name, value);
    }
}

/// Discards everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl ThemeSink for NullSink {
    fn set_property(&mut self, _name: &str, _value: &str) {}
}
