use serde_json::Value;

use super::form_view::FormView;
use crate::base::dom::Dom;
use crate::base::query::Query;
use crate::base::view::View;
use crate::collaborators::{FormFields, ValidationCallback};

const NON_DATA_INPUTS: [&str; 4] = ["submit", "button", "reset", "image"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Checked(bool),
    Text(String),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text),
            FieldValue::Checked(_) => None,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Checked(checked) => Value::Bool(*checked),
            FieldValue::Text(text) => Value::String(text.clone()),
        }
    }
}

/// Value of a single control; checkboxes report the presence of `checked`.
pub fn read_field<D: Dom>(dom: &D, node: &D::Node) -> FieldValue {
    if dom.attr(node, "type").as_deref() == Some("checkbox") {
        FieldValue::Checked(dom.attr(node, "checked").is_some())
    } else {
        FieldValue::Text(dom.value(node))
    }
}

/// Whether a control contributes data when its form is serialized.
pub fn is_serializable<D: Dom>(dom: &D, node: &D::Node) -> bool {
    let kind = dom.attr(node, "type").unwrap_or_default().to_ascii_lowercase();
    !NON_DATA_INPUTS.contains(&kind.as_str())
}

/// Field name to value for every named control under `root`. The first
/// control of a name wins.
pub fn serialize_fields<D: Dom>(dom: &D, root: &D::Node) -> FormFields {
    let mut data = FormFields::new();
    for node in dom.query_all(root, &Query::AnyField) {
        if !is_serializable(dom, &node) {
            continue;
        }
        if let Some(name) = dom.attr(&node, "name") {
            if !data.contains_key(&name) {
                data.insert(name, read_field(dom, &node).to_json());
            }
        }
    }
    data
}

impl<D: Dom> FormView<D> {
    pub fn field(&self, name: &str) -> Vec<D::Node> {
        self.find(&Query::field(name))
    }

    /// `None` when the form has no such field.
    pub fn get(&self, name: &str) -> Option<FieldValue> {
        let node = self.field(name).into_iter().next()?;
        Some(read_field(self.dom(), &node))
    }

    pub fn set(&self, name: &str, value: &str) {
        for node in self.field(name) {
            self.dom().set_value(&node, value);
        }
    }

    pub fn placeholder(&self, name: &str, value: &str) {
        for node in self.field(name) {
            self.dom().set_attr(&node, "placeholder", value);
        }
    }

    /// Focus the field, except on mobile devices where it would pop up the
    /// on-screen keyboard.
    pub fn focus(&self, name: &str) {
        if self.options().is_mobile {
            return;
        }
        if let Some(node) = self.field(name).into_iter().next() {
            self.dom().focus(&node);
        }
    }

    /// Check a single field against its declared rules, printing failures.
    pub fn valid(&self, name: &str, callback: ValidationCallback) {
        self.valid_with(name, true, callback)
    }

    pub fn valid_with(&self, name: &str, print: bool, callback: ValidationCallback) {
        let collaborators = self.collaborators();
        let fields = self.field(name);
        let rules = collaborators.autovalidator.validators(&fields);
        let value = self.get(name);
        collaborators.validator.field(
            name,
            &rules,
            value.as_ref(),
            &self.el(),
            print,
            callback,
        );
    }

    pub fn reset(&self) {
        if let Some(form) = self.find_first(&Query::tag("form")) {
            self.dom().reset(&form);
        }
    }
}
