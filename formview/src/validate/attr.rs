use std::collections::HashSet;
use std::rc::Rc;

use regex::Regex;

use super::rules::{email_regex, FieldRules};
use crate::base::dom::Dom;
use crate::base::query::Query;
use crate::base::translate::Translator;
use crate::collaborators::{
    AutoValidator, FormFields, ValidationCallback, Validator,
};
use crate::form::{is_serializable, read_field, FieldValue};
use crate::FormError;

/// Attribute holding a field's declared rules, e.g. `validate="required email"`.
pub const VALIDATE_ATTR: &str = "validate";
const ERROR_FOR_ATTR: &str = "data-error-for";
const CONTROL_TAGS: [&str; 4] = ["input", "textarea", "select", "button"];

/// Checks fields against the rules declared in their markup and prints
/// failures into `<span class="field-error">` siblings.
pub struct AttrValidator<D: Dom> {
    dom: Rc<D>,
    translator: Rc<dyn Translator>,
    email: Regex,
}

impl<D: Dom> AttrValidator<D> {
    pub fn new(dom: Rc<D>, translator: Rc<dyn Translator>) -> Result<Self, FormError> {
        Ok(Self {
            dom,
            translator,
            email: email_regex()?,
        })
    }

    pub fn check(&self, rules: &FieldRules, value: Option<&FieldValue>) -> Vec<String> {
        rules.check(value, &self.email, self.translator.as_ref())
    }

    /// Replace any printed errors of field `name` with `errors`.
    pub fn print(&self, root: &D::Node, name: &str, errors: &[String]) {
        let dom = self.dom.as_ref();
        for stale in dom.query_all(root, &Query::attr_value("span", ERROR_FOR_ATTR, name)) {
            dom.discard(&stale);
        }
        let fields = dom.query_all(root, &Query::field(name));
        for field in &fields {
            if errors.is_empty() {
                dom.remove_class(field, "invalid");
            } else {
                dom.add_class(field, "invalid");
            }
        }
        if errors.is_empty() {
            return;
        }
        let span = match dom.create_element("span") {
            Ok(span) => span,
            Err(err) => {
                log::error!("Cannot print errors for {}: {}", name, err);
                return;
            }
        };
        dom.add_class(&span, "field-error");
        dom.set_attr(&span, ERROR_FOR_ATTR, name);
        dom.set_text(&span, &errors.join(" "));
        let parent = fields
            .first()
            .and_then(|field| dom.parent(field))
            .unwrap_or_else(|| root.clone());
        dom.append(&parent, &span);
    }
}

impl<D: Dom> Validator<D::Node> for AttrValidator<D> {
    fn disable(&self, root: &D::Node) {
        for tag in CONTROL_TAGS {
            for node in self.dom.query_all(root, &Query::tag(tag)) {
                self.dom.set_attr(&node, "disabled", "");
            }
        }
    }

    fn enable(&self, root: &D::Node) {
        for tag in CONTROL_TAGS {
            for node in self.dom.query_all(root, &Query::tag(tag)) {
                self.dom.remove_attr(&node, "disabled");
            }
        }
    }

    fn field(
        &self,
        name: &str,
        rules: &FieldRules,
        value: Option<&FieldValue>,
        root: &D::Node,
        print: bool,
        callback: ValidationCallback,
    ) {
        let errors = self.check(rules, value);
        if print {
            self.print(root, name, &errors);
        }
        if errors.is_empty() {
            callback(Ok(()))
        } else {
            callback(Err(errors))
        }
    }
}

/// Runs [`AttrValidator`] over every declared field of a form.
pub struct AttrAutoValidator<D: Dom> {
    dom: Rc<D>,
    validator: Rc<AttrValidator<D>>,
}

impl<D: Dom> AttrAutoValidator<D> {
    pub fn new(dom: Rc<D>, validator: Rc<AttrValidator<D>>) -> Self {
        Self { dom, validator }
    }
}

impl<D: Dom> AutoValidator<D::Node> for AttrAutoValidator<D> {
    fn validate(&self, form: &D::Node, on_valid: Box<dyn FnOnce(FormFields)>) {
        let dom = self.dom.as_ref();
        let mut data = FormFields::new();
        let mut seen = HashSet::new();
        let mut failed = Vec::new();

        for node in dom.query_all(form, &Query::AnyField) {
            if !is_serializable(dom, &node) {
                continue;
            }
            let Some(name) = dom.attr(&node, "name") else {
                continue;
            };
            if !seen.insert(name.clone()) {
                continue;
            }
            let rules = self.validators(std::slice::from_ref(&node));
            let value = read_field(dom, &node);
            let errors = self.validator.check(&rules, Some(&value));
            self.validator.print(form, &name, &errors);
            if !errors.is_empty() {
                failed.push(name.clone());
            }
            data.insert(name, value.to_json());
        }

        if failed.is_empty() {
            on_valid(data);
        } else {
            log::debug!("Form not valid, failed fields: {}", failed.join(", "));
        }
    }

    fn validators(&self, fields: &[D::Node]) -> FieldRules {
        fields
            .first()
            .and_then(|field| self.dom.attr(field, VALIDATE_ATTR))
            .map(|declaration| FieldRules::parse(&declaration))
            .unwrap_or_default()
    }
}
