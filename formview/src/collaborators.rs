//! Interfaces of the helpers a form view delegates to.

use std::rc::Rc;

use crate::base::scheduler::Scheduler;
use crate::base::translate::Translator;
use crate::form::{FieldValue, SubmitOutcome};
use crate::validate::FieldRules;

/// Serialized form data, field name to value.
pub type FormFields = serde_json::Map<String, serde_json::Value>;

pub type ValidationResult = Result<(), Vec<String>>;
pub type ValidationCallback = Box<dyn FnOnce(ValidationResult)>;
pub type ResponseCallback = Box<dyn FnOnce(SubmitOutcome)>;
pub type Postserialize = Rc<dyn Fn(&mut FormFields)>;

pub trait Validator<N> {
    /// Disable every control under `root`.
    fn disable(&self, root: &N);
    fn enable(&self, root: &N);

    /// Check `value` of field `name` against `rules`. With `print` set,
    /// failures are rendered next to the field.
    fn field(
        &self,
        name: &str,
        rules: &FieldRules,
        value: Option<&FieldValue>,
        root: &N,
        print: bool,
        callback: ValidationCallback,
    );
}

pub trait AutoValidator<N> {
    /// Validate every declared field of `form`; `on_valid` only runs when
    /// all of them pass.
    fn validate(&self, form: &N, on_valid: Box<dyn FnOnce(FormFields)>);

    /// Rules declared on the given field elements.
    fn validators(&self, fields: &[N]) -> FieldRules;
}

/// In-flight submission.
pub trait RequestHandle {
    fn on_abort(&self, listener: Box<dyn Fn()>);
    fn abort(&self);
}

pub trait AutoSubmitter<N> {
    fn submit(
        &self,
        form: &N,
        on_response: ResponseCallback,
        postserialize: Option<Postserialize>,
    ) -> Rc<dyn RequestHandle>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpinnerOptions {
    pub size: u32,
    pub light: bool,
}

pub trait Spinner {
    fn remove(self: Box<Self>);
}

pub trait SpinnerFactory<N> {
    fn attach(&self, target: &N, options: &SpinnerOptions) -> Box<dyn Spinner>;
}

/// Everything a form view needs from its environment.
pub struct Collaborators<N> {
    pub validator: Rc<dyn Validator<N>>,
    pub autovalidator: Rc<dyn AutoValidator<N>>,
    pub submitter: Rc<dyn AutoSubmitter<N>>,
    pub spinners: Rc<dyn SpinnerFactory<N>>,
    pub scheduler: Rc<dyn Scheduler>,
    pub translator: Rc<dyn Translator>,
}

impl<N> Clone for Collaborators<N> {
    fn clone(&self) -> Self {
        Self {
            validator: Rc::clone(&self.validator),
            autovalidator: Rc::clone(&self.autovalidator),
            submitter: Rc::clone(&self.submitter),
            spinners: Rc::clone(&self.spinners),
            scheduler: Rc::clone(&self.scheduler),
            translator: Rc::clone(&self.translator),
        }
    }
}
