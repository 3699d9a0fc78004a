//! Base component for interactive HTML forms: client-side validation,
//! asynchronous submission, inline messages, delayed loading feedback and
//! cancellation, written against a small DOM abstraction so it runs in the
//! browser and headless alike.

pub mod base;
pub mod collaborators;
pub(crate) mod error;
pub mod form;
pub mod memory;
pub mod validate;

pub use base::{
    Catalog, Dom, FormViewOptions, NativeEvent, Query,
    ScheduledTask, Scheduler, Template, Translator, View,
};
pub use collaborators::{
    AutoSubmitter, AutoValidator, Collaborators, FormFields, Postserialize,
    RequestHandle, Spinner, SpinnerFactory, SpinnerOptions, ValidationResult,
    Validator,
};
pub use error::FormError;
pub use form::{
    EventKind, FieldValue, FormEvent, FormView, HttpResponse, LoadingState,
    MessageKind, Messages, SubmitOutcome, TransportError,
};
