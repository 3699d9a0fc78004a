mod events;
mod fields;
mod form_view;
mod loading;
mod messages;
mod response;
mod submission;


pub use events::{EventKind, FormEvent};
pub use fields::{is_serializable, read_field, serialize_fields, FieldValue};
pub use form_view::{FormView, WeakFormView};
pub use loading::LoadingState;
pub use messages::{MessageKind, Messages};
pub use response::{parse_error_body, HttpResponse, SubmitOutcome, TransportError};
