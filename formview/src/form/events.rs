use super::response::{HttpResponse, SubmitOutcome};
use crate::base::emitter::Event;
use crate::collaborators::FormFields;
use crate::FormError;

#[derive(Debug, Clone, PartialEq)]
pub enum FormEvent {
    // view attached to the document
    Insert,
    Submit,
    Valid(FormFields),
    Request,
    Response(SubmitOutcome),
    Success(HttpResponse),
    Error(FormError),
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Insert,
    Submit,
    Valid,
    Request,
    Response,
    Success,
    Error,
    Cancel,
}

impl Event for FormEvent {
    type Kind = EventKind;

    fn kind(&self) -> EventKind {
        match self {
            FormEvent::Insert => EventKind::Insert,
            FormEvent::Submit => EventKind::Submit,
            FormEvent::Valid(_) => EventKind::Valid,
            FormEvent::Request => EventKind::Request,
            FormEvent::Response(_) => EventKind::Response,
            FormEvent::Success(_) => EventKind::Success,
            FormEvent::Error(_) => EventKind::Error,
            FormEvent::Cancel => EventKind::Cancel,
        }
    }
}
