use std::rc::Rc;

use super::events::{EventKind, FormEvent};
use super::form_view::FormView;
use crate::base::dom::{Dom, NativeEvent};
use crate::base::query::Query;
use crate::base::view::View;

impl<D: Dom> FormView<D> {
    /// Validate the first form matching `query` on submit and emit
    /// [`FormEvent::Valid`] with its data when it passes.
    pub fn autovalidate(&self, query: &Query) {
        let Some(form) = self.find_first(query) else {
            return;
        };
        self.state_mut().autovalidating = true;
        let weak = self.downgrade();
        let target = form.clone();
        self.dom().listen(
            &form,
            "submit",
            Rc::new(move |event: &dyn NativeEvent| {
                event.prevent_default();
                let Some(view) = weak.upgrade() else {
                    return;
                };
                view.emit(FormEvent::Submit);
                let weak = view.downgrade();
                view.collaborators().autovalidator.validate(
                    &target,
                    Box::new(move |data| {
                        if let Some(view) = weak.upgrade() {
                            view.emit(FormEvent::Valid(data));
                        }
                    }),
                );
            }),
        );
        log::debug!("Autovalidating {}", query.to_css());
    }

    /// Submit the first form matching `query` asynchronously, after
    /// validation when the view is autovalidating.
    pub fn autosubmit(&self, query: &Query) {
        let Some(form) = self.find_first(query) else {
            return;
        };

        let weak = self.downgrade();
        self.dom().listen(
            &form,
            "submit",
            Rc::new(move |_: &dyn NativeEvent| {
                if let Some(view) = weak.upgrade() {
                    view.remove_messages();
                }
            }),
        );

        let weak = self.downgrade();
        if self.is_autovalidating() {
            let target = form.clone();
            self.on(EventKind::Valid, move |_| {
                if let Some(view) = weak.upgrade() {
                    view.submit(&target);
                }
            });
        } else {
            let target = form.clone();
            self.dom().listen(
                &form,
                "submit",
                Rc::new(move |event: &dyn NativeEvent| {
                    event.prevent_default();
                    if let Some(view) = weak.upgrade() {
                        view.emit(FormEvent::Submit);
                        view.submit(&target);
                    }
                }),
            );
        }
        log::debug!("Autosubmitting {}", query.to_css());
    }

    fn submit(&self, form: &D::Node) {
        self.emit(FormEvent::Request);
        let (seq, postserialize) = {
            let mut state = self.state_mut();
            state.request_seq += 1;
            state.in_flight = Some(state.request_seq);
            (state.request_seq, state.postserialize.clone())
        };

        let weak = self.downgrade();
        let request = self.collaborators().submitter.submit(
            form,
            Box::new(move |outcome| {
                let Some(view) = weak.upgrade() else {
                    return;
                };
                {
                    let mut state = view.state_mut();
                    if state.in_flight == Some(seq) {
                        state.in_flight = None;
                        state.request = None;
                    }
                }
                view.emit(FormEvent::Response(outcome));
            }),
            postserialize,
        );

        let weak = self.downgrade();
        request.on_abort(Box::new(move || {
            if let Some(view) = weak.upgrade() {
                view.on_cancel(None);
            }
        }));

        // keep the handle only while the response is outstanding
        let mut state = self.state_mut();
        if state.in_flight == Some(seq) {
            state.request = Some(request);
        }
    }

    pub fn on_cancel(&self, event: Option<&dyn NativeEvent>) {
        if let Some(event) = event {
            event.prevent_default();
        }
        log::debug!("Submission canceled");
        self.emit(FormEvent::Cancel);
    }

    /// Abort the in-flight submission, if any. The request's abort signal
    /// reaches [`FormView::on_cancel`].
    pub fn abort(&self) {
        let request = {
            let mut state = self.state_mut();
            state.in_flight = None;
            state.request.take()
        };
        if let Some(request) = request {
            request.abort();
        }
    }

    pub fn is_submitting(&self) -> bool {
        self.state().in_flight.is_some()
    }
}
