use std::cell::{Ref, RefCell, RefMut};
use std::rc::{Rc, Weak};

use super::events::{EventKind, FormEvent};
use super::loading::LoadingState;
use super::messages::Messages;
use crate::base::config::FormViewOptions;
use crate::base::dom::{Dom, Template};
use crate::base::emitter::{Emitter, ListenerId};
use crate::base::scheduler::ScheduledTask;
use crate::base::view::View;
use crate::collaborators::{Collaborators, Postserialize, RequestHandle, Spinner};
use crate::FormError;

pub(super) struct State {
    pub disabled: bool,
    pub autovalidating: bool,
    pub initialized: bool,
    pub listening: bool,
    pub loading: LoadingState,
    pub spin_timer: Option<ScheduledTask>,
    pub message_timer: Option<ScheduledTask>,
    pub spinner: Option<Box<dyn Spinner>>,
    // sequence number of the last submission and its handle while in flight
    pub request_seq: u64,
    pub in_flight: Option<u64>,
    pub request: Option<Rc<dyn RequestHandle>>,
    pub postserialize: Option<Postserialize>,
}

impl Default for State {
    fn default() -> Self {
        Self {
            disabled: false,
            autovalidating: false,
            initialized: false,
            listening: false,
            loading: LoadingState::Idle,
            spin_timer: None,
            message_timer: None,
            spinner: None,
            request_seq: 0,
            in_flight: None,
            request: None,
            postserialize: None,
        }
    }
}

struct Inner<D: Dom> {
    dom: Rc<D>,
    el: D::Node,
    options: FormViewOptions,
    collaborators: Collaborators<D::Node>,
    emitter: Emitter<FormEvent>,
    state: RefCell<State>,
}

/// Base form component.
///
/// A `FormView` is a cheap handle; clones share the same element and state.
/// Callbacks registered with the DOM, the scheduler and the collaborators
/// hold a [`WeakFormView`], so dropping the last handle releases the view.
pub struct FormView<D: Dom> {
    inner: Rc<Inner<D>>,
}

impl<D: Dom> Clone for FormView<D> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

pub struct WeakFormView<D: Dom> {
    inner: Weak<Inner<D>>,
}

impl<D: Dom> Clone for WeakFormView<D> {
    fn clone(&self) -> Self {
        Self {
            inner: Weak::clone(&self.inner),
        }
    }
}

impl<D: Dom> WeakFormView<D> {
    pub fn upgrade(&self) -> Option<FormView<D>> {
        self.inner.upgrade().map(|inner| FormView { inner })
    }
}

impl<D: Dom> FormView<D> {
    /// Render `template` and wire submission, validation and messaging.
    pub fn new(
        dom: Rc<D>,
        template: &dyn Template<D>,
        options: FormViewOptions,
        collaborators: Collaborators<D::Node>,
    ) -> Result<Self, FormError> {
        let view = Self::uninit(dom, template, options, collaborators)?;
        view.init();
        Ok(view)
    }

    /// Render `template` without wiring anything. Call [`FormView::init`]
    /// once custom hooks such as [`FormView::set_postserialize`] are in
    /// place.
    pub fn uninit(
        dom: Rc<D>,
        template: &dyn Template<D>,
        options: FormViewOptions,
        collaborators: Collaborators<D::Node>,
    ) -> Result<Self, FormError> {
        let el = template.render(dom.as_ref())?;
        Ok(Self {
            inner: Rc::new(Inner {
                dom,
                el,
                options,
                collaborators,
                emitter: Emitter::new(),
                state: RefCell::new(State::default()),
            }),
        })
    }

    /// Activate autovalidation and autosubmission on the forms that ask for
    /// it and render the (empty) message list. Runs once.
    pub fn init(&self) {
        {
            let mut state = self.state_mut();
            if state.initialized {
                return;
            }
            state.initialized = true;
        }
        self.autovalidate(&self.options().autovalidate_query());
        self.autosubmit(&self.options().autosubmit_query());
        let weak = self.downgrade();
        self.on(EventKind::Insert, move |_| {
            if let Some(view) = weak.upgrade() {
                view.on_insert();
            }
        });
        self.messages(Messages::empty(), None, false);
        log::debug!("Form view initialized");
    }

    /// Attach the view to `parent` in the live document.
    pub fn insert(&self, parent: &D::Node) {
        self.dom().append(parent, &self.el());
        self.emit(FormEvent::Insert);
    }

    // bound on insertion so handlers resolve against the live document
    fn on_insert(&self) {
        {
            let mut state = self.state_mut();
            if state.listening {
                return;
            }
            state.listening = true;
        }
        let weak = self.downgrade();
        self.on(EventKind::Request, move |_| {
            if let Some(view) = weak.upgrade() {
                view.loading();
            }
        });
        let weak = self.downgrade();
        self.on(EventKind::Response, move |_| {
            if let Some(view) = weak.upgrade() {
                view.unloading();
            }
        });
        let weak = self.downgrade();
        self.on(EventKind::Response, move |event| {
            if let (Some(view), FormEvent::Response(outcome)) = (weak.upgrade(), event) {
                view.response(outcome);
            }
        });
    }

    /// Cancel pending timers and tear down the spinner.
    pub fn destroy(&self) {
        let timer = self.state_mut().message_timer.take();
        if let Some(mut timer) = timer {
            timer.cancel();
        }
        self.unspin();
        self.state_mut().loading = LoadingState::Idle;
        log::debug!("Form view destroyed");
    }

    pub fn downgrade(&self) -> WeakFormView<D> {
        WeakFormView {
            inner: Rc::downgrade(&self.inner),
        }
    }

    pub fn options(&self) -> &FormViewOptions {
        &self.inner.options
    }

    pub fn collaborators(&self) -> &Collaborators<D::Node> {
        &self.inner.collaborators
    }

    pub fn is_disabled(&self) -> bool {
        self.state().disabled
    }

    pub fn is_autovalidating(&self) -> bool {
        self.state().autovalidating
    }

    pub fn loading_state(&self) -> LoadingState {
        self.state().loading
    }

    /// Hook applied to the serialized data before it is submitted.
    pub fn set_postserialize(&self, hook: impl Fn(&mut crate::FormFields) + 'static) {
        self.state_mut().postserialize = Some(Rc::new(hook));
    }

    pub(super) fn state(&self) -> Ref<'_, State> {
        self.inner.state.borrow()
    }

    pub(super) fn state_mut(&self) -> RefMut<'_, State> {
        self.inner.state.borrow_mut()
    }
}

impl<D: Dom> View for FormView<D> {
    type Dom = D;
    type Event = FormEvent;

    fn dom(&self) -> &D {
        self.inner.dom.as_ref()
    }

    fn el(&self) -> D::Node {
        self.inner.el.clone()
    }

    fn emit(&self, event: FormEvent) {
        self.inner.emitter.emit(&event);
    }

    fn on<F>(&self, kind: EventKind, handler: F) -> ListenerId
    where
        F: Fn(&FormEvent) + 'static,
    {
        self.inner.emitter.on(kind, Rc::new(handler))
    }

    fn off(&self, id: ListenerId) -> bool {
        self.inner.emitter.off(id)
    }
}
