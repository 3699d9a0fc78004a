use super::form_view::FormView;
use super::messages::MessageKind;
use crate::base::dom::Dom;
use crate::base::query::Query;
use crate::base::translate::PLEASE_WAIT;
use crate::base::view::View;
use crate::collaborators::SpinnerOptions;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadingState {
    Idle,
    // request sent, "please wait" not shown yet
    Pending,
    // "please wait" shown, spinner scheduled or running
    Waiting,
}

impl<D: Dom> FormView<D> {
    pub fn disable(&self) {
        self.state_mut().disabled = true;
        self.collaborators().validator.disable(&self.el());
    }

    pub fn enable(&self) {
        self.state_mut().disabled = false;
        self.collaborators().validator.enable(&self.el());
    }

    /// Disable the form and, unless the response arrives first, show a
    /// "please wait" message with a spinner after the message delay.
    pub fn loading(&self) {
        self.disable();
        let weak = self.downgrade();
        let timer = self.collaborators().scheduler.schedule(
            self.options().message_delay(),
            Box::new(move || {
                if let Some(view) = weak.upgrade() {
                    view.show_waiting();
                }
            }),
        );
        let previous = {
            let mut state = self.state_mut();
            state.loading = LoadingState::Pending;
            state.message_timer.replace(timer)
        };
        if let Some(mut previous) = previous {
            previous.cancel();
        }
    }

    fn show_waiting(&self) {
        {
            let mut state = self.state_mut();
            state.message_timer = None;
            if state.loading != LoadingState::Pending {
                return;
            }
            state.loading = LoadingState::Waiting;
        }
        let text = self.collaborators().translator.t(PLEASE_WAIT);
        self.messages(text, Some(MessageKind::Sending), false);
        self.spin();
        for cancel in self.find(&Query::tag_class("a", "cancel")) {
            self.dom().add_class(&cancel, "enabled");
        }
    }

    pub fn unloading(&self) {
        let timer = self.state_mut().message_timer.take();
        if let Some(mut timer) = timer {
            timer.cancel();
        }
        self.remove_messages();
        self.unspin();
        self.enable();
        for cancel in self.find(&Query::tag_class("a", "cancel")) {
            self.dom().remove_class(&cancel, "enabled");
        }
        self.state_mut().loading = LoadingState::Idle;
    }

    /// Attach a spinner to the first button after the spin delay.
    pub fn spin(&self) {
        if self.find_first(&Query::tag("button")).is_none() {
            return;
        }
        let weak = self.downgrade();
        let timer = self.collaborators().scheduler.schedule(
            self.options().spin_delay(),
            Box::new(move || {
                if let Some(view) = weak.upgrade() {
                    view.attach_spinner();
                }
            }),
        );
        let previous = self.state_mut().spin_timer.replace(timer);
        if let Some(mut previous) = previous {
            previous.cancel();
        }
    }

    fn attach_spinner(&self) {
        self.state_mut().spin_timer = None;
        let buttons = self.find(&Query::tag("button"));
        let Some(first) = buttons.first() else {
            return;
        };
        let options = SpinnerOptions {
            size: self.options().spinner_size,
            light: self.options().spinner_light,
        };
        let spinner = self.collaborators().spinners.attach(first, &options);
        for button in &buttons {
            self.dom().add_class(button, "spin");
        }
        let previous = self.state_mut().spinner.replace(spinner);
        if let Some(previous) = previous {
            previous.remove();
        }
    }

    /// Cancel a scheduled spinner and remove the active one. Idempotent.
    pub fn unspin(&self) {
        let (timer, spinner) = {
            let mut state = self.state_mut();
            (state.spin_timer.take(), state.spinner.take())
        };
        if let Some(mut timer) = timer {
            timer.cancel();
        }
        let Some(spinner) = spinner else {
            return;
        };
        for button in self.find(&Query::tag("button")) {
            self.dom().remove_class(&button, "spin");
        }
        spinner.remove();
    }
}
