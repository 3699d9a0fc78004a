use std::fmt;
use std::time::Duration;

pub type Task = Box<dyn FnOnce()>;

/// Deferred callbacks on the host event loop.
pub trait Scheduler {
    fn schedule(&self, delay: Duration, task: Task) -> ScheduledTask;
}

/// Handle to a task that has not necessarily run yet.
///
/// Cancelling is idempotent and a no-op once the task has fired.
pub struct ScheduledTask {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl ScheduledTask {
    pub fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Handle for a task that could not be scheduled.
    pub fn inert() -> Self {
        Self { cancel: None }
    }

    pub fn cancel(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl fmt::Debug for ScheduledTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScheduledTask")
            .field("cancelable", &self.cancel.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;

    #[test]
    fn test_cancel_runs_once() {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let mut task = ScheduledTask::new(move || counter.set(counter.get() + 1));
        task.cancel();
        task.cancel();
        assert_eq!(calls.get(), 1);
        ScheduledTask::inert().cancel();
    }
}
