use std::time::Duration;

use formview::base::Task;
use formview::{ScheduledTask, Scheduler};
use leptos::set_timeout_with_handle;

/// Timers on the browser event loop.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserScheduler;

impl Scheduler for BrowserScheduler {
    fn schedule(&self, delay: Duration, task: Task) -> ScheduledTask {
        match set_timeout_with_handle(task, delay) {
            Ok(handle) => ScheduledTask::new(move || handle.clear()),
            Err(err) => {
                log::error!("Cannot schedule task: {:?}", err);
                ScheduledTask::inert()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use wasm_bindgen_futures::JsFuture;
    use wasm_bindgen_test::*;

    use super::*;

    wasm_bindgen_test_configure!(run_in_browser);

    async fn sleep(ms: i32) {
        let promise = js_sys::Promise::new(&mut |resolve, _| {
            web_sys::window()
                .unwrap()
                .set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms)
                .unwrap();
        });
        JsFuture::from(promise).await.unwrap();
    }

    #[wasm_bindgen_test]
    async fn test_schedule_and_cancel() {
        let fired = Rc::new(Cell::new(0));

        let counter = Rc::clone(&fired);
        let _kept = BrowserScheduler.schedule(
            Duration::from_millis(10),
            Box::new(move || counter.set(counter.get() + 1)),
        );
        let counter = Rc::clone(&fired);
        let mut canceled = BrowserScheduler.schedule(
            Duration::from_millis(10),
            Box::new(move || counter.set(counter.get() + 10)),
        );
        canceled.cancel();
        canceled.cancel();

        sleep(50).await;
        assert_eq!(fired.get(), 1);
    }
}
