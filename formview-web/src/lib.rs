pub(crate) mod device;
pub(crate) mod dom;
pub(crate) mod scheduler;
pub(crate) mod spinner;
pub(crate) mod submit;

pub mod app;

pub use device::MobileAgents;
pub use dom::{WebDom, WebEvent};
pub use scheduler::BrowserScheduler;
pub use spinner::{CssSpinner, CssSpinnerFactory};
pub use submit::{FetchRequest, FetchSubmitter};
