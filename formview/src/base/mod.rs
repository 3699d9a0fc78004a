pub mod config;
pub mod dom;
pub mod emitter;
pub mod query;
pub mod scheduler;
pub mod translate;
pub mod view;

pub use config::FormViewOptions;
pub use dom::{Dom, Listener, NativeEvent, Template};
pub use emitter::{Emitter, Event, ListenerId};
pub use query::Query;
pub use scheduler::{ScheduledTask, Scheduler, Task};
pub use translate::{Catalog, Translator};
pub use view::View;
