mod dom;
mod html;
mod scheduler;

pub use dom::{MemoryDom, MemoryEvent, NodeId};
pub use scheduler::ManualScheduler;
