pub mod contracts;
pub mod driver;
pub mod reply_queue;
pub mod timers;
pub mod typewriter;

pub use contracts::*;
pub use driver::SessionDriver;
pub use typewriter::Typewriter;
