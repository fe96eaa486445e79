mod call_session;
mod manual_clock;
mod service_handler;
mod session_owner;
mod timer;
#[cfg(feature = "tokio_support")]
mod tokio_timer;

pub use call_session::Session;
pub use manual_clock::{ManualClock, ManualTimer};
pub use service_handler::ServiceHandler;
pub use session_owner::SessionOwner;
pub use timer::{Timer, TimerCallback, TimerFactory};
#[cfg(feature = "tokio_support")]
pub use tokio_timer::{TokioTimer, TokioTimerFactory};
