//! The audit funnel.
//!
//! - [`step`]: the steps and the events that move between them
//! - [`session`]: the per-visitor state machine
//! - [`timer`]: delayed callbacks behind the timer-driven steps
//! - [`store`]: live sessions and their pending timers

pub mod session;
pub mod step;
pub mod store;
pub mod timer;

pub use session::{FunnelContext, FunnelSession, SessionView};
pub use step::{FunnelEvent, FunnelStep};
pub use store::{Collaborators, SessionStore};
pub use timer::ScheduledTask;
