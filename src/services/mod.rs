//! External collaborators of the funnel.
//!
//! Company lookup, report delivery and call booking sit behind capability
//! traits so a deployment can swap the shipped in-process implementations
//! for real services.

mod directory;
mod mailer;
mod scheduler;

pub use directory::{CompanyDirectory, ConfiguredDirectory};
pub use mailer::{ReportMailer, SimulatedMailer};
pub use scheduler::{CallScheduler, SimulatedScheduler, offered_slots};
