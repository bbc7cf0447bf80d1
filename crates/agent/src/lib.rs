//! Response orchestration for InterDesk.
//!
//! One turn flows through a fixed decision procedure: OTP short-circuit →
//! knowledge-base check → completion pass → at most one tool round-trip →
//! engagement-question injection. See [`Orchestrator::respond`].

pub mod injector;
pub mod orchestrator;
pub mod prompt;
pub mod truncate;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use injector::EngagementInjector;
pub use orchestrator::Orchestrator;
pub use prompt::system_prompt;
pub use truncate::truncate_history;
