mod runner;
pub(crate) mod tasks;

pub(crate) use tasks::{cleanup::CleanupTask, round_event_listener::RoundEventListenerTask};
