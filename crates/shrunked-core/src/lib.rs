pub mod config;
pub mod logging;

pub mod bridge;
pub mod content;
pub mod dom;
pub mod negotiate;
pub mod orchestrator;
pub mod prefs;
pub mod prompt;
pub mod protocol;
pub mod resize;

#[cfg(test)]
pub(crate) mod testing;
