pub mod dispatcher;
pub mod providers;

pub use dispatcher::{Dispatcher, ANALYSIS_PROMPT};
