pub mod evidence;

pub use evidence::{Evidence, MAX_IMAGES};
