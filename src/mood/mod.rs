//! Time/weather driven copy selection and the fallback product matcher used
//! by the hero banner and the flavor shaker.

pub mod atmosphere;
pub mod classifier;
pub mod matcher;
pub mod phrases;

pub use atmosphere::{Atmosphere, Effect, atmosphere};
pub use classifier::{MoodTag, classify};
pub use matcher::{best_match, normalize};
pub use phrases::{render, select_phrase};
