//! Model name matching
//!
//! - `normalize` - canonical token form of a raw model name
//! - `fuzzy` - picks the best candidate identifier for a requested name

pub mod fuzzy;
pub mod normalize;

pub use fuzzy::best_match;
pub use normalize::normalize;
