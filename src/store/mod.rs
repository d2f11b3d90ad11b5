pub mod movies;
pub mod traits;

pub use movies::{Intent, MovieState, MovieStore};
pub use traits::MovieSource;
