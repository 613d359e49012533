mod get;
mod post;

pub use get::*;
pub use post::*;
