mod callback;
mod get;
mod logout;

pub use callback::*;
pub use get::*;
pub use logout::*;
