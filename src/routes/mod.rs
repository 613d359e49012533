mod compose;
mod errors;
pub mod layout;
mod login;
mod maillist;
mod maillists;
mod member;
mod templates;

pub use compose::*;
pub use errors::*;
pub use login::*;
pub use maillist::*;
pub use maillists::*;
pub use member::*;
pub use templates::*;
