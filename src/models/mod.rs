mod note;
mod tenant;
mod user;

pub use note::Note;
pub use tenant::{Plan, Tenant};
pub use user::{Role, User};
