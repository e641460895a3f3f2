//! Library components of the Pagemark terminal front end.

pub mod confirm;
pub mod logging;
pub mod render;
pub mod session;
pub mod settings;
