pub mod identity;
pub mod roles;

pub use identity::Caller;
pub use roles::{Permission, Role, RoleConfig, RoleResolver};
