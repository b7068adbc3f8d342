//! Entity re-exports.

pub use super::churches::Entity as Churches;
pub use super::contributions::Entity as Contributions;
pub use super::members::Entity as Members;
