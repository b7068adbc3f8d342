//! `SeaORM` entity definitions.

pub mod churches;
pub mod contributions;
pub mod members;
pub mod prelude;
