pub mod leave;
pub mod task;
pub mod user;
