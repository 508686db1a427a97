pub mod id;
pub mod leave;
pub mod role;
pub mod task;
pub mod user;
