pub mod attendance;
pub mod instruction;
pub mod role;
pub mod salary;
pub mod task;
pub mod user;
