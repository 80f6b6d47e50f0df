pub mod task;
pub mod user;

pub use task::{Task, TaskCreate, TaskUpdate};
pub use user::{SignupRequest, User};
