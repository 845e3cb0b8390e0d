pub mod auth;
pub mod children;
pub mod employees;
pub mod events;
pub mod groups;
pub mod parents;
pub mod programs;
pub mod users;
