pub mod resume;
pub mod skill;
pub mod user;
