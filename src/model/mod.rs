pub mod attendance;
pub mod shift;
pub mod summary;
pub mod user;
