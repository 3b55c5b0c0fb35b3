pub mod attendance;
pub mod proxy;
pub mod user;
