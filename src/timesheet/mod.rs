pub mod aggregate;
pub mod normalize;
pub mod time;
