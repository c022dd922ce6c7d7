pub mod constants;
pub mod controller;
pub mod lifecycle;
pub mod subscription;
pub mod types;
