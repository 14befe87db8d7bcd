pub mod error;
pub mod gate;
pub mod repos;
pub mod service;
pub mod session;
