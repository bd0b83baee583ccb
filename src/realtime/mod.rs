pub mod broadcaster;
pub mod controller;
pub mod index;
pub mod model;
pub mod server;
pub mod session;
