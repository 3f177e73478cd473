pub mod client;
pub mod contract;
pub mod event;
pub mod user;
