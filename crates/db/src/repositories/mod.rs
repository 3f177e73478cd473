mod client_repo;
mod contract_repo;
mod event_repo;
mod user_repo;

pub use client_repo::ClientRepo;
pub use contract_repo::ContractRepo;
pub use event_repo::EventRepo;
pub use user_repo::UserRepo;
