pub mod balance;
pub mod common;
pub mod department;
pub mod leave;
pub mod report;
pub mod slot;
pub mod user;
