pub mod company;
pub mod transfer;
