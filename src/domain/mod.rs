//! Pure business rules; no I/O.

pub mod capture;
pub mod catalogue;
pub mod checkout;
pub mod rewards;
pub mod similarity;
pub mod transfer;
