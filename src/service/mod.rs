pub mod accounts;
pub mod listing;
pub mod pagination;
pub mod password;
