pub mod chat;
pub mod dashboard;
pub mod explanation;
pub mod quiz;
