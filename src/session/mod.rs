pub mod chat;
pub mod quiz;
