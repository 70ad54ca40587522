pub mod chat;
pub mod draft;
pub mod event;
pub mod layout;
pub mod session;
