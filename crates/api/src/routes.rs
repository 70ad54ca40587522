pub mod calendar;
pub mod drafts;
pub mod health;
