/// Calendar layout and event management
pub mod calendar;
/// Workout draft autosave
pub mod drafts;
