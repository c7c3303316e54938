mod content;
mod status_bar;

pub use content::ContentWidget;
pub use status_bar::StatusBarWidget;
