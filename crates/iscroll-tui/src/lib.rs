//! Terminal front-end for the iscroll viewport engine
//!
//! [`host::TerminalHost`] implements the engine's host traits over terminal
//! cells; [`App`] owns the viewport and turns keys and mouse input into
//! viewport calls; `widgets` draw the content and a status line.

pub mod app;
pub mod event;
pub mod host;
pub mod input;
pub mod theme;
pub mod widgets;

pub use app::App;
pub use host::TerminalHost;
pub use theme::GruvboxMaterial;
