//! UI / rendering layer: everything that touches Ratatui widgets.
//!
//! The engine draws into a [`grid_widget::TerminalSurface`]; this layer turns
//! the recorded sprites into terminal cells and adds the chrome around them.

pub mod grid_widget;
pub mod layout;
pub mod popup;
pub mod spinner;
pub mod theme;
