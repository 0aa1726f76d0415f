pub mod tui;

pub use tui::{Cell, Charset, Color, TuiRenderer};
