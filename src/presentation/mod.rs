mod chrome;
mod theme;

pub use theme::{Palette, Theme};

pub(crate) use chrome::{UiContext, draw};
