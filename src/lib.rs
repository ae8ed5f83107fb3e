#![deny(rust_2018_idioms)]

mod app;
mod i18n;
pub mod model;
mod presentation;
mod render;
pub mod widget;

pub use app::{SurveyUI, UiOptions};
pub use i18n::{MessageKey, Translator};
pub use presentation::{Palette, Theme};
pub use render::{QuestionNumbers, RenderOptions};

pub mod prelude {
    pub use super::model::{Element, ElementRef, Survey, SurveyRef};
    pub use super::{SurveyUI, Theme, UiOptions};
}
