mod navigation;
mod options;
mod survey_ui;
mod terminal;
mod validation;

pub use options::UiOptions;
pub use survey_ui::SurveyUI;
