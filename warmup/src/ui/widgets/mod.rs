//! TUI widgets for the prompt deck

pub mod filter_panel;
pub mod prompt_card;
pub mod status_bar;
pub mod timer_gauge;

pub use filter_panel::FilterPanelWidget;
pub use prompt_card::PromptCardWidget;
pub use status_bar::{HotkeyBarWidget, StatusBarWidget};
pub use timer_gauge::TimerGaugeWidget;
