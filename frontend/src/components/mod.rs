pub mod forms;
pub mod language_switcher;
pub mod nav;
pub mod stat_card;
pub mod style_switcher;
pub mod toast;
pub mod transactions;
