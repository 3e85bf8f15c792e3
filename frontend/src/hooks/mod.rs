pub mod use_analytics;
pub mod use_categories;
pub mod use_transaction_form;
pub mod use_transactions;

pub use use_analytics::use_analytics;
pub use use_categories::use_categories;
pub use use_transaction_form::use_transaction_form;
pub use use_transactions::use_transactions;
