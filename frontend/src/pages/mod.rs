pub mod analytics;
pub mod dashboard;
pub mod login;
pub mod register;
pub mod transactions;

pub use analytics::AnalyticsPage;
pub use dashboard::DashboardPage;
pub use login::LoginPage;
pub use register::RegisterPage;
pub use transactions::TransactionsPage;
