use serde::{Deserialize, Serialize};
use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;

pub mod analytics;
pub mod charts;
pub mod config;
pub mod error;
pub mod format;
pub mod i18n;
pub mod routing;

pub use error::{ApiError, FormError};

/// Direction of money flow, shared by transactions and categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money received
    Income,
    /// Money spent
    Expense,
}

impl TransactionType {
    pub const ALL: [TransactionType; 2] = [TransactionType::Income, TransactionType::Expense];

    /// Wire value used in query strings and JSON bodies
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }

    /// Translation key for the user-facing label
    pub fn label_key(&self) -> &'static str {
        match self {
            TransactionType::Income => "transaction.income",
            TransactionType::Expense => "transaction.expense",
        }
    }

    /// Sign shown in front of amounts of this type
    pub fn sign(&self) -> char {
        match self {
            TransactionType::Income => '+',
            TransactionType::Expense => '-',
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            other => Err(FormError::InvalidType(other.to_string())),
        }
    }
}

/// The signed-in user as reported by the auth endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    /// RFC 3339 timestamp
    #[serde(default)]
    pub created_at: Option<String>,
}

/// A user-defined income or expense category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub category_type: TransactionType,
    /// Hex colour such as `#28a745`
    #[serde(default)]
    pub color: Option<String>,
}

impl Category {
    /// Categories of one type, in server order
    pub fn of_type(categories: &[Category], category_type: TransactionType) -> Vec<&Category> {
        categories
            .iter()
            .filter(|category| category.category_type == category_type)
            .collect()
    }
}

/// Read-only client view of a transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub amount: f64,
    #[serde(default)]
    pub category: Option<Category>,
    pub date: NaiveDate,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl Transaction {
    /// Name of the embedded category, empty when the server sent none
    pub fn category_name(&self) -> &str {
        self.category.as_ref().map(|c| c.name.as_str()).unwrap_or("")
    }

    pub fn description_text(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub per_page: u32,
    pub total: u64,
    pub pages: u32,
    pub has_next: bool,
    pub has_prev: bool,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 20,
            total: 0,
            pages: 0,
            has_next: false,
            has_prev: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionListResponse {
    pub transactions: Vec<Transaction>,
    pub pagination: Pagination,
}

/// Column the transaction list is ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    Date,
    Amount,
    CreatedAt,
}

impl SortField {
    pub const ALL: [SortField; 3] = [SortField::Date, SortField::Amount, SortField::CreatedAt];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Date => "date",
            SortField::Amount => "amount",
            SortField::CreatedAt => "created_at",
        }
    }

    pub fn label_key(&self) -> &'static str {
        match self {
            SortField::Date => "transactions.sort_date",
            SortField::Amount => "transactions.sort_amount",
            SortField::CreatedAt => "transactions.sort_created",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.as_str() == value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }
}

/// Query for `GET /api/transactions`
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionQuery {
    pub page: u32,
    pub per_page: u32,
    /// `None` lists both income and expense
    pub transaction_type: Option<TransactionType>,
    pub sort_by: SortField,
    pub sort_order: SortOrder,
}

impl Default for TransactionQuery {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 20,
            transaction_type: None,
            sort_by: SortField::Date,
            sort_order: SortOrder::Desc,
        }
    }
}

impl TransactionQuery {
    /// The newest `limit` transactions by creation time, as shown on the dashboard
    pub fn recent(limit: u32) -> Self {
        Self {
            page: 1,
            per_page: limit,
            transaction_type: None,
            sort_by: SortField::CreatedAt,
            sort_order: SortOrder::Desc,
        }
    }

    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("page", self.page.to_string()),
            ("per_page", self.per_page.to_string()),
        ];
        if let Some(transaction_type) = self.transaction_type {
            pairs.push(("type", transaction_type.as_str().to_string()));
        }
        pairs.push(("sort_by", self.sort_by.as_str().to_string()));
        pairs.push(("sort_order", self.sort_order.as_str().to_string()));
        pairs
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoriesResponse {
    pub categories: Vec<Category>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Body of `GET /api/auth/me`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentUserResponse {
    pub user: User,
}

/// Body of a successful login or registration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub message: Option<String>,
    pub user: User,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: Option<String>,
}

/// Body every endpoint returns on a non-success status
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateTransactionRequest {
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub amount: f64,
    pub category_id: i64,
    pub date: NaiveDate,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateTransactionResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub transaction: Option<Transaction>,
}

/// Raw values of the add-transaction form, as read from the inputs
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TransactionForm {
    pub transaction_type: String,
    pub amount: String,
    pub category_id: String,
    pub date: String,
    pub description: String,
}

impl TransactionForm {
    /// Empty form of the given type dated `today`
    pub fn new(transaction_type: TransactionType, today: NaiveDate) -> Self {
        Self {
            transaction_type: transaction_type.as_str().to_string(),
            date: today.format("%Y-%m-%d").to_string(),
            ..Self::default()
        }
    }

    /// Parse the inputs into a request body; nothing is sent when this fails
    pub fn validate(&self) -> Result<CreateTransactionRequest, FormError> {
        let transaction_type = self.transaction_type.parse::<TransactionType>()?;

        let amount_input = self.amount.trim();
        if amount_input.is_empty() {
            return Err(FormError::Required("amount"));
        }
        let amount = amount_input
            .parse::<f64>()
            .map_err(|_| FormError::InvalidAmount(amount_input.to_string()))?;
        if !amount.is_finite() {
            return Err(FormError::InvalidAmount(amount_input.to_string()));
        }
        if amount <= 0.0 {
            return Err(FormError::AmountNotPositive);
        }

        let category_input = self.category_id.trim();
        if category_input.is_empty() {
            return Err(FormError::Required("category"));
        }
        let category_id = category_input
            .parse::<i64>()
            .map_err(|_| FormError::Required("category"))?;

        let date_input = self.date.trim();
        if date_input.is_empty() {
            return Err(FormError::Required("date"));
        }
        let date = NaiveDate::parse_from_str(date_input, "%Y-%m-%d")
            .map_err(|_| FormError::InvalidDate(date_input.to_string()))?;

        let description = match self.description.trim() {
            "" => None,
            text => Some(text.to_string()),
        };

        Ok(CreateTransactionRequest {
            transaction_type,
            amount,
            category_id,
            date,
            description,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_form() -> TransactionForm {
        TransactionForm {
            transaction_type: "expense".to_string(),
            amount: "12.50".to_string(),
            category_id: "3".to_string(),
            date: "2025-03-14".to_string(),
            description: "  lunch ".to_string(),
        }
    }

    #[test]
    fn test_transaction_type_parse() {
        assert_eq!("income".parse::<TransactionType>().unwrap(), TransactionType::Income);
        assert_eq!("expense".parse::<TransactionType>().unwrap(), TransactionType::Expense);
        assert!(matches!(
            "transfer".parse::<TransactionType>(),
            Err(FormError::InvalidType(value)) if value == "transfer"
        ));
    }

    #[test]
    fn test_transaction_deserializes_from_api_shape() {
        let json = r##"{
            "id": 7,
            "amount": 42.5,
            "description": null,
            "date": "2025-06-01",
            "type": "income",
            "category": {"id": 1, "name": "Salary", "type": "income", "color": "#28a745", "created_at": "2025-01-01T00:00:00"},
            "created_at": "2025-06-01T10:00:00",
            "updated_at": "2025-06-01T10:00:00"
        }"##;
        let transaction: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(transaction.transaction_type, TransactionType::Income);
        assert_eq!(transaction.category_name(), "Salary");
        assert_eq!(transaction.description_text(), "");
        assert_eq!(transaction.date, NaiveDate::from_ymd_opt(2025, 6, 1).unwrap());
    }

    #[test]
    fn test_categories_of_type() {
        let categories = vec![
            Category { id: 1, name: "Salary".into(), category_type: TransactionType::Income, color: None },
            Category { id: 2, name: "Food".into(), category_type: TransactionType::Expense, color: None },
            Category { id: 3, name: "Bonus".into(), category_type: TransactionType::Income, color: None },
        ];
        let income: Vec<i64> = Category::of_type(&categories, TransactionType::Income)
            .iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(income, vec![1, 3]);
    }

    #[test]
    fn test_recent_query_pairs() {
        let pairs = TransactionQuery::recent(5).to_query_pairs();
        assert_eq!(
            pairs,
            vec![
                ("page", "1".to_string()),
                ("per_page", "5".to_string()),
                ("sort_by", "created_at".to_string()),
                ("sort_order", "desc".to_string()),
            ]
        );
    }

    #[test]
    fn test_filtered_query_includes_type() {
        let query = TransactionQuery {
            transaction_type: Some(TransactionType::Income),
            page: 3,
            ..TransactionQuery::default()
        };
        let pairs = query.to_query_pairs();
        assert!(pairs.contains(&("type", "income".to_string())));
        assert!(pairs.contains(&("page", "3".to_string())));
    }

    #[test]
    fn test_form_validates_into_request() {
        let request = sample_form().validate().unwrap();
        assert_eq!(request.transaction_type, TransactionType::Expense);
        assert_eq!(request.amount, 12.5);
        assert_eq!(request.category_id, 3);
        assert_eq!(request.description.as_deref(), Some("lunch"));

        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["type"], "expense");
        assert_eq!(body["date"], "2025-03-14");
    }

    #[test]
    fn test_form_rejects_bad_input() {
        let mut form = sample_form();
        form.amount = "abc".to_string();
        assert!(matches!(form.validate(), Err(FormError::InvalidAmount(_))));

        form.amount = "-3".to_string();
        assert_eq!(form.validate(), Err(FormError::AmountNotPositive));

        form.amount = "3".to_string();
        form.category_id = String::new();
        assert_eq!(form.validate(), Err(FormError::Required("category")));

        form.category_id = "1".to_string();
        form.date = "14/03/2025".to_string();
        assert!(matches!(form.validate(), Err(FormError::InvalidDate(_))));
    }

    #[test]
    fn test_empty_description_is_omitted() {
        let mut form = sample_form();
        form.description = "   ".to_string();
        assert_eq!(form.validate().unwrap().description, None);
    }

    #[test]
    fn test_new_form_defaults_date() {
        let today = NaiveDate::from_ymd_opt(2025, 1, 9).unwrap();
        let form = TransactionForm::new(TransactionType::Income, today);
        assert_eq!(form.date, "2025-01-09");
        assert_eq!(form.transaction_type, "income");
        assert!(form.amount.is_empty());
    }
}
