use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Categories created for every newly registered user
pub const DEFAULT_CATEGORIES: [&str; 6] =
    ["Food", "Rent", "Utilities", "Salary", "Entertainment", "Other"];

/// Date format used for forms, filters and exports
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Largest amount a single entry may carry
pub const MAX_AMOUNT: Decimal = dec!(1000000000000);

/// Share of income above which expenses trigger the overspending tip
pub const OVERSPEND_RATIO: Decimal = dec!(0.5);

/// Food spending over the recent window above which the food tip fires
pub const FOOD_TIP_THRESHOLD: Decimal = dec!(150);

/// Size of the "recent" window for tips, in days
pub const RECENT_WINDOW_DAYS: i64 = 30;

/// Number of month groups kept in the dashboard chart series
pub const MONTHLY_SERIES_LEN: usize = 6;

/// Number of categories listed on the admin dashboard
pub const TOP_CATEGORIES_LIMIT: i64 = 5;

/// Number of recently registered users listed on the admin dashboard
pub const RECENT_USERS_LIMIT: i64 = 5;

/// Shown to admins when the audit log does not exist yet
pub const NO_LOGS_PLACEHOLDER: &str = "No logs found.";

/// Audit log rotation threshold in bytes
pub const AUDIT_LOG_MAX_BYTES: u64 = 10_240;

/// Number of rotated audit log files kept
pub const AUDIT_LOG_BACKUPS: usize = 3;
