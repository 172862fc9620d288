//! 数据库查询操作

pub mod doctors;
pub mod expenses;
pub mod mr_data;
pub mod payments;
pub mod receipts;
pub mod reports;
pub mod services;
pub mod shift_cash;
pub mod shifts;

pub use doctors::DoctorQueries;
pub use expenses::ExpenseQueries;
pub use mr_data::MrDataQueries;
pub use payments::PaymentQueries;
pub use receipts::ReceiptQueries;
pub use reports::ReportQueries;
pub use services::ServiceQueries;
pub use shift_cash::ShiftCashQueries;
pub use shifts::ShiftQueries;
