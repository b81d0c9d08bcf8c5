//! Записи, встречающиеся в файле один раз, и общий префикс строк.
//!
//! - [`RecordHeader`] - 24 символа в начале каждой строки
//! - [`FileHeader`] - запись A
//! - [`FileFooter`] - запись Z с итогами по категориям транзакций

pub mod file_footer;
pub mod file_header;
pub mod header;

pub use file_footer::FileFooter;
pub use file_header::FileHeader;
pub use header::RecordHeader;
