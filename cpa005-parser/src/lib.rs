//! # CPA 005 Parser
//!
//! Библиотека для чтения и сборки файлов пакетных платежей в формате
//! фиксированной ширины CPA 005.
//!
//! ## Состав файла
//!
//! - **Заголовок** (запись A) - дата создания, центр обработки, валюта
//! - **Строки транзакций** - префикс из 24 символов и до шести сегментов
//!   по 240 символов (дебеты, кредиты, сторно и возвраты)
//! - **Итоговая запись** (запись Z) - суммы и количества по категориям
//!
//! ## Чтение
//!
//! - [`File::parse`] / [`File::from_read`] - строгое чтение, первая ошибка
//!   прерывает разбор
//! - [`FileStreamer`] - потоковое чтение, поврежденные сегменты и строки
//!   пропускаются, ошибка ввода/вывода завершает поток
//!
//! ## Пример использования
//!
//! ```rust,ignore
//! use cpa005_parser::{File, FileStreamer};
//! use std::io::BufReader;
//!
//! let mut input = std::fs::File::open("payments.txt")?;
//! let file = File::from_read(&mut input)?;
//! file.verify_footer()?;
//!
//! let streamer = FileStreamer::new(BufReader::new(std::fs::File::open("payments.txt")?));
//! for txn in streamer {
//!     match txn {
//!         Ok(txn) => println!("{} {}", txn.record_type(), txn.amount()),
//!         Err(e) if e.is_recoverable() => eprintln!("пропущено: {}", e),
//!         Err(e) => return Err(e.into()),
//!     }
//! }
//! ```

pub mod error;
pub mod field;
pub mod file;
pub mod reader;
pub mod record;
pub mod streamer;
pub mod transaction;
pub mod types;
pub mod validation;
pub mod writer;

pub use error::{Error, Result};
pub use file::File;
pub use record::{FileFooter, FileHeader, RecordHeader};
pub use streamer::FileStreamer;
pub use transaction::{
    BaseTxn, Credit, CreditReturn, CreditReverse, Debit, DebitReturn, DebitReverse, Transaction,
    TxnRecord, MAX_AMOUNT,
};
pub use types::*;
pub use validation::{Rule, ValidationErrors, Violation};
pub use writer::FileWriter;
