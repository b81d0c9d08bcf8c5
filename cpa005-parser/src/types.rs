//! Базовые типы и константы формата 005.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

// =============================================================================
// Константы разметки
// =============================================================================

/// Каноническая длина физической строки.
pub const MAX_LINE_LENGTH: usize = 1464;
/// Длина общего префикса строки (тип, номер строки, отправитель, номер файла).
pub const RECORD_HEADER_LENGTH: usize = 24;
/// Длина сегмента одной транзакции.
pub const SEGMENT_LENGTH: usize = 240;
/// Максимум сегментов в одной строке.
pub const MAX_SEGMENTS_PER_LINE: usize = 6;
/// Минимальная длина заголовка файла (запись A).
pub const HEADER_MIN_LENGTH: usize = 58;
/// Минимальная длина итоговой записи (запись Z).
pub const FOOTER_MIN_LENGTH: usize = 112;

/// Допустимые коды валют.
pub const CURRENCY_CODES: [&str; 2] = ["CAD", "USD"];

/// Код типа транзакции по умолчанию для хранимого типа.
pub const DEFAULT_STORED_TRANSACTION_TYPE: &str = "000";

// =============================================================================
// Тип записи
// =============================================================================

/// Логический тип записи.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordType {
    /// Заголовок файла.
    #[serde(rename = "A")]
    Header,
    /// Кредит.
    #[serde(rename = "C")]
    Credit,
    /// Дебет.
    #[serde(rename = "D")]
    Debit,
    /// Сторно кредита.
    #[serde(rename = "E")]
    CreditReverse,
    /// Сторно дебета.
    #[serde(rename = "F")]
    DebitReverse,
    /// Возврат кредита.
    #[serde(rename = "I")]
    CreditReturn,
    /// Возврат дебета.
    #[serde(rename = "J")]
    DebitReturn,
    /// Уведомление об изменении (не реализовано).
    #[serde(rename = "S")]
    NoticeOfChange,
    /// Заголовок уведомлений об изменении (не реализовано).
    #[serde(rename = "U")]
    NoticeOfChangeHeader,
    /// Итог уведомлений об изменении (не реализовано).
    #[serde(rename = "V")]
    NoticeOfChangeFooter,
    /// Итоговая запись файла.
    #[serde(rename = "Z")]
    Footer,
}

impl RecordType {
    /// Все коды, известные правилам валидации.
    pub const ALL: [RecordType; 11] = [
        RecordType::Header,
        RecordType::Credit,
        RecordType::Debit,
        RecordType::CreditReverse,
        RecordType::DebitReverse,
        RecordType::CreditReturn,
        RecordType::DebitReturn,
        RecordType::NoticeOfChange,
        RecordType::NoticeOfChangeHeader,
        RecordType::NoticeOfChangeFooter,
        RecordType::Footer,
    ];

    /// Порядок, в котором группы транзакций пишутся в файл.
    pub const TRANSACTION_ORDER: [RecordType; 6] = [
        RecordType::Debit,
        RecordType::Credit,
        RecordType::CreditReverse,
        RecordType::DebitReverse,
        RecordType::CreditReturn,
        RecordType::DebitReturn,
    ];

    /// Однобуквенный код записи.
    pub fn code(self) -> &'static str {
        match self {
            RecordType::Header => "A",
            RecordType::Credit => "C",
            RecordType::Debit => "D",
            RecordType::CreditReverse => "E",
            RecordType::DebitReverse => "F",
            RecordType::CreditReturn => "I",
            RecordType::DebitReturn => "J",
            RecordType::NoticeOfChange => "S",
            RecordType::NoticeOfChangeHeader => "U",
            RecordType::NoticeOfChangeFooter => "V",
            RecordType::Footer => "Z",
        }
    }

    /// Парсит код записи, для которого существует кодек (A, C, D, E, F, I, J, Z).
    pub fn from_code(code: &str) -> Result<Self> {
        match code {
            "A" => Ok(RecordType::Header),
            "C" => Ok(RecordType::Credit),
            "D" => Ok(RecordType::Debit),
            "E" => Ok(RecordType::CreditReverse),
            "F" => Ok(RecordType::DebitReverse),
            "I" => Ok(RecordType::CreditReturn),
            "J" => Ok(RecordType::DebitReturn),
            "Z" => Ok(RecordType::Footer),
            other => Err(Error::UnrecognizedRecordType(other.to_string())),
        }
    }

    /// Проверяет, что код входит в закрытый перечень (включая S, U, V).
    pub fn is_known_code(code: &str) -> bool {
        Self::ALL.iter().any(|t| t.code() == code)
    }

    /// true для шести типов, которые переносят транзакции.
    pub fn is_transaction(self) -> bool {
        Self::TRANSACTION_ORDER.contains(&self)
    }

    /// Код открывает файл (A или U).
    pub fn is_header_code(code: &str) -> bool {
        code == "A" || code == "U"
    }

    /// Код закрывает файл (Z или V).
    pub fn is_footer_code(code: &str) -> bool {
        code == "Z" || code == "V"
    }
}

impl std::fmt::Display for RecordType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for RecordType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_code(s)
    }
}

/// Категории итоговой записи.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TotalCategory {
    /// Дебеты и возвраты дебетов (D и J).
    Debit,
    /// Кредиты и возвраты кредитов (C и I).
    Credit,
    /// Сторно кредитов (E).
    CreditReverse,
    /// Сторно дебетов (F).
    DebitReverse,
}

impl TotalCategory {
    /// Категория, в которую попадает транзакция данного типа.
    pub fn of(record_type: RecordType) -> Option<Self> {
        match record_type {
            RecordType::Debit | RecordType::DebitReturn => Some(TotalCategory::Debit),
            RecordType::Credit | RecordType::CreditReturn => Some(TotalCategory::Credit),
            RecordType::CreditReverse => Some(TotalCategory::CreditReverse),
            RecordType::DebitReverse => Some(TotalCategory::DebitReverse),
            RecordType::Header
            | RecordType::NoticeOfChange
            | RecordType::NoticeOfChangeHeader
            | RecordType::NoticeOfChangeFooter
            | RecordType::Footer => None,
        }
    }
}
