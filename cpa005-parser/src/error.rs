//! Модуль обработки ошибок библиотеки.

use crate::types::RecordType;
use crate::validation::ValidationErrors;

/// Основной тип ошибки библиотеки.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Ошибка ввода/вывода
    #[error("Ошибка ввода/вывода: {0}")]
    Io(#[from] std::io::Error),

    /// Запись короче (или длиннее) допустимого размера.
    #[error("Некорректная длина записи {record}: ожидается {expected}, получено {actual}")]
    InvalidLength {
        /// Вид записи (сегмент, заголовок, итоговая запись, строка транзакций).
        record: &'static str,
        /// Описание ожидаемой длины.
        expected: String,
        /// Фактическая длина.
        actual: usize,
    },

    /// Значение поля не удалось преобразовать к нужному типу.
    #[error("Ошибка парсинга поля {field} ({value:?}): {reason}")]
    FieldParse {
        /// Имя поля.
        field: &'static str,
        /// Исходный текст поля.
        value: String,
        /// Причина.
        reason: String,
    },

    /// Символ типа записи не входит в перечень известных кодов.
    #[error("Неизвестный тип записи: {0:?}")]
    UnrecognizedRecordType(String),

    /// Известный тип записи в недопустимой позиции.
    #[error("Неожиданный тип записи {record_type} в {context}")]
    UnexpectedRecordType {
        /// Тип записи.
        record_type: RecordType,
        /// Где встретился.
        context: String,
    },

    /// Нарушены правила валидации полей.
    #[error("Ошибка валидации: {0}")]
    Validation(#[from] ValidationErrors),

    /// Имя содержит символы, которые нельзя свести к ASCII.
    #[error("Не удалось нормализовать поле {field}: недопустимый символ {character:?}")]
    Normalization {
        /// Имя поля (или "line" для целой строки).
        field: &'static str,
        /// Первый символ вне ASCII после удаления диакритики.
        character: char,
    },

    /// Числовое значение не помещается в поле фиксированной ширины.
    #[error("Значение поля {field} ({value}) не помещается в {width} символов")]
    FieldOverflow {
        /// Имя поля.
        field: &'static str,
        /// Значение.
        value: String,
        /// Ширина поля.
        width: usize,
    },

    /// Для сборки файла нужен заголовок.
    #[error("Отсутствует заголовок файла")]
    MissingHeader,

    /// Итоговая запись расходится с набором транзакций.
    #[error("Итоговая запись не сходится по полю {total}: в файле {declared}, по транзакциям {computed}")]
    FooterMismatch {
        /// Имя итогового поля.
        total: &'static str,
        /// Значение из итоговой записи.
        declared: u64,
        /// Значение, вычисленное по транзакциям.
        computed: u64,
    },

    /// Фатальная ошибка строгого чтения с номером физической строки.
    #[error("Строка {line}: {source}")]
    Line {
        /// Номер строки (с 1).
        line: usize,
        /// Исходная ошибка.
        source: Box<Error>,
    },

    /// Восстановимая ошибка разбора одного сегмента при потоковом чтении.
    #[error("Не удалось разобрать транзакцию {record_type} №{index} в строке {line}: {source}")]
    Segment {
        /// Номер строки (с 1).
        line: usize,
        /// Номер сегмента в строке (с 0).
        index: usize,
        /// Тип записи строки.
        record_type: RecordType,
        /// Исходная ошибка.
        source: Box<Error>,
    },
}

impl Error {
    pub(crate) fn field_parse(
        field: &'static str,
        value: &str,
        reason: impl std::fmt::Display,
    ) -> Self {
        Error::FieldParse {
            field,
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn at_line(self, line: usize) -> Self {
        Error::Line {
            line,
            source: Box::new(self),
        }
    }

    /// true, если после ошибки [`crate::FileStreamer`] продолжает чтение.
    ///
    /// Это ошибки одного сегмента и ошибки одной строки: сканер пропускает
    /// сегмент или строку и переходит к следующим. Ошибка ввода/вывода
    /// завершает поток.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::Segment { .. } | Error::Line { .. })
    }

    /// true, если ошибка относится к одному сегменту строки транзакций.
    pub fn is_segment_error(&self) -> bool {
        matches!(self, Error::Segment { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_kinds() {
        let segment = Error::Segment {
            line: 2,
            index: 0,
            record_type: RecordType::Debit,
            source: Box::new(Error::MissingHeader),
        };
        assert!(segment.is_recoverable());
        assert!(segment.is_segment_error());

        let line = Error::UnrecognizedRecordType("X".into()).at_line(3);
        assert!(line.is_recoverable());
        assert!(!line.is_segment_error());

        let io = Error::Io(std::io::Error::other("диск недоступен"));
        assert!(!io.is_recoverable());
        assert!(!Error::MissingHeader.is_recoverable());
    }

    #[test]
    fn test_line_display() {
        let e = Error::MissingHeader.at_line(5);
        assert_eq!(e.to_string(), "Строка 5: Отсутствует заголовок файла");
    }
}

/// Тип Result с ошибкой библиотеки.
pub type Result<T> = std::result::Result<T, Error>;
