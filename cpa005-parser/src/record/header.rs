//! Общий префикс строк заголовка, транзакций и итогов.

use crate::error::{Error, Result};
use crate::field::{ensure_ascii, pad_number, pad_numeric, parse_number};
use crate::types::{RecordType, RECORD_HEADER_LENGTH};
use crate::validation::{Rule, ValidationErrors, Validator};
use serde::{Deserialize, Serialize};

/// Префикс строки: тип записи, номер строки, отправитель и номер файла.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordHeader {
    /// Тип записи.
    #[serde(rename = "type")]
    pub record_type: RecordType,
    /// Идентификатор отправителя (10 символов).
    pub originator_id: String,
    /// Номер создания файла (до 4 цифр).
    pub file_creation_number: u16,
    /// Порядковый номер физической строки. Проставляется при сборке файла.
    #[serde(skip)]
    pub sequence_number: u32,
}

impl RecordHeader {
    /// Создает префикс с нулевым номером строки.
    pub fn new(
        record_type: RecordType,
        originator_id: impl Into<String>,
        file_creation_number: u16,
    ) -> Self {
        Self {
            record_type,
            originator_id: originator_id.into(),
            file_creation_number,
            sequence_number: 0,
        }
    }

    /// Копия префикса с другим типом записи и номером строки.
    pub fn for_line(&self, record_type: RecordType, sequence_number: u32) -> Self {
        Self {
            record_type,
            sequence_number,
            ..self.clone()
        }
    }

    /// Парсит первые 24 символа строки.
    pub fn parse(line: &str) -> Result<Self> {
        ensure_ascii(line, RECORD_HEADER_LENGTH, "record_header")?;
        let prefix = line
            .get(..RECORD_HEADER_LENGTH)
            .ok_or_else(|| Error::InvalidLength {
                record: "префикс записи",
                expected: format!("не меньше {}", RECORD_HEADER_LENGTH),
                actual: line.len(),
            })?;

        let record_type = RecordType::from_code(&prefix[..1])?;
        let sequence_number = parse_number(&prefix[1..10], "sequence_number")? as u32;
        let originator_id = prefix[10..20].trim().to_string();
        let file_creation_number = parse_number(&prefix[20..24], "file_creation_number")? as u16;

        Ok(RecordHeader {
            record_type,
            originator_id,
            file_creation_number,
            sequence_number,
        })
    }

    /// Сериализует префикс, всегда ровно 24 символа.
    pub fn build(&self) -> Result<String> {
        let mut out = String::with_capacity(RECORD_HEADER_LENGTH);
        out.push_str(self.record_type.code());
        out.push_str(&pad_number(self.sequence_number.into(), 9, "sequence_number")?);
        out.push_str(&pad_numeric(&self.originator_id, 10, "originator_id")?);
        out.push_str(&pad_number(self.file_creation_number.into(), 4, "file_creation_number")?);
        Ok(out)
    }

    /// Проверяет поля префикса.
    pub fn validate(&self) -> std::result::Result<(), ValidationErrors> {
        let mut v = Validator::new();
        v.check("type", self.record_type.code(), &[Rule::RecordType])
            .check(
                "originator_id",
                &self.originator_id,
                &[Rule::Required, Rule::EftAlpha, Rule::Length(10)],
            )
            .check(
                "file_creation_number",
                self.file_creation_number,
                &[Rule::Required, Rule::MaxValue(9999)],
            );
        v.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        let header = RecordHeader::parse("A0000000010000000610000102313861210").unwrap();
        assert_eq!(header.record_type, RecordType::Header);
        assert_eq!(header.sequence_number, 1);
        assert_eq!(header.originator_id, "0000000610");
        assert_eq!(header.file_creation_number, 1);
    }

    #[test]
    fn test_build_roundtrip() {
        let mut header = RecordHeader::new(RecordType::Footer, "ORIGIN0001", 42);
        header.sequence_number = 17;
        let built = header.build().unwrap();
        assert_eq!(built, "Z000000017ORIGIN00010042");
        assert_eq!(built.len(), RECORD_HEADER_LENGTH);
        assert_eq!(RecordHeader::parse(&built).unwrap(), header);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            RecordHeader::parse("A12"),
            Err(Error::InvalidLength { .. })
        ));
        assert!(matches!(
            RecordHeader::parse("X0000000010000000610000102"),
            Err(Error::UnrecognizedRecordType(_))
        ));
        assert!(matches!(
            RecordHeader::parse("A00000000a0000000610000102"),
            Err(Error::FieldParse { field: "sequence_number", .. })
        ));
        assert!(matches!(
            RecordHeader::parse("A000000001ORIGINATÉR0001"),
            Err(Error::Normalization { field: "record_header", character: 'É' })
        ));
    }

    #[test]
    fn test_build_rejects_overflow() {
        let header = RecordHeader::new(RecordType::Header, "ORIGINATOR-ID", 1);
        assert!(matches!(
            header.build(),
            Err(Error::FieldOverflow { field: "originator_id", .. })
        ));
        let header = RecordHeader::new(RecordType::Header, "0000000610", 10_000);
        assert!(header.build().is_err());
    }

    #[test]
    fn test_validate() {
        let header = RecordHeader::new(RecordType::Header, "", 0);
        let errors = header.validate().unwrap_err();
        assert!(errors.has_field("originator_id"));
        assert!(errors.has_field("file_creation_number"));
    }
}
