//! Заголовок файла (запись A).

use crate::error::{Error, Result};
use crate::field::{
    decode_date, encode_optional_date, ensure_ascii, filler, pad_number, parse_number, text_field,
};
use crate::record::RecordHeader;
use crate::types::{RecordType, HEADER_MIN_LENGTH, MAX_LINE_LENGTH};
use crate::validation::{Rule, ValidationErrors, Validator};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Длина заполнителя в конце заголовка.
const HEADER_FILLER_LENGTH: usize = 1406;

/// Заголовок файла: отправитель, дата создания, получатель и валюта.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileHeader {
    /// Общий префикс строки.
    #[serde(flatten)]
    pub record_header: RecordHeader,
    /// Дата создания файла.
    pub creation_date: Option<NaiveDate>,
    /// Номер центра обработки данных получателя (до 5 цифр).
    #[serde(rename = "destination_data_center")]
    pub destination_data_center_no: u32,
    /// Необязательная область связи с участником клиринга.
    #[serde(default)]
    pub communication_area: String,
    /// Код валюты (CAD или USD).
    pub currency_code: String,
}

impl FileHeader {
    /// Создает заголовок с номером строки 1.
    pub fn new(
        originator_id: impl Into<String>,
        file_creation_number: u16,
        creation_date: Option<NaiveDate>,
        destination_data_center_no: u32,
        currency_code: impl Into<String>,
    ) -> Self {
        let mut record_header =
            RecordHeader::new(RecordType::Header, originator_id, file_creation_number);
        record_header.sequence_number = 1;
        Self {
            record_header,
            creation_date,
            destination_data_center_no,
            communication_area: String::new(),
            currency_code: currency_code.into(),
        }
    }

    /// Добавляет текст в область связи.
    pub fn with_communication_area(mut self, area: impl Into<String>) -> Self {
        self.communication_area = area.into();
        self
    }

    /// Парсит строку заголовка.
    pub fn parse(line: &str) -> Result<Self> {
        ensure_ascii(line, line.len(), "line")?;
        if line.len() < HEADER_MIN_LENGTH {
            return Err(Error::InvalidLength {
                record: "заголовок файла",
                expected: format!("не меньше {}", HEADER_MIN_LENGTH),
                actual: line.len(),
            });
        }

        let record_header = RecordHeader::parse(line)?;
        if record_header.record_type != RecordType::Header {
            return Err(Error::UnexpectedRecordType {
                record_type: record_header.record_type,
                context: "заголовке файла".to_string(),
            });
        }

        let creation_date = decode_date(&line[24..30], "creation_date")?;
        let destination_data_center_no =
            parse_number(&line[30..35], "destination_data_center")? as u32;
        let communication_area = line[35..55].trim().to_string();
        let currency_code = line[55..58].trim().to_string();

        Ok(FileHeader {
            record_header,
            creation_date,
            destination_data_center_no,
            communication_area,
            currency_code,
        })
    }

    /// Сериализует заголовок в строку канонической длины.
    pub fn build(&self) -> Result<String> {
        let mut out = String::with_capacity(MAX_LINE_LENGTH);
        out.push_str(&self.record_header.build()?);
        out.push_str(&encode_optional_date(self.creation_date));
        out.push_str(&pad_number(
            self.destination_data_center_no.into(),
            5,
            "destination_data_center",
        )?);
        out.push_str(&text_field(&self.communication_area, 20, "communication_area")?);
        out.push_str(&text_field(&self.currency_code, 3, "currency_code")?);
        out.push_str(&filler(HEADER_FILLER_LENGTH));
        Ok(out)
    }

    /// Проверяет поля заголовка.
    pub fn validate(&self) -> std::result::Result<(), ValidationErrors> {
        let mut v = Validator::new();
        v.nest("record_header", self.record_header.validate());
        if self.record_header.record_type != RecordType::Header {
            v.push(
                "type",
                Rule::RecordType,
                self.record_header.record_type.code().to_string(),
            );
        }
        v.check("creation_date", self.creation_date, &[Rule::Required])
            .check(
                "destination_data_center",
                self.destination_data_center_no,
                &[Rule::MaxValue(99_999)],
            )
            .check("communication_area", &self.communication_area, &[Rule::MaxLength(20)])
            .check(
                "currency_code",
                &self.currency_code,
                &[Rule::Required, Rule::Currency, Rule::Length(3)],
            );
        v.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const VALID_HEADER: &str = "A0000000010000000610000102313861210hello               CAD";

    #[test]
    fn test_parse() {
        let header = FileHeader::parse(VALID_HEADER).unwrap();

        let expected = FileHeader::new(
            "0000000610",
            1,
            NaiveDate::from_ymd_opt(2023, 5, 18),
            61210,
            "CAD",
        )
        .with_communication_area("hello");

        assert_eq!(header, expected);
        assert!(header.validate().is_ok());
    }

    #[test]
    fn test_build() {
        let header = FileHeader::parse(VALID_HEADER).unwrap();
        let built = header.build().unwrap();

        assert_eq!(built.len(), MAX_LINE_LENGTH);
        assert_eq!(&built[..58], VALID_HEADER);
        assert_eq!(FileHeader::parse(&built).unwrap(), header);
    }

    #[rstest]
    #[case::too_short("A123")]
    #[case::wrong_type("C0000000010000000610000102313861210hello               CAD")]
    #[case::bad_date("A00000000100000006100001      61210hello               CAD")]
    #[case::bad_data_center("A0000000010000000610000102313861a10hello               CAD")]
    fn test_parse_errors(#[case] line: &str) {
        assert!(FileHeader::parse(line).is_err());
    }

    #[test]
    fn test_parse_rejects_non_ascii() {
        let line = VALID_HEADER.replacen("hello", "héllo", 1);
        assert!(matches!(
            FileHeader::parse(&line),
            Err(Error::Normalization { field: "line", character: 'é' })
        ));
    }

    #[test]
    fn test_build_normalizes_text_fields() {
        let header = FileHeader::parse(VALID_HEADER)
            .unwrap()
            .with_communication_area("Reçu à Montréal");
        let built = header.build().unwrap();
        assert_eq!(built.len(), MAX_LINE_LENGTH);
        assert_eq!(&built[35..55], "Recu a Montreal     ");

        let header = header.with_communication_area("Платеж");
        assert!(matches!(
            header.build(),
            Err(Error::Normalization { field: "communication_area", .. })
        ));
    }

    #[rstest]
    #[case::missing_originator(
        FileHeader::new("", 1, NaiveDate::from_ymd_opt(2023, 5, 18), 61210, "CAD"),
        "record_header.originator_id"
    )]
    #[case::missing_creation_num(
        FileHeader::new("0000000610", 0, NaiveDate::from_ymd_opt(2023, 5, 18), 61210, "CAD"),
        "record_header.file_creation_number"
    )]
    #[case::missing_date(FileHeader::new("0000000610", 1, None, 61210, "CAD"), "creation_date")]
    #[case::bad_currency(
        FileHeader::new("0000000610", 1, NaiveDate::from_ymd_opt(2023, 5, 18), 61210, "AAA"),
        "currency_code"
    )]
    fn test_validate(#[case] header: FileHeader, #[case] field: &str) {
        let errors = header.validate().unwrap_err();
        assert!(errors.has_field(field), "{}", errors);
    }
}
