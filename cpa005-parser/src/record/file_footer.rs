//! Итоговая запись файла (запись Z).

use crate::error::{Error, Result};
use crate::field::{ensure_ascii, filler, is_filler, pad_number, parse_number};
use crate::record::RecordHeader;
use crate::transaction::Transaction;
use crate::types::{RecordType, TotalCategory, FOOTER_MIN_LENGTH, MAX_LINE_LENGTH};
use serde::{Deserialize, Serialize};

/// Длина заполнителя после восьми итогов.
const FOOTER_FILLER_LENGTH: usize = 1352;
const VALUE_WIDTH: usize = 14;
const COUNT_WIDTH: usize = 8;

/// Итоги по четырем категориям транзакций.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileFooter {
    #[serde(flatten)]
    pub record_header: RecordHeader,
    /// Сумма дебетов и возвратов дебетов (D и J).
    pub total_value_debit: u64,
    pub total_count_debit: u64,
    /// Сумма кредитов и возвратов кредитов (C и I).
    pub total_value_credit: u64,
    pub total_count_credit: u64,
    /// Сумма сторно кредитов (E).
    ///
    /// Старые выгрузки называют итоги по E `reverse_debit`, а по F `reverse_credit`.
    #[serde(default, alias = "total_value_reverse_debit")]
    pub total_value_credit_reversal: u64,
    #[serde(default, alias = "total_count_reverse_debit")]
    pub total_count_credit_reversal: u64,
    /// Сумма сторно дебетов (F).
    #[serde(default, alias = "total_value_reverse_credit")]
    pub total_value_debit_reversal: u64,
    #[serde(default, alias = "total_count_reverse_credit")]
    pub total_count_debit_reversal: u64,
}

impl FileFooter {
    /// Итоговая запись с нулевыми итогами.
    pub fn new(record_header: RecordHeader) -> Self {
        Self {
            record_header,
            total_value_debit: 0,
            total_count_debit: 0,
            total_value_credit: 0,
            total_count_credit: 0,
            total_value_credit_reversal: 0,
            total_count_credit_reversal: 0,
            total_value_debit_reversal: 0,
            total_count_debit_reversal: 0,
        }
    }

    /// Считает итоги по набору транзакций.
    ///
    /// Сумма, не помещающаяся в u64, дает [`Error::FieldOverflow`].
    pub fn from_transactions(record_header: RecordHeader, txns: &[Transaction]) -> Result<Self> {
        let mut footer = FileFooter::new(record_header);
        for txn in txns {
            let (value, count, field) = match TotalCategory::of(txn.record_type()) {
                Some(TotalCategory::Debit) => (
                    &mut footer.total_value_debit,
                    &mut footer.total_count_debit,
                    "total_value_debit",
                ),
                Some(TotalCategory::Credit) => (
                    &mut footer.total_value_credit,
                    &mut footer.total_count_credit,
                    "total_value_credit",
                ),
                Some(TotalCategory::CreditReverse) => (
                    &mut footer.total_value_credit_reversal,
                    &mut footer.total_count_credit_reversal,
                    "total_value_credit_reversal",
                ),
                Some(TotalCategory::DebitReverse) => (
                    &mut footer.total_value_debit_reversal,
                    &mut footer.total_count_debit_reversal,
                    "total_value_debit_reversal",
                ),
                None => continue,
            };
            let sum = value
                .checked_add(txn.amount())
                .ok_or_else(|| Error::FieldOverflow {
                    field,
                    value: format!("{} + {}", value, txn.amount()),
                    width: VALUE_WIDTH,
                })?;
            *value = sum;
            *count += 1;
        }
        Ok(footer)
    }

    /// Восемь итогов с именами полей, в порядке их записи в строку.
    pub fn totals(&self) -> [(&'static str, u64); 8] {
        [
            ("total_value_debit", self.total_value_debit),
            ("total_count_debit", self.total_count_debit),
            ("total_value_credit", self.total_value_credit),
            ("total_count_credit", self.total_count_credit),
            ("total_value_credit_reversal", self.total_value_credit_reversal),
            ("total_count_credit_reversal", self.total_count_credit_reversal),
            ("total_value_debit_reversal", self.total_value_debit_reversal),
            ("total_count_debit_reversal", self.total_count_debit_reversal),
        ]
    }

    /// Сравнивает итоги с другими и возвращает первое расхождение.
    pub fn compare(&self, computed: &FileFooter) -> Result<()> {
        for ((total, declared), (_, expected)) in self.totals().into_iter().zip(computed.totals()) {
            if declared != expected {
                return Err(Error::FooterMismatch {
                    total,
                    declared,
                    computed: expected,
                });
            }
        }
        Ok(())
    }

    /// Парсит итоговую строку. Итоги сторно могут быть заполнены пробелами.
    pub fn parse(line: &str) -> Result<Self> {
        ensure_ascii(line, line.len(), "line")?;
        if line.len() < FOOTER_MIN_LENGTH {
            return Err(Error::InvalidLength {
                record: "итоговая запись",
                expected: format!("не меньше {}", FOOTER_MIN_LENGTH),
                actual: line.len(),
            });
        }

        let record_header = RecordHeader::parse(line)?;
        if record_header.record_type != RecordType::Footer {
            return Err(Error::UnexpectedRecordType {
                record_type: record_header.record_type,
                context: "итоговой записи".to_string(),
            });
        }

        let optional = |raw: &str, field: &'static str| -> Result<u64> {
            if is_filler(raw) {
                Ok(0)
            } else {
                parse_number(raw, field)
            }
        };

        Ok(FileFooter {
            record_header,
            total_value_debit: parse_number(&line[24..38], "total_value_debit")?,
            total_count_debit: parse_number(&line[38..46], "total_count_debit")?,
            total_value_credit: parse_number(&line[46..60], "total_value_credit")?,
            total_count_credit: parse_number(&line[60..68], "total_count_credit")?,
            total_value_credit_reversal: optional(&line[68..82], "total_value_credit_reversal")?,
            total_count_credit_reversal: optional(&line[82..90], "total_count_credit_reversal")?,
            total_value_debit_reversal: optional(&line[90..104], "total_value_debit_reversal")?,
            total_count_debit_reversal: optional(&line[104..112], "total_count_debit_reversal")?,
        })
    }

    /// Сериализует итоговую запись в строку канонической длины.
    pub fn build(&self) -> Result<String> {
        let mut out = String::with_capacity(MAX_LINE_LENGTH);
        out.push_str(&self.record_header.build()?);
        for (i, (field, total)) in self.totals().into_iter().enumerate() {
            let width = if i % 2 == 0 { VALUE_WIDTH } else { COUNT_WIDTH };
            out.push_str(&pad_number(total, width, field)?);
        }
        out.push_str(&filler(FOOTER_FILLER_LENGTH));
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::{BaseTxn, Credit, CreditReturn, CreditReverse, Debit, DebitReturn};

    const VALID_FOOTER: &str = "Z000000004000000061000010000000002016500000005000000000722200000000600000000000000000000000000000000000000000000";

    fn footer_header() -> RecordHeader {
        RecordHeader::new(RecordType::Footer, "0000000610", 1)
    }

    fn with_amount(amount: u64) -> BaseTxn {
        BaseTxn {
            amount,
            ..BaseTxn::default()
        }
    }

    #[test]
    fn test_parse() {
        let footer = FileFooter::parse(VALID_FOOTER).unwrap();

        assert_eq!(footer.record_header.sequence_number, 4);
        assert_eq!(footer.record_header.originator_id, "0000000610");
        assert_eq!(footer.record_header.file_creation_number, 1);
        assert_eq!(footer.total_value_debit, 20165);
        assert_eq!(footer.total_count_debit, 5);
        assert_eq!(footer.total_value_credit, 72220);
        assert_eq!(footer.total_count_credit, 6);
        assert_eq!(footer.total_value_credit_reversal, 0);
        assert_eq!(footer.total_count_debit_reversal, 0);
    }

    #[test]
    fn test_parse_blank_reversal_totals() {
        let line = format!("{}{}", &VALID_FOOTER[..68], " ".repeat(44));
        let footer = FileFooter::parse(&line).unwrap();
        assert_eq!(footer.total_value_credit_reversal, 0);
        assert_eq!(footer.total_count_debit_reversal, 0);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            FileFooter::parse(&VALID_FOOTER[..100]),
            Err(Error::InvalidLength { .. })
        ));
        let bad = VALID_FOOTER.replacen("Z", "A", 1);
        assert!(matches!(
            FileFooter::parse(&bad),
            Err(Error::UnexpectedRecordType { .. })
        ));
        let bad = VALID_FOOTER.replacen("Z0000", "Z000é", 1);
        assert!(matches!(
            FileFooter::parse(&bad),
            Err(Error::Normalization { field: "line", character: 'é' })
        ));
        let bad = format!("{}x{}", &VALID_FOOTER[..30], &VALID_FOOTER[31..]);
        assert!(matches!(
            FileFooter::parse(&bad),
            Err(Error::FieldParse { field: "total_value_debit", .. })
        ));
    }

    #[test]
    fn test_from_transactions() {
        let txns: Vec<Transaction> = vec![
            Debit::new(with_amount(1000), None, "", "", "", "").into(),
            Credit::new(with_amount(1000), None, "", "", "", "").into(),
            DebitReturn::new(with_amount(1000), None, "", "", "", "", "").into(),
            CreditReturn::new(with_amount(1000), None, "", "", "", "", "").into(),
            CreditReverse::new(with_amount(250), None, "", "", "", "", "").into(),
        ];
        let footer = FileFooter::from_transactions(footer_header(), &txns).unwrap();

        assert_eq!(footer.total_value_debit, 2000);
        assert_eq!(footer.total_count_debit, 2);
        assert_eq!(footer.total_value_credit, 2000);
        assert_eq!(footer.total_count_credit, 2);
        assert_eq!(footer.total_value_credit_reversal, 250);
        assert_eq!(footer.total_count_credit_reversal, 1);
        assert_eq!(footer.total_count_debit_reversal, 0);
    }

    #[test]
    fn test_build() {
        let txns: Vec<Transaction> =
            vec![Debit::new(with_amount(1000), None, "", "", "", "").into()];
        let mut footer = FileFooter::from_transactions(footer_header(), &txns).unwrap();
        footer.record_header.sequence_number = 3;

        let built = footer.build().unwrap();
        assert_eq!(built.len(), MAX_LINE_LENGTH);
        assert!(built.starts_with("Z000000003000000061000010000000000100000000001"));
        assert_eq!(FileFooter::parse(&built).unwrap(), footer);
    }

    #[test]
    fn test_compare() {
        let footer = FileFooter::parse(VALID_FOOTER).unwrap();
        assert!(footer.compare(&footer.clone()).is_ok());

        let computed = FileFooter {
            total_count_credit: 7,
            ..footer.clone()
        };
        assert!(matches!(
            footer.compare(&computed),
            Err(Error::FooterMismatch {
                total: "total_count_credit",
                declared: 6,
                computed: 7
            })
        ));
    }

    #[test]
    fn test_from_transactions_overflow() {
        let txns: Vec<Transaction> = vec![
            DebitReturn::new(with_amount(u64::MAX), None, "", "", "", "", "").into(),
            Debit::new(with_amount(1), None, "", "", "", "").into(),
        ];
        assert!(matches!(
            FileFooter::from_transactions(footer_header(), &txns),
            Err(Error::FieldOverflow { field: "total_value_debit", .. })
        ));
    }

    #[test]
    fn test_json_accepts_legacy_reversal_keys() {
        let json = r#"{
            "type": "Z",
            "originator_id": "0000000610",
            "file_creation_number": 1,
            "total_value_debit": 0,
            "total_count_debit": 0,
            "total_value_credit": 0,
            "total_count_credit": 0,
            "total_value_reverse_debit": 250,
            "total_count_reverse_debit": 1,
            "total_value_reverse_credit": 125,
            "total_count_reverse_credit": 2
        }"#;
        let footer: FileFooter = serde_json::from_str(json).unwrap();
        assert_eq!(footer.total_value_credit_reversal, 250);
        assert_eq!(footer.total_count_credit_reversal, 1);
        assert_eq!(footer.total_value_debit_reversal, 125);
        assert_eq!(footer.total_count_debit_reversal, 2);

        let out = serde_json::to_value(&footer).unwrap();
        assert_eq!(out["total_value_credit_reversal"], 250);
    }
}
