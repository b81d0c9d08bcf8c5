//! Дебет (запись D).

use crate::error::Result;
use crate::transaction::layout::{parse_segment, SegmentFields, Tail};
use crate::transaction::{BaseTxn, TxnRecord};
use crate::types::RecordType;
use crate::validation::{Rule, ValidationErrors, Validator};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Списание со счета плательщика.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Debit {
    /// Общие поля.
    #[serde(flatten)]
    pub base: BaseTxn,
    /// Дата, к которой должен быть произведен платеж.
    pub due_date: Option<NaiveDate>,
    /// Счет плательщика.
    pub payor_account_no: String,
    /// Имя плательщика.
    pub payor_name: String,
    /// Учреждение для возврата средств.
    pub return_institution_id: String,
    /// Счет для возврата средств.
    pub return_account_no: String,
}

impl Debit {
    /// Создает дебет из общей части и полей записи.
    pub fn new(
        base: BaseTxn,
        due_date: Option<NaiveDate>,
        payor_account_no: impl Into<String>,
        payor_name: impl Into<String>,
        return_institution_id: impl Into<String>,
        return_account_no: impl Into<String>,
    ) -> Self {
        Self {
            base,
            due_date,
            payor_account_no: payor_account_no.into(),
            payor_name: payor_name.into(),
            return_institution_id: return_institution_id.into(),
            return_account_no: return_account_no.into(),
        }
    }

    /// Разбирает сегмент из 240 символов.
    pub fn parse(data: &str) -> Result<Self> {
        let s = parse_segment(data, Tail::Plain, "due_date")?;
        Ok(Self {
            base: s.base,
            due_date: s.date,
            payor_account_no: s.account_no,
            payor_name: s.name,
            return_institution_id: s.counterparty_institution_id,
            return_account_no: s.counterparty_account_no,
        })
    }
}

impl TxnRecord for Debit {
    fn record_type(&self) -> RecordType {
        RecordType::Debit
    }

    fn base(&self) -> &BaseTxn {
        &self.base
    }

    fn account_no(&self) -> &str {
        &self.payor_account_no
    }

    fn name(&self) -> &str {
        &self.payor_name
    }

    fn date(&self) -> Option<NaiveDate> {
        self.due_date
    }

    fn build(&self) -> Result<String> {
        SegmentFields {
            base: &self.base,
            date: self.due_date,
            account_no: &self.payor_account_no,
            name: &self.payor_name,
            name_field: "payor_name",
            counterparty_institution_id: &self.return_institution_id,
            counterparty_account_no: &self.return_account_no,
            original_item_trace_no: None,
        }
        .build()
    }

    fn validate(&self) -> std::result::Result<(), ValidationErrors> {
        let mut v = Validator::new();
        self.base.check(&mut v);
        v.check("due_date", self.due_date, &[Rule::Required])
            .check(
                "payor_account_no",
                &self.payor_account_no,
                &[Rule::Required, Rule::MaxLength(12), Rule::Numeric],
            )
            .check("payor_name", &self.payor_name, &[Rule::Required, Rule::MaxLength(30)])
            .check(
                "return_institution_id",
                &self.return_institution_id,
                &[Rule::Required, Rule::MaxLength(9), Rule::Numeric],
            )
            .check(
                "return_account_no",
                &self.return_account_no,
                &[Rule::Required, Rule::MaxLength(12), Rule::EftAlpha],
            );
        v.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::transaction::tests::{build_date, PARSE_SEGMENT};
    use rstest::rstest;

    #[test]
    fn test_parse() {
        let debit = Debit::parse(PARSE_SEGMENT).unwrap();

        let base = BaseTxn {
            item_trace_no: "6121006100001000000003".into(),
            user_id: "0000000110".into(),
            cross_ref_no: "1140".into(),
            ..BaseTxn::new("450", 4042, "061214821", "", "BANK OF MONTREA", "BANK OF MONTREA")
        };
        let expected = Debit::new(
            base,
            NaiveDate::from_ymd_opt(2023, 5, 17),
            "101000000303",
            "D1-1-OCC ZERO",
            "000101261",
            "8989899",
        );
        assert_eq!(debit, expected);
    }

    #[rstest]
    #[case::empty("")]
    #[case::short("4500000004042023137")]
    fn test_parse_invalid_length(#[case] data: &str) {
        assert!(matches!(Debit::parse(data), Err(Error::InvalidLength { .. })));
    }

    #[test]
    fn test_parse_bad_amount() {
        let data = PARSE_SEGMENT.replacen("0000004042", "000000404a", 1);
        assert!(matches!(
            Debit::parse(&data),
            Err(Error::FieldParse { field: "amount", .. })
        ));
    }

    #[test]
    fn test_build() {
        let base = BaseTxn::new("400", 999, "123456789", "", "SHORT-NAME", "LONG-NAME")
            .with_user_id("54321")
            .with_cross_ref_no("123")
            .with_settlement_code("01");
        let debit = Debit::new(
            base,
            Some(build_date()),
            "123456789012",
            "RECEIVER NAME",
            "123456789",
            "210987654321",
        );
        assert_eq!(
            debit.build().unwrap(),
            "40000000009990232411234567891234567890120000000000000000000000000SHORT-NAME     RECEIVER NAME                 LONG-NAME                     54321     123                123456789210987654321                                     0100000000000"
        );
    }

    #[test]
    fn test_build_normalizes_text_fields() {
        let mut debit = valid();
        debit.payor_account_no = "12é".to_string();
        debit.base.sundry_info = "Crème brûlée".to_string();
        let data = debit.build().unwrap();
        assert_eq!(data.chars().count(), 240);
        assert_eq!(data.len(), 240);
        assert!(data.contains("12e "));
        assert!(data.contains("Creme brulee"));

        debit.base.user_id = "Пользователь".to_string();
        assert!(matches!(
            debit.build(),
            Err(Error::Normalization { field: "user_id", character: 'П' })
        ));
    }

    #[rstest]
    #[case::missing_due_date(Debit { due_date: None, ..valid() }, "due_date")]
    #[case::account_not_numeric(
        Debit { payor_account_no: "12ab".into(), ..valid() },
        "payor_account_no"
    )]
    #[case::name_too_long(Debit { payor_name: "X".repeat(31), ..valid() }, "payor_name")]
    #[case::missing_return_institution(
        Debit { return_institution_id: "".into(), ..valid() },
        "return_institution_id"
    )]
    #[case::bad_return_account(
        Debit { return_account_no: "12/34".into(), ..valid() },
        "return_account_no"
    )]
    fn test_validate(#[case] debit: Debit, #[case] field: &str) {
        let errors = debit.validate().unwrap_err();
        assert!(errors.has_field(field), "{}", errors);
    }

    fn valid() -> Debit {
        let base = BaseTxn::new("450", 100, "123456789", "1234", "SHORT", "LONG NAME");
        Debit::new(base, Some(build_date()), "12345", "PAYOR", "987654321", "2109876")
    }

    #[test]
    fn test_validate_ok() {
        assert!(valid().validate().is_ok());
    }
}
