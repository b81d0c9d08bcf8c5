//! Сторно дебета (запись F).

use crate::error::Result;
use crate::transaction::layout::{parse_segment, SegmentFields, Tail};
use crate::transaction::{BaseTxn, TxnRecord};
use crate::types::RecordType;
use crate::validation::{Rule, ValidationErrors, Validator};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Отмена ранее отправленного дебета.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebitReverse {
    /// Общие поля.
    #[serde(flatten)]
    pub base: BaseTxn,
    /// Срок платежа.
    pub due_date: Option<NaiveDate>,
    /// Счет плательщика.
    pub payor_account_no: String,
    /// Имя плательщика.
    pub payor_name: String,
    /// Учреждение для возврата средств.
    pub return_institution_id: String,
    /// Счет для возврата средств.
    pub return_account_no: String,
    /// Номер трассировки отменяемого дебета.
    pub original_item_trace_no: String,
}

impl DebitReverse {
    /// Создает сторно дебета из общей части и полей записи.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        base: BaseTxn,
        due_date: Option<NaiveDate>,
        payor_account_no: impl Into<String>,
        payor_name: impl Into<String>,
        return_institution_id: impl Into<String>,
        return_account_no: impl Into<String>,
        original_item_trace_no: impl Into<String>,
    ) -> Self {
        Self {
            base,
            due_date,
            payor_account_no: payor_account_no.into(),
            payor_name: payor_name.into(),
            return_institution_id: return_institution_id.into(),
            return_account_no: return_account_no.into(),
            original_item_trace_no: original_item_trace_no.into(),
        }
    }

    /// Разбирает сегмент из 240 символов.
    pub fn parse(data: &str) -> Result<Self> {
        let s = parse_segment(data, Tail::Referencing, "due_date")?;
        Ok(Self {
            base: s.base,
            due_date: s.date,
            payor_account_no: s.account_no,
            payor_name: s.name,
            return_institution_id: s.counterparty_institution_id,
            return_account_no: s.counterparty_account_no,
            original_item_trace_no: s.original_item_trace_no,
        })
    }
}

impl TxnRecord for DebitReverse {
    fn record_type(&self) -> RecordType {
        RecordType::DebitReverse
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

    fn original_item_trace_no(&self) -> Option<&str> {
        Some(&self.original_item_trace_no)
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
            original_item_trace_no: Some(&self.original_item_trace_no),
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
            )
            .check(
                "original_item_trace_no",
                &self.original_item_trace_no,
                &[Rule::Required, Rule::Numeric, Rule::MaxLength(22)],
            );
        v.finish()
    }
}
