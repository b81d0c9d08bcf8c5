//! Сторно кредита (запись E).

use crate::error::Result;
use crate::transaction::layout::{parse_segment, SegmentFields, Tail};
use crate::transaction::{BaseTxn, TxnRecord};
use crate::types::RecordType;
use crate::validation::{Rule, ValidationErrors, Validator};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Отмена ранее отправленного кредита.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditReverse {
    /// Общие поля.
    #[serde(flatten)]
    pub base: BaseTxn,
    /// Дата зачисления средств.
    pub date_funds_available: Option<NaiveDate>,
    /// Счет получателя.
    pub payee_account_no: String,
    /// Имя получателя.
    pub payee_name: String,
    /// Учреждение для возврата средств.
    pub return_institution_id: String,
    /// Счет для возврата средств.
    pub return_account_no: String,
    /// Номер трассировки отменяемого кредита.
    pub original_item_trace_no: String,
}

impl CreditReverse {
    /// Создает сторно кредита из общей части и полей записи.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        base: BaseTxn,
        date_funds_available: Option<NaiveDate>,
        payee_account_no: impl Into<String>,
        payee_name: impl Into<String>,
        return_institution_id: impl Into<String>,
        return_account_no: impl Into<String>,
        original_item_trace_no: impl Into<String>,
    ) -> Self {
        Self {
            base,
            date_funds_available,
            payee_account_no: payee_account_no.into(),
            payee_name: payee_name.into(),
            return_institution_id: return_institution_id.into(),
            return_account_no: return_account_no.into(),
            original_item_trace_no: original_item_trace_no.into(),
        }
    }

    /// Разбирает сегмент из 240 символов.
    pub fn parse(data: &str) -> Result<Self> {
        let s = parse_segment(data, Tail::Referencing, "date_funds_available")?;
        Ok(Self {
            base: s.base,
            date_funds_available: s.date,
            payee_account_no: s.account_no,
            payee_name: s.name,
            return_institution_id: s.counterparty_institution_id,
            return_account_no: s.counterparty_account_no,
            original_item_trace_no: s.original_item_trace_no,
        })
    }
}

impl TxnRecord for CreditReverse {
    fn record_type(&self) -> RecordType {
        RecordType::CreditReverse
    }

    fn base(&self) -> &BaseTxn {
        &self.base
    }

    fn account_no(&self) -> &str {
        &self.payee_account_no
    }

    fn name(&self) -> &str {
        &self.payee_name
    }

    fn date(&self) -> Option<NaiveDate> {
        self.date_funds_available
    }

    fn original_item_trace_no(&self) -> Option<&str> {
        Some(&self.original_item_trace_no)
    }

    fn build(&self) -> Result<String> {
        SegmentFields {
            base: &self.base,
            date: self.date_funds_available,
            account_no: &self.payee_account_no,
            name: &self.payee_name,
            name_field: "payee_name",
            counterparty_institution_id: &self.return_institution_id,
            counterparty_account_no: &self.return_account_no,
            original_item_trace_no: Some(&self.original_item_trace_no),
        }
        .build()
    }

    fn validate(&self) -> std::result::Result<(), ValidationErrors> {
        let mut v = Validator::new();
        self.base.check(&mut v);
        v.check("date_funds_available", self.date_funds_available, &[Rule::Required])
            .check(
                "payee_account_no",
                &self.payee_account_no,
                &[Rule::Required, Rule::MaxLength(12), Rule::Numeric],
            )
            .check("payee_name", &self.payee_name, &[Rule::Required, Rule::MaxLength(30)])
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
