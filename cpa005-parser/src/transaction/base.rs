//! Поля, общие для всех шести типов транзакций.

use crate::types::DEFAULT_STORED_TRANSACTION_TYPE;
use crate::validation::{Rule, ValidationErrors, Validator};
use serde::{Deserialize, Serialize};

/// Максимальная сумма, помещающаяся в 10 цифр.
pub const MAX_AMOUNT: u64 = 9_999_999_999;

/// Общая часть транзакции.
///
/// Тип записи хранится не здесь, а в варианте [`crate::Transaction`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BaseTxn {
    /// Код вида транзакции (3 цифры).
    pub txn_type: String,
    /// Сумма в центах.
    pub amount: u64,
    /// Номер трассировки (до 22 цифр).
    #[serde(default)]
    pub item_trace_no: String,
    /// Учреждение плательщика или получателя (9 цифр).
    pub institution_id: String,
    /// Хранимый тип транзакции. Используется сторно и возвратами.
    #[serde(rename = "stored_txn_type", default)]
    pub stored_transaction_type: String,
    /// Краткое имя отправителя.
    #[serde(rename = "short_name", default)]
    pub originator_short_name: String,
    /// Полное имя отправителя.
    #[serde(rename = "long_name", default)]
    pub originator_long_name: String,
    /// Идентификатор пользователя у отправителя (до 10 символов).
    #[serde(default)]
    pub user_id: String,
    /// Перекрестная ссылка отправителя (до 19 символов).
    #[serde(default)]
    pub cross_ref_no: String,
    /// Произвольное примечание (до 15 символов).
    #[serde(default)]
    pub sundry_info: String,
    /// Код расчетов (2 символа).
    #[serde(default)]
    pub settlement_code: String,
    /// Номер поля, из-за которого транзакция вернулась.
    #[serde(default)]
    pub invalid_data_element_id: String,
}

impl BaseTxn {
    /// Создает общую часть с хранимым типом `000`.
    pub fn new(
        txn_type: impl Into<String>,
        amount: u64,
        institution_id: impl Into<String>,
        item_trace_no: impl Into<String>,
        originator_short_name: impl Into<String>,
        originator_long_name: impl Into<String>,
    ) -> Self {
        Self {
            txn_type: txn_type.into(),
            amount,
            item_trace_no: item_trace_no.into(),
            institution_id: institution_id.into(),
            stored_transaction_type: DEFAULT_STORED_TRANSACTION_TYPE.to_string(),
            originator_short_name: originator_short_name.into(),
            originator_long_name: originator_long_name.into(),
            ..Self::default()
        }
    }

    /// Задает идентификатор пользователя.
    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = user_id.into();
        self
    }

    /// Задает перекрестную ссылку.
    pub fn with_cross_ref_no(mut self, cross_ref_no: impl Into<String>) -> Self {
        self.cross_ref_no = cross_ref_no.into();
        self
    }

    /// Задает примечание.
    pub fn with_sundry_info(mut self, sundry_info: impl Into<String>) -> Self {
        self.sundry_info = sundry_info.into();
        self
    }

    /// Задает код расчетов.
    pub fn with_settlement_code(mut self, settlement_code: impl Into<String>) -> Self {
        self.settlement_code = settlement_code.into();
        self
    }

    /// Задает хранимый тип транзакции (для сторно и возвратов).
    pub fn with_stored_transaction_type(mut self, stored: impl Into<String>) -> Self {
        self.stored_transaction_type = stored.into();
        self
    }

    /// Задает номер ошибочного поля (для возвратов).
    pub fn with_invalid_data_element_id(mut self, id: impl Into<String>) -> Self {
        self.invalid_data_element_id = id.into();
        self
    }

    /// Проверяет общие поля. Нарушения добавляются в `v`.
    pub(crate) fn check(&self, v: &mut Validator) {
        v.check(
            "txn_type",
            &self.txn_type,
            &[Rule::Required, Rule::Numeric, Rule::MaxLength(3)],
        )
        .check("amount", self.amount, &[Rule::Required, Rule::MaxValue(MAX_AMOUNT)])
        .check(
            "item_trace_no",
            &self.item_trace_no,
            &[Rule::Numeric, Rule::MaxLength(22)],
        )
        .check(
            "institution_id",
            &self.institution_id,
            &[Rule::Required, Rule::Numeric, Rule::MaxLength(9)],
        )
        .check(
            "stored_txn_type",
            &self.stored_transaction_type,
            &[Rule::Numeric, Rule::MaxLength(3)],
        )
        .check("short_name", &self.originator_short_name, &[Rule::MaxLength(15)])
        .check(
            "long_name",
            &self.originator_long_name,
            &[Rule::Required, Rule::MaxLength(30)],
        )
        .check("user_id", &self.user_id, &[Rule::EftAlpha, Rule::MaxLength(10)])
        .check("cross_ref_no", &self.cross_ref_no, &[Rule::EftAlpha, Rule::MaxLength(19)])
        .check("sundry_info", &self.sundry_info, &[Rule::EftAlpha, Rule::MaxLength(15)])
        .check(
            "settlement_code",
            &self.settlement_code,
            &[Rule::EftAlpha, Rule::MaxLength(2)],
        )
        .check(
            "invalid_data_element_id",
            &self.invalid_data_element_id,
            &[Rule::Numeric, Rule::MaxLength(11)],
        );
    }

    /// Проверяет только общие поля.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new();
        self.check(&mut v);
        v.finish()
    }
}
