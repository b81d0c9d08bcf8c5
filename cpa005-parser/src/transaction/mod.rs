//! Транзакции шести типов и общий интерфейс к ним.
//!
//! Каждая транзакция занимает сегмент из 240 символов. Разметка сегмента
//! описана в модуле `layout`, варианты отличаются только тем, как называются
//! поля и что пишется в хвост сегмента.

mod base;
mod credit;
mod credit_return;
mod credit_reverse;
mod debit;
mod debit_return;
mod debit_reverse;
pub(crate) mod layout;

pub use base::{BaseTxn, MAX_AMOUNT};
pub use credit::Credit;
pub use credit_return::CreditReturn;
pub use credit_reverse::CreditReverse;
pub use debit::Debit;
pub use debit_return::DebitReturn;
pub use debit_reverse::DebitReverse;

use crate::error::{Error, Result};
use crate::types::RecordType;
use crate::validation::ValidationErrors;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Общий интерфейс транзакций.
pub trait TxnRecord {
    /// Тип записи, соответствующий варианту.
    fn record_type(&self) -> RecordType;

    /// Общие поля.
    fn base(&self) -> &BaseTxn;

    /// Счет плательщика (D, F, J) или получателя (C, E, I).
    fn account_no(&self) -> &str;

    /// Имя плательщика или получателя.
    fn name(&self) -> &str;

    /// Срок платежа или дата доступности средств.
    fn date(&self) -> Option<NaiveDate>;

    /// Номер трассировки исходной транзакции. Есть только у сторно и возвратов.
    fn original_item_trace_no(&self) -> Option<&str> {
        None
    }

    /// Сумма в центах.
    fn amount(&self) -> u64 {
        self.base().amount
    }

    /// Сериализует транзакцию в сегмент из 240 символов.
    fn build(&self) -> Result<String>;

    /// Проверяет все поля и возвращает все найденные нарушения.
    fn validate(&self) -> std::result::Result<(), ValidationErrors>;
}

/// Транзакция любого из шести типов.
///
/// В JSON тип записи хранится в поле `type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Transaction {
    #[serde(rename = "D")]
    Debit(Debit),
    #[serde(rename = "C")]
    Credit(Credit),
    #[serde(rename = "E")]
    CreditReverse(CreditReverse),
    #[serde(rename = "F")]
    DebitReverse(DebitReverse),
    #[serde(rename = "I")]
    CreditReturn(CreditReturn),
    #[serde(rename = "J")]
    DebitReturn(DebitReturn),
}

impl Transaction {
    /// Разбирает сегмент строки с типом `record_type`.
    pub fn parse(record_type: RecordType, segment: &str) -> Result<Self> {
        Ok(match record_type {
            RecordType::Debit => Transaction::Debit(Debit::parse(segment)?),
            RecordType::Credit => Transaction::Credit(Credit::parse(segment)?),
            RecordType::CreditReverse => Transaction::CreditReverse(CreditReverse::parse(segment)?),
            RecordType::DebitReverse => Transaction::DebitReverse(DebitReverse::parse(segment)?),
            RecordType::CreditReturn => Transaction::CreditReturn(CreditReturn::parse(segment)?),
            RecordType::DebitReturn => Transaction::DebitReturn(DebitReturn::parse(segment)?),
            other => {
                return Err(Error::UnexpectedRecordType {
                    record_type: other,
                    context: "строке транзакций".to_string(),
                })
            }
        })
    }

    fn record(&self) -> &dyn TxnRecord {
        match self {
            Transaction::Debit(t) => t,
            Transaction::Credit(t) => t,
            Transaction::CreditReverse(t) => t,
            Transaction::DebitReverse(t) => t,
            Transaction::CreditReturn(t) => t,
            Transaction::DebitReturn(t) => t,
        }
    }

    /// Код записи варианта.
    pub fn record_type(&self) -> RecordType {
        self.record().record_type()
    }

    /// Общие поля транзакции.
    pub fn base(&self) -> &BaseTxn {
        self.record().base()
    }

    /// Сумма в центах.
    pub fn amount(&self) -> u64 {
        self.record().amount()
    }

    /// Счет плательщика или получателя, в зависимости от варианта.
    pub fn account_no(&self) -> &str {
        self.record().account_no()
    }

    /// Имя плательщика или получателя.
    pub fn name(&self) -> &str {
        self.record().name()
    }

    /// Срок платежа для дебетов, дата зачисления для кредитов.
    pub fn date(&self) -> Option<NaiveDate> {
        self.record().date()
    }

    /// Собирает сегмент из 240 символов.
    pub fn build(&self) -> Result<String> {
        self.record().build()
    }

    /// Проверяет все поля варианта.
    pub fn validate(&self) -> std::result::Result<(), ValidationErrors> {
        self.record().validate()
    }

    /// Учреждение для возврата (D, C, E, F).
    pub fn return_institution_id(&self) -> Option<&str> {
        match self {
            Transaction::Debit(t) => Some(&t.return_institution_id),
            Transaction::Credit(t) => Some(&t.return_institution_id),
            Transaction::CreditReverse(t) => Some(&t.return_institution_id),
            Transaction::DebitReverse(t) => Some(&t.return_institution_id),
            Transaction::CreditReturn(_) | Transaction::DebitReturn(_) => None,
        }
    }

    /// Счет для возврата (D, C, E, F).
    pub fn return_account_no(&self) -> Option<&str> {
        match self {
            Transaction::Debit(t) => Some(&t.return_account_no),
            Transaction::Credit(t) => Some(&t.return_account_no),
            Transaction::CreditReverse(t) => Some(&t.return_account_no),
            Transaction::DebitReverse(t) => Some(&t.return_account_no),
            Transaction::CreditReturn(_) | Transaction::DebitReturn(_) => None,
        }
    }

    /// Учреждение исходной транзакции (I, J).
    pub fn original_institution_id(&self) -> Option<&str> {
        match self {
            Transaction::CreditReturn(t) => Some(&t.original_institution_id),
            Transaction::DebitReturn(t) => Some(&t.original_institution_id),
            _ => None,
        }
    }

    /// Счет исходной транзакции (I, J).
    pub fn original_account_no(&self) -> Option<&str> {
        match self {
            Transaction::CreditReturn(t) => Some(&t.original_account_no),
            Transaction::DebitReturn(t) => Some(&t.original_account_no),
            _ => None,
        }
    }

    /// Номер трассировки исходной транзакции (E, F, I, J).
    pub fn original_item_trace_no(&self) -> Option<&str> {
        self.record().original_item_trace_no()
    }
}

impl From<Debit> for Transaction {
    fn from(t: Debit) -> Self {
        Transaction::Debit(t)
    }
}

impl From<Credit> for Transaction {
    fn from(t: Credit) -> Self {
        Transaction::Credit(t)
    }
}

impl From<CreditReverse> for Transaction {
    fn from(t: CreditReverse) -> Self {
        Transaction::CreditReverse(t)
    }
}

impl From<DebitReverse> for Transaction {
    fn from(t: DebitReverse) -> Self {
        Transaction::DebitReverse(t)
    }
}

impl From<CreditReturn> for Transaction {
    fn from(t: CreditReturn) -> Self {
        Transaction::CreditReturn(t)
    }
}

impl From<DebitReturn> for Transaction {
    fn from(t: DebitReturn) -> Self {
        Transaction::DebitReturn(t)
    }
}
