//! Файл целиком: заголовок, транзакции и итоговая запись.

use crate::error::{Error, Result};
use crate::record::{FileFooter, FileHeader, RecordHeader};
use crate::transaction::{
    Credit, CreditReturn, CreditReverse, Debit, DebitReturn, DebitReverse, Transaction,
};
use crate::types::RecordType;
use crate::validation::{Rule, ValidationErrors, Validator};
use serde::{Deserialize, Serialize};

/// Файл формата 005 в памяти.
///
/// Порядок транзакций задает вызывающий код. При сборке они группируются
/// по типу записи, поэтому порядок строк в результате может отличаться.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct File {
    /// Заголовок (запись A). Обязателен для сборки.
    #[serde(rename = "file_header", default, skip_serializing_if = "Option::is_none")]
    pub header: Option<FileHeader>,
    /// Транзакции в порядке, заданном вызывающим кодом или прочитанном из файла.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub transactions: Vec<Transaction>,
    /// Итоговая запись. При сборке без нее итоги считаются по транзакциям.
    #[serde(rename = "file_footer", default, skip_serializing_if = "Option::is_none")]
    pub footer: Option<FileFooter>,
}

impl File {
    /// Создает файл без итоговой записи.
    pub fn new(header: FileHeader, transactions: Vec<Transaction>) -> Self {
        Self {
            header: Some(header),
            transactions,
            footer: None,
        }
    }

    /// Задает итоговую запись, которая будет использована при сборке как есть.
    pub fn with_footer(mut self, footer: FileFooter) -> Self {
        self.footer = Some(footer);
        self
    }

    /// Дебеты (D) в порядке следования в файле.
    pub fn debits(&self) -> Vec<&Debit> {
        self.transactions
            .iter()
            .filter_map(|t| match t {
                Transaction::Debit(d) => Some(d),
                _ => None,
            })
            .collect()
    }

    /// Кредиты (C).
    pub fn credits(&self) -> Vec<&Credit> {
        self.transactions
            .iter()
            .filter_map(|t| match t {
                Transaction::Credit(c) => Some(c),
                _ => None,
            })
            .collect()
    }

    /// Возвраты дебетов (J).
    pub fn debit_returns(&self) -> Vec<&DebitReturn> {
        self.transactions
            .iter()
            .filter_map(|t| match t {
                Transaction::DebitReturn(r) => Some(r),
                _ => None,
            })
            .collect()
    }

    /// Возвраты кредитов (I).
    pub fn credit_returns(&self) -> Vec<&CreditReturn> {
        self.transactions
            .iter()
            .filter_map(|t| match t {
                Transaction::CreditReturn(r) => Some(r),
                _ => None,
            })
            .collect()
    }

    /// Сторно дебетов (F).
    pub fn debit_reversals(&self) -> Vec<&DebitReverse> {
        self.transactions
            .iter()
            .filter_map(|t| match t {
                Transaction::DebitReverse(r) => Some(r),
                _ => None,
            })
            .collect()
    }

    /// Сторно кредитов (E).
    pub fn credit_reversals(&self) -> Vec<&CreditReverse> {
        self.transactions
            .iter()
            .filter_map(|t| match t {
                Transaction::CreditReverse(r) => Some(r),
                _ => None,
            })
            .collect()
    }

    /// Итоговая запись, посчитанная по транзакциям.
    ///
    /// Отправитель и номер файла берутся из заголовка.
    pub fn computed_footer(&self) -> Result<FileFooter> {
        let header = self.header.as_ref().ok_or(Error::MissingHeader)?;
        let record_header = RecordHeader::new(
            RecordType::Footer,
            header.record_header.originator_id.clone(),
            header.record_header.file_creation_number,
        );
        FileFooter::from_transactions(record_header, &self.transactions)
    }

    /// Сверяет итоговую запись с транзакциями.
    ///
    /// Файл без итоговой записи считается согласованным.
    pub fn verify_footer(&self) -> Result<()> {
        let Some(footer) = &self.footer else {
            return Ok(());
        };
        let computed =
            FileFooter::from_transactions(footer.record_header.clone(), &self.transactions)?;
        footer.compare(&computed)
    }

    /// Проверяет заголовок и каждую транзакцию, собирая все нарушения.
    pub fn validate(&self) -> std::result::Result<(), ValidationErrors> {
        let mut v = Validator::new();
        match &self.header {
            Some(header) => {
                v.nest("file_header", header.validate());
            }
            None => v.push("file_header", Rule::Required, "null".to_string()),
        }
        for (i, txn) in self.transactions.iter().enumerate() {
            v.nest(&format!("transaction[{}]", i), txn.validate());
        }
        v.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::BaseTxn;
    use chrono::NaiveDate;

    fn header() -> FileHeader {
        FileHeader::new("0000000610", 1, NaiveDate::from_ymd_opt(2023, 5, 18), 61210, "CAD")
    }

    fn base(amount: u64) -> BaseTxn {
        BaseTxn::new("450", amount, "123456789", "1234", "SHORT", "LONG NAME")
    }

    fn sample() -> File {
        let date = NaiveDate::from_ymd_opt(2023, 8, 29);
        File::new(
            header(),
            vec![
                Debit::new(base(100), date, "12345", "PAYOR", "987654321", "2109876").into(),
                Credit::new(base(200), date, "12345", "PAYEE", "987654321", "2109876").into(),
                DebitReturn::new(base(300), date, "12345", "PAYOR", "987654321", "2109876", "1")
                    .into(),
                Credit::new(base(400), date, "12345", "PAYEE", "987654321", "2109876").into(),
            ],
        )
    }

    #[test]
    fn test_category_views() {
        let file = sample();
        assert_eq!(file.debits().len(), 1);
        assert_eq!(file.credits().len(), 2);
        assert_eq!(file.debit_returns().len(), 1);
        assert!(file.credit_returns().is_empty());
        assert!(file.debit_reversals().is_empty());
        assert!(file.credit_reversals().is_empty());
        assert_eq!(file.credits()[1].base.amount, 400);
    }

    #[test]
    fn test_computed_footer() {
        let footer = sample().computed_footer().unwrap();
        assert_eq!(footer.record_header.originator_id, "0000000610");
        assert_eq!(footer.total_value_debit, 400);
        assert_eq!(footer.total_count_debit, 2);
        assert_eq!(footer.total_value_credit, 600);
        assert_eq!(footer.total_count_credit, 2);

        assert!(matches!(File::default().computed_footer(), Err(Error::MissingHeader)));
    }

    #[test]
    fn test_verify_footer() {
        let file = sample();
        assert!(file.verify_footer().is_ok());

        let mut footer = file.computed_footer().unwrap();
        footer.total_value_credit += 1;
        let file = file.with_footer(footer);
        assert!(matches!(
            file.verify_footer(),
            Err(Error::FooterMismatch { total: "total_value_credit", .. })
        ));
    }

    #[test]
    fn test_validate_aggregates() {
        assert!(sample().validate().is_ok());

        let mut file = sample();
        file.header = None;
        if let Transaction::Credit(c) = &mut file.transactions[1] {
            c.payee_name.clear();
            c.payee_account_no.clear();
        }
        let errors = file.validate().unwrap_err();
        assert!(errors.has_field("file_header"));
        assert!(errors.has_field("transaction[1].payee_name"));
        assert!(errors.has_field("transaction[1].payee_account_no"));
        assert_eq!(errors.violations().len(), 3);
    }

    #[test]
    fn test_json_shape() {
        let json = serde_json::to_value(sample()).unwrap();
        assert!(json.get("file_header").is_some());
        assert!(json.get("file_footer").is_none());
        assert_eq!(json["transactions"][2]["type"], "J");
        assert_eq!(json["file_header"]["type"], "A");
        assert_eq!(json["file_header"]["creation_date"], "2023-05-18");

        let back: File = serde_json::from_value(json).unwrap();
        assert_eq!(back.transactions, sample().transactions);
    }
}
