//! Разметка 240-символьного сегмента транзакции.
//!
//! Все шесть вариантов делят первые 169 символов. Дальше идут реквизиты
//! встречной стороны (учреждение и счет для возврата либо исходные), прочая
//! информация, и в конце либо заполнитель (D, C), либо номер исходной
//! трассировки и идентификатор ошибочного поля (E, F, I, J).
//!
//! | Смещение | Длина | Поле                                     |
//! |----------|-------|------------------------------------------|
//! | 0        | 3     | тип транзакции                           |
//! | 3        | 10    | сумма                                    |
//! | 13       | 6     | дата                                     |
//! | 19       | 9     | учреждение                               |
//! | 28       | 12    | счет плательщика/получателя              |
//! | 40       | 22    | номер трассировки                        |
//! | 62       | 3     | хранимый тип транзакции                  |
//! | 65       | 15    | краткое имя отправителя                  |
//! | 80       | 30    | имя плательщика/получателя               |
//! | 110      | 30    | полное имя отправителя                   |
//! | 140      | 10    | идентификатор пользователя               |
//! | 150      | 19    | перекрестная ссылка                      |
//! | 169      | 9     | учреждение для возврата / исходное       |
//! | 178      | 12    | счет для возврата / исходный             |
//! | 190      | 15    | прочая информация                        |
//! | 205      | 22    | заполнитель / исходный номер трассировки |
//! | 227      | 2     | код расчетов                             |
//! | 229      | 11    | нули / идентификатор ошибочного поля     |

use crate::error::{Error, Result};
use crate::field::{
    decode_date, encode_optional_date, filler, format_name, pad_number, pad_numeric,
    pad_trailing_zeros, parse_number, text_field,
};
use crate::transaction::BaseTxn;
use crate::types::SEGMENT_LENGTH;
use chrono::NaiveDate;

/// Форма хвоста сегмента.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Tail {
    /// D и C: заполнитель вместо исходной трассировки.
    Plain,
    /// E, F, I, J: исходная трассировка и идентификатор ошибочного поля.
    Referencing,
}

/// Сегмент, разобранный на поля без привязки к варианту.
#[derive(Debug)]
pub(crate) struct ParsedSegment {
    pub base: BaseTxn,
    pub date: Option<NaiveDate>,
    pub account_no: String,
    pub name: String,
    pub counterparty_institution_id: String,
    pub counterparty_account_no: String,
    pub original_item_trace_no: String,
}

/// Поля варианта, которые нужно записать в сегмент.
pub(crate) struct SegmentFields<'a> {
    pub base: &'a BaseTxn,
    pub date: Option<NaiveDate>,
    pub account_no: &'a str,
    pub name: &'a str,
    pub name_field: &'static str,
    pub counterparty_institution_id: &'a str,
    pub counterparty_account_no: &'a str,
    /// None для хвоста [`Tail::Plain`].
    pub original_item_trace_no: Option<&'a str>,
}

struct Cursor<'a> {
    data: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn take(&mut self, len: usize) -> &'a str {
        let s = &self.data[self.pos..self.pos + len];
        self.pos += len;
        s
    }

    fn text(&mut self, len: usize) -> String {
        self.take(len).trim().to_string()
    }
}

/// Разбирает сегмент. Длина должна быть ровно 240 символов.
pub(crate) fn parse_segment(
    data: &str,
    tail: Tail,
    date_field: &'static str,
) -> Result<ParsedSegment> {
    if data.len() != SEGMENT_LENGTH {
        return Err(Error::InvalidLength {
            record: "сегмент транзакции",
            expected: SEGMENT_LENGTH.to_string(),
            actual: data.len(),
        });
    }
    if let Some(character) = data.chars().find(|c| !c.is_ascii()) {
        return Err(Error::Normalization {
            field: "segment",
            character,
        });
    }

    let mut c = Cursor { data, pos: 0 };
    let txn_type = c.take(3).to_string();
    let amount = parse_number(c.take(10), "amount")?;
    let date = decode_date(c.take(6), date_field)?;
    let institution_id = c.take(9).to_string();
    let account_no = c.text(12);
    let item_trace_no = c.take(22).to_string();
    let stored_transaction_type = c.take(3).to_string();
    let originator_short_name = c.text(15);
    let name = c.text(30);
    let originator_long_name = c.text(30);
    let user_id = c.text(10);
    let cross_ref_no = c.text(19);
    let counterparty_institution_id = c.text(9);
    let counterparty_account_no = c.text(12);
    let sundry_info = c.text(15);

    let (original_item_trace_no, settlement_code, invalid_data_element_id) = match tail {
        Tail::Plain => {
            c.take(22);
            let settlement = c.text(2);
            (String::new(), settlement, String::new())
        }
        Tail::Referencing => {
            let original = c.text(22);
            let settlement = c.text(2);
            (original, settlement, c.text(11))
        }
    };

    Ok(ParsedSegment {
        base: BaseTxn {
            txn_type,
            amount,
            item_trace_no,
            institution_id,
            stored_transaction_type,
            originator_short_name,
            originator_long_name,
            user_id,
            cross_ref_no,
            sundry_info,
            settlement_code,
            invalid_data_element_id,
        },
        date,
        account_no,
        name,
        counterparty_institution_id,
        counterparty_account_no,
        original_item_trace_no,
    })
}

impl SegmentFields<'_> {
    /// Собирает сегмент ровно из 240 символов.
    pub(crate) fn build(&self) -> Result<String> {
        let base = self.base;
        let mut out = String::with_capacity(SEGMENT_LENGTH);

        out.push_str(&pad_numeric(&base.txn_type, 3, "txn_type")?);
        out.push_str(&pad_number(base.amount, 10, "amount")?);
        out.push_str(&encode_optional_date(self.date));
        out.push_str(&pad_numeric(&base.institution_id, 9, "institution_id")?);
        out.push_str(&text_field(self.account_no, 12, "account_no")?);
        out.push_str(&pad_numeric(&base.item_trace_no, 22, "item_trace_no")?);
        out.push_str(&pad_numeric(
            &base.stored_transaction_type,
            3,
            "stored_txn_type",
        )?);
        out.push_str(&format_name(&base.originator_short_name, 15, "short_name")?);
        out.push_str(&format_name(self.name, 30, self.name_field)?);
        out.push_str(&format_name(&base.originator_long_name, 30, "long_name")?);
        out.push_str(&text_field(&base.user_id, 10, "user_id")?);
        out.push_str(&text_field(&base.cross_ref_no, 19, "cross_ref_no")?);
        out.push_str(&pad_numeric(
            self.counterparty_institution_id,
            9,
            "counterparty_institution_id",
        )?);
        out.push_str(&text_field(
            self.counterparty_account_no,
            12,
            "counterparty_account_no",
        )?);
        out.push_str(&text_field(&base.sundry_info, 15, "sundry_info")?);

        match self.original_item_trace_no {
            None => {
                out.push_str(&filler(22));
                out.push_str(&text_field(&base.settlement_code, 2, "settlement_code")?);
                out.push_str(&pad_number(0, 11, "invalid_data_element_id")?);
            }
            Some(original) => {
                out.push_str(&pad_numeric(original, 22, "original_item_trace_no")?);
                out.push_str(&text_field(&base.settlement_code, 2, "settlement_code")?);
                out.push_str(&pad_trailing_zeros(
                    &base.invalid_data_element_id,
                    11,
                    "invalid_data_element_id",
                )?);
            }
        }

        if out.len() != SEGMENT_LENGTH {
            return Err(Error::InvalidLength {
                record: "сегмент транзакции",
                expected: SEGMENT_LENGTH.to_string(),
                actual: out.len(),
            });
        }
        Ok(out)
    }
}
