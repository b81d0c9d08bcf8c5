//! Кодирование примитивных полей фиксированной ширины.
//!
//! Числовые поля выравниваются вправо и дополняются нулями, текстовые
//! выравниваются влево, дополняются пробелами и обрезаются по ширине.
//! Даты пишутся как `0YYDDD`: ведущий ноль, две цифры года (2000-е) и
//! номер дня в году.

use crate::error::{Error, Result};
use chrono::{Datelike, NaiveDate};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Длина поля даты.
pub const DATE_LENGTH: usize = 6;

/// Число, дополненное нулями слева до `width`.
pub fn pad_number(value: u64, width: usize, field: &'static str) -> Result<String> {
    let s = format!("{:0width$}", value, width = width);
    if s.len() > width {
        return Err(Error::FieldOverflow {
            field,
            value: value.to_string(),
            width,
        });
    }
    Ok(s)
}

/// Строка из цифр, дополненная нулями слева до `width`.
pub fn pad_numeric(value: &str, width: usize, field: &'static str) -> Result<String> {
    let value = fit_width(value, width, field)?;
    Ok(format!("{:0>width$}", value, width = width))
}

/// Строка, выровненная влево и дополненная нулями справа до `width`.
pub fn pad_trailing_zeros(value: &str, width: usize, field: &'static str) -> Result<String> {
    let value = fit_width(value, width, field)?;
    Ok(format!("{:0<width$}", value, width = width))
}

/// Нормализованное значение, которое помещается в `width` символов.
fn fit_width(value: &str, width: usize, field: &'static str) -> Result<String> {
    let value = normalize_field(value, field)?;
    if value.len() > width {
        return Err(Error::FieldOverflow { field, value, width });
    }
    Ok(value)
}

/// Текст, обрезанный или дополненный пробелами до `width`.
///
/// Ширина считается в символах, поэтому на вход подается уже нормализованный текст.
pub fn fit_text(value: &str, width: usize) -> String {
    let truncated: String = value.chars().take(width).collect();
    format!("{:<width$}", truncated, width = width)
}

/// Нормализует текстовое поле и приводит его к ширине `width`.
pub fn text_field(value: &str, width: usize, field: &'static str) -> Result<String> {
    Ok(fit_text(&normalize_field(value, field)?, width))
}

/// Заполнитель из пробелов.
pub fn filler(width: usize) -> String {
    " ".repeat(width)
}

/// true, если область целиком состоит из пробелов.
pub fn is_filler(s: &str) -> bool {
    s.bytes().all(|b| b == b' ')
}

/// Парсит неотрицательное число из поля, состоящего только из цифр.
pub fn parse_number(raw: &str, field: &'static str) -> Result<u64> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::field_parse(field, raw, "ожидаются только цифры"));
    }
    raw.parse()
        .map_err(|e: std::num::ParseIntError| Error::field_parse(field, raw, e))
}

/// Кодирует дату в формат `0YYDDD`.
pub fn encode_date(date: NaiveDate) -> String {
    format!("0{:02}{:03}", date.year().rem_euclid(100), date.ordinal())
}

/// Кодирует необязательную дату; отсутствующая дата пишется нулями.
pub fn encode_optional_date(date: Option<NaiveDate>) -> String {
    match date {
        Some(date) => encode_date(date),
        None => "0".repeat(DATE_LENGTH),
    }
}

/// Декодирует дату формата `0YYDDD`. Поле из одних нулей означает отсутствие даты.
pub fn decode_date(raw: &str, field: &'static str) -> Result<Option<NaiveDate>> {
    if raw.len() != DATE_LENGTH {
        return Err(Error::field_parse(field, raw, "длина даты должна быть 6"));
    }
    if raw.bytes().all(|b| b == b'0') {
        return Ok(None);
    }
    let year = parse_number(&raw[1..3], field)? as i32 + 2000;
    let day = parse_number(&raw[3..6], field)? as u32;
    NaiveDate::from_yo_opt(year, day)
        .map(Some)
        .ok_or_else(|| Error::field_parse(field, raw, format!("нет дня {} в {} году", day, year)))
}

/// Удаляет диакритику и требует, чтобы результат состоял только из ASCII.
///
/// Возвращает первый символ, который не удалось свести к ASCII.
pub fn normalize(input: &str) -> std::result::Result<String, char> {
    if input.is_ascii() {
        return Ok(input.to_string());
    }
    let stripped: String = input
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .nfc()
        .collect();
    match stripped.chars().find(|c| !c.is_ascii()) {
        Some(c) => Err(c),
        None => Ok(stripped),
    }
}

/// Нормализует значение поля, превращая отказ в ошибку с именем поля.
pub fn normalize_field(input: &str, field: &'static str) -> Result<String> {
    normalize(input).map_err(|character| Error::Normalization { field, character })
}

/// Нормализует имя и приводит его к ширине поля.
pub fn format_name(input: &str, width: usize, field: &'static str) -> Result<String> {
    text_field(input, width, field)
}

/// Проверяет, что в первых `len` символах строки нет символов вне ASCII.
///
/// Записи разбираются по байтовым смещениям, поэтому не-ASCII символ сдвинул бы все поля.
pub fn ensure_ascii(line: &str, len: usize, field: &'static str) -> Result<()> {
    match line.chars().take(len).find(|c| !c.is_ascii()) {
        Some(character) => Err(Error::Normalization { field, character }),
        None => Ok(()),
    }
}
