//! Декларативная валидация полей записей.
//!
//! Каждое поле проверяется набором правил независимо от остальных, поэтому
//! одна запись сообщает сразу обо всех нарушениях. Ошибки нескольких записей
//! собираются в один [`ValidationErrors`].

use crate::types::{RecordType, CURRENCY_CODES};
use chrono::NaiveDate;
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static EFT_ALPHA: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_\-\s]+$").expect("шаблон буквенно-цифрового поля корректен")
});

static NUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+$").expect("шаблон числового поля корректен"));

/// Правило проверки поля.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Ненулевое значение: непустая строка, ненулевое число, заданная дата.
    Required,
    /// Только цифры. Пустая строка допустима.
    Numeric,
    /// Буквы, цифры, `_`, дефис и пробельные символы. Пустая строка допустима.
    EftAlpha,
    /// Длина строки не больше N символов.
    MaxLength(usize),
    /// Длина строки ровно N символов.
    Length(usize),
    /// Число не больше N.
    MaxValue(u64),
    /// Код типа записи из закрытого перечня.
    RecordType,
    /// Код валюты из закрытого перечня.
    Currency,
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Required => write!(f, "required"),
            Rule::Numeric => write!(f, "numeric"),
            Rule::EftAlpha => write!(f, "eft_alpha"),
            Rule::MaxLength(n) => write!(f, "max={}", n),
            Rule::Length(n) => write!(f, "len={}", n),
            Rule::MaxValue(n) => write!(f, "max_value={}", n),
            Rule::RecordType => write!(f, "rec_type"),
            Rule::Currency => write!(f, "eft_cur"),
        }
    }
}

/// Значение поля, передаваемое в правила.
#[derive(Debug, Clone, Copy)]
pub enum FieldValue<'a> {
    /// Текстовое поле.
    Text(&'a str),
    /// Числовое поле.
    Number(u64),
    /// Необязательная дата.
    Date(Option<NaiveDate>),
}

impl<'a> From<&'a str> for FieldValue<'a> {
    fn from(s: &'a str) -> Self {
        FieldValue::Text(s)
    }
}

impl<'a> From<&'a String> for FieldValue<'a> {
    fn from(s: &'a String) -> Self {
        FieldValue::Text(s.as_str())
    }
}

impl From<u64> for FieldValue<'_> {
    fn from(n: u64) -> Self {
        FieldValue::Number(n)
    }
}

impl From<u32> for FieldValue<'_> {
    fn from(n: u32) -> Self {
        FieldValue::Number(n.into())
    }
}

impl From<u16> for FieldValue<'_> {
    fn from(n: u16) -> Self {
        FieldValue::Number(n.into())
    }
}

impl From<Option<NaiveDate>> for FieldValue<'_> {
    fn from(d: Option<NaiveDate>) -> Self {
        FieldValue::Date(d)
    }
}

impl fmt::Display for FieldValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => write!(f, "{:?}", s),
            FieldValue::Number(n) => write!(f, "{}", n),
            FieldValue::Date(Some(d)) => write!(f, "{}", d),
            FieldValue::Date(None) => write!(f, "null"),
        }
    }
}

impl Rule {
    /// Проверяет значение по правилу.
    pub fn check(self, value: FieldValue<'_>) -> bool {
        match (self, value) {
            (Rule::Required, FieldValue::Text(s)) => !s.is_empty(),
            (Rule::Required, FieldValue::Number(n)) => n != 0,
            (Rule::Required, FieldValue::Date(d)) => d.is_some(),
            (Rule::Numeric, FieldValue::Text(s)) => s.is_empty() || NUMERIC.is_match(s),
            (Rule::EftAlpha, FieldValue::Text(s)) => s.is_empty() || EFT_ALPHA.is_match(s),
            (Rule::MaxLength(n), FieldValue::Text(s)) => s.chars().count() <= n,
            (Rule::Length(n), FieldValue::Text(s)) => s.chars().count() == n,
            (Rule::MaxValue(max), FieldValue::Number(n)) => n <= max,
            (Rule::RecordType, FieldValue::Text(s)) => RecordType::is_known_code(s),
            (Rule::Currency, FieldValue::Text(s)) => CURRENCY_CODES.contains(&s),
            // Правило неприменимо к этому виду значения.
            _ => true,
        }
    }
}

/// Одно нарушенное правило.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Путь к полю, например `transaction[2].payor_name`.
    pub field: String,
    /// Нарушенное правило.
    pub rule: Rule,
    /// Проверенное значение в текстовом виде.
    pub value: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {} нарушает правило '{}'", self.field, self.value, self.rule)
    }
}

/// Совокупность нарушений по одной записи или по всему файлу.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    violations: Vec<Violation>,
}

impl ValidationErrors {
    /// Список нарушений в порядке проверки.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// true, если нарушений нет.
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// true, если среди нарушений есть поле с таким путем.
    pub fn has_field(&self, field: &str) -> bool {
        self.violations.iter().any(|v| v.field == field)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, violation) in self.violations.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}", violation)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Накопитель нарушений.
#[derive(Debug, Default)]
pub struct Validator {
    errors: ValidationErrors,
}

impl Validator {
    /// Создает пустой накопитель.
    pub fn new() -> Self {
        Self::default()
    }

    /// Проверяет поле всеми правилами и запоминает каждое нарушение.
    pub fn check<'a>(
        &mut self,
        field: &str,
        value: impl Into<FieldValue<'a>>,
        rules: &[Rule],
    ) -> &mut Self {
        let value = value.into();
        for rule in rules {
            if !rule.check(value) {
                self.push(field, *rule, value.to_string());
            }
        }
        self
    }

    /// Добавляет нарушение, найденное вне декларативных правил.
    pub fn push(&mut self, field: &str, rule: Rule, value: String) {
        self.errors.violations.push(Violation {
            field: field.to_string(),
            rule,
            value,
        });
    }

    /// Переносит нарушения вложенной записи с префиксом `context`.
    pub fn nest(&mut self, context: &str, result: Result<(), ValidationErrors>) -> &mut Self {
        if let Err(nested) = result {
            self.errors
                .violations
                .extend(nested.violations.into_iter().map(|v| Violation {
                    field: format!("{}.{}", context, v.field),
                    ..v
                }));
        }
        self
    }

    /// Возвращает Ok, если нарушений нет.
    pub fn finish(self) -> Result<(), ValidationErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::required_text(Rule::Required, FieldValue::Text(""), false)]
    #[case::required_number(Rule::Required, FieldValue::Number(0), false)]
    #[case::required_date(Rule::Required, FieldValue::Date(None), false)]
    #[case::numeric_ok(Rule::Numeric, FieldValue::Text("0123"), true)]
    #[case::numeric_bad(Rule::Numeric, FieldValue::Text("12a"), false)]
    #[case::numeric_empty(Rule::Numeric, FieldValue::Text(""), true)]
    #[case::alpha_ok(Rule::EftAlpha, FieldValue::Text("AB-12 c_d"), true)]
    #[case::alpha_bad(Rule::EftAlpha, FieldValue::Text("a/b"), false)]
    #[case::alpha_empty(Rule::EftAlpha, FieldValue::Text(""), true)]
    #[case::max_len(Rule::MaxLength(3), FieldValue::Text("abcd"), false)]
    #[case::len(Rule::Length(10), FieldValue::Text("0000000610"), true)]
    #[case::len_short(Rule::Length(10), FieldValue::Text("610"), false)]
    #[case::max_value(Rule::MaxValue(9_999_999_999), FieldValue::Number(99_999_999_999), false)]
    #[case::rec_type(Rule::RecordType, FieldValue::Text("V"), true)]
    #[case::rec_type_bad(Rule::RecordType, FieldValue::Text("X"), false)]
    #[case::currency(Rule::Currency, FieldValue::Text("USD"), true)]
    #[case::currency_bad(Rule::Currency, FieldValue::Text("AAA"), false)]
    fn test_rule_check(#[case] rule: Rule, #[case] value: FieldValue<'static>, #[case] ok: bool) {
        assert_eq!(rule.check(value), ok);
    }

    #[test]
    fn test_collects_every_field() {
        let mut v = Validator::new();
        v.check("payor_name", "", &[Rule::Required, Rule::MaxLength(30)])
            .check("payor_account_no", "", &[Rule::Required, Rule::Numeric])
            .check("institution_id", "123456789", &[Rule::Required, Rule::Numeric]);
        let errors = v.finish().unwrap_err();

        assert_eq!(errors.violations().len(), 2);
        assert!(errors.has_field("payor_name"));
        assert!(errors.has_field("payor_account_no"));
    }

    #[test]
    fn test_nest_prefixes_fields() {
        let mut inner = Validator::new();
        inner.check("amount", 0u64, &[Rule::Required]);

        let mut outer = Validator::new();
        outer.nest("transaction[3]", inner.finish());
        let errors = outer.finish().unwrap_err();

        assert!(errors.has_field("transaction[3].amount"));
        assert!(errors.to_string().contains("required"));
    }
}
