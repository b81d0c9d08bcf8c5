//! Строгое чтение файла целиком.
//!
//! Любая ошибка прерывает чтение, частичный результат не возвращается.
//! Для чтения с пропуском поврежденных транзакций есть [`crate::FileStreamer`].

use crate::error::{Error, Result};
use crate::field::{is_filler, normalize};
use crate::file::File;
use crate::record::{FileFooter, FileHeader};
use crate::transaction::Transaction;
use crate::types::{RecordType, RECORD_HEADER_LENGTH, SEGMENT_LENGTH};
use std::io::Read;

impl File {
    /// Парсит файл из любого источника, реализующего трейт Read.
    pub fn from_read<R: Read>(reader: &mut R) -> Result<Self> {
        let mut content = String::new();
        reader.read_to_string(&mut content)?;
        Self::parse(&content)
    }

    /// Парсит файл из строки.
    ///
    /// Пустые строки пропускаются. Ошибка содержит номер строки (с 1).
    pub fn parse(content: &str) -> Result<Self> {
        let mut file = File::default();

        for (idx, raw) in content.lines().enumerate() {
            if raw.is_empty() {
                continue;
            }
            let line_no = idx + 1;
            Self::parse_line(&mut file, raw).map_err(|e| e.at_line(line_no))?;
        }

        Ok(file)
    }

    fn parse_line(file: &mut File, raw: &str) -> Result<()> {
        let line = normalize(raw).map_err(|character| Error::Normalization {
            field: "line",
            character,
        })?;

        match RecordType::from_code(line.get(..1).unwrap_or(""))? {
            RecordType::Header => {
                file.header = Some(FileHeader::parse(&line)?);
            }
            RecordType::Footer => {
                file.footer = Some(FileFooter::parse(&line)?);
            }
            record_type if record_type.is_transaction() => {
                let txns = parse_transaction_line(record_type, &line)?;
                tracing::debug!("Прочитано {} транзакций типа {}", txns.len(), record_type);
                file.transactions.extend(txns);
            }
            other => {
                return Err(Error::UnexpectedRecordType {
                    record_type: other,
                    context: "файле".to_string(),
                })
            }
        }
        Ok(())
    }
}

/// Делит строку транзакций на сегменты и разбирает каждый непустой.
pub(crate) fn parse_transaction_line(
    record_type: RecordType,
    line: &str,
) -> Result<Vec<Transaction>> {
    let payload = line
        .get(RECORD_HEADER_LENGTH..)
        .filter(|p| p.len() % SEGMENT_LENGTH == 0)
        .ok_or_else(|| Error::InvalidLength {
            record: "строка транзакций",
            expected: format!("{} + N x {}", RECORD_HEADER_LENGTH, SEGMENT_LENGTH),
            actual: line.len(),
        })?;

    let mut txns = Vec::with_capacity(payload.len() / SEGMENT_LENGTH);
    for start in (0..payload.len()).step_by(SEGMENT_LENGTH) {
        let segment = &payload[start..start + SEGMENT_LENGTH];
        if is_filler(segment) {
            continue;
        }
        txns.push(Transaction::parse(record_type, segment)?);
    }
    Ok(txns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::tests::PARSE_SEGMENT;

    const HEADER: &str = "A0000000010000000610000102313861210hello               CAD";
    const FOOTER: &str = "Z000000003000000061000010000000000404200000001000000000000000000000000000000000000000000000000000000000000000000";

    fn debit_line(segments: &[&str]) -> String {
        format!("D00000000200000006100001{}", segments.concat())
    }

    #[test]
    fn test_parse() {
        let content = format!(
            "{}\n{}\n{}",
            HEADER,
            debit_line(&[PARSE_SEGMENT, &" ".repeat(SEGMENT_LENGTH)]),
            FOOTER
        );
        let file = File::parse(&content).unwrap();

        assert_eq!(file.header.as_ref().unwrap().currency_code, "CAD");
        assert_eq!(file.transactions.len(), 1);
        assert_eq!(file.transactions[0].record_type(), RecordType::Debit);
        assert_eq!(file.footer.as_ref().unwrap().total_value_debit, 4042);
        assert!(file.verify_footer().is_ok());
    }

    #[test]
    fn test_short_line_aborts() {
        let short = &PARSE_SEGMENT[..SEGMENT_LENGTH - 1];
        let content = format!("{}\n{}\n{}", HEADER, debit_line(&[short]), FOOTER);
        match File::parse(&content) {
            Err(Error::Line { line, source }) => {
                assert_eq!(line, 2);
                assert!(matches!(*source, Error::InvalidLength { .. }));
            }
            other => panic!("ожидалась ошибка длины, получено {:?}", other),
        }
    }

    #[test]
    fn test_bad_segment_aborts() {
        let bad = PARSE_SEGMENT.replacen("0000004042", "00000040x2", 1);
        let content = format!("{}\n{}\n{}", HEADER, debit_line(&[PARSE_SEGMENT, &bad]), FOOTER);
        assert!(matches!(File::parse(&content), Err(Error::Line { line: 2, .. })));
    }

    #[test]
    fn test_unknown_record_type() {
        let content = format!("{}\nX123", HEADER);
        match File::parse(&content) {
            Err(Error::Line { line: 2, source }) => {
                assert!(matches!(*source, Error::UnrecognizedRecordType(_)));
            }
            other => panic!("ожидалась ошибка типа записи, получено {:?}", other),
        }
    }

    #[test]
    fn test_normalizes_lines() {
        let segment = PARSE_SEGMENT.replacen("D1-1-OCC ZERO", "D1-1-OCC ZÉRO", 1);
        let content = format!("{}\n{}", HEADER, debit_line(&[&segment]));
        let file = File::parse(&content).unwrap();
        assert_eq!(file.transactions[0].name(), "D1-1-OCC ZERO");
    }

    #[test]
    fn test_from_read() {
        let content = format!("{}\n{}\n", HEADER, FOOTER);
        let file = File::from_read(&mut content.as_bytes()).unwrap();
        assert!(file.header.is_some());
        assert!(file.transactions.is_empty());
        assert!(file.footer.is_some());
    }
}
