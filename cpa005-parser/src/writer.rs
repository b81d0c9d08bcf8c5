//! Сборка файла формата 005.

use crate::error::{Error, Result};
use crate::file::File;
use crate::record::RecordHeader;
use crate::transaction::Transaction;
use crate::types::{RecordType, MAX_LINE_LENGTH, MAX_SEGMENTS_PER_LINE};
use std::io::Write;

/// Writer для формата 005.
///
/// Строки разделяются `\n`, после итоговой строки перевод строки не пишется.
pub struct FileWriter;

impl FileWriter {
    /// Записывает файл в любой приемник, реализующий трейт Write.
    pub fn write_to<W: Write>(file: &File, writer: &mut W) -> Result<()> {
        let content = Self::render(file)?;
        writer.write_all(content.as_bytes())?;
        Ok(())
    }

    /// Собирает файл в строку.
    ///
    /// Транзакции пишутся группами в порядке D, C, E, F, I, J, не больше
    /// шести сегментов в строке.
    pub fn render(file: &File) -> Result<String> {
        let header = file.header.as_ref().ok_or(Error::MissingHeader)?;

        let mut header_line = header.clone();
        header_line.record_header.sequence_number = 1;
        let mut lines = vec![header_line.build()?];

        for record_type in RecordType::TRANSACTION_ORDER {
            let bucket: Vec<&Transaction> = file
                .transactions
                .iter()
                .filter(|t| t.record_type() == record_type)
                .collect();

            for chunk in bucket.chunks(MAX_SEGMENTS_PER_LINE) {
                let sequence_number = lines.len() as u32 + 1;
                let line = Self::transaction_line(
                    &header.record_header,
                    record_type,
                    sequence_number,
                    chunk,
                )?;
                tracing::debug!(
                    "Строка {}: {} сегментов типа {}",
                    sequence_number,
                    chunk.len(),
                    record_type
                );
                lines.push(line);
            }
        }

        let footer_sequence = lines.len() as u32 + 1;
        let computed = file.computed_footer()?;
        let mut footer = match &file.footer {
            Some(supplied) => {
                if let Err(e) = supplied.compare(&computed) {
                    tracing::warn!("Переданная итоговая запись не сходится с транзакциями: {}", e);
                }
                supplied.clone()
            }
            None => computed,
        };
        footer.record_header.sequence_number = footer_sequence;
        lines.push(footer.build()?);

        Ok(lines.join("\n"))
    }

    fn transaction_line(
        record_header: &RecordHeader,
        record_type: RecordType,
        sequence_number: u32,
        chunk: &[&Transaction],
    ) -> Result<String> {
        let mut line = String::with_capacity(MAX_LINE_LENGTH);
        line.push_str(&record_header.for_line(record_type, sequence_number).build()?);
        for txn in chunk {
            line.push_str(&txn.build()?);
        }
        Ok(format!("{:<width$}", line, width = MAX_LINE_LENGTH))
    }
}

impl File {
    /// Собирает файл в строку. Без заголовка возвращает [`Error::MissingHeader`].
    pub fn create(&self) -> Result<String> {
        FileWriter::render(self)
    }

    /// Собирает файл и пишет его в `writer`.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        FileWriter::write_to(self, writer)
    }
}
