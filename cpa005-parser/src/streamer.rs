//! Потоковое чтение транзакций с пропуском поврежденных записей.
//!
//! [`FileStreamer`] читает файл построчно и отдает транзакции по одной через
//! [`Iterator`]. Ошибка в одном сегменте не останавливает чтение: итератор
//! возвращает [`Error::Segment`] и продолжает со следующего сегмента.
//! Ошибка длины строки или неизвестный тип записи пропускают строку целиком.
//! Итерация заканчивается на итоговой записи, пустой строке или конце ввода.

use crate::error::{Error, Result};
use crate::field::{is_filler, normalize};
use crate::record::{FileFooter, FileHeader};
use crate::transaction::Transaction;
use crate::types::{RecordType, RECORD_HEADER_LENGTH, SEGMENT_LENGTH};
use std::io::{BufRead, Seek, SeekFrom};
use std::iter::FusedIterator;

/// Состояние сканера.
#[derive(Debug)]
enum ScanState {
    /// Заголовок еще не прочитан.
    BeforeHeader,
    /// Буфер строки пуст.
    BetweenLines,
    /// В буфере строка, из которой отданы не все сегменты.
    MidLine {
        line: String,
        segments: usize,
        next: usize,
    },
    /// Итоговая запись или конец ввода.
    Finished,
}

/// Потоковый сканер транзакций.
///
/// Хранит позицию чтения, поэтому один экземпляр обслуживает один поток.
pub struct FileStreamer<R> {
    reader: R,
    state: ScanState,
    line_no: usize,
}

impl<R: BufRead> FileStreamer<R> {
    /// Создает сканер в состоянии до заголовка.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            state: ScanState::BeforeHeader,
            line_no: 0,
        }
    }

    /// Номер последней прочитанной строки (с 1).
    pub fn line_number(&self) -> usize {
        self.line_no
    }

    /// Возвращает источник, из которого читал сканер.
    pub fn into_inner(self) -> R {
        self.reader
    }

    /// Следующая строка без перевода строки. Ok(None) в конце ввода.
    ///
    /// Строка не в UTF-8 считается прочитанной: ошибка несет ее номер,
    /// и следующий вызов читает дальше.
    fn read_line(&mut self) -> Result<Option<String>> {
        let Some(line) = read_raw_line(&mut self.reader)? else {
            return Ok(None);
        };
        self.line_no += 1;
        line.map(Some).map_err(|e| e.at_line(self.line_no))
    }

    /// Ошибка чтения строки. Ошибка ввода/вывода завершает поток.
    fn read_failed(&mut self, e: Error, resume: ScanState) -> Option<Result<Transaction>> {
        if e.is_recoverable() {
            self.state = resume;
        } else {
            tracing::warn!("Чтение остановлено после строки {}: {}", self.line_no, e);
        }
        Some(Err(e))
    }

    /// Один шаг автомата. None означает конец потока.
    fn scan(&mut self) -> Option<Result<Transaction>> {
        loop {
            match std::mem::replace(&mut self.state, ScanState::Finished) {
                ScanState::Finished => return None,

                ScanState::BeforeHeader => match self.read_line() {
                    Err(e) => return self.read_failed(e, ScanState::BeforeHeader),
                    Ok(None) => return None,
                    Ok(Some(line)) => {
                        if line.get(..1).is_some_and(RecordType::is_header_code) {
                            self.state = ScanState::BetweenLines;
                        } else {
                            self.state = ScanState::BeforeHeader;
                            return Some(Err(Error::MissingHeader.at_line(self.line_no)));
                        }
                    }
                },

                ScanState::BetweenLines => {
                    let raw = match self.read_line() {
                        Err(e) => return self.read_failed(e, ScanState::BetweenLines),
                        Ok(None) => return None,
                        Ok(Some(raw)) => raw,
                    };
                    self.state = ScanState::BetweenLines;

                    let line = match normalize_line(raw) {
                        Ok(line) => line,
                        Err(e) => return Some(Err(e.at_line(self.line_no))),
                    };

                    if line.is_empty() || RecordType::is_footer_code(&line[..1]) {
                        self.state = ScanState::Finished;
                        return None;
                    }

                    if line.len() < RECORD_HEADER_LENGTH
                        || (line.len() - RECORD_HEADER_LENGTH) % SEGMENT_LENGTH != 0
                    {
                        let e = Error::InvalidLength {
                            record: "строка транзакций",
                            expected: format!("{} + N x {}", RECORD_HEADER_LENGTH, SEGMENT_LENGTH),
                            actual: line.len(),
                        };
                        return Some(Err(e.at_line(self.line_no)));
                    }

                    let segments = (line.len() - RECORD_HEADER_LENGTH) / SEGMENT_LENGTH;
                    if segments > 0 {
                        self.state = ScanState::MidLine {
                            line,
                            segments,
                            next: 0,
                        };
                    }
                }

                ScanState::MidLine {
                    line,
                    segments,
                    next,
                } => {
                    let record_type = match RecordType::from_code(&line[..1]) {
                        Ok(t) if t.is_transaction() => t,
                        Ok(t) => {
                            self.state = ScanState::BetweenLines;
                            let e = Error::UnexpectedRecordType {
                                record_type: t,
                                context: "строке транзакций".to_string(),
                            };
                            return Some(Err(e.at_line(self.line_no)));
                        }
                        Err(e) => {
                            self.state = ScanState::BetweenLines;
                            return Some(Err(e.at_line(self.line_no)));
                        }
                    };

                    let start = RECORD_HEADER_LENGTH + next * SEGMENT_LENGTH;
                    let segment = &line[start..start + SEGMENT_LENGTH];
                    let result = if is_filler(segment) {
                        None
                    } else {
                        Some(Transaction::parse(record_type, segment))
                    };

                    self.state = if next + 1 < segments {
                        ScanState::MidLine {
                            line,
                            segments,
                            next: next + 1,
                        }
                    } else {
                        ScanState::BetweenLines
                    };

                    match result {
                        None => continue,
                        Some(Ok(txn)) => return Some(Ok(txn)),
                        Some(Err(source)) => {
                            tracing::warn!(
                                "Пропущена транзакция {} №{} в строке {}: {}",
                                record_type,
                                next,
                                self.line_no,
                                source
                            );
                            return Some(Err(Error::Segment {
                                line: self.line_no,
                                index: next,
                                record_type,
                                source: Box::new(source),
                            }));
                        }
                    }
                }
            }
        }
    }
}

impl<R: BufRead + Seek> FileStreamer<R> {
    /// Читает заголовок из первой строки файла.
    ///
    /// Позиция чтения после вызова восстанавливается.
    pub fn get_header(&mut self) -> Result<FileHeader> {
        self.with_rewind(|reader| {
            let line = match read_raw_line(reader)? {
                Some(line) => normalize_line(line?)?,
                None => return Err(Error::MissingHeader),
            };
            if !line.starts_with(RecordType::Header.code()) {
                return Err(Error::MissingHeader);
            }
            FileHeader::parse(&line)
        })
    }

    /// Ищет первую итоговую запись. Ok(None), если ее нет.
    ///
    /// Позиция чтения после вызова восстанавливается.
    pub fn get_footer(&mut self) -> Result<Option<FileFooter>> {
        self.with_rewind(|reader| {
            while let Some(line) = read_raw_line(reader)? {
                let Ok(line) = line else {
                    continue;
                };
                if line.starts_with(RecordType::Footer.code()) {
                    return FileFooter::parse(&normalize_line(line)?).map(Some);
                }
            }
            Ok(None)
        })
    }

    fn with_rewind<T>(&mut self, f: impl FnOnce(&mut R) -> Result<T>) -> Result<T> {
        let position = self.reader.stream_position()?;
        self.reader.seek(SeekFrom::Start(0))?;
        let result = f(&mut self.reader);
        self.reader.seek(SeekFrom::Start(position))?;
        result
    }
}

/// Читает строку байтов и отрезает перевод строки.
///
/// Внешний Result - ошибка ввода/вывода, внутренний - строка не в UTF-8.
fn read_raw_line<R: BufRead>(reader: &mut R) -> Result<Option<Result<String>>> {
    let mut buf = Vec::new();
    if reader.read_until(b'\n', &mut buf)? == 0 {
        return Ok(None);
    }
    while matches!(buf.last(), Some(b'\n' | b'\r')) {
        buf.pop();
    }
    Ok(Some(String::from_utf8(buf).map_err(|e| {
        let raw = String::from_utf8_lossy(e.as_bytes()).into_owned();
        Error::field_parse("line", &raw, e.utf8_error())
    })))
}

fn normalize_line(line: String) -> Result<String> {
    normalize(&line).map_err(|character| Error::Normalization {
        field: "line",
        character,
    })
}

impl<R: BufRead> Iterator for FileStreamer<R> {
    type Item = Result<Transaction>;

    fn next(&mut self) -> Option<Self::Item> {
        self.scan()
    }
}

impl<R: BufRead> FusedIterator for FileStreamer<R> {}
