//! CLI-утилита для конвертации файлов CPA 005 в JSON и обратно.

use clap::{Parser, ValueEnum};
use std::fs;
use std::io::{self, BufRead, Cursor, Read, Seek, Write};
use std::process;
use tracing_subscriber::EnvFilter;

use cpa005_parser::{File, FileStreamer};

/// Режим работы.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Файл 005 -> JSON
    Parse,
    /// JSON -> файл 005
    Build,
}

/// CPA 005 Converter - чтение и сборка платежных файлов.
///
/// В режиме parse читает файл 005 (или stdin) и печатает JSON.
/// В режиме build читает JSON и собирает файл 005.
#[derive(Debug, Parser)]
#[command(name = "cpa005-converter")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Режим работы
    #[arg(long, short, value_enum)]
    mode: Mode,

    /// Входной файл (для parse по умолчанию stdin)
    #[arg(long, short)]
    file: Option<String>,

    /// Выходной файл (по умолчанию stdout)
    #[arg(long, short)]
    output: Option<String>,

    /// Проверить поля и итоговую запись
    #[arg(long)]
    validate: bool,

    /// Потоковое чтение с пропуском поврежденных транзакций (только parse)
    #[arg(long)]
    stream: bool,

    /// Форматированный JSON
    #[arg(long)]
    pretty: bool,
}

fn read_input(path: Option<&str>) -> Result<String, String> {
    let mut content = String::new();

    if let Some(path) = path {
        let mut file =
            fs::File::open(path).map_err(|e| format!("Не удалось открыть файл '{}': {}", path, e))?;
        file.read_to_string(&mut content)
            .map_err(|e| format!("Не удалось прочитать файл '{}': {}", path, e))?;
    } else {
        io::stdin()
            .read_to_string(&mut content)
            .map_err(|e| format!("Не удалось прочитать stdin: {}", e))?;
    }

    Ok(content)
}

/// Собирает файл потоковым сканером, пропуская поврежденные строки и сегменты.
/// Ошибка ввода/вывода прерывает сборку.
fn stream_file<R: BufRead + Seek>(reader: R) -> Result<File, String> {
    let mut streamer = FileStreamer::new(reader);
    let header = streamer
        .get_header()
        .map_err(|e| format!("Ошибка чтения заголовка: {}", e))?;
    let footer = streamer
        .get_footer()
        .map_err(|e| format!("Ошибка чтения итоговой записи: {}", e))?;

    let mut transactions = Vec::new();
    let mut skipped = 0;
    for result in streamer {
        match result {
            Ok(txn) => transactions.push(txn),
            Err(e) if e.is_recoverable() => {
                tracing::warn!("Запись пропущена: {}", e);
                skipped += 1;
            }
            Err(e) => return Err(format!("Ошибка чтения: {}", e)),
        }
    }
    if skipped > 0 {
        tracing::warn!("Пропущено записей: {}", skipped);
    }

    let file = File::new(header, transactions);
    Ok(match footer {
        Some(footer) => file.with_footer(footer),
        None => file,
    })
}

fn parse_mode(args: &Args) -> Result<String, String> {
    let content = read_input(args.file.as_deref())?;

    let file = if args.stream {
        stream_file(Cursor::new(content))?
    } else {
        File::parse(&content).map_err(|e| format!("Ошибка парсинга: {}", e))?
    };
    tracing::info!("Прочитано транзакций: {}", file.transactions.len());

    if args.validate {
        file.validate()
            .map_err(|e| format!("Ошибка валидации: {}", e))?;
        file.verify_footer()
            .map_err(|e| format!("Ошибка сверки итогов: {}", e))?;
    }

    let json = if args.pretty {
        serde_json::to_string_pretty(&file)
    } else {
        serde_json::to_string(&file)
    };
    json.map_err(|e| format!("Ошибка сериализации JSON: {}", e))
}

fn build_mode(args: &Args) -> Result<String, String> {
    let path = args
        .file
        .as_deref()
        .ok_or("Для режима build нужен входной JSON (--file)")?;
    let content = read_input(Some(path))?;

    let file: File =
        serde_json::from_str(&content).map_err(|e| format!("Ошибка разбора JSON: {}", e))?;

    if args.validate {
        file.validate()
            .map_err(|e| format!("Ошибка валидации: {}", e))?;
    }

    file.create().map_err(|e| format!("Ошибка сборки файла: {}", e))
}

fn run(args: &Args) -> Result<(), String> {
    if args.stream && args.mode == Mode::Build {
        return Err("Флаг --stream применим только в режиме parse".to_string());
    }

    let output = match args.mode {
        Mode::Parse => parse_mode(args)?,
        Mode::Build => build_mode(args)?,
    };

    match &args.output {
        Some(path) => fs::write(path, output)
            .map_err(|e| format!("Не удалось записать файл '{}': {}", path, e)),
        None => io::stdout()
            .write_all(output.as_bytes())
            .map_err(|e| format!("Ошибка записи: {}", e)),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();

    if let Err(e) = run(&args) {
        eprintln!("Ошибка: {}", e);
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufReader, SeekFrom};
    use std::path::Path;

    const HEADER: &str = "A0000000010000000610000102313861210hello               CAD";

    fn args(list: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("cpa005-converter").chain(list.iter().copied()))
            .unwrap()
    }

    fn path_str(path: &Path) -> String {
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn test_args_parse() {
        let a = args(&["--mode", "parse", "--stream", "--pretty"]);
        assert_eq!(a.mode, Mode::Parse);
        assert!(a.stream && a.pretty && !a.validate);
        assert!(a.file.is_none());

        let a = args(&["-m", "build", "-f", "in.json", "-o", "out.txt", "--validate"]);
        assert_eq!(a.mode, Mode::Build);
        assert_eq!(a.file.as_deref(), Some("in.json"));
        assert_eq!(a.output.as_deref(), Some("out.txt"));
    }

    #[test]
    fn test_args_reject_unknown_mode() {
        let res = Args::try_parse_from(["cpa005-converter", "--mode", "convert"]);
        assert!(res.is_err());
        let res = Args::try_parse_from(["cpa005-converter"]);
        assert!(res.is_err());
    }

    #[test]
    fn test_build_requires_file() {
        let err = run(&args(&["--mode", "build"])).unwrap_err();
        assert!(err.contains("--file"));
        let err = run(&args(&["--mode", "build", "--stream", "-f", "x.json"])).unwrap_err();
        assert!(err.contains("--stream"));
    }

    #[test]
    fn test_parse_then_build_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("input.txt");
        let json = dir.path().join("file.json");
        let output = dir.path().join("output.txt");

        let original = File::parse(HEADER).unwrap().create().unwrap();
        fs::write(&input, &original).unwrap();

        run(&args(&[
            "--mode", "parse", "-f", &path_str(&input), "-o", &path_str(&json), "--validate",
        ]))
        .unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&json).unwrap()).unwrap();
        assert_eq!(value["file_header"]["currency_code"], "CAD");

        run(&args(&["--mode", "build", "-f", &path_str(&json), "-o", &path_str(&output)])).unwrap();
        assert_eq!(fs::read_to_string(&output).unwrap(), original);
    }

    #[test]
    fn test_stream_mode_skips_bad_lines() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("input.txt");
        let json = dir.path().join("file.json");

        let content = format!("{}\nD0000000020000000610000100000", HEADER);
        fs::write(&input, content).unwrap();

        let strict = run(&args(&["--mode", "parse", "-f", &path_str(&input)]));
        assert!(strict.is_err());

        run(&args(&[
            "--mode", "parse", "--stream", "-f", &path_str(&input), "-o", &path_str(&json),
        ]))
        .unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&json).unwrap()).unwrap();
        assert!(value.get("transactions").is_none());
    }

    /// Источник, который отказывает после заданного числа чтений.
    struct FailingSource {
        inner: Cursor<Vec<u8>>,
        reads_left: usize,
    }

    impl Read for FailingSource {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.reads_left == 0 {
                return Err(io::Error::other("диск отключен"));
            }
            self.reads_left -= 1;
            self.inner.read(buf)
        }
    }

    impl Seek for FailingSource {
        fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
            self.inner.seek(pos)
        }
    }

    #[test]
    fn test_stream_file_stops_on_io_error() {
        let content = format!("{}\nD0000000020000000610000100000", HEADER);
        let source = FailingSource {
            inner: Cursor::new(content.clone().into_bytes()),
            reads_left: 4,
        };

        let err = stream_file(BufReader::new(source)).unwrap_err();
        assert!(err.contains("диск отключен"));

        let file = stream_file(Cursor::new(content)).unwrap();
        assert!(file.transactions.is_empty());
    }
}
