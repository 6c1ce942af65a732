use std::io::Write;

use crate::errors::GenerationError;
use crate::model::Delimiter;

/// Encode a grid as delimited text and return the bytes.
pub fn encode_grid(grid: &[Vec<String>], delimiter: Delimiter) -> Result<Vec<u8>, GenerationError> {
    let mut buffer = Vec::new();
    write_grid(&mut buffer, grid, delimiter)?;
    Ok(buffer)
}

/// Write a grid as delimited text, quoting fields only when needed.
///
/// Returns the number of bytes handed to `writer`.
pub fn write_grid<W: Write>(
    writer: W,
    grid: &[Vec<String>],
    delimiter: Delimiter,
) -> Result<u64, GenerationError> {
    let counting = CountingWriter::new(writer);
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter.as_byte())
        .quote_style(csv::QuoteStyle::Necessary)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(counting);

    for row in grid {
        writer.write_record(row)?;
    }

    writer.flush().map_err(csv::Error::from)?;
    let counting = writer
        .into_inner()
        .map_err(|err| csv::Error::from(err.into_error()))?;
    Ok(counting.bytes_written())
}

struct CountingWriter<W: Write> {
    inner: W,
    bytes: u64,
}

impl<W: Write> CountingWriter<W> {
    fn new(inner: W) -> Self {
        Self { inner, bytes: 0 }
    }

    fn bytes_written(&self) -> u64 {
        self.bytes
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let size = self.inner.write(buf)?;
        self.bytes = self.bytes.saturating_add(size as u64);
        Ok(size)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn quotes_only_when_needed() {
        let grid = vec![
            row(&["id", "note"]),
            row(&["1", "plain"]),
            row(&["2", "say \"hi\""]),
            row(&["3", "two\nlines"]),
        ];
        let bytes = encode_grid(&grid, Delimiter::Comma).expect("encode");
        assert_eq!(
            String::from_utf8(bytes).expect("utf8"),
            "id,note\n1,plain\n2,\"say \"\"hi\"\"\"\n3,\"two\nlines\"\n"
        );
    }

    #[test]
    fn tab_delimiter_leaves_commas_bare() {
        let grid = vec![row(&["a", "b"]), row(&["x, y", "z\tw"])];
        let bytes = encode_grid(&grid, Delimiter::Tab).expect("encode");
        assert_eq!(
            String::from_utf8(bytes).expect("utf8"),
            "a\tb\nx, y\t\"z\tw\"\n"
        );
    }

    #[test]
    fn reports_bytes_written() {
        let grid = vec![row(&["id"]), row(&["1"])];
        let mut out = Vec::new();
        let written = write_grid(&mut out, &grid, Delimiter::Comma).expect("write");
        assert_eq!(written, out.len() as u64);
        assert_eq!(written, 5);
    }

    struct FailingWriter {
        fail_write: bool,
    }

    impl Write for FailingWriter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            if self.fail_write {
                return Err(std::io::Error::other("disk full"));
            }
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Err(std::io::Error::other("flush rejected"))
        }
    }

    #[test]
    fn write_failure_is_an_encoding_error() {
        let grid = vec![row(&["id"])];
        let result = write_grid(FailingWriter { fail_write: true }, &grid, Delimiter::Comma);
        assert!(matches!(result, Err(GenerationError::Encoding(_))));
    }

    #[test]
    fn flush_failure_is_an_encoding_error() {
        let grid = vec![row(&["id"]), row(&["1"])];
        let result = write_grid(FailingWriter { fail_write: false }, &grid, Delimiter::Comma);
        let err = result.expect_err("flush fails");
        assert!(matches!(err, GenerationError::Encoding(_)));
        assert!(err.to_string().contains("flush rejected"));
    }
}
