use anyhow::anyhow;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Streams a file one line at a time.
///
/// Line terminators (`\n` or `\r\n`) are stripped and nothing else is
/// trimmed. Bytes that are not valid UTF-8 are replaced with U+FFFD rather
/// than failing the read.
pub struct LineReader<R> {
    reader: R,
    buf: Vec<u8>,
}

impl LineReader<BufReader<File>> {
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        let file = File::open(path)
            .map_err(|e| anyhow!("Failed to open {}: {}", path.display(), e))?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> LineReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::new(),
        }
    }
}

impl<R: BufRead> Iterator for LineReader<R> {
    type Item = std::io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.buf.clear();
        match self.reader.read_until(b'\n', &mut self.buf) {
            Ok(0) => None,
            Ok(_) => {
                if self.buf.last() == Some(&b'\n') {
                    self.buf.pop();
                }
                if self.buf.last() == Some(&b'\r') {
                    self.buf.pop();
                }
                Some(Ok(String::from_utf8_lossy(&self.buf).into_owned()))
            }
            Err(e) => Some(Err(e)),
        }
    }
}

/// Reads every line of the file at `path`, in order.
pub fn read_lines(path: &Path) -> anyhow::Result<Vec<String>> {
    LineReader::open(path)?
        .collect::<std::io::Result<Vec<_>>>()
        .map_err(|e| anyhow!("Failed to read {}: {}", path.display(), e))
}
