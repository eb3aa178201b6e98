//! The source extract: a header row followed by delimited data rows.

use std::{
  fs::File,
  io::{self, BufRead, BufReader, Read, Seek, SeekFrom},
  path::{Path, PathBuf},
};

use crate::{Error, Result};

const SCAN_BUFFER: usize = 32 * 1024;

/// An opened source file. Read twice: once to estimate the row count, once
/// to stream rows.
pub struct Source {
  path: PathBuf,
  file: File,
}

impl Source {
  pub fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref().to_path_buf();
    let file = File::open(&path).map_err(|source| Error::Open {
      path: path.clone(),
      source,
    })?;
    Ok(Self { path, file })
  }

  pub fn path(&self) -> &Path { &self.path }

  /// Estimate the number of data rows by counting line terminators after the
  /// header line.
  ///
  /// Quoted cells containing line breaks are counted as extra rows, so this
  /// is an estimate for progress reporting only.
  pub fn count_data_rows(&mut self) -> Result<u64> {
    self.file.seek(SeekFrom::Start(0))?;
    let mut reader = BufReader::with_capacity(SCAN_BUFFER, &self.file);

    let mut header = Vec::new();
    if reader.read_until(b'\n', &mut header)? == 0 {
      return Ok(0);
    }
    Ok(count_lines(reader)?)
  }

  /// Rewind and return the header row together with a reader positioned on
  /// the first data row.
  pub fn rows(&mut self) -> Result<(csv::ByteRecord, csv::Reader<&File>)> {
    self.file.seek(SeekFrom::Start(0))?;
    let mut reader = csv::ReaderBuilder::new()
      .has_headers(false)
      .flexible(true)
      .from_reader(&self.file);

    let mut header = csv::ByteRecord::new();
    if !reader.read_byte_record(&mut header)? {
      return Err(Error::MissingHeader);
    }
    Ok((header, reader))
  }
}

/// Count `\n` bytes in `r`, plus one for a trailing line without a
/// terminator.
pub fn count_lines<R: Read>(mut r: R) -> io::Result<u64> {
  let mut buf = vec![0u8; SCAN_BUFFER];
  let mut count = 0u64;
  let mut last = None;

  loop {
    let n = match r.read(&mut buf) {
      Ok(0) => break,
      Ok(n) => n,
      Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
      Err(e) => return Err(e),
    };
    count += buf[..n].iter().filter(|&&b| b == b'\n').count() as u64;
    last = Some(buf[n - 1]);
  }

  if last.is_some_and(|b| b != b'\n') {
    count += 1;
  }
  Ok(count)
}
