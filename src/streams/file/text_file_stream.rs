use std::fs::File;
use std::io::{BufRead, BufReader, Error, ErrorKind};
use std::path::{Path, PathBuf};

use log::warn;

use crate::core::Observation;
use crate::streams::stream::ObservationStream;

/// Observations read line by line from a text or delimited file.
///
/// Each non-comment line yields exactly one observation, taken from column
/// `column` when a delimiter is set. Empty cells and the usual "no value"
/// spellings (`none`, `null`, `nan`, `na`) yield [`Observation::Missing`];
/// anything else that does not parse, including a line that is not valid
/// UTF-8, yields [`Observation::Malformed`].
/// Lines starting with `#` are skipped.
#[derive(Debug)]
pub struct TextFileStream {
    path: PathBuf,
    reader: BufReader<File>,
    delimiter: Option<char>,
    column: usize,
    skip_header: bool,
    exhausted: bool,
    line_buf: Vec<u8>,
}

impl TextFileStream {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        Self::with_layout(path, None, 0, false)
    }

    pub fn with_layout<P: AsRef<Path>>(
        path: P,
        delimiter: Option<char>,
        column: usize,
        skip_header: bool,
    ) -> Result<Self, Error> {
        if delimiter.is_none() && column != 0 {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "column must be 0 when no delimiter is set",
            ));
        }
        let path = path.as_ref().to_path_buf();
        let reader = Self::open(&path, skip_header)?;
        Ok(Self {
            path,
            reader,
            delimiter,
            column,
            skip_header,
            exhausted: false,
            line_buf: Vec::new(),
        })
    }

    fn open(path: &Path, skip_header: bool) -> Result<BufReader<File>, Error> {
        let mut reader = BufReader::new(File::open(path)?);
        if skip_header {
            reader.read_until(b'\n', &mut Vec::new())?;
        }
        Ok(reader)
    }

    fn parse_cell(&self, line: &str) -> Observation {
        let cell = match self.delimiter {
            None => Some(line),
            Some(d) => line.split(d).nth(self.column),
        };
        let Some(cell) = cell.map(str::trim) else {
            return Observation::Malformed(line.to_string());
        };
        if cell.is_empty()
            || ["none", "null", "nan", "na"]
                .iter()
                .any(|m| cell.eq_ignore_ascii_case(m))
        {
            return Observation::Missing;
        }
        match cell.parse::<f64>() {
            Ok(v) => Observation::Value(v),
            Err(_) => Observation::Malformed(cell.to_string()),
        }
    }
}

impl ObservationStream for TextFileStream {
    fn has_more_observations(&self) -> bool {
        !self.exhausted
    }

    fn next_observation(&mut self) -> Option<Observation> {
        while !self.exhausted {
            self.line_buf.clear();
            match self.reader.read_until(b'\n', &mut self.line_buf) {
                Ok(0) => self.exhausted = true,
                Ok(_) => {
                    let Ok(text) = std::str::from_utf8(&self.line_buf) else {
                        let raw = String::from_utf8_lossy(&self.line_buf);
                        return Some(Observation::Malformed(
                            raw.trim_end_matches(['\n', '\r']).to_string(),
                        ));
                    };
                    let line = text.trim_end_matches(['\n', '\r']);
                    if line.trim_start().starts_with('#') {
                        continue;
                    }
                    return Some(self.parse_cell(line));
                }
                Err(e) => {
                    warn!("reading {} failed, ending stream: {e}", self.path.display());
                    self.exhausted = true;
                }
            }
        }
        None
    }

    fn restart(&mut self) -> Result<(), Error> {
        self.reader = Self::open(&self.path, self.skip_header)?;
        self.exhausted = false;
        Ok(())
    }

    fn name(&self) -> &str {
        "text-file"
    }
}
