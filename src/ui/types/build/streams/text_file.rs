use crate::streams::TextFileStream;
use crate::ui::types::{build::BuildError, choices::TextFileParameters};

fn parse_delimiter(raw: Option<&str>) -> Result<Option<char>, BuildError> {
    let Some(raw) = raw.filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    let raw = match raw {
        "\\t" | "tab" => "\t",
        other => other,
    };
    let mut chars = raw.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(Some(c)),
        _ => Err(BuildError::InvalidParameter(format!(
            "delimiter must be a single character, got {raw:?}"
        ))),
    }
}

impl TryFrom<TextFileParameters> for TextFileStream {
    type Error = BuildError;

    fn try_from(p: TextFileParameters) -> Result<Self, Self::Error> {
        let delimiter = parse_delimiter(p.delimiter.as_deref())?;
        Ok(TextFileStream::with_layout(
            &p.path,
            delimiter,
            p.column,
            p.skip_header,
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Observation;
    use crate::streams::ObservationStream;
    use std::io::Write;

    #[test]
    fn delimiter_accepts_single_char_and_tab_alias() {
        assert_eq!(parse_delimiter(None).unwrap(), None);
        assert_eq!(parse_delimiter(Some("")).unwrap(), None);
        assert_eq!(parse_delimiter(Some(",")).unwrap(), Some(','));
        assert_eq!(parse_delimiter(Some("\\t")).unwrap(), Some('\t'));
        assert!(parse_delimiter(Some(";;")).is_err());
    }

    #[test]
    fn builds_stream_over_csv_column() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "ts,value").unwrap();
        writeln!(f, "1,4.5").unwrap();
        writeln!(f, "2,").unwrap();
        f.flush().unwrap();

        let mut s = TextFileStream::try_from(TextFileParameters {
            path: f.path().to_path_buf(),
            delimiter: Some(",".into()),
            column: 1,
            skip_header: true,
        })
        .unwrap();
        assert_eq!(s.next_observation(), Some(Observation::Value(4.5)));
        assert_eq!(s.next_observation(), Some(Observation::Missing));
        assert_eq!(s.next_observation(), None);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = TextFileStream::try_from(TextFileParameters {
            path: "/definitely/not/here.txt".into(),
            ..TextFileParameters::default()
        })
        .unwrap_err();
        assert!(matches!(err, BuildError::Io(_)), "{err}");
    }
}
