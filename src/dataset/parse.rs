use crate::dataset::{Dataset, Samples};
use crate::error::{PlotError, Result};
use crate::field::{self, FieldId};
use std::fs;
use std::path::Path;

/// Parse a loopback test log file into a dataset.
///
/// Expected layout (whitespace-separated columns):
/// ```text
/// <title>
/// <frame count>
/// <field names...>
/// <one row of values per frame>
/// ```
///
/// Example:
/// ```text
/// vp8 screenshare
/// 2
/// dropped input_time_ms send_time_ms recv_time_ms render_time_ms
/// 0 100 110 200 210
/// 0 200 205 300 305
/// ```
pub fn parse_dataset_file(path: &Path) -> Result<Dataset> {
    let text = fs::read_to_string(path).map_err(|source| PlotError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_dataset(path, &text)
}

/// Parse dataset text; `path` is only used for error messages.
pub fn parse_dataset(path: &Path, text: &str) -> Result<Dataset> {
    let mut lines = text.lines().enumerate().map(|(idx, line)| (idx + 1, line));

    let (_, title) = lines
        .next()
        .ok_or_else(|| PlotError::format(path, 1, "missing title line"))?;
    let title = title.trim().to_string();

    let (lno, count) = lines
        .next()
        .ok_or_else(|| PlotError::format(path, 2, "missing frame count line"))?;
    let length: usize = count.trim().parse().map_err(|_| {
        PlotError::format(path, lno, format!("bad frame count: {:?}", count.trim()))
    })?;

    let (lno, header) = lines
        .next()
        .ok_or_else(|| PlotError::format(path, 3, "missing field name line"))?;
    let fields = parse_header(path, lno, header)?;

    // Columns grow as rows are read; the declared count is untrusted.
    let mut columns: Vec<Vec<f64>> = vec![Vec::new(); fields.len()];
    for frame in 0..length {
        let (lno, line) = lines.next().ok_or_else(|| {
            PlotError::format(
                path,
                frame + 4,
                format!("expected {} frames, file ends after {}", length, frame),
            )
        })?;

        let cells: Vec<&str> = line.split_whitespace().collect();
        if cells.len() != fields.len() {
            return Err(PlotError::format(
                path,
                lno,
                format!("expected {} values, found {}", fields.len(), cells.len()),
            ));
        }

        for (col, cell) in cells.iter().enumerate() {
            let value: f64 = cell.parse().map_err(|_| {
                PlotError::format(
                    path,
                    lno,
                    format!("non-numeric {} value: {:?}", fields[col].name(), cell),
                )
            })?;
            columns[col].push(value);
        }
    }

    let samples: Samples = fields.into_iter().zip(columns).collect();
    Dataset::new(path, title, length, samples)
}

/// Map header names to field ids. Only raw fields may appear, each at most once.
fn parse_header(path: &Path, lno: usize, header: &str) -> Result<Vec<FieldId>> {
    let mut fields: Vec<FieldId> = Vec::new();
    for name in header.split_whitespace() {
        let id = field::name_to_id(name).ok_or_else(|| {
            PlotError::format(path, lno, format!("unknown field name in header: {:?}", name))
        })?;
        if id.is_derived() {
            return Err(PlotError::format(
                path,
                lno,
                format!("derived field {:?} cannot be read from a file", name),
            ));
        }
        if fields.contains(&id) {
            return Err(PlotError::format(
                path,
                lno,
                format!("duplicate field name in header: {:?}", name),
            ));
        }
        fields.push(id);
    }
    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    const HEADER: &str = "dropped input_time_ms send_time_ms recv_time_ms render_time_ms";

    fn parse(text: &str) -> Result<Dataset> {
        parse_dataset(Path::new("run.txt"), text)
    }

    fn format_line(err: PlotError) -> usize {
        match err {
            PlotError::Format { line, .. } => line,
            other => panic!("expected format error, got {:?}", other),
        }
    }

    #[test]
    fn parses_title_length_and_columns() {
        let text = format!("  Run A \n2\n{} psnr\n0 10 12 20 25 38.5\n1 20 21 0 0 0\n", HEADER);
        let data = parse(&text).unwrap();
        assert_eq!(data.title(), "Run A");
        assert_eq!(data.len(), 2);
        assert_eq!(data.samples(FieldId::Psnr).unwrap(), &[38.5, 0.0]);
        assert_eq!(data.samples(FieldId::Dropped).unwrap(), &[0.0, 1.0]);
        assert!(data.samples(FieldId::Ssim).is_none());
    }

    #[test]
    fn ignores_lines_after_declared_frames() {
        let text = format!("t\n1\n{}\n0 1 2 3 4\ngarbage here\n", HEADER);
        assert_eq!(parse(&text).unwrap().len(), 1);
    }

    #[test]
    fn missing_header_lines_are_format_errors() {
        assert_eq!(format_line(parse("").unwrap_err()), 1);
        assert_eq!(format_line(parse("title\n").unwrap_err()), 2);
        assert_eq!(format_line(parse("title\n3\n").unwrap_err()), 3);
    }

    #[test]
    fn bad_frame_count() {
        let err = parse(&format!("t\nmany\n{}\n", HEADER)).unwrap_err();
        assert_eq!(format_line(err), 2);
    }

    #[test]
    fn unknown_header_field() {
        let err = parse("t\n0\ndropped bitrate\n").unwrap_err();
        assert!(err.to_string().contains("bitrate"));
        assert_eq!(format_line(err), 3);
    }

    #[test]
    fn derived_field_in_header_is_rejected() {
        let err = parse(&format!("t\n0\n{} end_to_end\n", HEADER)).unwrap_err();
        assert_eq!(format_line(err), 3);
    }

    #[test]
    fn short_file_is_rejected() {
        let err = parse(&format!("t\n3\n{}\n0 1 2 3 4\n", HEADER)).unwrap_err();
        assert_eq!(format_line(err), 5);
    }

    #[test]
    fn huge_frame_count_is_a_format_error() {
        let text = format!("t\n18446744073709551615\n{}\n0 1 2 3 4\n", HEADER);
        let err = parse(&text).unwrap_err();
        assert!(err.to_string().contains("file ends after 1"));
        assert_eq!(format_line(err), 5);
    }

    #[test]
    fn row_width_must_match_header() {
        let err = parse(&format!("t\n1\n{}\n0 1 2 3\n", HEADER)).unwrap_err();
        assert_eq!(format_line(err), 4);
        let err = parse(&format!("t\n1\n{}\n0 1 2 3 4 5\n", HEADER)).unwrap_err();
        assert_eq!(format_line(err), 4);
    }

    #[test]
    fn non_numeric_cell() {
        let err = parse(&format!("t\n1\n{}\n0 1 x 3 4\n", HEADER)).unwrap_err();
        assert!(err.to_string().contains("send_time_ms"));
        assert_eq!(format_line(err), 4);
    }

    #[test]
    fn reads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "disk\n1\n{}\n0 5 6 7 8\n", HEADER).unwrap();
        let data = parse_dataset_file(file.path()).unwrap();
        assert_eq!(data.title(), "disk");
        assert_eq!(data.path(), file.path());
    }

    #[test]
    fn unreadable_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = parse_dataset_file(&dir.path().join("missing.txt")).unwrap_err();
        assert!(matches!(err, PlotError::Io { .. }));
    }
}
