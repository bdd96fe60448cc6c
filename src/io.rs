use crate::alignment::Alignment;
use anyhow::Context;
use std::fs::File;
use std::io::{stdout, BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use thiserror::Error;

/// Output path which sends the alignment to standard output instead of a file.
pub const STDOUT_PATH: &str = "-";

#[derive(Error, Debug)]
pub enum FastaError {
    #[error(
        "sequence data found before any header:
line {line}
suggestion: every record must start with a `>name` line"
    )]
    SequenceBeforeHeader { line: usize },

    #[error("header on line {line} is not valid UTF-8")]
    InvalidHeader { line: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Parses a FASTA alignment from any buffered reader.
///
/// Lines are split on `\n` only, so any other trailing characters (such as the `\r` of a
/// Windows line ending) are kept as part of the line. Any line containing `>` declares a new
/// record whose name is the line with its leading `>` characters removed. Every other line is
/// appended verbatim to the most recently declared record.
///
/// # Errors
///
/// * `FastaError::SequenceBeforeHeader` if a sequence line appears before the first header.
/// * `FastaError::InvalidHeader` if a header is not valid UTF-8.
/// * `FastaError::Io` if the reader fails.
pub fn parse_alignment<R: BufRead>(reader: R) -> Result<Alignment, FastaError> {
    let mut alignment = Alignment::new();
    let mut current: Option<usize> = None;

    for (idx, line) in reader.split(b'\n').enumerate() {
        let line = line?;
        let line_no = idx + 1;

        if line.contains(&b'>') {
            let start = line.iter().take_while(|&&b| b == b'>').count();
            let name = String::from_utf8(line[start..].to_vec())
                .map_err(|_| FastaError::InvalidHeader { line: line_no })?;

            let (pos, replaced) = alignment.insert(name, Vec::new());
            if replaced {
                warn!(
                    "Duplicate header `{}` on line {line_no}, replacing earlier record",
                    String::from_utf8_lossy(&line[start..])
                );
            }
            current = Some(pos);
        } else {
            let seq = match current {
                Some(pos) => alignment.get_index_mut(pos),
                None => None,
            }
            .ok_or(FastaError::SequenceBeforeHeader { line: line_no })?;
            seq.extend_from_slice(&line);
        }
    }

    Ok(alignment)
}

/// Reads an entire FASTA alignment from `path`. The file is closed before this returns.
pub fn read_alignment<P: AsRef<Path>>(path: P) -> anyhow::Result<Alignment> {
    let path = path.as_ref();
    let file =
        File::open(path).with_context(|| format!("Unable to open file {}", path.display()))?;

    parse_alignment(BufReader::new(file))
        .with_context(|| format!("Unable to parse FASTA file {}", path.display()))
}

/// Writes every record as a header line followed by the whole sequence on a single line.
///
/// # Arguments
///
/// * `writer` - Anything implementing `std::io::Write`. A `Vec<u8>` or `std::io::Cursor` is
///   fine for in-memory output.
/// * `alignment` - The records to write, emitted in their stored order.
pub fn write_alignment(writer: &mut impl Write, alignment: &Alignment) -> std::io::Result<()> {
    for (name, seq) in alignment {
        writeln!(writer, ">{name}")?;
        writer.write_all(seq)?;
        writer.write_all(b"\n")?;
    }
    Ok(())
}

/// Creates a buffered writer for `output`, which is either a file path or `-` for standard
/// output.
pub fn get_writer(output: &Path) -> anyhow::Result<impl Write> {
    let writer = BufWriter::new(if output == Path::new(STDOUT_PATH) {
        Box::new(stdout()) as Box<dyn Write>
    } else {
        let file = File::create(output)
            .with_context(|| format!("Unable to create output file {}", output.display()))?;
        Box::new(file) as Box<dyn Write>
    });
    Ok(writer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use std::io::Cursor;

    fn parse(s: &str) -> Result<Alignment, FastaError> {
        parse_alignment(Cursor::new(s.as_bytes()))
    }

    #[test]
    fn single_line_records() {
        let aln = parse(indoc! {"
            >seq1
            TTGCCG-CGA
            >seq2
            TTCCCGGCGA
        "})
        .unwrap();

        assert_eq!(aln.len(), 2);
        assert_eq!(aln.get("seq1").unwrap(), b"TTGCCG-CGA");
        assert_eq!(aln.get("seq2").unwrap(), b"TTCCCGGCGA");
    }

    #[test]
    fn wrapped_lines_are_concatenated() {
        let aln = parse(indoc! {"
            >Some larger record, with several lines
            HWYQYDSW
            SWHQIQ

            DPWV
        "})
        .unwrap();

        assert_eq!(
            aln.get("Some larger record, with several lines").unwrap(),
            b"HWYQYDSWSWHQIQDPWV"
        );
    }

    #[test]
    fn header_anywhere_in_line() {
        let aln = parse(">>a>b\nAC\nx>y\nGT\n").unwrap();
        let names: Vec<&str> = aln.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["a>b", "x>y"]);
        assert_eq!(aln.get("x>y").unwrap(), b"GT");
    }

    #[test]
    fn carriage_returns_are_kept() {
        let aln = parse(">s\r\nAC\r\n").unwrap();
        assert_eq!(aln.get("s\r").unwrap(), b"AC\r");
    }

    #[test]
    fn last_line_without_newline() {
        let aln = parse(">s\nACGT").unwrap();
        assert_eq!(aln.get("s").unwrap(), b"ACGT");
    }

    #[test]
    fn duplicate_header_last_wins() {
        let aln = parse(">a\nAAAA\n>b\nCC\n>a\nGG\n").unwrap();
        assert_eq!(aln.len(), 2);
        assert_eq!(aln.get("a").unwrap(), b"GG");
        assert_eq!(aln.get("b").unwrap(), b"CC");
    }

    #[test]
    fn duplicate_header_collects_following_lines() {
        let aln = parse(">a\nAA\n>b\nCC\n>a\nG\nT\n>c\nTT\n").unwrap();
        let records: Vec<(&str, &[u8])> =
            aln.iter().map(|(n, s)| (n.as_str(), s.as_slice())).collect();
        assert_eq!(
            records,
            vec![("a", &b"GT"[..]), ("b", &b"CC"[..]), ("c", &b"TT"[..])]
        );
    }

    #[test]
    fn sequence_before_header() {
        let err = parse("ACGT\n>s\nAC\n").unwrap_err();
        assert!(matches!(err, FastaError::SequenceBeforeHeader { line: 1 }));
    }

    #[test]
    fn blank_line_before_header() {
        let err = parse("\n>s\nAC\n").unwrap_err();
        assert!(matches!(err, FastaError::SequenceBeforeHeader { line: 1 }));
    }

    #[test]
    fn invalid_header() {
        let err = parse_alignment(Cursor::new(b">\xff\xfe\nAC\n".to_vec())).unwrap_err();
        assert!(matches!(err, FastaError::InvalidHeader { line: 1 }));
    }

    #[test]
    fn empty_input() {
        let aln = parse("").unwrap();
        assert!(aln.is_empty());
    }

    #[test]
    fn write_one_line_per_sequence() {
        let aln = parse(">seq1\nAC-\nGT\n>seq2\nNNNNN\n").unwrap();
        let mut out = Vec::new();
        write_alignment(&mut out, &aln).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            ">seq1\nAC-GT\n>seq2\nNNNNN\n"
        );
    }

    #[test]
    fn write_empty_record() {
        let aln = parse(">empty\n>full\nA\n").unwrap();
        let mut out = Vec::new();
        write_alignment(&mut out, &aln).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), ">empty\n\n>full\nA\n");
    }

    #[test]
    fn missing_file() {
        let err = read_alignment("file_which_does_not_exist.fasta").unwrap_err();
        assert!(err.to_string().contains("Unable to open file"));
    }
}
