use std::{
    fs,
    io::{self, BufRead, BufReader, Read},
    path::Path,
    str,
};

use xz2::read::XzDecoder;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Read,
    Write,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceEntry {
    pub op: Op,
    pub addr: u64,
}

impl TraceEntry {
    pub fn is_write(&self) -> bool {
        self.op == Op::Write
    }
}

/// One classified line of a text trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line {
    Entry(TraceEntry),
    Malformed,
    End,
}

/// Parses `<label>: <R|W> <hex addr>`. The label and anything after the
/// address are not used by the simulation.
pub fn parse_line(line: &str) -> Line {
    if line.starts_with('#') {
        return Line::End;
    }
    let mut fields = line.split_whitespace();
    let (Some(label), Some(op), Some(addr)) = (fields.next(), fields.next(), fields.next()) else {
        return Line::Malformed;
    };
    if !label.ends_with(':') {
        return Line::Malformed;
    }
    let op = match op {
        "R" => Op::Read,
        "W" => Op::Write,
        _ => return Line::Malformed,
    };
    let digits = addr
        .strip_prefix("0x")
        .or_else(|| addr.strip_prefix("0X"))
        .unwrap_or(addr);
    match u64::from_str_radix(digits, 16) {
        Ok(addr) => Line::Entry(TraceEntry { op, addr }),
        Err(_) => Line::Malformed,
    }
}

/// Streams entries from a trace, skipping malformed lines and stopping at the
/// first `#` line.
pub struct Trace {
    lines: io::Split<BufReader<Box<dyn Read>>>,
    line_no: usize,
    done: bool,
    pub skipped: u64,
}

impl Trace {
    /// Opens a text trace, decompressing it on the fly when the path ends in `.xz`.
    pub fn open(path: &Path) -> io::Result<Trace> {
        let stream = fs::File::open(path)?;
        let reader: Box<dyn Read> = if path.extension().is_some_and(|ext| ext == "xz") {
            Box::new(XzDecoder::new(stream))
        } else {
            Box::new(stream)
        };
        Ok(Trace::from_reader(reader))
    }

    pub fn from_reader(reader: Box<dyn Read>) -> Trace {
        Trace {
            lines: BufReader::new(reader).split(b'\n'),
            line_no: 0,
            done: false,
            skipped: 0,
        }
    }
}

impl Iterator for Trace {
    type Item = io::Result<TraceEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(err) => {
                    self.done = true;
                    return Some(Err(err));
                }
            };
            self.line_no += 1;
            // a line that is not UTF-8 cannot hold an R/W entry
            let parsed = str::from_utf8(&line).map_or(Line::Malformed, parse_line);
            match parsed {
                Line::Entry(entry) => return Some(Ok(entry)),
                Line::End => self.done = true,
                Line::Malformed => {
                    self.skipped += 1;
                    log::debug!(
                        "skipping trace line {}: {:?}",
                        self.line_no,
                        String::from_utf8_lossy(&line)
                    );
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::testing::init_logging;

    fn entries(text: &'static str) -> Vec<TraceEntry> {
        Trace::from_reader(Box::new(text.as_bytes()))
            .collect::<io::Result<_>>()
            .unwrap()
    }

    #[test]
    fn parses_reads_and_writes() {
        assert_eq!(
            parse_line("0x804ae19: R 0x9cb3d40"),
            Line::Entry(TraceEntry {
                op: Op::Read,
                addr: 0x9cb3d40
            })
        );
        assert_eq!(
            parse_line("804ae1c: W 9cb3d44\n"),
            Line::Entry(TraceEntry {
                op: Op::Write,
                addr: 0x9cb3d44
            })
        );
    }

    #[test]
    fn rejects_bad_lines() {
        assert_eq!(parse_line("badaddr: X 0x10"), Line::Malformed);
        assert_eq!(parse_line("0x1: r 0x10"), Line::Malformed);
        assert_eq!(parse_line("0x1: R zz"), Line::Malformed);
        assert_eq!(parse_line("0x1 R 0x10"), Line::Malformed);
        assert_eq!(parse_line(""), Line::Malformed);
        assert_eq!(parse_line("#eof"), Line::End);
    }

    #[test]
    fn stops_at_terminator_and_skips_garbage() {
        init_logging();
        let mut trace = Trace::from_reader(Box::new(
            "0x1: R 0x0\nbadaddr: X 0x10\n\n0x2: W 0x4\n#eof\n0x3: R 0x8\n".as_bytes(),
        ));
        let got: Vec<_> = trace.by_ref().map(Result::unwrap).collect();
        assert_eq!(
            got,
            vec![
                TraceEntry {
                    op: Op::Read,
                    addr: 0
                },
                TraceEntry {
                    op: Op::Write,
                    addr: 4
                },
            ]
        );
        assert_eq!(trace.skipped, 2);
        assert!(trace.next().is_none());
    }

    #[test]
    fn non_utf8_line_is_skipped() {
        init_logging();
        let mut trace = Trace::from_reader(Box::new(
            &b"0x1: R 0x0\n\xff\xfe: X 0x10\n0x2: W 0x4\r\n0x3: R \xff\n0x4: R 0x8"[..],
        ));
        let got: Vec<_> = trace
            .by_ref()
            .collect::<io::Result<_>>()
            .unwrap();
        assert_eq!(
            got.iter().map(|e| e.addr).collect::<Vec<_>>(),
            vec![0x0, 0x4, 0x8]
        );
        assert!(got[1].is_write());
        assert_eq!(trace.skipped, 2);
    }

    #[test]
    fn no_terminator_reads_to_end() {
        assert_eq!(entries("0x1: R 0x0\n0x2: R 0x4").len(), 2);
        assert!(entries("").is_empty());
    }

    #[test]
    fn opens_plain_and_xz_files() {
        let text = "0x1: R 0x40\n0x2: W 0x80\n#eof\n";
        let dir = tempfile::tempdir().unwrap();

        let plain = dir.path().join("trace.txt");
        fs::write(&plain, text).unwrap();

        let packed = dir.path().join("trace.txt.xz");
        let mut encoder = xz2::write::XzEncoder::new(fs::File::create(&packed).unwrap(), 6);
        encoder.write_all(text.as_bytes()).unwrap();
        encoder.finish().unwrap();

        for path in [plain, packed] {
            let got: Vec<_> = Trace::open(&path).unwrap().map(Result::unwrap).collect();
            assert_eq!(got.len(), 2);
            assert_eq!(got[1].addr, 0x80);
            assert!(got[1].is_write());
        }
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Trace::open(&dir.path().join("nope")).is_err());
    }
}
