use crate::{HashMap, SignalDesc, SignalRef};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Value-change-dump trace sink.
///
/// Samples append to an in-memory buffer so the clocked hot path never
/// touches the filesystem; [`flush`](VcdWriter::flush) drains the buffer
/// to disk. Only changed values are emitted per timestamp.
pub struct VcdWriter {
    writer: BufWriter<File>,
    buffer: String,
    ids: Vec<(String, usize)>,
    last_values: HashMap<usize, u64>,
    timestamp: Option<u64>,
}

impl VcdWriter {
    pub fn new<P: AsRef<Path>>(path: P, signals: &[SignalDesc]) -> std::io::Result<Self> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);

        writeln!(writer, "$date")?;
        writeln!(
            writer,
            "  {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
        )?;
        writeln!(writer, "$end")?;
        writeln!(writer, "$version")?;
        writeln!(writer, "  dalibench")?;
        writeln!(writer, "$end")?;
        writeln!(writer, "$timescale 1ns $end")?;

        writeln!(writer, "$scope module top $end")?;
        let mut ids = Vec::with_capacity(signals.len());
        for (num, desc) in signals.iter().enumerate() {
            let vcd_id = Self::short_id(num);
            writeln!(writer, "$var wire {} {} {} $end", desc.width, vcd_id, desc.name)?;
            ids.push((vcd_id, desc.width));
        }
        writeln!(writer, "$upscope $end")?;

        writeln!(writer, "$enddefinitions $end")?;
        writeln!(writer, "$dumpvars")?;
        writeln!(writer, "$end")?;

        Ok(Self {
            writer,
            buffer: String::new(),
            ids,
            last_values: HashMap::default(),
            timestamp: None,
        })
    }

    // Identifiers use the printable ASCII range 33..=126, shortest first.
    fn short_id(num: usize) -> String {
        let mut id = String::new();
        let mut n = num;
        loop {
            id.push(((n % 94) + 33) as u8 as char);
            if n < 94 {
                break;
            }
            n = (n / 94) - 1;
        }
        id.chars().rev().collect()
    }

    /// Record the state of all signals at `timestamp`. `get_val` samples
    /// the wire addressed by each handle.
    pub fn sample(&mut self, timestamp: u64, get_val: impl Fn(SignalRef) -> u64) {
        let mut stamped = false;
        for index in 0..self.ids.len() {
            let current = get_val(SignalRef(index));
            if self.last_values.get(&index) == Some(&current) {
                continue;
            }
            if !stamped && self.timestamp != Some(timestamp) {
                self.buffer.push_str(&format!("#{timestamp}\n"));
                self.timestamp = Some(timestamp);
                stamped = true;
            }
            let (vcd_id, width) = &self.ids[index];
            if *width == 1 {
                self.buffer.push_str(&format!("{current}{vcd_id}\n"));
            } else {
                self.buffer.push_str(&format!("b{current:b} {vcd_id}\n"));
            }
            self.last_values.insert(index, current);
        }
    }

    /// Drain buffered samples to the file.
    pub fn flush(&mut self) -> std::io::Result<()> {
        self.writer.write_all(self.buffer.as_bytes())?;
        self.buffer.clear();
        self.writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_ids_cover_the_printable_range() {
        assert_eq!(VcdWriter::short_id(0), "!");
        assert_eq!(VcdWriter::short_id(93), "~");
        assert_eq!(VcdWriter::short_id(94), "!!");
    }

    #[test]
    fn emits_changes_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trace.vcd");
        let signals = vec![SignalDesc::new("clk", 1), SignalDesc::new("data", 8)];
        let mut vcd = VcdWriter::new(&path, &signals).unwrap();

        vcd.sample(0, |s| if s.index() == 0 { 1 } else { 0xa5 });
        vcd.sample(500, |s| if s.index() == 0 { 0 } else { 0xa5 });
        vcd.sample(1000, |s| if s.index() == 0 { 0 } else { 0xa5 });
        vcd.flush().unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("$timescale 1ns $end"));
        assert!(content.contains("$var wire 1 ! clk $end"));
        assert!(content.contains("$var wire 8 \" data $end"));
        assert!(content.contains("#0"));
        assert!(content.contains("#500"));
        // Nothing changed at t=1000, so no timestamp marker for it.
        assert!(!content.contains("#1000"));
        assert!(content.contains("b10100101 \""));
    }
}
