//! Wall-clock timing splits, written into the diagnostics file next to each
//! render.

use std::{
    io::{self, Write},
    time::{Duration, Instant},
};

struct Split {
    name: String,
    duration: Duration,
}

pub struct Stopwatch {
    name: String,
    splits: Vec<Split>,
    start_total: Instant,
    start_split: Instant,
}

impl Stopwatch {
    pub fn new(name: String) -> Stopwatch {
        let now = Instant::now();
        Stopwatch {
            name,
            splits: Vec::new(),
            start_total: now,
            start_split: now,
        }
    }

    pub fn total_elapsed(&self) -> Duration {
        self.start_total.elapsed()
    }

    /// Closes the current split and starts the next one.
    pub fn record_split(&mut self, name: String) -> Duration {
        let duration = self.start_split.elapsed();
        self.start_split = Instant::now();
        self.splits.push(Split { name, duration });
        duration
    }

    pub fn display<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writeln!(
            writer,
            "Stopwatch: {};  Total elapsed duration: {:?}",
            self.name,
            self.total_elapsed()
        )?;
        for split in self.splits.iter() {
            writeln!(writer, "  {}: {:?}", split.name, split.duration)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_appear_in_the_report() {
        let mut stopwatch = Stopwatch::new("test".to_owned());
        stopwatch.record_split("first".to_owned());
        stopwatch.record_split("second".to_owned());

        let mut report = Vec::new();
        stopwatch.display(&mut report).unwrap();
        let report = String::from_utf8(report).unwrap();
        assert!(report.contains("Stopwatch: test"));
        assert!(report.contains("first"));
        assert!(report.contains("second"));
    }
}
