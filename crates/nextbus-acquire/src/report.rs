use nextbus_model::{ArrivalEstimate, StopId, StopTarget};
use std::io::{self, Write};

/// Format one estimate the way it is printed for a stop.
pub fn estimate_line(stop: StopId, estimate: &ArrivalEstimate) -> String {
    format!("Stop {stop} - {estimate}")
}

/// Plain-text report writer: a heading per stop followed by its estimates,
/// with a blank line between stop sections.
pub struct Report<W: Write> {
    out: W,
    sections: usize,
}

impl<W: Write> Report<W> {
    pub fn new(out: W) -> Self {
        Self { out, sections: 0 }
    }

    /// Start a stop section. Flushed so the heading precedes any log output
    /// produced while that stop is fetched.
    pub fn begin_stop(&mut self, target: &StopTarget) -> io::Result<()> {
        if self.sections > 0 {
            writeln!(self.out)?;
        }
        self.sections += 1;
        writeln!(self.out, "{}", target.heading())?;
        self.out.flush()
    }

    pub fn estimates(&mut self, stop: StopId, estimates: &[ArrivalEstimate]) -> io::Result<()> {
        for estimate in estimates {
            writeln!(self.out, "{}", estimate_line(stop, estimate))?;
        }
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
