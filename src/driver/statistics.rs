//! Capture and report phase timings

use std::{
    fmt::Display,
    time::{Duration, Instant},
};

use indexmap::IndexMap;

#[derive(Default, Debug)]
pub struct Timings {
    timings: IndexMap<String, Duration>,
}

impl Timings {
    pub fn record<T: AsRef<str>>(&mut self, name: T, elapsed: Duration) {
        self.timings.insert(name.as_ref().to_string(), elapsed);
    }

    /// Run `f`, recording its elapsed time under `name`
    pub fn time<T: AsRef<str>, R, F: FnOnce() -> R>(&mut self, name: T, f: F) -> R {
        let start = Instant::now();
        let result = f();
        self.record(name, start.elapsed());
        result
    }

    pub fn get(&self, name: &str) -> Option<Duration> {
        self.timings.get(name).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.timings.is_empty()
    }
}

impl Display for Timings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let width = self.timings.keys().map(|k| k.len()).max().unwrap_or(0) + 1;

        for (k, v) in &self.timings {
            writeln!(f, "{:width$}: {:14.9}s", k, v.as_secs_f64(), width = width)?;
        }
        Ok(())
    }
}
