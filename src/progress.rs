/// Progress reporting for the per-listing extraction loop.
/// Frontends implement this to surface status while listings are fetched.
pub trait Progress {
    /// Called at the start with the number of listings to extract.
    fn begin(&mut self, _total: usize) {}

    /// Called once per listing, in order; `ok` is false when extraction failed.
    fn item_done(&mut self, _index: usize, _url: &str, _ok: bool) {}

    /// Called at the end of the loop.
    fn finish(&mut self) {}
}

/// A no-op progress sink.
pub struct NullProgress;
impl Progress for NullProgress {}

/// Writes one `info` line per listing.
#[derive(Debug, Default)]
pub struct LogProgress {
    total: usize,
    done: usize,
    failed: usize,
}

impl LogProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn done(&self) -> usize {
        self.done
    }

    pub fn failed(&self) -> usize {
        self.failed
    }
}

impl Progress for LogProgress {
    fn begin(&mut self, total: usize) {
        self.total = total;
        self.done = 0;
        self.failed = 0;
        log::info!("Extracting {} listing(s)", total);
    }

    fn item_done(&mut self, _index: usize, url: &str, ok: bool) {
        self.done += 1;
        if !ok {
            self.failed += 1;
        }
        let status = if ok { "ok" } else { "failed" };
        log::info!("[{}/{}] {} {}", self.done, self.total, status, url);
    }

    fn finish(&mut self) {
        log::info!(
            "Extraction finished: {} listing(s), {} failed",
            self.done,
            self.failed
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_progress_counts() {
        let mut progress = LogProgress::new();
        progress.begin(3);
        progress.item_done(0, "a", true);
        progress.item_done(1, "b", false);
        progress.item_done(2, "c", true);
        progress.finish();

        assert_eq!(progress.done(), 3);
        assert_eq!(progress.failed(), 1);
    }
}
