use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

/// Aggregate-plus-current-file byte bars for hub transfers.
pub struct TransferBars {
    _multi: MultiProgress,
    total: ProgressBar,
    file: ProgressBar,
}

impl TransferBars {
    pub fn new(total_bytes: u64) -> Self {
        let multi = MultiProgress::new();

        let total = multi.add(ProgressBar::new(total_bytes));
        total.set_style(bytes_style());
        total.set_message("total".to_string());

        let file = multi.add(ProgressBar::new(0));
        file.set_style(bytes_style());

        Self {
            _multi: multi,
            total,
            file,
        }
    }

    /// Resets the per-file bar for a new transfer attempt and returns the
    /// chunk callback that advances both bars.
    pub fn begin_file(
        &self,
        name: &str,
        size: u64,
        idx: usize,
        total_files: usize,
    ) -> Box<dyn FnMut(u64) + Send + Sync + 'static> {
        self.file.reset();
        self.file.set_length(size);
        self.file
            .set_message(format!("[{}/{}] {}", idx + 1, total_files, name));

        let file = self.file.clone();
        let total = self.total.clone();
        Box::new(move |n| {
            file.inc(n);
            total.inc(n);
        })
    }

    pub fn finish(&self) {
        self.file.finish_and_clear();
        self.total.finish_and_clear();
    }
}

fn bytes_style() -> ProgressStyle {
    ProgressStyle::with_template("{msg:32!} {bar:28.cyan/blue} {bytes}/{total_bytes} ({bytes_per_sec})")
        .unwrap()
}
