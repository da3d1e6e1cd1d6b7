//! CLI-specific progress handling for butterfly-roads
//!
//! Renders the library's per-pass progress callbacks as spinners on stderr.

use butterfly_roads::{Pass, ProgressCallback};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Creates a spinner counting records for one pass
pub fn create_spinner(pass: Pass) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg} {human_pos} records ({per_sec})")
            .expect("Failed to create progress style"),
    );
    pb.set_message(format!("Reading {pass}"));
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

/// Progress manager for the two extraction passes
pub struct ProgressManager {
    current: Mutex<Option<(Pass, ProgressBar)>>,
}

impl ProgressManager {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            current: Mutex::new(None),
        })
    }

    /// Move the spinner of `pass` to `count`, finishing the previous pass's
    /// spinner when the pass changes.
    pub fn update(&self, pass: Pass, count: u64) {
        let Ok(mut current) = self.current.lock() else {
            return;
        };

        match current.as_ref() {
            Some((active, pb)) if *active == pass => pb.set_position(count),
            _ => {
                if let Some((done, pb)) = current.take() {
                    pb.finish_with_message(format!("✓ Read {done}"));
                }
                let pb = create_spinner(pass);
                pb.set_position(count);
                *current = Some((pass, pb));
            }
        }
    }

    /// Finish whatever spinner is still running
    pub fn finish(&self) {
        if let Ok(mut current) = self.current.lock() {
            if let Some((done, pb)) = current.take() {
                pb.finish_with_message(format!("✓ Read {done}"));
            }
        }
    }

    /// Callback to hand to `ExtractOptions::progress`
    pub fn callback(self: &Arc<Self>) -> ProgressCallback {
        let manager = Arc::clone(self);
        Arc::new(move |pass: Pass, count: u64| manager.update(pass, count))
    }
}
