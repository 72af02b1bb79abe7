use indicatif::{ProgressBar, ProgressStyle};
use lintfix_golangci::{ProvisionListener, ProvisionState};

const STEPS: u64 = 1000;
const TEMPLATE: &str = "{spinner:.cyan} [{bar:30.cyan/blue}] {percent:>3}% {msg}";

/// Renders provisioning progress as a terminal bar.
pub struct BarListener {
    bar: ProgressBar,
}

impl BarListener {
    pub fn new() -> Self {
        let bar = ProgressBar::new(STEPS);
        if let Ok(style) = ProgressStyle::default_bar().template(TEMPLATE) {
            bar.set_style(style.progress_chars("=> "));
        }
        Self { bar }
    }
}

impl Default for BarListener {
    fn default() -> Self {
        Self::new()
    }
}

impl ProvisionListener for BarListener {
    fn on_state(&mut self, state: ProvisionState) {
        match state {
            ProvisionState::Ready => self.bar.finish_with_message("done"),
            ProvisionState::Cancelled | ProvisionState::Failed => self.bar.abandon(),
            _ => {}
        }
    }

    fn on_text(&mut self, text: &str) {
        self.bar.set_message(text.to_string());
    }

    fn on_fraction(&mut self, fraction: f64) {
        self.bar.set_position((fraction.clamp(0.0, 1.0) * STEPS as f64) as u64);
    }
}
