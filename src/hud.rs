//! Score and status display
//!
//! The HUD is drawn by the host. The simulation only reports what changed.

/// Host score/status display
pub trait Hud {
    fn set_score(&mut self, score: u32);
    fn set_record(&mut self, record: u32);
    /// Show a transient banner
    fn alert(&mut self, text: &str);
    fn set_paused(&mut self, paused: bool);
}

/// HUD that writes to the log and keeps the latest values
#[derive(Debug, Clone, Default)]
pub struct LogHud {
    pub score: u32,
    pub record: u32,
    pub paused: bool,
    pub alerts: Vec<String>,
}

impl Hud for LogHud {
    fn set_score(&mut self, score: u32) {
        if score != self.score {
            log::debug!("Score: {score}");
        }
        self.score = score;
    }

    fn set_record(&mut self, record: u32) {
        if record > self.record {
            log::info!("New record: {record}");
        }
        self.record = record;
    }

    fn alert(&mut self, text: &str) {
        log::info!("{text}");
        self.alerts.push(text.to_string());
    }

    fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }
}
