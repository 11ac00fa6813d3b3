//! Terminal stand-ins for the phone's haptics, sounds and lock-screen widget.

use std::path::PathBuf;

use runmate_core::{Haptic, LiveStatus, PublishError, Tone, WorkoutCues};
use tracing::{debug, info};

#[derive(Debug, Default)]
pub struct TerminalCues {
    /// Ring the terminal bell on tones.
    pub sound: bool,
    pub haptics: bool,
    /// Print every published status record to stdout as a JSON line.
    pub echo_status: bool,
    /// Keep the latest status record in this file, for an external widget.
    pub status_file: Option<PathBuf>,
}

impl WorkoutCues for TerminalCues {
    fn publish_status(&mut self, status: &LiveStatus) -> Result<(), PublishError> {
        debug!(
            progress = status.progress,
            paused = status.is_paused,
            complete = status.is_complete,
            cancelled = status.is_cancelled,
            "live status"
        );
        if self.echo_status {
            let json = serde_json::to_string(status).map_err(|e| PublishError(e.to_string()))?;
            println!("{json}");
        }
        if let Some(path) = &self.status_file {
            let json = serde_json::to_string(status).map_err(|e| PublishError(e.to_string()))?;
            std::fs::write(path, json)
                .map_err(|e| PublishError(format!("{}: {e}", path.display())))?;
        }
        Ok(())
    }

    fn play_haptic(&mut self, haptic: Haptic) {
        if self.haptics {
            info!(?haptic, "haptic");
        }
    }

    fn play_tone(&mut self, tone: Tone) {
        if self.sound {
            eprint!("\x07");
            info!(?tone, "tone");
        }
    }
}
