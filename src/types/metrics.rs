//! Network and frame-time metrics reported by online sessions
//!
//! Field names follow the client's own struct; what each one measures is not
//! documented anywhere, so values are kept exactly as sent.

use serde::{Deserialize, Serialize};

/// Session-wide experience metrics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct UserExperienceMetrics {
    pub current_mspf: f32,
    pub average_mspf: f32,
    pub high_mspf: f32,
    pub predict_applied: u32,
    pub predict_desired: u32,
    pub is_host: bool,
    pub is_create: bool,
    pub num_players: u32,
    pub num_ps3s: u32,
    pub average_rtt_host: f32,
    pub bandwidth_usage: f32,
    pub worst_ping: f32,
    pub worst_bandwidth: f32,
    pub worst_packet_loss: f32,
    pub worst_players: u32,
    pub http_bandwidth_up: f32,
    pub http_bandwidth_down: f32,
    pub frame: u32,
    pub last_mgj_frame: u32,
    pub player_stats: Vec<PlayerNetStats>,
}

/// Per-player network statistics nested in [`UserExperienceMetrics`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct PlayerNetStats {
    pub frame: u32,
    pub player: u32,
    pub is_local: bool,
    pub available_bandwidth: u32,
    pub available_rnp_bandwidth: u32,
    pub available_game_bandwidth: f32,
    pub recent_total_bandwidth_used: u32,
    pub time_between_sends: f32,
}
