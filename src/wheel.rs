pub const LOSE_TURN: i32 = 0;
pub const BANKRUPT: i32 = -1;

pub const WHEEL_SEGMENTS: [i32; 24] = [
    LOSE_TURN, BANKRUPT, 500, 550, 600, 650, 700, 750, 800, 850, 900, BANKRUPT,
    500, 550, 600, 650, 700, 750, 800, 850, 900, 500, 550, 600,
];

/// What a drawn wheel value means for the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    Cash(u32),
    LoseTurn,
    Bankrupt,
}

impl Segment {
    /// Anything that is neither sentinel nor positive is treated as a lost turn.
    pub fn from_value(value: i32) -> Self {
        match value {
            BANKRUPT => Self::Bankrupt,
            v if v > 0 => Self::Cash(v as u32),
            _ => Self::LoseTurn,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelAnalysis {
    /// Summed cash over *all* segments, so a failed spin counts as zero.
    pub expected_value: f64,
    pub lose_turn_probability: f64,
    pub bankrupt_probability: f64,
    pub success_probability: f64,
    /// Mean over cash segments only.
    pub average_positive_value: f64,
}

pub fn analyze_wheel() -> WheelAnalysis {
    analyze_segments(&WHEEL_SEGMENTS)
}

pub fn analyze_segments(segments: &[i32]) -> WheelAnalysis {
    let total = segments.len().max(1) as f64;
    let positive: Vec<f64> = segments.iter().filter(|&&v| v > 0).map(|&v| v as f64).collect();
    let positive_sum: f64 = positive.iter().sum();
    let count = |value: i32| segments.iter().filter(|&&v| v == value).count() as f64;

    WheelAnalysis {
        expected_value: positive_sum / total,
        lose_turn_probability: count(LOSE_TURN) / total,
        bankrupt_probability: count(BANKRUPT) / total,
        success_probability: positive.len() as f64 / total,
        average_positive_value: if positive.is_empty() {
            0.0
        } else {
            positive_sum / positive.len() as f64
        },
    }
}
