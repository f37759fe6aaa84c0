use crate::session::{sum_durations, Segment};

/// Step-shaped series of speed and incline over the planned timeline (seconds)
pub fn profile_series(segments: &[Segment]) -> (Vec<(f64, f64)>, Vec<(f64, f64)>) {
    let mut speed = Vec::with_capacity(segments.len() * 2);
    let mut incline = Vec::with_capacity(segments.len() * 2);
    let mut t = 0.0;
    for seg in segments {
        let end = t + seg.duration as f64;
        speed.push((t, seg.speed));
        speed.push((end, seg.speed));
        incline.push((t, seg.incline));
        incline.push((end, seg.incline));
        t = end;
    }
    (speed, incline)
}

/// Compute X (seconds) and Y (speed/incline) bounds for the profile chart
pub fn compute_chart_params(segments: &[Segment]) -> (f64, f64) {
    let overall_duration = sum_durations(segments);
    let highest = segments
        .iter()
        .flat_map(|s| [s.speed, s.incline])
        .fold(0.0_f64, f64::max);

    ((overall_duration as f64).max(1.0), highest.ceil().max(1.0))
}

/// Vertical marker at the current playback position
pub fn position_marker(position_secs: u64, y_max: f64) -> Vec<(f64, f64)> {
    let x = position_secs as f64;
    vec![(x, 0.0), (x, y_max)]
}

/// Format a simple numeric label consistently
pub fn format_label(val: f64) -> String {
    if (val - val.round()).abs() < f64::EPSILON {
        format!("{}", val.round())
    } else {
        format!("{val:.2}")
    }
}
