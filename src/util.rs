use rand::Rng;

const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const ID_LEN: usize = 9;

/// Format whole seconds as `MM:SS`. Minutes keep counting past 59.
pub fn format_time(total_secs: u64) -> String {
    format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
}

/// Compose a duration from minute and second text fields. Unparseable parts count as 0.
pub fn parse_time(mm: &str, ss: &str) -> u32 {
    let m = mm.trim().parse::<u32>().unwrap_or(0);
    let s = ss.trim().parse::<u32>().unwrap_or(0);
    m.saturating_mul(60).saturating_add(s)
}

pub fn minutes_of(total_secs: u32) -> String {
    (total_secs / 60).to_string()
}

pub fn seconds_of(total_secs: u32) -> String {
    (total_secs % 60).to_string()
}

/// Random lowercase base-36 identifier
pub fn generate_id() -> String {
    let mut rng = rand::thread_rng();
    (0..ID_LEN)
        .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
        .collect()
}

/// `part / whole` clamped to `[0, 1]`; 0 when `whole` is 0 so callers never see NaN.
pub fn ratio(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    (part as f64 / whole as f64).clamp(0.0, 1.0)
}
