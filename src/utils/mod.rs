use chrono::{DateTime, Duration, Utc};

/// Parse an ISO-8601 duration such as `PT1H2M3S` or `P1DT4M`.
///
/// Fractional seconds are dropped. Years and months are rejected since their length is
/// ambiguous, and so is anything too large for a `chrono::Duration`.
pub fn parse_iso8601_duration(input: &str) -> Option<Duration> {
    let rest = input.trim().strip_prefix('P')?;
    if rest.is_empty() {
        return None;
    }

    let mut total = 0i64;
    let mut number = String::new();
    let mut in_time = false;
    let mut saw_component = false;

    for c in rest.chars() {
        match c {
            'T' if !in_time && number.is_empty() => in_time = true,
            '0'..='9' | '.' | ',' => number.push(if c == ',' { '.' } else { c }),
            unit => {
                if number.is_empty() {
                    return None;
                }
                let value: f64 = number.parse().ok()?;
                number.clear();

                let seconds_per_unit: i64 = match (unit, in_time) {
                    ('W', false) => 7 * 86_400,
                    ('D', false) => 86_400,
                    ('H', true) => 3_600,
                    ('M', true) => 60,
                    ('S', true) => 1,
                    _ => return None,
                };
                let seconds = (value * seconds_per_unit as f64).trunc();
                if !seconds.is_finite() || seconds >= i64::MAX as f64 {
                    return None;
                }
                total = total.checked_add(seconds as i64)?;
                saw_component = true;
            }
        }
    }

    if !number.is_empty() || !saw_component {
        return None;
    }

    Duration::try_seconds(total)
}

/// Format duration in human-readable format
pub fn format_duration(duration: Duration) -> String {
    let total_seconds = duration.num_seconds().max(0);
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let secs = total_seconds % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, secs)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, secs)
    } else {
        format!("{}s", secs)
    }
}

/// Describe how long ago `then` was, relative to `now` ("3 days ago")
pub fn format_relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(then);
    let seconds = elapsed.num_seconds();

    if seconds < 60 {
        return "just now".to_string();
    }

    const UNITS: &[(&str, i64)] = &[
        ("year", 365 * 86_400),
        ("month", 30 * 86_400),
        ("week", 7 * 86_400),
        ("day", 86_400),
        ("hour", 3_600),
        ("minute", 60),
    ];

    let (unit, size) = UNITS
        .iter()
        .copied()
        .find(|(_, size)| seconds >= *size)
        .unwrap_or(("minute", 60));

    let count = seconds / size;
    if count == 1 {
        format!("1 {} ago", unit)
    } else {
        format!("{} {}s ago", count, unit)
    }
}

/// Group digits in thousands ("1,234,567")
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    grouped
}

/// Sanitize filename for safe filesystem usage
pub fn sanitize_filename(filename: &str) -> String {
    filename
        .chars()
        .map(|c| {
            match c {
                // Keep alphanumeric characters, spaces, hyphens, underscores, and dots
                c if c.is_alphanumeric() || c == ' ' || c == '-' || c == '_' || c == '.' => c,
                // Replace everything else with underscore
                _ => '_',
            }
        })
        .collect::<String>()
        .trim()
        .to_string()
}

/// Longest filename component taken from a title or subject, in characters
pub const MAX_SLUG_CHARS: usize = 100;

/// Turn a title or subject into a filename component: sanitized, spaces to underscores,
/// capped at `MAX_SLUG_CHARS` characters
pub fn filename_slug(text: &str) -> String {
    sanitize_filename(text)
        .replace(' ', "_")
        .chars()
        .take(MAX_SLUG_CHARS)
        .collect()
}

/// Read one line of input, without the trailing newline
pub fn read_trimmed_line<R: std::io::BufRead>(mut input: R) -> std::io::Result<String> {
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim().to_string())
}

/// Check if the current environment has required tools
pub async fn check_dependencies(yt_dlp_path: &str) -> Vec<String> {
    let mut missing = Vec::new();

    if !check_command_available(yt_dlp_path).await {
        missing.push(format!("{} - required for fetching transcripts", yt_dlp_path));
    }

    missing
}

/// Check if a command is available in PATH
async fn check_command_available(command: &str) -> bool {
    use tokio::process::Command;

    Command::new(command)
        .arg("--version")
        .output()
        .await
        .map(|output| output.status.success())
        .unwrap_or(false)
}
