// Parsing of the timing summary `ollama run --verbose` prints on stderr

/// Seconds reported on the `load duration:` line, if present.
pub fn parse_load_duration(stderr: &str) -> Option<f64> {
    stderr
        .lines()
        .find_map(|line| line.trim().strip_prefix("load duration:"))
        .and_then(|value| parse_go_duration(value.trim()))
}

/// Parse a Go-style duration such as `1m3.5s`, `812.4ms` or `950µs` into seconds.
pub fn parse_go_duration(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let mut total = 0.0;
    let mut rest = text;
    while !rest.is_empty() {
        let number_len = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        if number_len == 0 {
            return None;
        }
        let value: f64 = rest[..number_len].parse().ok()?;
        rest = &rest[number_len..];

        let unit_len = rest
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(rest.len());
        let scale = match &rest[..unit_len] {
            "h" => 3600.0,
            "m" => 60.0,
            "s" => 1.0,
            "ms" => 1e-3,
            "us" | "µs" | "μs" => 1e-6,
            "ns" => 1e-9,
            _ => return None,
        };
        rest = &rest[unit_len..];
        total += value * scale;
    }
    Some(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_parse_go_duration_units() {
        assert!(close(parse_go_duration("2.5s").unwrap(), 2.5));
        assert!(close(parse_go_duration("812.4ms").unwrap(), 0.8124));
        assert!(close(parse_go_duration("950µs").unwrap(), 0.00095));
        assert!(close(parse_go_duration("120ns").unwrap(), 1.2e-7));
        assert!(close(parse_go_duration("1m3.5s").unwrap(), 63.5));
        assert!(close(parse_go_duration("1h0m2s").unwrap(), 3602.0));
    }

    #[test]
    fn test_parse_go_duration_rejects_garbage() {
        assert!(parse_go_duration("").is_none());
        assert!(parse_go_duration("fast").is_none());
        assert!(parse_go_duration("12").is_none());
        assert!(parse_go_duration("3 parsecs").is_none());
    }

    #[test]
    fn test_parse_load_duration_from_verbose_stats() {
        let stderr = "\
total duration:       4.102938s
load duration:        1.25s
prompt eval count:    32 token(s)
prompt eval duration: 120ms
eval rate:            41.2 tokens/s
";
        assert!(close(parse_load_duration(stderr).unwrap(), 1.25));
        assert!(parse_load_duration("pulling manifest\n").is_none());
    }
}
