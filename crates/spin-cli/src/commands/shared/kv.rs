/// Split `key=value` on the first `=`. The key must be non-empty.
pub fn parse_key_value(raw: &str) -> anyhow::Result<(String, String)> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => anyhow::bail!("invalid entry '{raw}': expected key=value"),
    }
}

/// Parse a comma separated `K1=V1,K2=V2` list. Blank entries are skipped.
pub fn parse_pairs(raw: &str) -> anyhow::Result<Vec<(String, String)>> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(parse_key_value)
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn splits_on_first_equals() {
        assert_eq!(
            parse_key_value("filter=a=b").unwrap(),
            ("filter".to_string(), "a=b".to_string())
        );
        assert_eq!(
            parse_key_value("empty=").unwrap(),
            ("empty".to_string(), String::new())
        );
    }

    #[test]
    fn rejects_missing_equals_or_key() {
        assert!(parse_key_value("novalue").is_err());
        assert!(parse_key_value("=value").is_err());
    }

    #[test]
    fn header_lists() {
        assert_eq!(
            parse_pairs("X-Team=delivery, X-Env=prod,").unwrap(),
            vec![
                ("X-Team".to_string(), "delivery".to_string()),
                ("X-Env".to_string(), "prod".to_string()),
            ]
        );
        assert!(parse_pairs("").unwrap().is_empty());
        assert!(parse_pairs("X-Team").is_err());
    }
}
