use crate::error::{InfraError, Result};

/// Parses repeated `--parameter KEY=VALUE` flags. Splits on the first `=`;
/// a token with no `=` is a fatal parse error. Empty values are legal.
/// Duplicate keys are preserved in input order — the provider owns its
/// own duplicate policy.
pub fn parse_parameters(raw: &[String]) -> Result<Vec<(String, String)>> {
    raw.iter()
        .map(|token| {
            token
                .split_once('=')
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .ok_or_else(|| InfraError::InvalidInput(format!("parameter missing '=': {token}")))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_first_equals_only() {
        let params = parse_parameters(&["KEY=a=b=c".to_string()]).unwrap();
        assert_eq!(params, vec![("KEY".to_string(), "a=b=c".to_string())]);
    }

    #[test]
    fn missing_equals_is_fatal() {
        assert!(parse_parameters(&["NOEQUALS".to_string()]).is_err());
    }

    #[test]
    fn empty_value_is_legal() {
        let params = parse_parameters(&["KEY=".to_string()]).unwrap();
        assert_eq!(params, vec![("KEY".to_string(), String::new())]);
    }

    #[test]
    fn duplicate_keys_preserved_in_order() {
        let params = parse_parameters(&["K=1".to_string(), "K=2".to_string()]).unwrap();
        assert_eq!(params, vec![("K".to_string(), "1".to_string()), ("K".to_string(), "2".to_string())]);
    }
}
