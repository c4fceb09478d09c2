//! Secret Manager references attached to a container.
//!
//! Each entry is `NAME=SECRET:VERSION`, where `NAME` is an environment
//! variable or an absolute mount path, and `VERSION` is `latest` or a
//! version number. Malformed entries are dropped, not fatal.

use std::sync::LazyLock;

use regex::Regex;

static SECRET_REF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[A-Za-z_][A-Za-z0-9_]*|/[^=,\s]+)=[A-Za-z0-9_-]+:(?:latest|[0-9]+)$")
        .expect("secret reference pattern is a valid regex")
});

pub fn is_valid_secret_ref(entry: &str) -> bool {
    SECRET_REF.is_match(entry)
}

/// Split entries into `(valid, invalid)`, preserving declaration order.
pub fn partition_secret_refs(entries: &[String]) -> (Vec<&str>, Vec<&str>) {
    entries
        .iter()
        .map(String::as_str)
        .partition(|e| is_valid_secret_ref(e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_env_var_refs() {
        assert!(is_valid_secret_ref("DB_PASS=db-pass:latest"));
        assert!(is_valid_secret_ref("_TOKEN=api_token:12"));
    }

    #[test]
    fn accepts_mount_path_refs() {
        assert!(is_valid_secret_ref("/etc/secrets/key=tls-key:3"));
    }

    #[test]
    fn rejects_malformed_refs() {
        for bad in [
            "",
            "DB_PASS",
            "DB_PASS=db-pass",
            "DB_PASS=db-pass:",
            "DB_PASS=db-pass:first",
            "1DB=db:latest",
            "DB PASS=db:latest",
            "DB=db:latest,OTHER=x:1",
            "=db:latest",
        ] {
            assert!(!is_valid_secret_ref(bad), "accepted {bad:?}");
        }
    }

    #[test]
    fn partition_keeps_order() {
        let entries = vec![
            "A=a:latest".to_owned(),
            "broken".to_owned(),
            "B=b:2".to_owned(),
            "C=c".to_owned(),
        ];
        let (valid, invalid) = partition_secret_refs(&entries);
        assert_eq!(valid, vec!["A=a:latest", "B=b:2"]);
        assert_eq!(invalid, vec!["broken", "C=c"]);
    }
}
