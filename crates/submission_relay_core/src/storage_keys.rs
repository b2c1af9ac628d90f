use chrono::{DateTime, Utc};

pub const CONSOLE_OBJECT_BASE: &str = "https://s3.console.aws.amazon.com/s3/object";

pub fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("{trimmed}/")
    }
}

/// ISO-8601 with millisecond precision and `:` swapped for `-`.
pub fn object_timestamp(now: DateTime<Utc>) -> String {
    now.format("%Y-%m-%dT%H-%M-%S%.3fZ").to_string()
}

pub fn destination_object_name(prefix: &str, recipient_email: &str, now: DateTime<Utc>) -> String {
    format!(
        "{}{recipient_email}_{}.zip",
        normalize_prefix(prefix),
        object_timestamp(now)
    )
}

pub fn staged_file_name(recipient_email: &str, now: DateTime<Utc>) -> String {
    let safe_email = recipient_email.replace(['/', '\\'], "_");
    format!("{safe_email}_{}.zip", now.timestamp_millis())
}

pub fn canonical_object_url(bucket: &str, key: &str) -> String {
    format!("s3://{bucket}/{key}")
}

/// The key is percent-encoded as a query value, so `@`, `+` and `&` in
/// recipient addresses survive the round trip.
pub fn console_object_url(region: &str, bucket: &str, key: &str) -> String {
    format!(
        "{CONSOLE_OBJECT_BASE}/{bucket}?region={region}&prefix={}",
        urlencoding::encode(key)
    )
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 10, 15, 30)
            .single()
            .expect("valid timestamp")
            + chrono::Duration::milliseconds(123)
    }

    #[test]
    fn builds_destination_name_without_colons() {
        let key = destination_object_name("", "student@example.edu", fixed_now());
        assert_eq!(key, "student@example.edu_2024-03-01T10-15-30.123Z.zip");
        assert!(!key.contains(':'));
    }

    #[test]
    fn destination_name_honours_prefix() {
        let key = destination_object_name("/submissions/", "student@example.edu", fixed_now());
        assert_eq!(
            key,
            "submissions/student@example.edu_2024-03-01T10-15-30.123Z.zip"
        );
    }

    #[test]
    fn staged_name_uses_epoch_millis_and_strips_separators() {
        let name = staged_file_name("a/b@example.edu", fixed_now());
        assert_eq!(name, "a_b@example.edu_1709288130123.zip");
    }

    #[test]
    fn builds_canonical_url() {
        assert_eq!(
            canonical_object_url("relay-bucket", "student@example.edu_x.zip"),
            "s3://relay-bucket/student@example.edu_x.zip"
        );
    }

    #[test]
    fn console_url_percent_encodes_at_sign() {
        let url = console_object_url("us-east-1", "relay-bucket", "student@example.edu_x.zip");
        assert_eq!(
            url,
            "https://s3.console.aws.amazon.com/s3/object/relay-bucket?region=us-east-1&prefix=student%40example.edu_x.zip"
        );
        assert!(!url.contains('@'));
    }

    #[test]
    fn console_url_keeps_plus_in_recipient() {
        let url = console_object_url("us-east-1", "relay-bucket", "first+tag@example.edu_x.zip");
        assert_eq!(
            url,
            "https://s3.console.aws.amazon.com/s3/object/relay-bucket?region=us-east-1&prefix=first%2Btag%40example.edu_x.zip"
        );
    }

    #[test]
    fn console_url_does_not_split_on_ampersand() {
        let url = console_object_url("us-east-1", "relay-bucket", "a&b=c#d@example.edu_x.zip");
        let (_, prefix) = url.split_once("&prefix=").expect("prefix parameter");
        assert_eq!(prefix, "a%26b%3Dc%23d%40example.edu_x.zip");
        assert_eq!(
            urlencoding::decode(prefix).expect("valid utf-8"),
            "a&b=c#d@example.edu_x.zip"
        );
    }

    #[test]
    fn console_url_encodes_prefix_separator() {
        let url = console_object_url("us-east-1", "relay-bucket", "submissions/a@b.c_x.zip");
        assert!(url.ends_with("&prefix=submissions%2Fa%40b.c_x.zip"));
    }
}
