/// A normalized subscriber address: trimmed, lower-cased, non-empty.
///
/// The address string itself is the subscriber's identity, so
/// normalization happens here, before any comparison or storage. No
/// further syntax validation is performed on purpose - the intake is
/// deliberately permissive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriberEmail(String);

impl SubscriberEmail {
    pub fn parse(s: String) -> Result<SubscriberEmail, String> {
        let normalized = s.trim().to_lowercase();
        if normalized.is_empty() {
            return Err("subscriber email cannot be empty".to_string());
        }
        Ok(Self(normalized))
    }
}

impl AsRef<str> for SubscriberEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SubscriberEmail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
