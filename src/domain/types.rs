//! Strongly-typed value objects used by domain entities.
//!
//! These wrappers enforce basic invariants (e.g., positive identifiers,
//! normalized/validated email) so that once a value reaches the domain layer it
//! can be treated as trusted.
use std::{ops::Deref, str::FromStr};

use phonenumber::{Mode, parse};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use thiserror::Error;
use uuid::Uuid;
use url::Url;
use validator::ValidateEmail;

/// Errors produced when attempting to construct a constrained value object.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeConstraintError {
    /// Provided identifier is zero or negative.
    #[error("id must be greater than zero")]
    NonPositiveId,
    /// Provided email failed format validation.
    #[error("invalid email address")]
    InvalidEmail,
    /// Provided string contained no non-whitespace characters.
    #[error("value cannot be empty")]
    EmptyString,
    /// Provided value failed custom validation.
    #[error("invalid value: {0}")]
    InvalidValue(String),
    /// Phone number did not meet expected format.
    #[error("invalid phone number")]
    InvalidPhone,
    /// Provided url failed format validation.
    #[error("invalid url address")]
    InvalidUrl,
    /// Provided share token is empty or too long.
    #[error("invalid share token")]
    InvalidToken,
}

/// Normalizes and validates an email string.
fn normalize_email<S: Into<String>>(email: S) -> Result<String, TypeConstraintError> {
    let normalized = email.into().trim().to_lowercase();
    if normalized.validate_email() {
        Ok(normalized)
    } else {
        Err(TypeConstraintError::InvalidEmail)
    }
}

/// Macro to generate lightweight newtypes for positive identifiers.
macro_rules! id_newtype {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(i32);

        impl $name {
            /// Creates a new identifier ensuring it is greater than zero.
            pub fn new(value: i32) -> Result<Self, TypeConstraintError> {
                if value > 0 {
                    Ok(Self(value))
                } else {
                    Err(TypeConstraintError::NonPositiveId)
                }
            }

            /// Returns the raw `i32` backing this identifier.
            pub const fn get(self) -> i32 {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<i32> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: i32) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for i32 {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

id_newtype!(UserId, "Unique identifier for a back-office user.");
id_newtype!(HearingId, "Unique identifier for a hearing.");
id_newtype!(ListingId, "Unique identifier for an opportunity listing.");
id_newtype!(TeamMemberId, "Unique identifier for a team member profile.");
id_newtype!(ErrorLogId, "Unique identifier for an error log entry.");

/// Lower-cased and validated email address.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Email(String);

impl Email {
    /// Validates and normalizes an email string.
    pub fn new<S: Into<String>>(email: S) -> Result<Self, TypeConstraintError> {
        let normalized = normalize_email(email)?;
        Ok(Self(normalized))
    }

    /// Borrow the email as a `&str`.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert into the owned inner `String`.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for Email {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for Email {
    type Error = TypeConstraintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for Email {
    type Error = TypeConstraintError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.0
    }
}

/// Wrapper for non-empty, trimmed strings.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Trims whitespace and rejects empty inputs.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let trimmed = value.into().trim().to_string();
        if trimmed.is_empty() {
            return Err(TypeConstraintError::EmptyString);
        }
        Ok(Self(trimmed))
    }

    /// Consume the wrapper returning the owned string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

macro_rules! non_empty_string_newtype {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(String);

        impl $name {
            /// Constructs a trimmed, non-empty value.
            pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
                let inner = NonEmptyString::new(value)?;
                Ok(Self(inner.into_inner()))
            }

            /// Borrow the value as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the wrapper and return the owned string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Deref for $name {
            type Target = str;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

non_empty_string_newtype!(PersonName, "Person name wrapper enforcing non-empty values.");

non_empty_string_newtype!(
    CaseNumber,
    "Court case number enforcing trimmed, non-empty values."
);

non_empty_string_newtype!(CourtName, "Court or tribunal name enforcing non-empty values.");

non_empty_string_newtype!(
    LocationText,
    "Hearing location enforcing trimmed, non-empty values."
);

non_empty_string_newtype!(
    Title,
    "Portuguese title or headline enforcing trimmed, non-empty values."
);

non_empty_string_newtype!(
    ErrorContext,
    "Label identifying where an error was recorded."
);

/// Free text sanitized with `ammonia`, possibly empty.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RichText(String);

impl RichText {
    /// Sanitizes and trims a user provided value.
    pub fn new<S: Into<String>>(value: S) -> Self {
        Self(ammonia::clean(value.into().trim()))
    }

    /// Borrow the value as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consume the wrapper and return the owned string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for RichText {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Sanitized text that must not be empty after cleaning.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MessageText(String);

impl MessageText {
    /// Constructs a sanitized, trimmed, non-empty value.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let sanitized = ammonia::clean(&value.into());
        let inner = NonEmptyString::new(sanitized)?;
        Ok(Self(inner.into_inner()))
    }

    /// Borrow the value as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for MessageText {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for MessageText {
    type Error = TypeConstraintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Normalizes a phone number string to E.164 format.
pub fn normalize_phone_to_e164(value: &str) -> Result<String, TypeConstraintError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(TypeConstraintError::EmptyString);
    }
    let parsed = parse(None, trimmed).map_err(|_| TypeConstraintError::InvalidPhone)?;
    Ok(parsed.format().mode(Mode::E164).to_string())
}

/// Normalized phone number wrapper (expected E.164).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Constructs a phone number ensuring it is valid and normalizes to E.164 format.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let normalized = normalize_phone_to_e164(&value.into())?;
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for PhoneNumber {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<&str> for PhoneNumber {
    type Error = TypeConstraintError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
/// Image location: either an absolute URL or a site-relative path under `/`.
pub struct ImageUrl(String);

impl ImageUrl {
    /// Ensures a trimmed URL is non-empty and well formed before wrapping.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let url = NonEmptyString::new(value)?.into_inner();

        let is_relative = url.starts_with('/') && !url.starts_with("//");
        let is_web = || {
            Url::parse(&url).is_ok_and(|parsed| matches!(parsed.scheme(), "http" | "https"))
        };
        if is_relative || is_web() {
            Ok(Self(url))
        } else {
            Err(TypeConstraintError::InvalidUrl)
        }
    }

    /// Borrow the URL.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Extract the owned URL.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for ImageUrl {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for ImageUrl {
    type Error = TypeConstraintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Opaque token granting public read access to a single shared record.
///
/// Tokens are compared verbatim: no trimming or case folding is applied.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ShareToken(String);

impl ShareToken {
    pub const MAX_LEN: usize = 128;

    /// Generates a fresh random token (32 lowercase hex characters).
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    /// Wraps a caller supplied token without altering it.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let value = value.into();
        if value.is_empty() || value.len() > Self::MAX_LEN {
            return Err(TypeConstraintError::InvalidToken);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for ShareToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ShareToken {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Monetary amount in cents of the local currency (BRL).
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PriceCents(i64);

impl PriceCents {
    pub fn new(value: i64) -> Result<Self, TypeConstraintError> {
        if value < 0 {
            return Err(TypeConstraintError::InvalidValue(
                "price cannot be negative".to_string(),
            ));
        }
        Ok(Self(value))
    }

    /// Parses a human entered amount such as `1.250.000,50`, `1250000.5` or `300`.
    pub fn parse_amount(value: &str) -> Result<Self, TypeConstraintError> {
        let cleaned: String = value
            .trim()
            .trim_start_matches("R$")
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        if cleaned.is_empty() {
            return Err(TypeConstraintError::EmptyString);
        }

        // The last separator followed by one or two digits is the decimal mark.
        let decimal_at = cleaned
            .rfind([',', '.'])
            .filter(|&idx| (1..=2).contains(&(cleaned.len() - idx - 1)));

        let (whole, fraction) = match decimal_at {
            Some(idx) => (&cleaned[..idx], &cleaned[idx + 1..]),
            None => (cleaned.as_str(), ""),
        };

        let whole_digits: String = whole.chars().filter(|c| *c != '.' && *c != ',').collect();
        if whole_digits.is_empty() && fraction.is_empty() {
            return Err(TypeConstraintError::InvalidValue(value.to_string()));
        }
        if !whole_digits.chars().all(|c| c.is_ascii_digit())
            || !fraction.chars().all(|c| c.is_ascii_digit())
        {
            return Err(TypeConstraintError::InvalidValue(value.to_string()));
        }

        let whole: i64 = if whole_digits.is_empty() {
            0
        } else {
            whole_digits
                .parse()
                .map_err(|_| TypeConstraintError::InvalidValue(value.to_string()))?
        };
        let cents: i64 = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<i64>().unwrap_or(0) * 10,
            _ => fraction.parse::<i64>().unwrap_or(0),
        };

        whole
            .checked_mul(100)
            .and_then(|v| v.checked_add(cents))
            .ok_or_else(|| TypeConstraintError::InvalidValue(value.to_string()))
            .and_then(Self::new)
    }

    pub const fn get(self) -> i64 {
        self.0
    }
}

impl Display for PriceCents {
    /// Formats as `R$ 1.250.000,50`.
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let whole = (self.0 / 100).to_string();
        let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
        for (i, ch) in whole.chars().enumerate() {
            if i > 0 && (whole.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(ch);
        }
        write!(f, "R$ {},{:02}", grouped, self.0 % 100)
    }
}

/// Language used to pick bilingual record fields.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Pt,
    En,
}

impl Locale {
    pub fn as_str(self) -> &'static str {
        match self {
            Locale::Pt => "pt",
            Locale::En => "en",
        }
    }

    /// Picks the value for this locale, falling back to Portuguese when the
    /// English text is missing.
    pub fn pick<'a>(self, pt: &'a str, en: &'a str) -> &'a str {
        match self {
            Locale::En if !en.trim().is_empty() => en,
            _ => pt,
        }
    }
}

impl FromStr for Locale {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pt" | "pt-br" => Ok(Locale::Pt),
            "en" | "en-us" => Ok(Locale::En),
            other => Err(TypeConstraintError::InvalidValue(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_must_be_positive() {
        assert_eq!(UserId::new(0), Err(TypeConstraintError::NonPositiveId));
        assert_eq!(HearingId::new(7).map(HearingId::get), Ok(7));
    }

    #[test]
    fn email_is_normalized() {
        let email = Email::new("  Maria@Example.COM ").unwrap();
        assert_eq!(email.as_str(), "maria@example.com");
        assert!(Email::new("not-an-email").is_err());
    }

    #[test]
    fn share_token_is_kept_verbatim() {
        let token = ShareToken::new(" abc ").unwrap();
        assert_eq!(token.as_str(), " abc ");
        assert_eq!(ShareToken::new(""), Err(TypeConstraintError::InvalidToken));
        assert!(ShareToken::new("x".repeat(ShareToken::MAX_LEN + 1)).is_err());
    }

    #[test]
    fn generated_tokens_are_hex_and_unique() {
        let a = ShareToken::generate();
        let b = ShareToken::generate();
        assert_eq!(a.as_str().len(), 32);
        assert!(a.as_str().chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }

    #[test]
    fn image_url_accepts_only_site_paths_and_web_urls() {
        assert!(ImageUrl::new("/uploads/a.jpg").is_ok());
        assert!(ImageUrl::new("https://cdn.example.com/a.jpg").is_ok());
        assert!(ImageUrl::new("http://cdn.example.com/a.jpg").is_ok());
        assert_eq!(
            ImageUrl::new("javascript:alert(1)"),
            Err(TypeConstraintError::InvalidUrl)
        );
        assert_eq!(ImageUrl::new("ftp:/bad"), Err(TypeConstraintError::InvalidUrl));
        assert_eq!(
            ImageUrl::new("//evil.example.com/a.jpg"),
            Err(TypeConstraintError::InvalidUrl)
        );
        assert_eq!(ImageUrl::new("  "), Err(TypeConstraintError::EmptyString));
    }

    #[test]
    fn price_parses_brazilian_and_plain_formats() {
        assert_eq!(
            PriceCents::parse_amount("R$ 1.250.000,50").unwrap().get(),
            125_000_050
        );
        assert_eq!(PriceCents::parse_amount("1250000.5").unwrap().get(), 125_000_050);
        assert_eq!(PriceCents::parse_amount("300").unwrap().get(), 30_000);
        assert_eq!(PriceCents::parse_amount("1.500").unwrap().get(), 150_000);
        assert!(PriceCents::parse_amount("abc").is_err());
        assert!(PriceCents::parse_amount("").is_err());
    }

    #[test]
    fn price_displays_grouped() {
        assert_eq!(
            PriceCents::new(125_000_050).unwrap().to_string(),
            "R$ 1.250.000,50"
        );
        assert_eq!(PriceCents::new(5).unwrap().to_string(), "R$ 0,05");
    }

    #[test]
    fn rich_text_strips_scripts() {
        let text = RichText::new("<b>ok</b><script>alert(1)</script>");
        assert_eq!(text.as_str(), "<b>ok</b>");
    }

    #[test]
    fn locale_falls_back_to_portuguese() {
        assert_eq!(Locale::En.pick("Olá", ""), "Olá");
        assert_eq!(Locale::En.pick("Olá", "Hello"), "Hello");
        assert_eq!("EN".parse::<Locale>(), Ok(Locale::En));
    }
}
