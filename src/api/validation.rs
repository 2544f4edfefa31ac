//! Field patterns shared by request bodies.

use once_cell::sync::Lazy;
use regex::Regex;

/// `male` or `female`
pub static GENDER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(male|female)$").expect("gender regex should compile")
});

/// `active` or `deactive`
pub static STATUS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(active|deactive)$").expect("status regex should compile")
});

/// Calendar date shape; the date itself is checked when parsed
pub static BIRTH_DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("birth date regex should compile")
});

/// Optional leading `+`, then 6 to 15 digits
pub static PHONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\+?[0-9]{6,15}$").expect("phone regex should compile")
});
