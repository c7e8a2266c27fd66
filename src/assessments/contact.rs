use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::domain::ContactRecord;

/// Unvalidated contact fields as entered by the respondent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactDraft {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
}

/// First violated rule, in field order. The display text is what the UI
/// surfaces inline next to the blocked "save results" action.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContactValidationError {
    #[error("first name must be 2-30 letters")]
    InvalidFirstName,
    #[error("last name must be 2-30 letters")]
    InvalidLastName,
    #[error("enter a valid email address")]
    InvalidEmail,
}

// Letters and spaces, including Latin-1 supplement and Latin Extended-A so
// Turkish names (Ayşe, Çağla, İsmail) pass.
fn name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-zÀ-ÖØ-öø-ÿĀ-ſ ]{2,30}$")
            .expect("name pattern is valid")
    })
}

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]{2,}$").expect("email pattern is valid")
    })
}

/// Validate a draft and build the immutable record submitted with the
/// result. Returns the first violated rule; all mandatory fields must pass
/// individually, there is no partial success.
pub fn validate_contact(draft: &ContactDraft) -> Result<ContactRecord, ContactValidationError> {
    let first_name = draft.first_name.trim();
    if !name_pattern().is_match(first_name) {
        return Err(ContactValidationError::InvalidFirstName);
    }

    let last_name = draft.last_name.trim();
    if !name_pattern().is_match(last_name) {
        return Err(ContactValidationError::InvalidLastName);
    }

    let email = draft.email.trim();
    if !email_pattern().is_match(email) {
        return Err(ContactValidationError::InvalidEmail);
    }

    let phone = draft
        .phone
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string);

    Ok(ContactRecord {
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        email: email.to_string(),
        phone,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(first: &str, last: &str, email: &str) -> ContactDraft {
        ContactDraft {
            first_name: first.to_string(),
            last_name: last.to_string(),
            email: email.to_string(),
            phone: None,
        }
    }

    #[test]
    fn accepts_plain_latin_names_and_valid_email() {
        let record =
            validate_contact(&draft("Jane", "Doe", "a@b.co")).expect("valid draft passes");
        assert_eq!(record.first_name, "Jane");
        assert_eq!(record.email, "a@b.co");
        assert!(record.phone.is_none());
    }

    #[test]
    fn accepts_turkish_diacritics() {
        let record = validate_contact(&draft("Ayşe", "Çağlar", "ayse@example.com"))
            .expect("diacritics permitted");
        assert_eq!(record.first_name, "Ayşe");
    }

    #[test]
    fn rejects_single_letter_first_name() {
        assert_eq!(
            validate_contact(&draft("A", "Doe", "a@b.co")),
            Err(ContactValidationError::InvalidFirstName)
        );
    }

    #[test]
    fn rejects_name_longer_than_thirty_characters() {
        let long = "A".repeat(31);
        assert_eq!(
            validate_contact(&draft(&long, "Doe", "a@b.co")),
            Err(ContactValidationError::InvalidFirstName)
        );
    }

    #[test]
    fn rejects_digits_in_last_name() {
        assert_eq!(
            validate_contact(&draft("Jane", "D0e", "a@b.co")),
            Err(ContactValidationError::InvalidLastName)
        );
    }

    #[test]
    fn rejects_malformed_email() {
        assert_eq!(
            validate_contact(&draft("Jane", "Doe", "not-an-email")),
            Err(ContactValidationError::InvalidEmail)
        );
    }

    #[test]
    fn first_violation_wins_when_multiple_fields_fail() {
        assert_eq!(
            validate_contact(&draft("", "", "not-an-email")),
            Err(ContactValidationError::InvalidFirstName)
        );
    }

    #[test]
    fn blank_phone_normalizes_to_none() {
        let mut entry = draft("Jane", "Doe", "a@b.co");
        entry.phone = Some("   ".to_string());
        let record = validate_contact(&entry).expect("valid draft passes");
        assert!(record.phone.is_none());

        entry.phone = Some("+90 555 000 1122".to_string());
        let record = validate_contact(&entry).expect("valid draft passes");
        assert_eq!(record.phone.as_deref(), Some("+90 555 000 1122"));
    }

    #[test]
    fn error_messages_are_descriptive() {
        let message = ContactValidationError::InvalidEmail.to_string();
        assert!(message.contains("email"));
    }
}
