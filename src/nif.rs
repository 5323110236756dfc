//! Spanish tax identifier validation (NIF, NIE and CIF).
//!
//! Identifiers are normalized (trimmed, uppercased, optional `ES` country
//! prefix removed) to a 9-character body: one leading class character, seven
//! digits and a trailing control character. Two control rules exist:
//!
//! - **NIF/NIE**: the leading character is a digit (NIF) or `X`/`Y`/`Z` (NIE,
//!   mapped to `0`/`1`/`2`). The resulting 8-digit number modulo 23 indexes
//!   the control letter alphabet `TRWAGMYFPDXBNJZSQVHLCKE`.
//! - **CIF**: the leading character is an entity-type letter. The seven digits
//!   are weighted 2,1,2,1,... and the decimal digits of every product are
//!   summed. The check digit is `(10 - sum % 10) % 10` and the check letter is
//!   `JABCDEFGHI[check digit]`. Either form is accepted.
//!
//! # Examples
//!
//! ```
//! use face_relations::nif;
//!
//! assert!(nif::validate("12345678Z"));
//! assert!(nif::validate(" es12345678z "));
//! assert!(nif::validate("ESA58818501"));
//! assert!(!nif::validate("12345678A"));
//! ```

use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use thiserror::Error;

/// Country prefix accepted in front of an identifier body.
pub const COUNTRY_PREFIX: &str = "ES";

/// Length of a normalized identifier body.
pub const BODY_LEN: usize = 9;

/// Control letters for NIF and NIE, indexed by the number modulo 23.
const NIE_CONTROL: &[u8; 23] = b"TRWAGMYFPDXBNJZSQVHLCKE";

/// Control letters for CIF, indexed by the check digit.
const CIF_CONTROL: &[u8; 10] = b"JABCDEFGHI";

static BODY_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Z0-9]{9}$").unwrap());

static NIE_HEAD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[XYZ0-9][0-9]{7}$").unwrap());

static CIF_HEAD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[ABCDEFGHJKLMNPQRSUVW][0-9]{7}$").unwrap());

/// Identifier class, determined by the leading character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentifierClass {
    /// Natural person (leading digit).
    Nif,
    /// Foreign resident (leading `X`, `Y` or `Z`).
    Nie,
    /// Juridical person (leading entity-type letter).
    Cif,
}

impl IdentifierClass {
    /// Classify the first eight characters of a normalized body.
    ///
    /// The NIF/NIE layout is tried first; the two layouts have disjoint
    /// leading characters so at most one matches.
    fn of_head(head: &str) -> Option<Self> {
        if NIE_HEAD_RE.is_match(head) {
            match head.as_bytes()[0] {
                b'X' | b'Y' | b'Z' => Some(Self::Nie),
                _ => Some(Self::Nif),
            }
        } else if CIF_HEAD_RE.is_match(head) {
            Some(Self::Cif)
        } else {
            None
        }
    }

    /// Expected control character(s) for a head already matched by [`Self::of_head`].
    fn control_for(self, head: &str) -> ControlCharacters {
        let bytes = head.as_bytes();
        match self {
            Self::Nif | Self::Nie => {
                ControlCharacters::Letter(nie_control_letter(nie_number(bytes)))
            }
            Self::Cif => {
                let digit = cif_check_digit(&bytes[1..]);
                ControlCharacters::DigitOrLetter {
                    digit: char::from(b'0' + digit),
                    letter: char::from(CIF_CONTROL[usize::from(digit)]),
                }
            }
        }
    }
}

impl fmt::Display for IdentifierClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdentifierClass::Nif => write!(f, "NIF"),
            IdentifierClass::Nie => write!(f, "NIE"),
            IdentifierClass::Cif => write!(f, "CIF"),
        }
    }
}

/// Control character(s) a body must end with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlCharacters {
    /// NIF/NIE: exactly one letter.
    Letter(char),
    /// CIF: the check digit or its letter form.
    DigitOrLetter { digit: char, letter: char },
}

impl ControlCharacters {
    /// Whether `c` is an acceptable trailing character.
    pub fn accepts(&self, c: char) -> bool {
        match *self {
            ControlCharacters::Letter(letter) => c == letter,
            ControlCharacters::DigitOrLetter { digit, letter } => c == digit || c == letter,
        }
    }
}

impl fmt::Display for ControlCharacters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlCharacters::Letter(letter) => write!(f, "{}", letter),
            ControlCharacters::DigitOrLetter { digit, letter } => {
                write!(f, "{} or {}", digit, letter)
            }
        }
    }
}

/// Why an identifier was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaxIdError {
    #[error("'{0}' is not a 9-character alphanumeric identifier")]
    Malformed(String),
    #[error("'{0}' does not match the NIF, NIE or CIF layout")]
    Unrecognized(String),
    #[error("{id}: invalid {class} check character, expected {expected}")]
    CheckMismatch {
        id: String,
        class: IdentifierClass,
        expected: ControlCharacters,
    },
}

/// A validated, normalized tax identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TaxId {
    body: String,
    class: IdentifierClass,
}

impl TaxId {
    /// Normalize and validate `raw`.
    pub fn parse(raw: &str) -> Result<Self, TaxIdError> {
        let body =
            normalize(raw).ok_or_else(|| TaxIdError::Malformed(raw.trim().to_string()))?;
        let head = &body[..BODY_LEN - 1];
        let control = char::from(body.as_bytes()[BODY_LEN - 1]);

        let Some(class) = IdentifierClass::of_head(head) else {
            return Err(TaxIdError::Unrecognized(body));
        };

        let expected = class.control_for(head);
        if !expected.accepts(control) {
            return Err(TaxIdError::CheckMismatch {
                id: body,
                class,
                expected,
            });
        }

        Ok(Self { body, class })
    }

    /// The normalized 9-character body, without country prefix.
    pub fn as_str(&self) -> &str {
        &self.body
    }

    pub fn class(&self) -> IdentifierClass {
        self.class
    }
}

impl FromStr for TaxId {
    type Err = TaxIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for TaxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.body)
    }
}

impl AsRef<str> for TaxId {
    fn as_ref(&self) -> &str {
        &self.body
    }
}

/// Check whether `raw` is a valid NIF, NIE or CIF.
///
/// Malformed input yields `false`; this never panics.
pub fn validate(raw: &str) -> bool {
    TaxId::parse(raw).is_ok()
}

/// Class of a valid identifier, `None` when `raw` does not validate.
pub fn classify(raw: &str) -> Option<IdentifierClass> {
    TaxId::parse(raw).ok().map(|id| id.class())
}

/// Trim, uppercase and strip the country prefix, returning the body when it
/// is exactly nine characters of `[A-Z0-9]`.
pub fn normalize(raw: &str) -> Option<String> {
    let upper = raw.trim().to_uppercase();
    let body = strip_country_prefix(&upper, BODY_LEN);
    BODY_RE.is_match(body).then(|| body.to_string())
}

/// Expected control character(s) for an identifier without its trailing
/// character (8 characters, optionally `ES`-prefixed).
///
/// ```
/// use face_relations::nif::{control_characters, ControlCharacters};
///
/// assert_eq!(control_characters("X1234567"), Some(ControlCharacters::Letter('L')));
/// assert_eq!(
///     control_characters("A5881850"),
///     Some(ControlCharacters::DigitOrLetter { digit: '1', letter: 'A' })
/// );
/// ```
pub fn control_characters(prefix: &str) -> Option<ControlCharacters> {
    let upper = prefix.trim().to_uppercase();
    let head = strip_country_prefix(&upper, BODY_LEN - 1);
    IdentifierClass::of_head(head).map(|class| class.control_for(head))
}

/// Remove a leading `ES` only when exactly `len` characters follow it.
pub(crate) fn strip_country_prefix(value: &str, len: usize) -> &str {
    match value.strip_prefix(COUNTRY_PREFIX) {
        Some(rest) if rest.len() == len => rest,
        _ => value,
    }
}

/// NIF/NIE control letter for an 8-digit number.
pub fn nie_control_letter(number: u32) -> char {
    char::from(NIE_CONTROL[(number % 23) as usize])
}

/// CIF check digit (0-9) over seven ASCII digits.
///
/// Even positions (0-indexed) are doubled; the decimal digits of each product
/// are added together.
pub fn cif_check_digit(digits: &[u8]) -> u8 {
    let checksum: u32 = digits
        .iter()
        .enumerate()
        .map(|(pos, byte)| {
            let weight = if pos % 2 == 0 { 2 } else { 1 };
            let product = u32::from(byte - b'0') * weight;
            product / 10 + product % 10
        })
        .sum();

    ((10 - checksum % 10) % 10) as u8
}

/// Leading `X`/`Y`/`Z` map to `0`/`1`/`2`; the rest are digits.
fn nie_number(head: &[u8]) -> u32 {
    head.iter().fold(0, |acc, byte| {
        let digit = match byte {
            b'X' => 0,
            b'Y' => 1,
            b'Z' => 2,
            _ => u32::from(byte - b'0'),
        };
        acc * 10 + digit
    })
}
