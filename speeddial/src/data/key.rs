//! Keyboard shortcuts.
//!
//! Key sequences use the portable text form common to desktop toolkits: up to four chords
//! separated by `", "`, each chord being `+`-joined modifiers followed by a key name.
//!
//! ```
//! use speeddial::data::key::{KeyModifiers, KeySequence};
//!
//! let sequence: KeySequence = "ctrl+shift+a, F5".parse()?;
//! assert_eq!(sequence.to_string(), "Ctrl+Shift+A, F5");
//! assert_eq!(sequence.chords()[0].modifiers, KeyModifiers::CTRL | KeyModifiers::SHIFT);
//!
//! // Ctrl is reserved by the console, so it is stripped from stored shortcuts.
//! assert_eq!(sequence.stripped().to_string(), "Shift+A, F5");
//! # Ok::<(), speeddial::data::key::ParseKeySequenceError>(())
//! ```

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use strum::EnumString;
use tracing::warn;

use super::*;

/// Maximum number of chords in one [KeySequence].
pub const MAX_CHORDS: usize = 4;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseKeySequenceError {
    #[error("key sequence has {0} chords, at most {MAX_CHORDS} are allowed")]
    TooManyChords(usize),
    #[error("missing key in chord '{0}'")]
    MissingKey(String),
    #[error("unknown modifier '{0}'")]
    UnknownModifier(String),
    #[error("unknown key '{0}'")]
    UnknownKey(String),
}

bitflags! {
    /// Modifier keys held down for a chord.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct KeyModifiers: u8 {
        const META = 1 << 0;
        const CTRL = 1 << 1;
        const ALT = 1 << 2;
        const SHIFT = 1 << 3;
    }
}

impl KeyModifiers {
    // Order in which modifiers are written out.
    const PORTABLE_NAMES: [(KeyModifiers, &'static str); 4] = [
        (KeyModifiers::META, "Meta"),
        (KeyModifiers::CTRL, "Ctrl"),
        (KeyModifiers::ALT, "Alt"),
        (KeyModifiers::SHIFT, "Shift"),
    ];

    fn parse_one(name: &str) -> Result<Self, ParseKeySequenceError> {
        match name.trim().to_ascii_lowercase().as_str() {
            "meta" => Ok(KeyModifiers::META),
            "ctrl" | "control" => Ok(KeyModifiers::CTRL),
            "alt" => Ok(KeyModifiers::ALT),
            "shift" => Ok(KeyModifiers::SHIFT),
            _ => Err(ParseKeySequenceError::UnknownModifier(name.trim().to_owned())),
        }
    }
}

/// Non-character keys, by their portable names.
#[derive(EnumString, strum::Display, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[strum(ascii_case_insensitive)]
pub enum NamedKey {
    #[strum(to_string = "Esc", serialize = "Escape")]
    Esc,
    Tab,
    Backtab,
    Backspace,
    Return,
    Enter,
    #[strum(to_string = "Ins", serialize = "Insert")]
    Ins,
    #[strum(to_string = "Del", serialize = "Delete")]
    Del,
    Pause,
    Print,
    SysReq,
    Home,
    End,
    Left,
    Up,
    Right,
    Down,
    #[strum(to_string = "PgUp", serialize = "PageUp")]
    PgUp,
    #[strum(to_string = "PgDown", serialize = "PageDown")]
    PgDown,
    CapsLock,
    NumLock,
    ScrollLock,
    Menu,
    Help,
    Space,
    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,
    F13,
    F14,
    F15,
    F16,
    F17,
    F18,
    F19,
    F20,
    F21,
    F22,
    F23,
    F24,
}

/// The non-modifier part of a chord.
///
/// Either a printable character or a [NamedKey]. Character keys are only built through
/// [Key::char], so letters are always stored upper-case and every key has a text form that parses
/// back to itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Key(KeyKind);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum KeyKind {
    Char(char),
    Named(NamedKey),
}

impl Key {
    /// Key for the printable character `c`.
    ///
    /// ASCII letters are upper-cased and `' '` becomes [NamedKey::Space]. Other whitespace and
    /// control characters have no portable text form and are rejected.
    pub fn char(c: char) -> Result<Self, ParseKeySequenceError> {
        match c {
            ' ' => Ok(Self::named(NamedKey::Space)),
            c if c.is_whitespace() || c.is_control() => {
                Err(ParseKeySequenceError::UnknownKey(c.escape_default().to_string()))
            },
            c => Ok(Self(KeyKind::Char(c.to_ascii_uppercase()))),
        }
    }

    #[inline]
    pub const fn named(key: NamedKey) -> Self {
        Self(KeyKind::Named(key))
    }

    #[inline]
    pub fn as_char(&self) -> Option<char> {
        match self.0 {
            KeyKind::Char(c) => Some(c),
            KeyKind::Named(_) => None,
        }
    }

    #[inline]
    pub fn as_named(&self) -> Option<NamedKey> {
        match self.0 {
            KeyKind::Char(_) => None,
            KeyKind::Named(named) => Some(named),
        }
    }
}

impl From<NamedKey> for Key {
    #[inline]
    fn from(key: NamedKey) -> Self {
        Self::named(key)
    }
}

impl TryFrom<char> for Key {
    type Error = ParseKeySequenceError;

    #[inline]
    fn try_from(c: char) -> Result<Self, Self::Error> {
        Self::char(c)
    }
}

impl FromStr for Key {
    type Err = ParseKeySequenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (None, _) => Err(ParseKeySequenceError::MissingKey(s.to_owned())),
            (Some(c), None) => Self::char(c),
            _ => s.parse::<NamedKey>()
                .map(Self::named)
                .map_err(|_| ParseKeySequenceError::UnknownKey(s.to_owned())),
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            KeyKind::Char(c) => write!(f, "{c}"),
            KeyKind::Named(named) => write!(f, "{named}"),
        }
    }
}

/// One key press, with the modifiers held while pressing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyChord {
    pub modifiers: KeyModifiers,
    pub key: Key,
}

impl FromStr for KeyChord {
    type Err = ParseKeySequenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        // '+' may itself be the key, as in "+" or "Ctrl++".
        let (modifier_text, key_text) = if text == "+" {
            ("", "+")
        } else if let Some(modifier_text) = text.strip_suffix("++") {
            (modifier_text, "+")
        } else {
            text.rsplit_once('+').unwrap_or(("", text))
        };

        let mut modifiers = KeyModifiers::empty();
        if !modifier_text.is_empty() {
            for name in modifier_text.split('+') {
                modifiers |= KeyModifiers::parse_one(name)?;
            }
        }

        let key_text = key_text.trim();
        if key_text.is_empty() {
            return Err(ParseKeySequenceError::MissingKey(text.to_owned()));
        }

        Ok(Self {
            modifiers,
            key: key_text.parse()?,
        })
    }
}

impl fmt::Display for KeyChord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (modifier, name) in KeyModifiers::PORTABLE_NAMES {
            if self.modifiers.contains(modifier) {
                write!(f, "{name}+")?;
            }
        }
        write!(f, "{}", self.key)
    }
}

/// A keyboard shortcut of up to [MAX_CHORDS] chords. The default sequence is empty, meaning no
/// shortcut is assigned.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq, Hash)]
#[serde(into = "String", try_from = "String")]
pub struct KeySequence {
    chords: Vec<KeyChord>,
}
impl_string_conversions!(KeySequence, ParseKeySequenceError);

impl KeySequence {
    /// Parse `text` and [strip](Self::stripped) the result.
    ///
    /// This is how stored shortcuts are read: text that does not parse is logged and yields an
    /// empty sequence instead of an error.
    pub fn parse_stripped(text: &str) -> Self {
        match text.parse::<Self>() {
            Ok(sequence) => sequence.stripped(),
            Err(error) => {
                warn!(%error, text, "Could not parse key sequence");
                Self::default()
            },
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.chords.is_empty()
    }

    #[inline]
    pub fn chords(&self) -> &[KeyChord] {
        &self.chords
    }

    /// Copy of this sequence with `Ctrl` removed from every chord.
    pub fn stripped(&self) -> Self {
        Self {
            chords: self.chords.iter()
                .map(|chord| KeyChord {
                    modifiers: chord.modifiers - KeyModifiers::CTRL,
                    key: chord.key,
                })
                .collect(),
        }
    }
}

impl TryFrom<Vec<KeyChord>> for KeySequence {
    type Error = ParseKeySequenceError;

    fn try_from(chords: Vec<KeyChord>) -> Result<Self, Self::Error> {
        if chords.len() > MAX_CHORDS {
            Err(ParseKeySequenceError::TooManyChords(chords.len()))
        } else {
            Ok(Self { chords })
        }
    }
}

impl FromStr for KeySequence {
    type Err = ParseKeySequenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let chords = split_chords(s).into_iter()
            .map(KeyChord::from_str)
            .collect::<Result<Vec<_>, _>>()?;
        Self::try_from(chords)
    }
}

impl fmt::Display for KeySequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, chord) in self.chords.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{chord}")?;
        }
        Ok(())
    }
}

// A chord still waiting for its key, such as "Ctrl+".
fn is_complete_chord(chord: &str) -> bool {
    !chord.is_empty() && (!chord.ends_with('+') || chord == "+" || chord.ends_with("++"))
}

// A ',' only separates chords when the text before it is a complete chord; otherwise it is the
// key itself.
fn split_chords(text: &str) -> Vec<&str> {
    let mut chords = Vec::new();
    let mut start = 0;
    for (index, c) in text.char_indices() {
        if c == ',' {
            let chord = text[start..index].trim();
            if is_complete_chord(chord) {
                chords.push(chord);
                start = index + 1;
            }
        }
    }

    let rest = text[start..].trim();
    if !rest.is_empty() {
        chords.push(rest);
    }
    chords
}
