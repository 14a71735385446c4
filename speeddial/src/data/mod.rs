//! Plain data types making up a speed dial preset.
//!
//! Everything in this module is a value: presets own their [input source](input::InputSource)
//! and [key sequence](key::KeySequence) outright, and cloning a preset never shares state with the
//! original.

pub mod input;
pub mod key;
pub mod preset;

macro_rules! id_type {
    ($(#[$meta:meta])* $type_name:ident($subtype:ty)) => {
        $(#[$meta])*
        #[repr(transparent)]
        #[derive(serde::Serialize, serde::Deserialize, educe::Educe, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[serde(transparent)]
        #[educe(Deref, DerefMut)]
        pub struct $type_name(pub $subtype);

        // Custom Debug impl so that pretty printing doesn't add unnecessary line breaks
        impl std::fmt::Debug for $type_name {
            #[inline]
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, concat!(stringify!($type_name), "({:?})"), self.0)
            }
        }

        impl std::fmt::Display for $type_name {
            #[inline]
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                std::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<$subtype> for $type_name {
            #[inline]
            fn from(value: $subtype) -> Self {
                Self(value)
            }
        }
    };
}
pub(in crate::data) use id_type;

macro_rules! impl_string_conversions {
    ($type_name:ident, $error:ty) => {
        impl core::convert::TryFrom<String> for $type_name {
            type Error = $error;

            #[inline]
            fn try_from(value: String) -> Result<Self, Self::Error> {
                <Self as core::str::FromStr>::from_str(&value)
            }
        }

        impl From<$type_name> for String {
            #[inline]
            fn from(value: $type_name) -> Self {
                value.to_string()
            }
        }
    };
}
pub(in crate::data) use impl_string_conversions;
