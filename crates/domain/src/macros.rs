//! Macro for wire-name conversions on small domain enums
//!
//! Generates `as_str`, `Display` and case-insensitive `FromStr` from one
//! variant-to-string table.
//!
//! # Example
//!
//! ```rust
//! use yotei_domain::impl_wire_name_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Strategy {
//!     Primary,
//!     Fallback,
//! }
//!
//! impl_wire_name_conversions!(Strategy {
//!     Primary => "primary",
//!     Fallback => "fallback",
//! });
//!
//! assert_eq!(Strategy::Fallback.as_str(), "fallback");
//! assert_eq!("PRIMARY".parse::<Strategy>(), Ok(Strategy::Primary));
//! ```

/// Implements `as_str`, `Display` and `FromStr` for a fieldless enum.
///
/// Parsing trims surrounding whitespace and ignores ASCII case; unknown
/// strings produce a descriptive `String` error naming the enum.
#[macro_export]
macro_rules! impl_wire_name_conversions {
    ($enum_name:ident { $($variant:ident => $str:literal),+ $(,)? }) => {
        impl $enum_name {
            /// Wire name of this variant.
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $str,)+
                }
            }
        }

        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}
