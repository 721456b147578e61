// SPDX-License-Identifier: MIT

/// Defines a fieldless enum stored on disk as a single ASCII byte and typed
/// on the command line as a short code.
///
/// For every variant the macro generates:
/// - `from_byte` / `as_byte` for the on-disk representation
/// - `from_code` / `code` for the textual form (case-insensitive)
/// - an `is_<variant>` predicate
/// - a `Display` implementation using the description
///
/// # Example
/// ```rust,ignore
/// define_byte_codes! {
///     pub enum FitPolicy {
///         Best => b'B', "BF", "best fit",
///         First => b'F', "FF", "first fit",
///     }
/// }
/// ```
///
/// # Note
/// This macro requires the `paste` crate for identifier concatenation.
macro_rules! define_byte_codes {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $( $variant:ident => $byte:literal, $code:literal, $desc:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $(
                #[doc = $desc]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn from_byte(byte: u8) -> Option<Self> {
                match byte {
                    $($byte => Some(Self::$variant),)+
                    _ => None,
                }
            }

            pub fn as_byte(&self) -> u8 {
                match self {
                    $(Self::$variant => $byte,)+
                }
            }

            pub fn from_code(code: &str) -> Option<Self> {
                let code = code.trim();
                $(
                    if code.eq_ignore_ascii_case($code) {
                        return Some(Self::$variant);
                    }
                )+
                None
            }

            pub fn code(&self) -> &'static str {
                match self {
                    $(Self::$variant => $code,)+
                }
            }

            paste::paste! {
                $(
                    #[doc = concat!("Checks if the value is: ", $desc)]
                    #[inline]
                    pub fn [<is_ $variant:lower>](&self) -> bool {
                        matches!(self, Self::$variant)
                    }
                )+
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                match self {
                    $(Self::$variant => write!(f, $desc),)+
                }
            }
        }
    };
}
