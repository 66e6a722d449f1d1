use std::{borrow::Borrow, fmt};

pub use kurbo::{Point, Rect, Size, Vec2};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Wrap a raw identifier.
            pub fn new(raw: impl Into<String>) -> Self {
                Self(raw.into())
            }

            /// Borrow the raw identifier.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.0 == *other
            }
        }

        impl From<&str> for $name {
            fn from(raw: &str) -> Self {
                Self(raw.to_string())
            }
        }
    };
}

string_id!(
    /// Identifier of a [`crate::PartCategory`], unique within a catalog.
    CategoryId
);

string_id!(
    /// Identifier of a [`crate::PartOption`], unique across the whole catalog.
    PartId
);

/// Premultiplied RGBA8 pixel.
pub type Rgba8Premul = [u8; 4];

/// Convert a straight-alpha pixel into premultiplied form.
pub fn premultiply(px: [u8; 4]) -> Rgba8Premul {
    let a = u16::from(px[3]);
    if a == 0 {
        return [0, 0, 0, 0];
    }
    [
        ((u16::from(px[0]) * a + 127) / 255) as u8,
        ((u16::from(px[1]) * a + 127) / 255) as u8,
        ((u16::from(px[2]) * a + 127) / 255) as u8,
        px[3],
    ]
}

/// Convert a premultiplied pixel back into straight alpha.
pub fn unpremultiply(px: Rgba8Premul) -> [u8; 4] {
    let a = u32::from(px[3]);
    if a == 0 {
        return [0, 0, 0, 0];
    }
    let un = |c: u8| ((u32::from(c) * 255 + a / 2) / a).min(255) as u8;
    [un(px[0]), un(px[1]), un(px[2]), px[3]]
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
