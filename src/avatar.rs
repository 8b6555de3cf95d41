//! Deterministic identicon avatars
//!
//! The same name always produces the same image. The image is a 5x5 grid
//! mirrored around the middle column, drawn as an SVG and returned as a
//! `data:` URI so it can be stored with the profile.

use std::fmt::Write;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Prefix of every avatar produced by [`IdenticonAvatar`]
pub const SVG_DATA_URI_PREFIX: &str = "data:image/svg+xml;utf8,";

/// Grid size (cells per side)
const GRID: usize = 5;

/// Produces an opaque image reference for a player name
pub trait AvatarGenerator {
    /// Must be a pure function of `name`
    fn generate(&self, name: &str) -> String;
}

/// Mirrored 5x5 identicon with a name-derived hue
#[derive(Debug, Clone, Copy)]
pub struct IdenticonAvatar {
    /// HSL saturation percentage
    pub saturation: u8,
    /// HSL lightness percentage
    pub lightness: u8,
}

impl Default for IdenticonAvatar {
    fn default() -> Self {
        Self {
            saturation: 95,
            lightness: 50,
        }
    }
}

impl IdenticonAvatar {
    /// Build the raw SVG document for a name
    pub fn svg(&self, name: &str) -> String {
        let mut rng = Pcg32::seed_from_u64(fnv1a(name));
        let hue: u16 = rng.random_range(0..360);

        let mut svg = format!(
            "<svg viewBox=\"-1.5 -1.5 8 8\" xmlns=\"http://www.w3.org/2000/svg\" fill=\"hsl({} {}% {}%)\">",
            hue, self.saturation, self.lightness
        );

        // Left half plus middle column, mirrored onto the right half
        for col in 0..=GRID / 2 {
            for row in 0..GRID {
                if !rng.random_bool(0.5) {
                    continue;
                }
                let _ = write!(svg, "<rect x=\"{col}\" y=\"{row}\" width=\"1\" height=\"1\"/>");
                let mirror = GRID - 1 - col;
                if mirror != col {
                    let _ = write!(
                        svg,
                        "<rect x=\"{mirror}\" y=\"{row}\" width=\"1\" height=\"1\"/>"
                    );
                }
            }
        }

        svg.push_str("</svg>");
        svg
    }
}

impl AvatarGenerator for IdenticonAvatar {
    fn generate(&self, name: &str) -> String {
        format!("{}{}", SVG_DATA_URI_PREFIX, encode_uri_component(&self.svg(name)))
    }
}

/// FNV-1a over the UTF-8 bytes of the name
fn fnv1a(s: &str) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;
    s.bytes()
        .fold(OFFSET, |hash, b| (hash ^ u64::from(b)).wrapping_mul(PRIME))
}

/// Percent-encode everything except the URI-component unreserved set
fn encode_uri_component(s: &str) -> String {
    let mut out = String::with_capacity(s.len() * 2);
    for b in s.bytes() {
        match b {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'!'
            | b'~'
            | b'*'
            | b'\''
            | b'('
            | b')' => out.push(b as char),
            _ => {
                let _ = write!(out, "%{:02X}", b);
            }
        }
    }
    out
}
