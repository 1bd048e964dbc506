/// CSS-style colors with a nom parser for `#rgb`, `#rrggbb`, `#rrggbbaa`,
/// `rgb(r, g, b)` and `rgba(r, g, b, a)`
use std::fmt;
use std::str::FromStr;

use nom::{
    branch::alt,
    bytes::complete::{tag_no_case, take_while_m_n},
    character::complete::{char, digit1, multispace0},
    combinator::{all_consuming, map_res, opt},
    number::complete::float,
    sequence::{delimited, preceded, tuple},
    IResult,
};
use serde::{Deserialize, Serialize};

use crate::error::ColorError;

/// An sRGB color with straight (non-premultiplied) alpha in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);
    pub const BLACK: Rgba = Rgba::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self {
            a: a.clamp(0.0, 1.0),
            ..self
        }
    }

    /// Multiply the color channels by `brightness`, leaving alpha untouched
    pub fn scaled(self, brightness: f32) -> Self {
        let scale = |c: u8| (c as f32 * brightness).round().clamp(0.0, 255.0) as u8;
        Self {
            r: scale(self.r),
            g: scale(self.g),
            b: scale(self.b),
            a: self.a,
        }
    }

    /// Composite this color over an opaque background
    pub fn over(self, background: Rgba) -> Rgba {
        let a = self.a.clamp(0.0, 1.0);
        let mix = |fg: u8, bg: u8| (fg as f32 * a + bg as f32 * (1.0 - a)).round() as u8;
        Rgba::rgb(
            mix(self.r, background.r),
            mix(self.g, background.g),
            mix(self.b, background.b),
        )
    }

    /// Relative luminance in `[0, 1]` ignoring alpha
    pub fn luminance(self) -> f32 {
        (0.2126 * self.r as f32 + 0.7152 * self.g as f32 + 0.0722 * self.b as f32) / 255.0
    }

    /// Format as a canvas-compatible `rgba(..)` string, alpha rounded to three decimals
    pub fn to_css(self) -> String {
        format!("rgba({}, {}, {}, {:.3})", self.r, self.g, self.b, self.a)
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css())
    }
}

impl FromStr for Rgba {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_color(s)
    }
}

impl TryFrom<String> for Rgba {
    type Error = ColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        parse_color(&value)
    }
}

/// Serialized form keeps the full alpha so values survive a round trip
impl From<Rgba> for String {
    fn from(color: Rgba) -> Self {
        format!("rgba({}, {}, {}, {})", color.r, color.g, color.b, color.a)
    }
}

/// Channels as parsed, before range checks
struct RawColor {
    r: u32,
    g: u32,
    b: u32,
    a: f32,
}

/// Parse a CSS color string
pub fn parse_color(input: &str) -> Result<Rgba, ColorError> {
    let trimmed = input.trim();
    let (_, raw) = all_consuming(alt((hex_color, functional_color)))(trimmed)
        .map_err(|_| ColorError::Syntax(input.to_string()))?;

    if raw.r > 255 || raw.g > 255 || raw.b > 255 || !(0.0..=1.0).contains(&raw.a) {
        return Err(ColorError::OutOfRange(input.to_string()));
    }

    Ok(Rgba {
        r: raw.r as u8,
        g: raw.g as u8,
        b: raw.b as u8,
        a: raw.a,
    })
}

fn ws<'a, O, F>(inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    delimited(multispace0, inner, multispace0)
}

fn hex_color(input: &str) -> IResult<&str, RawColor> {
    map_res(
        preceded(
            char('#'),
            take_while_m_n(3, 8, |c: char| c.is_ascii_hexdigit()),
        ),
        expand_hex,
    )(input)
}

fn expand_hex(digits: &str) -> Result<RawColor, ColorError> {
    let channel = |s: &str| {
        u32::from_str_radix(s, 16).map_err(|_| ColorError::Syntax(digits.to_string()))
    };

    match digits.len() {
        3 => Ok(RawColor {
            r: channel(&digits[0..1])? * 17,
            g: channel(&digits[1..2])? * 17,
            b: channel(&digits[2..3])? * 17,
            a: 1.0,
        }),
        6 | 8 => Ok(RawColor {
            r: channel(&digits[0..2])?,
            g: channel(&digits[2..4])?,
            b: channel(&digits[4..6])?,
            a: if digits.len() == 8 {
                channel(&digits[6..8])? as f32 / 255.0
            } else {
                1.0
            },
        }),
        _ => Err(ColorError::Syntax(digits.to_string())),
    }
}

fn channel(input: &str) -> IResult<&str, u32> {
    map_res(ws(digit1), |s: &str| s.parse::<u32>())(input)
}

fn functional_color(input: &str) -> IResult<&str, RawColor> {
    let (rest, (_, _, r, _, g, _, b, alpha, _)) = tuple((
        alt((tag_no_case("rgba"), tag_no_case("rgb"))),
        ws(char('(')),
        channel,
        char(','),
        channel,
        char(','),
        channel,
        opt(preceded(char(','), ws(float))),
        char(')'),
    ))(input)?;

    Ok((
        rest,
        RawColor {
            r,
            g,
            b,
            a: alpha.unwrap_or(1.0),
        },
    ))
}
