use thiserror::Error;

/// Errors raised while decoding a hex color literal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    #[error("Color '{0}' must start with '#'")]
    MissingHash(String),
    #[error("Color '{0}' must have 3 or 6 hex digits")]
    InvalidLength(String),
    #[error("Color '{0}' contains non-hex characters")]
    InvalidDigit(String),
}

/// A decoded sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Parse `#RGB` or `#RRGGBB`. Shorthand digits are expanded by `x * 17`.
    pub fn parse(hex: &str) -> Result<Self, ColorError> {
        let digits = hex
            .strip_prefix('#')
            .ok_or_else(|| ColorError::MissingHash(hex.to_string()))?;

        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ColorError::InvalidDigit(hex.to_string()));
        }

        let channel = |s: &str| {
            u8::from_str_radix(s, 16).map_err(|_| ColorError::InvalidDigit(hex.to_string()))
        };

        match digits.len() {
            3 => Ok(Rgb {
                r: channel(&digits[0..1])? * 17,
                g: channel(&digits[1..2])? * 17,
                b: channel(&digits[2..3])? * 17,
            }),
            6 => Ok(Rgb {
                r: channel(&digits[0..2])?,
                g: channel(&digits[2..4])?,
                b: channel(&digits[4..6])?,
            }),
            _ => Err(ColorError::InvalidLength(hex.to_string())),
        }
    }

    /// Lowercase six digit form without the leading `#`.
    pub fn to_hex(self) -> String {
        format!("{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Relative luminance as defined by WCAG 2.x.
    pub fn luminance(self) -> f64 {
        fn linear(channel: u8) -> f64 {
            let c = f64::from(channel) / 255.0;
            if c <= 0.03928 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        }
        0.2126 * linear(self.r) + 0.7152 * linear(self.g) + 0.0722 * linear(self.b)
    }
}

/// Alpha in `0.0..=1.0` as a single byte, rounded to nearest.
pub fn alpha_byte(alpha: f32) -> u8 {
    (alpha.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// `#6750A4` with alpha 0.8 becomes `6750a4cc`.
pub fn hex_to_rgba_packed(hex: &str, alpha: f32) -> Result<String, ColorError> {
    let rgb = Rgb::parse(hex)?;
    Ok(format!("{}{:02x}", rgb.to_hex(), alpha_byte(alpha)))
}

/// Function-call notation with a float alpha: `rgba(103, 80, 164, 0.9)`.
pub fn hex_to_css_rgba(hex: &str, alpha: f32) -> Result<String, ColorError> {
    let rgb = Rgb::parse(hex)?;
    Ok(format!(
        "rgba({}, {}, {}, {})",
        rgb.r,
        rgb.g,
        rgb.b,
        alpha.clamp(0.0, 1.0)
    ))
}

/// WCAG contrast ratio between two colors, always `>= 1.0`.
pub fn contrast_ratio(a: Rgb, b: Rgb) -> f64 {
    let (la, lb) = (a.luminance(), b.luminance());
    let (lighter, darker) = if la > lb { (la, lb) } else { (lb, la) };
    (lighter + 0.05) / (darker + 0.05)
}
