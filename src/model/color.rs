use serde::{Deserialize, Serialize};

/// RGBA display color of a category, as produced by the color picker.
///
/// Channels are 0-255. An alpha of `-1` marks an unset color (the view falls
/// back to the theme's text color).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rgba(pub [i32; 4]);

impl Rgba {
    /// No color chosen
    pub const UNSET: Rgba = Rgba([0, 0, 0, -1]);
    /// The color picker's initial value
    pub const PICKER_DEFAULT: Rgba = Rgba([255, 0, 0, 255]);

    pub fn is_unset(self) -> bool {
        self.0[3] < 0
    }

    /// `#rrggbbaa`, or `None` for an unset color
    pub fn to_hex(self) -> Option<String> {
        if self.is_unset() {
            return None;
        }
        let [r, g, b, a] = self.0.map(|c| c.clamp(0, 255));
        Some(format!("#{:02x}{:02x}{:02x}{:02x}", r, g, b, a))
    }

    /// Parse `r,g,b,a` or `#rrggbb[aa]`.
    pub fn parse(s: &str) -> Result<Rgba, String> {
        let s = s.trim();
        if let Some(hex_str) = s.strip_prefix('#') {
            let bytes = hex::decode(hex_str).map_err(|e| format!("invalid color '{}': {}", s, e))?;
            return match bytes.as_slice() {
                [r, g, b] => Ok(Rgba([*r as i32, *g as i32, *b as i32, 255])),
                [r, g, b, a] => Ok(Rgba([*r as i32, *g as i32, *b as i32, *a as i32])),
                _ => Err(format!("invalid color '{}': expected #rrggbb or #rrggbbaa", s)),
            };
        }
        let channels: Vec<i32> = s
            .split(',')
            .map(|c| c.trim().parse::<i32>())
            .collect::<Result<_, _>>()
            .map_err(|e| format!("invalid color '{}': {}", s, e))?;
        match channels.as_slice() {
            [r, g, b, a] => Ok(Rgba([*r, *g, *b, *a])),
            _ => Err(format!("invalid color '{}': expected 4 channels", s)),
        }
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Rgba::UNSET
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_formatting() {
        assert_eq!(Rgba::PICKER_DEFAULT.to_hex().as_deref(), Some("#ff0000ff"));
        assert_eq!(Rgba::UNSET.to_hex(), None);
    }

    #[test]
    fn parse_channels_and_hex() {
        assert_eq!(Rgba::parse("255, 0, 0, 255").unwrap(), Rgba::PICKER_DEFAULT);
        assert_eq!(Rgba::parse("#00ff00").unwrap(), Rgba([0, 255, 0, 255]));
        assert_eq!(Rgba::parse("#0000ff80").unwrap(), Rgba([0, 0, 255, 128]));
        assert!(Rgba::parse("1,2,3").is_err());
        assert!(Rgba::parse("#12").is_err());
    }
}
