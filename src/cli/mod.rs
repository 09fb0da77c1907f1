//! Terminal rendering for the CLI build

use colored::Colorize;

use crate::error::RenderError;
use crate::render::{Badge, BadgeSurface};

/// Parse a CSS hex color (`#666` or `#00b759`) into RGB.
fn hex_to_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.strip_prefix('#')?;
    let expanded = match hex.len() {
        3 => hex.chars().flat_map(|c| [c, c]).collect::<String>(),
        6 => hex.to_string(),
        _ => return None,
    };
    let value = u32::from_str_radix(&expanded, 16).ok()?;
    Some(((value >> 16) as u8, (value >> 8) as u8, value as u8))
}

/// Render one badge as a colored terminal pill.
pub fn paint_badge(badge: &Badge) -> String {
    let text = format!(" {} ", badge.text);
    let Some((r, g, b)) = hex_to_rgb(badge.palette.background) else {
        return text;
    };
    let painted = text.on_truecolor(r, g, b);
    let painted = if badge.palette.foreground == "black" {
        painted.truecolor(0, 0, 0)
    } else {
        painted.truecolor(255, 255, 255)
    };
    painted.to_string()
}

/// Badge surface that prints to stdout. A terminal always has room, so
/// mounting never fails.
#[derive(Debug, Default)]
pub struct TerminalSurface;

impl BadgeSurface for TerminalSurface {
    fn clear_badges(&mut self) {}

    fn mount(&mut self, badges: &[Badge]) -> Result<(), RenderError> {
        for badge in badges {
            println!("  {}", paint_badge(badge));
        }
        Ok(())
    }
}
