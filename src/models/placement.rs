use std::fmt;

/// A presentation length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Extent {
    /// Absolute pixels.
    Px(f64),
    /// Share of the container width, 0..=100.
    Percent(f64),
    /// Left to the row-height mechanism of the presentation layer.
    Auto,
}

impl Extent {
    pub fn px(&self) -> Option<f64> {
        match *self {
            Extent::Px(v) => Some(v),
            _ => None,
        }
    }

    pub fn percent(&self) -> Option<f64> {
        match *self {
            Extent::Percent(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for Extent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Extent::Px(v) => write!(f, "{}px", decimal(*v)),
            Extent::Percent(v) => write!(f, "{}%", decimal(*v)),
            Extent::Auto => f.write_str("auto"),
        }
    }
}

/// Four decimal places at most, without trailing zeros.
fn decimal(v: f64) -> String {
    let text = format!("{:.4}", v);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" {
        "0".to_string()
    } else {
        text.to_string()
    }
}

/// Float clearing of an item. `Left` starts a new visual row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clear {
    Left,
    None,
}

impl fmt::Display for Clear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Clear::Left => f.write_str("left"),
            Clear::None => f.write_str("none"),
        }
    }
}

/// Presentation attributes computed for one item.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub width: Extent,
    pub height: Extent,
    pub clear: Clear,
}

impl Placement {
    pub fn starts_row(&self) -> bool {
        self.clear == Clear::Left
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "width: {}; height: {}; clear: {}",
            self.width, self.height, self.clear
        )
    }
}
