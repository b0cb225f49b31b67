//! Label records and their physical size classes.
//!
//! A [`Label`] is owned by the caller's persistence layer; the renderer only
//! reads it. Fields that only matter to that layer (`owner_id`, `active`,
//! `created_at`) ride along so a JSON export of the table can be fed to the
//! CLI unchanged.

use crate::error::LabelPdfError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// PostScript points per millimetre.
pub const PT_PER_MM: f32 = 72.0 / 25.4;

/// Convert millimetres to points.
pub fn mm_to_pt(mm: f32) -> f32 {
    mm * PT_PER_MM
}

/// One product label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Label {
    pub id: u64,
    pub name: String,
    pub code: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub size: LabelSize,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub owner_id: Option<u64>,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub created_at: Option<String>,
}

fn default_active() -> bool {
    true
}

impl Label {
    pub fn new(id: u64, name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            code: code.into(),
            category: None,
            price: None,
            size: LabelSize::default(),
            description: None,
            owner_id: None,
            active: true,
            created_at: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    pub fn with_size(mut self, size: LabelSize) -> Self {
        self.size = size;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_owner(mut self, owner_id: u64) -> Self {
        self.owner_id = Some(owner_id);
        self
    }

    /// Price to print, if any. Zero, negative and non-finite values count
    /// as "no price".
    pub fn printable_price(&self) -> Option<f64> {
        self.price.filter(|p| p.is_finite() && *p > 0.0)
    }

    /// Category, unless absent or blank.
    pub fn printable_category(&self) -> Option<&str> {
        non_blank(self.category.as_deref())
    }

    /// Description, unless absent or blank.
    pub fn printable_description(&self) -> Option<&str> {
        non_blank(self.description.as_deref())
    }

    /// Check the invariants the renderer relies on.
    pub fn validate(&self) -> Result<(), LabelPdfError> {
        if self.code.trim().is_empty() {
            return Err(LabelPdfError::InvalidLabel {
                id: self.id,
                reason: "code is empty".into(),
            });
        }
        if self.name.trim().is_empty() {
            return Err(LabelPdfError::InvalidLabel {
                id: self.id,
                reason: "name is empty".into(),
            });
        }
        Ok(())
    }
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.filter(|v| !v.trim().is_empty())
}

/// Physical label size class.
///
/// Unknown or missing values deserialize as [`LabelSize::Medium`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LabelSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl LabelSize {
    /// Parse a size name. Accepts the English names and the Portuguese
    /// names used by older exports; anything else is `Medium`.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "small" | "pequeno" => LabelSize::Small,
            "large" | "grande" => LabelSize::Large,
            _ => LabelSize::Medium,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LabelSize::Small => "small",
            LabelSize::Medium => "medium",
            LabelSize::Large => "large",
        }
    }

    /// Width × height of a label of this size.
    pub fn footprint(&self) -> Footprint {
        match self {
            LabelSize::Small => Footprint::from_mm(50.0, 30.0),
            LabelSize::Medium => Footprint::from_mm(80.0, 50.0),
            LabelSize::Large => Footprint::from_mm(100.0, 70.0),
        }
    }
}

impl fmt::Display for LabelSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for LabelSize {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for LabelSize {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = Option::<String>::deserialize(deserializer)?;
        Ok(name.as_deref().map(LabelSize::from_name).unwrap_or_default())
    }
}

/// Physical width × height of a label frame, in millimetres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Footprint {
    pub width_mm: f32,
    pub height_mm: f32,
}

impl Footprint {
    pub const fn from_mm(width_mm: f32, height_mm: f32) -> Self {
        Self {
            width_mm,
            height_mm,
        }
    }

    pub fn width_pt(&self) -> f32 {
        mm_to_pt(self.width_mm)
    }

    pub fn height_pt(&self) -> f32 {
        mm_to_pt(self.height_mm)
    }
}
