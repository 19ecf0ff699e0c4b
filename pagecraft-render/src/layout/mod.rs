//! Fixed-arity layout containers.
//!
//! Each layout type has a fixed slot count and width distribution. The
//! interpreter resolves slot contents; [`adapters`] draws them.

pub mod adapters;

use crate::style::format_number;
use serde_json::Value;

pub use adapters::render_layout;

/// Default gap between slots, in pixels.
pub const DEFAULT_COLUMN_GAP: f64 = 16.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayoutKind {
    TwoEqualColumns,
    ThreeEqualColumns,
    FourEqualColumns,
    SidebarMainLayout,
    ThreeColumnsWideCenter,
}

impl LayoutKind {
    pub const ALL: [LayoutKind; 5] = [
        LayoutKind::TwoEqualColumns,
        LayoutKind::ThreeEqualColumns,
        LayoutKind::FourEqualColumns,
        LayoutKind::SidebarMainLayout,
        LayoutKind::ThreeColumnsWideCenter,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    pub fn name(self) -> &'static str {
        match self {
            LayoutKind::TwoEqualColumns => "TwoEqualColumns",
            LayoutKind::ThreeEqualColumns => "ThreeEqualColumns",
            LayoutKind::FourEqualColumns => "FourEqualColumns",
            LayoutKind::SidebarMainLayout => "SidebarMainLayout",
            LayoutKind::ThreeColumnsWideCenter => "ThreeColumnsWideCenter",
        }
    }

    /// CSS modifier used in class names.
    pub fn css_modifier(self) -> &'static str {
        match self {
            LayoutKind::TwoEqualColumns => "two-equal",
            LayoutKind::ThreeEqualColumns => "three-equal",
            LayoutKind::FourEqualColumns => "four-equal",
            LayoutKind::SidebarMainLayout => "sidebar-main",
            LayoutKind::ThreeColumnsWideCenter => "wide-center",
        }
    }

    /// Fractional widths in percent; they sum to 100.
    pub fn default_widths(self) -> &'static [f64] {
        match self {
            LayoutKind::TwoEqualColumns => &[50.0, 50.0],
            LayoutKind::ThreeEqualColumns => &[33.33, 33.33, 33.34],
            LayoutKind::FourEqualColumns => &[25.0, 25.0, 25.0, 25.0],
            LayoutKind::SidebarMainLayout => &[33.33, 66.67],
            LayoutKind::ThreeColumnsWideCenter => &[25.0, 50.0, 25.0],
        }
    }

    pub fn slot_count(self) -> usize {
        self.default_widths().len()
    }

    /// Widths for one instance. An override is honored only when it has
    /// exactly one positive number per slot; it is normalized to 100.
    pub fn widths(self, override_widths: Option<&Value>) -> Vec<f64> {
        let defaults = self.default_widths().to_vec();
        let Some(values) = override_widths.and_then(Value::as_array) else {
            return defaults;
        };
        if values.len() != self.slot_count() {
            return defaults;
        }
        let parsed: Option<Vec<f64>> = values
            .iter()
            .map(|v| v.as_f64().filter(|w| w.is_finite() && *w > 0.0))
            .collect();
        match parsed {
            Some(widths) => {
                let total: f64 = widths.iter().sum();
                widths
                    .iter()
                    .map(|w| (w / total * 10000.0).round() / 100.0)
                    .collect()
            }
            None => defaults,
        }
    }
}

/// Width of one slot: its percentage minus its proportional share of the
/// gaps, so all slots together fill 100% minus the gaps.
pub fn slot_width_expr(width_pct: f64, gap: f64, slot_count: usize) -> String {
    let gaps = gap * slot_count.saturating_sub(1) as f64;
    let share = gaps * width_pct / 100.0;
    if share <= 0.0 {
        return format!("{}%", format_number(width_pct));
    }
    format!("calc({}% - {}px)", format_number(width_pct), format_number(share))
}
