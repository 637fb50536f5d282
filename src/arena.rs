//! Frame-local element storage.
//!
//! Elements live in one flat `Vec` and reference each other by index;
//! the open stack and the tree roots index into the same arena. The
//! whole structure is cleared (capacity retained) at the start of every
//! frame.

use crate::config::{ConfigSet, LayoutDirection, SizingConfig};
use crate::id::ElementId;
use crate::math::Dimensions;
use crate::text::{TextLine, TextMeasurement};

/// Text payload of a leaf element, filled in over the course of
/// resolution: measurement after the measure step, lines after
/// wrapping.
#[derive(Debug, Clone)]
pub(crate) struct TextElement {
    pub content: String,
    pub measurement: TextMeasurement,
    pub lines: Vec<TextLine>,
}

/// One layout element. Floating elements are stored here like any
/// other but are not listed in their parent's `children`; they appear
/// as separate [`TreeRoot`]s instead.
#[derive(Debug, Clone)]
pub(crate) struct Element<CustomData> {
    pub id: ElementId,
    pub parent: Option<usize>,
    pub children: Vec<usize>,
    /// Count of all children ever opened under this element, floating
    /// included. Feeds the anonymous-id derivation so ids stay stable
    /// whether or not siblings float.
    pub child_slots: u32,
    pub configs: ConfigSet<CustomData>,
    pub dimensions: Dimensions,
    /// Floor the overflow-compression step may shrink to.
    pub min_dimensions: Dimensions,
    pub text: Option<TextElement>,
}

impl<CustomData> Element<CustomData> {
    pub fn new(id: ElementId, parent: Option<usize>) -> Self {
        Self {
            id,
            parent,
            children: Vec::new(),
            child_slots: 0,
            configs: ConfigSet::default(),
            dimensions: Dimensions::default(),
            min_dimensions: Dimensions::default(),
            text: None,
        }
    }

    pub fn sizing(&self) -> SizingConfig {
        self.configs.sizing_or_default()
    }

    pub fn is_text(&self) -> bool {
        self.text.is_some()
    }

    pub fn scrolls(&self, x_axis: bool) -> bool {
        self.configs.scroll.is_some_and(|scroll| {
            if x_axis {
                scroll.horizontal
            } else {
                scroll.vertical
            }
        })
    }

    /// Padding along one axis (left+right or top+bottom).
    pub fn padding_along(&self, x_axis: bool) -> f32 {
        let padding = self.configs.padding_or_default();
        if x_axis {
            padding.left + padding.right
        } else {
            padding.top + padding.bottom
        }
    }

    /// Total child gap along the primary axis; zero off-axis and for
    /// fewer than two children.
    pub fn gap_along(&self, x_axis: bool) -> f32 {
        let sizing = self.sizing();
        let on_axis = match sizing.direction {
            LayoutDirection::LeftToRight => x_axis,
            LayoutDirection::TopToBottom => !x_axis,
        };
        if on_axis && self.children.len() > 1 {
            sizing.child_gap * (self.children.len() - 1) as f32
        } else {
            0.0
        }
    }

    /// Whether `x_axis` is this element's primary (flow) axis.
    pub fn is_primary_axis(&self, x_axis: bool) -> bool {
        match self.sizing().direction {
            LayoutDirection::LeftToRight => x_axis,
            LayoutDirection::TopToBottom => !x_axis,
        }
    }
}

/// A root of one layout tree: the main tree, or one detached floating
/// subtree. Roots are stable-sorted by `z_index` before emission.
#[derive(Debug, Clone, Copy)]
pub(crate) struct TreeRoot {
    pub element: usize,
    pub z_index: i16,
}
