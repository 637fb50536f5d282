use thiserror::Error;

/// Everything that can go wrong while building or resolving a layout.
///
/// Construction-time structural errors (stack underflow, capacity
/// exhaustion) are returned directly from the builder call that caused
/// them. Resolution-time errors are collected into
/// [`LayoutFrame::errors`](crate::LayoutFrame::errors) so one bad
/// element cannot take down the whole frame; the single exception is a
/// missing text measurement function, which makes
/// [`LayoutContext::end_layout`](crate::LayoutContext::end_layout)
/// fail outright because text cannot be sized at all.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutError {
    #[error("layout contains text elements but no text measurement function was provided")]
    TextMeasurementFunctionNotProvided,
    #[error("render command arena capacity exceeded (max {max})")]
    ArenaCapacityExceeded { max: usize },
    #[error("element capacity exceeded (max {max})")]
    ElementsCapacityExceeded { max: usize },
    #[error("text measurement cache capacity exceeded (max {max})")]
    TextMeasurementCapacityExceeded { max: usize },
    /// Non-fatal: the latest registration shadows the earlier one.
    #[error("duplicate element id {id:#010x}")]
    DuplicateId { id: u32 },
    /// Fatal only for the floating element itself; it is left unplaced
    /// and the rest of the layout proceeds.
    #[error("floating element target {id:#010x} not found")]
    FloatingContainerParentNotFound { id: u32 },
    #[error("internal error: {0}")]
    InternalError(&'static str),
}
