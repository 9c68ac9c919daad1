//! Control logic: fan hysteresis and feed arbitration/dispensing.

pub mod fan;
pub mod feeding;
