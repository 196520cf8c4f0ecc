//! Unit conversions. Thresholds are configured in inches and pounds while
//! item data arrives in centimetres and kilograms.

pub const CM_PER_IN: f64 = 2.54;
pub const LB_PER_KG: f64 = 2.2046226218;
pub const CM3_PER_M3: f64 = 1_000_000.0;

#[inline]
pub fn cm_to_in(cm: f64) -> f64 {
    cm / CM_PER_IN
}

#[inline]
pub fn in_to_cm(inches: f64) -> f64 {
    inches * CM_PER_IN
}

#[inline]
pub fn kg_to_lb(kg: f64) -> f64 {
    kg * LB_PER_KG
}

/// Volume of a `a x b x c` centimetre box in cubic metres.
#[inline]
pub fn volume_m3(a_cm: f64, b_cm: f64, c_cm: f64) -> f64 {
    a_cm * b_cm * c_cm / CM3_PER_M3
}

/// Volume of a `a x b x c` centimetre box in cubic inches.
#[inline]
pub fn volume_in3(a_cm: f64, b_cm: f64, c_cm: f64) -> f64 {
    cm_to_in(a_cm) * cm_to_in(b_cm) * cm_to_in(c_cm)
}
