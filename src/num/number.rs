pub fn format_i32(value: i32) -> String {
    let mut buffer = itoa::Buffer::new();
    buffer.format(value).to_string()
}

pub fn format_i64(value: i64) -> String {
    let mut buffer = itoa::Buffer::new();
    buffer.format(value).to_string()
}

pub fn format_f64(value: f64) -> String {
    if let Some(special) = non_finite(value.is_nan(), value.is_infinite(), value < 0.0) {
        return special.to_string();
    }
    let mut buffer = ryu::Buffer::new();
    buffer.format_finite(value).to_string()
}

pub fn format_f32(value: f32) -> String {
    if let Some(special) = non_finite(value.is_nan(), value.is_infinite(), value < 0.0) {
        return special.to_string();
    }
    let mut buffer = ryu::Buffer::new();
    buffer.format_finite(value).to_string()
}

// Spelled the way the float parser on the read side accepts them back.
fn non_finite(nan: bool, infinite: bool, negative: bool) -> Option<&'static str> {
    if nan {
        Some("NaN")
    } else if infinite && negative {
        Some("-Infinity")
    } else if infinite {
        Some("Infinity")
    } else {
        None
    }
}
