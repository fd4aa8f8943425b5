use custom_error::custom_error;

pub type Result<T> = std::result::Result<T, Error>;

custom_error! {pub Error
    Io{source: std::io::Error} = "I/O error",
    Json{source: serde_json::Error} = "JSON error",
    NotYielded = "No item was yielded",
    UnsupportedAltitude{unit: String} = "Unsupported altitude {unit}",
    InvalidCoordinate{feature: String} = "Invalid coordinate in {feature}"
}
