use thiserror::Error;

/// A label configuration the geometry resolver refuses to work with.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LabelError {
    #[error("unknown label type `{0}`")]
    UnknownLabelType(String),

    #[error("size preset `{preset}` is not available for {label_type} labels")]
    UnknownPreset { label_type: &'static str, preset: String },

    #[error("custom {dimension} {value}in is outside {min}..={max}in")]
    DimensionOutOfRange {
        dimension: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("custom {0} must be a finite number of inches")]
    NonFiniteDimension(&'static str),

    #[error("custom size checked for {validated_for} labels cannot be used for {used_for} labels")]
    CustomSizeMismatch {
        validated_for: &'static str,
        used_for: &'static str,
    },
}

/// A value that cannot be drawn as a CODE128 symbol.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodingError {
    #[error("barcode value is empty")]
    Empty,

    #[error("character {ch:?} at position {position} is outside the CODE128 alphabet")]
    UnsupportedChar { ch: char, position: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("no bars found")]
    NoSymbol,

    #[error("module count {0} does not frame a CODE128 symbol")]
    BadLength(usize),

    #[error("unrecognised pattern at symbol {0}")]
    BadPattern(usize),

    #[error("missing start code")]
    MissingStart,

    #[error("missing stop pattern")]
    MissingStop,

    #[error("checksum mismatch: expected {expected}, found {found}")]
    Checksum { expected: u8, found: u8 },

    #[error("unsupported function code {0}")]
    UnsupportedFunction(u8),
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("upstream responded {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("malformed products payload: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum PrintError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("spooler error: {0}")]
    Spooler(String),

    #[error("nothing to print")]
    Empty,
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("invalid value `{value}` for {var}")]
    Invalid { var: &'static str, value: String },

    #[error("cannot read font {path}: {source}")]
    FontIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{0} is not a usable TrueType font")]
    BadFont(String),
}
