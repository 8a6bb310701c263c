use std::{
    fmt,
    path::{Path, PathBuf},
};

use crate::source::SourceId;

/// A geographic point. Values are passed through as given, without range checks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Latitude as it appears in output file names.
    pub fn lat_label(&self) -> String {
        format_degrees(self.latitude)
    }

    /// Longitude as it appears in output file names.
    pub fn long_label(&self) -> String {
        format_degrees(self.longitude)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.lat_label(), self.long_label())
    }
}

/// Shortest round-trip rendering; integral values keep their `.0`. Exponents are
/// signed and at least two digits wide (`1e-05`, `1e+16`), NaN is `nan`, so names
/// line up with files already written by earlier tooling.
fn format_degrees(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }

    let repr = format!("{value:?}");
    match repr.split_once('e') {
        Some((mantissa, exp)) => {
            let (sign, digits) = match exp.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exp),
            };
            format!("{mantissa}e{sign}{digits:0>2}")
        }
        None => repr,
    }
}

/// Directory that receives the files written by sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLocation {
    dir: PathBuf,
}

impl OutputLocation {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Deterministic file path for a source/coordinate pair:
    /// `{dir}/{source}_data_{lat}_{long}.{ext}`.
    pub fn file_for(&self, id: SourceId, coordinate: &Coordinate, ext: &str) -> PathBuf {
        self.dir.join(format!(
            "{}_data_{}_{}.{}",
            id.as_str(),
            coordinate.lat_label(),
            coordinate.long_label(),
            ext
        ))
    }
}

impl fmt::Display for OutputLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.dir.display())
    }
}
