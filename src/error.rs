use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProjError {
    #[error("Latitude out of range: {0}")]
    Lat(String),

    #[error("Longitude out of range: {0}")]
    Lon(String),

    #[error("Easting out of range: {0}")]
    Easting(String),

    #[error("Northing out of range: {0}")]
    Northing(String),

    #[error("Origin latitude out of range: {0}")]
    OriginLat(String),

    #[error("Central meridian out of range: {0}")]
    CentralMeridian(String),

    #[error("Scale factor out of range: {0}")]
    ScaleFactor(String),

    #[error("Semi-major axis must be greater than zero, got {0}")]
    SemiMajorAxis(f64),

    #[error("Inverse flattening must be between 250 and 350, got {0}")]
    InverseFlattening(f64),

    #[error("Invalid UTM zone: {0}")]
    UtmZone(u8),

    #[error("Invalid UTM zone override: {0}")]
    UtmZoneOverride(String),

    #[error("Invalid hemisphere: {0:?}")]
    Hemisphere(char),

    #[error("Invalid MGRS string: {0}")]
    MgrsString(String),

    #[error("MGRS precision must be between 0 and 5, got {0}")]
    MgrsPrecision(u8),

    #[error("Point is outside of the polar projection area: {0}")]
    PolarRadius(String),
}

/// Advisory conditions that do not abort a conversion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProjWarning {
    /// Longitude is more than 9 degrees from the central meridian.
    LongitudeDistortion { delta_lon: f64 },
}

impl std::fmt::Display for ProjWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LongitudeDistortion { delta_lon } => write!(
                f,
                "longitude is {:.3} degrees from the central meridian, distortion will result",
                delta_lon.to_degrees()
            ),
        }
    }
}

#[derive(Error, Debug)]
pub enum DbfError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed DBF file: {0}")]
    Malformed(String),

    #[error("No such field: {0}")]
    NoSuchField(String),

    #[error("No such record: {0}")]
    NoSuchRecord(usize),
}

#[derive(Error, Debug)]
pub enum ShapefileError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed ESRI record: {0}")]
    MalformedRecord(String),

    #[error("Shapes of type {0} not supported")]
    UnsupportedShape(i32),

    #[error("Trying to get shape {index} of {max}")]
    IndexOutOfBounds { index: i32, max: i32 },

    #[error("DBF error: {0}")]
    Dbf(#[from] DbfError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Unknown ellipsoid: {0}")]
    UnknownEllipsoid(String),

    #[error("Invalid ellipsoid code {0:?}, expected two ASCII letters")]
    EllipsoidCode(String),

    #[error("Invalid name field pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Projection parameter error: {0}")]
    Projection(#[from] ProjError),

    #[error("Shapefile error: {0}")]
    Shapefile(#[from] ShapefileError),
}
