//! Plane grid coordinate systems layered over the projections: UTM, UPS and MGRS.

pub mod bands;
pub mod batch;
pub mod coords;
pub mod mgrs;
pub mod ups;
pub mod utm;

pub use coords::{Hemisphere, MgrsCoord, UpsCoord, UtmCoord};
pub use mgrs::Mgrs;
pub use ups::Ups;
pub use utm::Utm;
