use crate::error::LocationError;
use crate::types::Coords;

/// Source of the user's current position. Asked once, at boot.
pub trait LocationProvider {
    fn current_position(&mut self) -> Result<Coords, LocationError>;
}

/// A position known up front (or known to be missing).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedLocation(pub Option<Coords>);

impl LocationProvider for FixedLocation {
    fn current_position(&mut self) -> Result<Coords, LocationError> {
        self.0.ok_or(LocationError::Unavailable)
    }
}

impl<F> LocationProvider for F
where
    F: FnMut() -> Result<Coords, LocationError>,
{
    fn current_position(&mut self) -> Result<Coords, LocationError> {
        self()
    }
}
