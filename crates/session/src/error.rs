use annotations::AnnotationError;

use crate::controller::SessionState;
use crate::events::DrawEventKind;

/// Why the device position could not be obtained. Always recovered by
/// centering on the fallback coordinate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationUnavailable {
    PermissionDenied,
    PositionUnavailable,
    Timeout,
    Other(String),
}

impl LocationUnavailable {
    /// Maps a W3C `GeolocationPositionError.code`.
    pub fn from_code(code: u16) -> Self {
        match code {
            1 => LocationUnavailable::PermissionDenied,
            2 => LocationUnavailable::PositionUnavailable,
            3 => LocationUnavailable::Timeout,
            other => LocationUnavailable::Other(format!("error code {other}")),
        }
    }
}

impl std::fmt::Display for LocationUnavailable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LocationUnavailable::PermissionDenied => write!(f, "location permission denied"),
            LocationUnavailable::PositionUnavailable => write!(f, "position unavailable"),
            LocationUnavailable::Timeout => write!(f, "location request timed out"),
            LocationUnavailable::Other(msg) => write!(f, "location unavailable: {msg}"),
        }
    }
}

impl std::error::Error for LocationUnavailable {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// The drawing tool and the annotation store disagree about which
    /// shapes exist.
    Annotation(AnnotationError),
    NotReady(SessionState),
    AlreadyAttached,
    UnhandledEvent(DrawEventKind),
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionError::Annotation(e) => write!(f, "annotation store out of sync: {e}"),
            SessionError::NotReady(state) => {
                write!(f, "session not ready for draw events (state: {state:?})")
            }
            SessionError::AlreadyAttached => write!(f, "session already attached to a map"),
            SessionError::UnhandledEvent(kind) => {
                write!(f, "no handler registered for {kind:?} events")
            }
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SessionError::Annotation(e) => Some(e),
            _ => None,
        }
    }
}

impl From<AnnotationError> for SessionError {
    fn from(e: AnnotationError) -> Self {
        SessionError::Annotation(e)
    }
}

#[cfg(test)]
mod tests {
    use super::{LocationUnavailable, SessionError};
    use annotations::AnnotationError;
    use foundation::ShapeId;
    use std::error::Error;

    #[test]
    fn maps_geolocation_error_codes() {
        assert_eq!(LocationUnavailable::from_code(1), LocationUnavailable::PermissionDenied);
        assert_eq!(LocationUnavailable::from_code(3), LocationUnavailable::Timeout);
        assert!(matches!(LocationUnavailable::from_code(9), LocationUnavailable::Other(_)));
    }

    #[test]
    fn annotation_errors_are_the_source() {
        let e = SessionError::from(AnnotationError::NotFound(ShapeId::new(4)));
        assert_eq!(e.to_string(), "annotation store out of sync: annotation #4 not found");
        assert!(e.source().is_some());
    }
}
