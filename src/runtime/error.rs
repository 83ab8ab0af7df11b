use failure::Fail;

use crate::runtime::driver::{ErrorCode, ObjectKind};

/// Describes a bind call the driver rejected.
#[derive(Clone, PartialEq, Debug, Fail)]
#[fail(
    display = "the driver rejected binding {} to the {} slot {} ({})",
    value, kind, slot, code
)]
pub struct RejectedBind {
    /// The kind of binding slot.
    pub kind: &'static str,

    /// The slot the bind targeted.
    pub slot: String,

    /// The value that was to be bound.
    pub value: String,

    /// The error the driver reported.
    pub code: ErrorCode,
}

/// Error returned by the binding operations.
#[derive(Clone, PartialEq, Debug, Fail)]
pub enum BindError {
    /// The driver signalled an error immediately after a bind call.
    ///
    /// The cache entry for the slot is cold after this error: the driver's state after a rejected
    /// call is unspecified, so the slot is queried again on next use.
    #[fail(display = "{}", _0)]
    DriverRejectedBind(RejectedBind),

    /// The container that owns the slot could not be made current, so the slot could not be read
    /// or written. No entry of the container's own slots was changed.
    #[fail(
        display = "could not make {} the current container for {} bindings",
        container, kind
    )]
    StaleContainer {
        kind: &'static str,
        container: String,
        #[fail(cause)]
        cause: RejectedBind,
    },

    /// The driver reported that the context is lost. Every cache entry of the connection was
    /// turned cold.
    #[fail(display = "the rendering context is lost")]
    ContextLost,

    /// An object was used with a different connection than the one that created it.
    #[fail(
        display = "{} object belongs to connection {}, not to connection {}",
        kind, owner, connection
    )]
    ForeignConnection {
        kind: ObjectKind,
        owner: usize,
        connection: usize,
    },
}

/// Error returned when creating a driver object.
#[derive(Clone, PartialEq, Debug, Fail)]
pub enum CreateError {
    /// The driver did not return an object.
    #[fail(display = "the driver could not create a {} object", _0)]
    Unavailable(ObjectKind),

    /// The requested data store size does not fit in a `usize`.
    #[fail(
        display = "a data store of {} elements of {} bytes each is too large",
        len, element_size
    )]
    TooLarge { len: usize, element_size: usize },

    /// The driver rejected the initial data upload.
    #[fail(display = "the driver rejected the initial data upload ({})", _0)]
    Upload(ErrorCode),

    /// Binding the new object, or restoring the binding it displaced, failed.
    #[fail(display = "{}", _0)]
    Bind(#[fail(cause)] BindError),
}

impl From<BindError> for CreateError {
    fn from(error: BindError) -> Self {
        CreateError::Bind(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stale_container_exposes_rejected_switch_as_cause() {
        let error = BindError::StaleContainer {
            kind: "index buffer",
            container: "Some(ObjectName(4))".to_string(),
            cause: RejectedBind {
                kind: "vertex array",
                slot: "VertexArray".to_string(),
                value: "Some(ObjectName(4))".to_string(),
                code: ErrorCode::InvalidOperation,
            },
        };

        let cause = error.cause().map(|cause| cause.to_string());

        assert_eq!(
            cause.as_ref().map(|c| c.as_str()),
            Some(
                "the driver rejected binding Some(ObjectName(4)) to the vertex array slot \
                 VertexArray (INVALID_OPERATION)"
            )
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(
            CreateError::Unavailable(ObjectKind::VertexArray).to_string(),
            "the driver could not create a vertex array object"
        );
        assert_eq!(
            BindError::ContextLost.to_string(),
            "the rendering context is lost"
        );
    }
}
