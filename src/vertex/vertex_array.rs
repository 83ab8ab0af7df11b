use crate::runtime::{BindError, Connection, CreateError, Driver, ObjectKind, ObjectName};

/// The slot that selects the current vertex array object.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum VertexArrayTarget {
    VertexArray,
}

/// A vertex array object.
///
/// Besides the vertex attribute layout, a vertex array object owns an element array buffer
/// binding; see [IndexBuffer](crate::vertex::IndexBuffer).
#[derive(Debug)]
pub struct VertexArray {
    connection_id: usize,
    name: ObjectName,
}

impl VertexArray {
    pub fn new<D>(connection: &mut Connection<D>) -> Result<Self, CreateError>
    where
        D: Driver,
    {
        let name = connection.create_object(ObjectKind::VertexArray)?;

        Ok(VertexArray {
            connection_id: connection.id(),
            name,
        })
    }

    pub fn name(&self) -> ObjectName {
        self.name
    }

    pub(crate) fn connection_id(&self) -> usize {
        self.connection_id
    }

    /// Makes this the current vertex array object.
    pub fn bind<D>(&self, connection: &mut Connection<D>) -> Result<(), BindError>
    where
        D: Driver,
    {
        connection.ensure_owns(self.connection_id, ObjectKind::VertexArray)?;
        connection
            .vertex_arrays()
            .bind(VertexArrayTarget::VertexArray, Some(self.name))
    }

    /// Makes the default vertex array object current if this one is current.
    pub fn unbind<D>(&self, connection: &mut Connection<D>) -> Result<(), BindError>
    where
        D: Driver,
    {
        connection.ensure_owns(self.connection_id, ObjectKind::VertexArray)?;
        connection
            .vertex_arrays()
            .unbind_if(VertexArrayTarget::VertexArray, Some(self.name))
    }

    pub fn with<D, F, T, E>(&self, connection: &mut Connection<D>, f: F) -> Result<T, E>
    where
        D: Driver,
        F: FnOnce(&mut Connection<D>) -> Result<T, E>,
        E: From<BindError>,
    {
        connection.ensure_owns(self.connection_id, ObjectKind::VertexArray)?;
        connection
            .vertex_arrays()
            .with_bound(VertexArrayTarget::VertexArray, Some(self.name), f)
    }

    /// Deletes the vertex array object, together with everything recorded about the element array
    /// buffer it owned.
    pub fn delete<D>(self, connection: &mut Connection<D>) -> Result<(), BindError>
    where
        D: Driver,
    {
        connection.ensure_owns(self.connection_id, ObjectKind::VertexArray)?;
        connection.delete_object(ObjectKind::VertexArray, self.name);

        Ok(())
    }
}
