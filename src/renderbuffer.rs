use web_sys::WebGl2RenderingContext as Gl;

use crate::runtime::{BindError, Connection, CreateError, Driver, ObjectKind, ObjectName};

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum RenderbufferTarget {
    Renderbuffer,
}

impl RenderbufferTarget {
    pub fn id(&self) -> u32 {
        match self {
            RenderbufferTarget::Renderbuffer => Gl::RENDERBUFFER,
        }
    }
}

#[derive(Debug)]
pub struct Renderbuffer {
    connection_id: usize,
    name: ObjectName,
}

impl Renderbuffer {
    pub fn new<D>(connection: &mut Connection<D>) -> Result<Self, CreateError>
    where
        D: Driver,
    {
        let name = connection.create_object(ObjectKind::Renderbuffer)?;

        Ok(Renderbuffer {
            connection_id: connection.id(),
            name,
        })
    }

    pub fn name(&self) -> ObjectName {
        self.name
    }

    pub fn bind<D>(&self, connection: &mut Connection<D>) -> Result<(), BindError>
    where
        D: Driver,
    {
        connection.ensure_owns(self.connection_id, ObjectKind::Renderbuffer)?;
        connection
            .renderbuffers()
            .bind(RenderbufferTarget::Renderbuffer, Some(self.name))
    }

    pub fn unbind<D>(&self, connection: &mut Connection<D>) -> Result<(), BindError>
    where
        D: Driver,
    {
        connection.ensure_owns(self.connection_id, ObjectKind::Renderbuffer)?;
        connection
            .renderbuffers()
            .unbind_if(RenderbufferTarget::Renderbuffer, Some(self.name))
    }

    pub fn with<D, F, T, E>(&self, connection: &mut Connection<D>, f: F) -> Result<T, E>
    where
        D: Driver,
        F: FnOnce(&mut Connection<D>) -> Result<T, E>,
        E: From<BindError>,
    {
        connection.ensure_owns(self.connection_id, ObjectKind::Renderbuffer)?;
        connection
            .renderbuffers()
            .with_bound(RenderbufferTarget::Renderbuffer, Some(self.name), f)
    }

    pub fn delete<D>(self, connection: &mut Connection<D>) -> Result<(), BindError>
    where
        D: Driver,
    {
        connection.ensure_owns(self.connection_id, ObjectKind::Renderbuffer)?;
        connection.delete_object(ObjectKind::Renderbuffer, self.name);

        Ok(())
    }
}
