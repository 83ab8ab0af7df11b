use web_sys::WebGl2RenderingContext as Gl;

use crate::runtime::{
    BindError, BindingParameter, Connection, CreateError, Driver, ObjectKind, ObjectName,
};

/// The framebuffer slots: the framebuffer drawn into and the framebuffer read from.
///
/// `None` in either slot selects the default framebuffer.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum FramebufferTarget {
    DrawFramebuffer,
    ReadFramebuffer,
}

impl FramebufferTarget {
    pub fn id(&self) -> u32 {
        match self {
            FramebufferTarget::DrawFramebuffer => Gl::DRAW_FRAMEBUFFER,
            FramebufferTarget::ReadFramebuffer => Gl::READ_FRAMEBUFFER,
        }
    }

    pub fn binding_parameter(&self) -> BindingParameter {
        match self {
            FramebufferTarget::DrawFramebuffer => BindingParameter::DrawFramebuffer,
            FramebufferTarget::ReadFramebuffer => BindingParameter::ReadFramebuffer,
        }
    }
}

#[derive(Debug)]
pub struct Framebuffer {
    connection_id: usize,
    name: ObjectName,
}

impl Framebuffer {
    pub fn new<D>(connection: &mut Connection<D>) -> Result<Self, CreateError>
    where
        D: Driver,
    {
        let name = connection.create_object(ObjectKind::Framebuffer)?;

        Ok(Framebuffer {
            connection_id: connection.id(),
            name,
        })
    }

    pub fn name(&self) -> ObjectName {
        self.name
    }

    pub fn bind<D>(
        &self,
        connection: &mut Connection<D>,
        target: FramebufferTarget,
    ) -> Result<(), BindError>
    where
        D: Driver,
    {
        connection.ensure_owns(self.connection_id, ObjectKind::Framebuffer)?;
        connection.framebuffers().bind(target, Some(self.name))
    }

    /// Binds the default framebuffer to `target` if this framebuffer occupies it.
    pub fn unbind<D>(
        &self,
        connection: &mut Connection<D>,
        target: FramebufferTarget,
    ) -> Result<(), BindError>
    where
        D: Driver,
    {
        connection.ensure_owns(self.connection_id, ObjectKind::Framebuffer)?;
        connection.framebuffers().unbind_if(target, Some(self.name))
    }

    pub fn with<D, F, T, E>(
        &self,
        connection: &mut Connection<D>,
        target: FramebufferTarget,
        f: F,
    ) -> Result<T, E>
    where
        D: Driver,
        F: FnOnce(&mut Connection<D>) -> Result<T, E>,
        E: From<BindError>,
    {
        connection.ensure_owns(self.connection_id, ObjectKind::Framebuffer)?;
        connection
            .framebuffers()
            .with_bound(target, Some(self.name), f)
    }

    pub fn delete<D>(self, connection: &mut Connection<D>) -> Result<(), BindError>
    where
        D: Driver,
    {
        connection.ensure_owns(self.connection_id, ObjectKind::Framebuffer)?;
        connection.delete_object(ObjectKind::Framebuffer, self.name);

        Ok(())
    }
}
