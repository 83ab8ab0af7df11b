//! Textures and the texture units they are bound to.
//!
//! A texture binding belongs to a texture unit: binding a texture puts it in the slot of the
//! currently active unit. Bindings are therefore recorded per unit (see
//! [Connection::textures](crate::runtime::Connection::textures)).

use web_sys::WebGl2RenderingContext as Gl;

use crate::runtime::{
    BindError, BindingParameter, Connection, CreateError, Driver, ObjectKind, ObjectName,
    TextureUnit,
};

/// The texture slots of a texture unit.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum TextureTarget {
    Texture2D,
    TextureCubeMap,
    Texture3D,
    Texture2DArray,
}

impl TextureTarget {
    pub fn id(&self) -> u32 {
        match self {
            TextureTarget::Texture2D => Gl::TEXTURE_2D,
            TextureTarget::TextureCubeMap => Gl::TEXTURE_CUBE_MAP,
            TextureTarget::Texture3D => Gl::TEXTURE_3D,
            TextureTarget::Texture2DArray => Gl::TEXTURE_2D_ARRAY,
        }
    }

    pub fn binding_parameter(&self) -> BindingParameter {
        match self {
            TextureTarget::Texture2D => BindingParameter::Texture2D,
            TextureTarget::TextureCubeMap => BindingParameter::TextureCubeMap,
            TextureTarget::Texture3D => BindingParameter::Texture3D,
            TextureTarget::Texture2DArray => BindingParameter::Texture2DArray,
        }
    }
}

/// The slot that selects the active texture unit.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum ActiveTextureTarget {
    ActiveTexture,
}

#[derive(Debug)]
pub struct Texture {
    connection_id: usize,
    name: ObjectName,
    target: TextureTarget,
}

impl Texture {
    pub fn new<D>(connection: &mut Connection<D>, target: TextureTarget) -> Result<Self, CreateError>
    where
        D: Driver,
    {
        let name = connection.create_object(ObjectKind::Texture)?;

        Ok(Texture {
            connection_id: connection.id(),
            name,
            target,
        })
    }

    pub fn name(&self) -> ObjectName {
        self.name
    }

    pub fn target(&self) -> TextureTarget {
        self.target
    }

    /// Binds this texture to its slot of the active texture unit.
    pub fn bind<D>(&self, connection: &mut Connection<D>) -> Result<(), BindError>
    where
        D: Driver,
    {
        connection.ensure_owns(self.connection_id, ObjectKind::Texture)?;

        let unit = connection.textures().current_container();

        connection.textures().bind(unit, self.target, Some(self.name))
    }

    /// Makes `unit` the active texture unit and binds this texture to its slot of `unit`.
    pub fn bind_to_unit<D>(
        &self,
        connection: &mut Connection<D>,
        unit: TextureUnit,
    ) -> Result<(), BindError>
    where
        D: Driver,
    {
        connection.ensure_owns(self.connection_id, ObjectKind::Texture)?;
        connection.textures().bind(unit, self.target, Some(self.name))
    }

    /// Unbinds this texture from the active texture unit; does nothing if a different texture
    /// occupies the slot.
    pub fn unbind<D>(&self, connection: &mut Connection<D>) -> Result<(), BindError>
    where
        D: Driver,
    {
        connection.ensure_owns(self.connection_id, ObjectKind::Texture)?;

        let unit = connection.textures().current_container();

        connection
            .textures()
            .unbind_if(unit, self.target, Some(self.name))
    }

    /// Runs `f` with this texture bound to its slot of the active texture unit, then binds
    /// whichever texture was bound before.
    pub fn with<D, F, T, E>(&self, connection: &mut Connection<D>, f: F) -> Result<T, E>
    where
        D: Driver,
        F: FnOnce(&mut Connection<D>) -> Result<T, E>,
        E: From<BindError>,
    {
        connection.ensure_owns(self.connection_id, ObjectKind::Texture)?;

        let unit = connection.textures().current_container();

        connection
            .textures()
            .with_bound(unit, self.target, Some(self.name), f)
    }

    pub fn delete<D>(self, connection: &mut Connection<D>) -> Result<(), BindError>
    where
        D: Driver,
    {
        connection.ensure_owns(self.connection_id, ObjectKind::Texture)?;
        connection.delete_object(ObjectKind::Texture, self.name);

        Ok(())
    }
}
