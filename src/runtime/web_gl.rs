use std::cell::{Cell, RefCell};

use failure::Fail;
use fnv::FnvHashMap;
use log::{debug, warn};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    HtmlCanvasElement, WebGl2RenderingContext as Gl, WebGlBuffer, WebGlFramebuffer,
    WebGlRenderbuffer, WebGlTexture, WebGlVertexArrayObject,
};

use crate::buffer::{BufferData, BufferUsage};
use crate::runtime::connection::Connection;
use crate::runtime::context_options::ContextOptions;
use crate::runtime::driver::{
    BindingParameter, Driver, ErrorCode, ObjectKind, ObjectName, TextureUnit,
};

/// Error returned when a WebGL 2.0 context could not be obtained from a canvas.
#[derive(Debug, Fail)]
pub enum ContextCreationError {
    #[fail(display = "could not convert the context attributes: {}", _0)]
    InvalidAttributes(String),

    #[fail(display = "the canvas refused to create a WebGL 2.0 context: {}", _0)]
    Refused(String),

    #[fail(display = "WebGL 2.0 is not supported by this browser")]
    Unsupported,
}

/// Maps [ObjectName]s to the JavaScript objects WebGL hands out.
///
/// WebGL identifies objects by reference rather than by number. Names are never reused, so a
/// name that was forgotten by the binding state can not come to refer to a different object.
///
/// Objects created by other code are registered the first time a query reports them and are kept
/// until the connection forgets their name. Looking up the name of an object is a linear scan
/// over all registered objects; it only happens when a cold binding slot is queried.
struct ObjectRegistry<T> {
    next: u32,
    objects: FnvHashMap<ObjectName, Entry<T>>,
}

struct Entry<T> {
    kind: ObjectKind,
    object: T,
    foreign: bool,
}

impl<T> ObjectRegistry<T> {
    fn new() -> Self {
        ObjectRegistry {
            next: 1,
            objects: FnvHashMap::default(),
        }
    }

    fn register(&mut self, kind: ObjectKind, object: T) -> Option<ObjectName> {
        self.insert(kind, object, false)
    }

    fn insert(&mut self, kind: ObjectKind, object: T, foreign: bool) -> Option<ObjectName> {
        let name = ObjectName::new(self.next)?;

        self.next += 1;
        self.objects.insert(
            name,
            Entry {
                kind,
                object,
                foreign,
            },
        );

        Some(name)
    }

    fn get(&self, kind: ObjectKind, name: ObjectName) -> Option<&T> {
        match self.objects.get(&name) {
            Some(entry) if entry.kind == kind => Some(&entry.object),
            _ => None,
        }
    }

    fn remove(&mut self, kind: ObjectKind, name: ObjectName) -> Option<T> {
        if self.get(kind, name).is_some() {
            self.objects.remove(&name).map(|entry| entry.object)
        } else {
            None
        }
    }

    /// Returns the name of `object`, registering it first if it was created by other code.
    fn name_of<F>(&mut self, kind: ObjectKind, object: T, same: F) -> Option<ObjectName>
    where
        F: Fn(&T, &T) -> bool,
    {
        let found = self
            .objects
            .iter()
            .find(|(_, entry)| entry.kind == kind && same(&entry.object, &object))
            .map(|(name, _)| *name);

        match found {
            Some(name) => Some(name),
            None => {
                let name = self.insert(kind, object, true)?;

                debug!("registered foreign {} object as {}", kind, name);

                Some(name)
            }
        }
    }

    /// Drops the entry for `name` if it was registered by [name_of](ObjectRegistry::name_of).
    /// Objects created through the registry stay until they are deleted.
    fn release(&mut self, name: ObjectName) -> bool {
        match self.objects.get(&name) {
            Some(entry) if entry.foreign => {
                self.objects.remove(&name);

                true
            }
            _ => false,
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.objects.len()
    }
}

/// A [Driver] that forwards to a [WebGl2RenderingContext](web_sys::WebGl2RenderingContext).
pub struct WebGl2Driver {
    gl: Gl,
    registry: RefCell<ObjectRegistry<JsValue>>,
    pending_error: Cell<Option<ErrorCode>>,
}

impl WebGl2Driver {
    pub fn new(gl: Gl) -> Self {
        WebGl2Driver {
            gl,
            registry: RefCell::new(ObjectRegistry::new()),
            pending_error: Cell::new(None),
        }
    }

    /// Obtains a WebGL 2.0 context from `canvas`, configured with the context attributes of
    /// `options`.
    pub fn from_canvas(
        canvas: &HtmlCanvasElement,
        options: &ContextOptions,
    ) -> Result<Self, ContextCreationError> {
        #[allow(deprecated)]
        let attributes = JsValue::from_serde(&options.context_attributes())
            .map_err(|err| ContextCreationError::InvalidAttributes(err.to_string()))?;

        let context = canvas
            .get_context_with_context_options("webgl2", &attributes)
            .map_err(|err| ContextCreationError::Refused(err.as_string().unwrap_or_default()))?
            .ok_or(ContextCreationError::Unsupported)?;

        let gl = context
            .dyn_into::<Gl>()
            .map_err(|_| ContextCreationError::Unsupported)?;

        Ok(WebGl2Driver::new(gl))
    }

    pub fn gl(&self) -> &Gl {
        &self.gl
    }

    fn object(&self, kind: ObjectKind, name: Option<ObjectName>) -> Result<Option<JsValue>, ()> {
        match name {
            Some(name) => match self.registry.borrow().get(kind, name) {
                Some(object) => Ok(Some(object.clone())),
                None => {
                    // Same outcome as binding a deleted object.
                    self.pending_error.set(Some(ErrorCode::InvalidOperation));

                    Err(())
                }
            },
            None => Ok(None),
        }
    }
}

impl Driver for WebGl2Driver {
    fn create_object(&self, kind: ObjectKind) -> Option<ObjectName> {
        let object: JsValue = match kind {
            ObjectKind::Buffer => self.gl.create_buffer()?.into(),
            ObjectKind::Texture => self.gl.create_texture()?.into(),
            ObjectKind::Framebuffer => self.gl.create_framebuffer()?.into(),
            ObjectKind::Renderbuffer => self.gl.create_renderbuffer()?.into(),
            ObjectKind::VertexArray => self.gl.create_vertex_array()?.into(),
        };

        self.registry.borrow_mut().register(kind, object)
    }

    fn forget_object(&self, name: ObjectName) {
        if self.registry.borrow_mut().release(name) {
            debug!("released foreign object {}", name);
        }
    }

    fn delete_object(&self, kind: ObjectKind, name: ObjectName) {
        let object = match self.registry.borrow_mut().remove(kind, name) {
            Some(object) => object,
            None => return,
        };

        match kind {
            ObjectKind::Buffer => self.gl.delete_buffer(Some(object.unchecked_ref())),
            ObjectKind::Texture => self.gl.delete_texture(Some(object.unchecked_ref())),
            ObjectKind::Framebuffer => self.gl.delete_framebuffer(Some(object.unchecked_ref())),
            ObjectKind::Renderbuffer => {
                self.gl.delete_renderbuffer(Some(object.unchecked_ref()))
            }
            ObjectKind::VertexArray => self.gl.delete_vertex_array(Some(object.unchecked_ref())),
        }
    }

    fn buffer_data(&self, target: u32, data: BufferData, usage: BufferUsage) {
        match data {
            BufferData::FromData(data) => {
                self.gl.buffer_data_with_u8_array(target, data, usage.id())
            }
            BufferData::FromSize(size) => {
                self.gl
                    .buffer_data_with_f64(target, size_arg(size), usage.id())
            }
            BufferData::Empty => (),
        }
    }

    fn bind_buffer(&self, target: u32, buffer: Option<ObjectName>) {
        if let Ok(object) = self.object(ObjectKind::Buffer, buffer) {
            self.gl
                .bind_buffer(target, object.as_ref().map(|o| o.unchecked_ref::<WebGlBuffer>()));
        }
    }

    fn bind_texture(&self, target: u32, texture: Option<ObjectName>) {
        if let Ok(object) = self.object(ObjectKind::Texture, texture) {
            self.gl.bind_texture(
                target,
                object.as_ref().map(|o| o.unchecked_ref::<WebGlTexture>()),
            );
        }
    }

    fn bind_framebuffer(&self, target: u32, framebuffer: Option<ObjectName>) {
        if let Ok(object) = self.object(ObjectKind::Framebuffer, framebuffer) {
            self.gl.bind_framebuffer(
                target,
                object.as_ref().map(|o| o.unchecked_ref::<WebGlFramebuffer>()),
            );
        }
    }

    fn bind_renderbuffer(&self, target: u32, renderbuffer: Option<ObjectName>) {
        if let Ok(object) = self.object(ObjectKind::Renderbuffer, renderbuffer) {
            self.gl.bind_renderbuffer(
                target,
                object
                    .as_ref()
                    .map(|o| o.unchecked_ref::<WebGlRenderbuffer>()),
            );
        }
    }

    fn bind_vertex_array(&self, vertex_array: Option<ObjectName>) {
        if let Ok(object) = self.object(ObjectKind::VertexArray, vertex_array) {
            self.gl.bind_vertex_array(
                object
                    .as_ref()
                    .map(|o| o.unchecked_ref::<WebGlVertexArrayObject>()),
            );
        }
    }

    fn active_texture(&self, unit: TextureUnit) {
        self.gl.active_texture(unit.id());
    }

    fn binding(&self, parameter: BindingParameter) -> Option<ObjectName> {
        let kind = match parameter {
            BindingParameter::Texture2D
            | BindingParameter::TextureCubeMap
            | BindingParameter::Texture3D
            | BindingParameter::Texture2DArray => ObjectKind::Texture,
            BindingParameter::DrawFramebuffer | BindingParameter::ReadFramebuffer => {
                ObjectKind::Framebuffer
            }
            BindingParameter::Renderbuffer => ObjectKind::Renderbuffer,
            BindingParameter::VertexArray => ObjectKind::VertexArray,
            _ => ObjectKind::Buffer,
        };

        match self.gl.get_parameter(parameter.id()) {
            Ok(value) => {
                if value.is_null() || value.is_undefined() {
                    None
                } else {
                    self.registry
                        .borrow_mut()
                        .name_of(kind, value, |a, b| js_sys::Object::is(a, b))
                }
            }
            Err(err) => {
                warn!("could not query {:?}: {:?}", parameter, err);

                None
            }
        }
    }

    fn active_texture_unit(&self) -> TextureUnit {
        let id = self
            .gl
            .get_parameter(Gl::ACTIVE_TEXTURE)
            .ok()
            .and_then(|value| value.as_f64())
            .map(|id| id as u32)
            .unwrap_or(Gl::TEXTURE0);

        TextureUnit(id.saturating_sub(Gl::TEXTURE0))
    }

    fn take_error(&self) -> Option<ErrorCode> {
        self.pending_error
            .take()
            .or_else(|| ErrorCode::from_id(self.gl.get_error()))
    }

    fn is_context_lost(&self) -> bool {
        self.gl.is_context_lost()
    }
}

/// Converts a data store size to the `GLsizeiptr` argument of `bufferData`.
///
/// WebGL takes the size as a JavaScript number, which represents every `usize` of a 32-bit wasm
/// target exactly.
fn size_arg(size: usize) -> f64 {
    size as f64
}

impl Connection<WebGl2Driver> {
    /// Creates a connection to a new WebGL 2.0 context for `canvas`.
    pub fn from_canvas(
        canvas: &HtmlCanvasElement,
        options: ContextOptions,
    ) -> Result<Self, ContextCreationError> {
        let driver = WebGl2Driver::from_canvas(canvas, &options)?;

        Ok(Connection::new(driver, options))
    }
}
