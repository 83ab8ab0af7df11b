//! An in-memory [Driver] that behaves like a WebGL 2.0 context with respect to bindings, and that
//! records every call made to it.

use std::cell::RefCell;

use fnv::FnvHashMap;
use web_sys::WebGl2RenderingContext as Gl;

use crate::buffer::{BufferData, BufferUsage};
use crate::runtime::driver::{
    BindingParameter, Driver, ErrorCode, ObjectKind, ObjectName, TextureUnit,
};

const MAX_TEXTURE_UNITS: u32 = 16;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum Call {
    BindBuffer(u32, Option<ObjectName>),
    BindTexture(u32, Option<ObjectName>),
    BindFramebuffer(u32, Option<ObjectName>),
    BindRenderbuffer(u32, Option<ObjectName>),
    BindVertexArray(Option<ObjectName>),
    ActiveTexture(TextureUnit),
    BufferData(u32, usize),
}

enum Slot {
    Context(u32),
    Element,
    Texture(u32),
    VertexArray,
}

impl Slot {
    fn of(parameter: BindingParameter) -> Self {
        match parameter {
            BindingParameter::ArrayBuffer => Slot::Context(Gl::ARRAY_BUFFER),
            BindingParameter::ElementArrayBuffer => Slot::Element,
            BindingParameter::CopyReadBuffer => Slot::Context(Gl::COPY_READ_BUFFER),
            BindingParameter::CopyWriteBuffer => Slot::Context(Gl::COPY_WRITE_BUFFER),
            BindingParameter::PixelPackBuffer => Slot::Context(Gl::PIXEL_PACK_BUFFER),
            BindingParameter::PixelUnpackBuffer => Slot::Context(Gl::PIXEL_UNPACK_BUFFER),
            BindingParameter::TransformFeedbackBuffer => {
                Slot::Context(Gl::TRANSFORM_FEEDBACK_BUFFER)
            }
            BindingParameter::UniformBuffer => Slot::Context(Gl::UNIFORM_BUFFER),
            BindingParameter::Texture2D => Slot::Texture(Gl::TEXTURE_2D),
            BindingParameter::TextureCubeMap => Slot::Texture(Gl::TEXTURE_CUBE_MAP),
            BindingParameter::Texture3D => Slot::Texture(Gl::TEXTURE_3D),
            BindingParameter::Texture2DArray => Slot::Texture(Gl::TEXTURE_2D_ARRAY),
            BindingParameter::DrawFramebuffer => Slot::Context(Gl::DRAW_FRAMEBUFFER),
            BindingParameter::ReadFramebuffer => Slot::Context(Gl::READ_FRAMEBUFFER),
            BindingParameter::Renderbuffer => Slot::Context(Gl::RENDERBUFFER),
            BindingParameter::VertexArray => Slot::VertexArray,
        }
    }
}

#[derive(Default)]
struct MockState {
    next_name: u32,
    live: FnvHashMap<ObjectName, ObjectKind>,
    context_bindings: FnvHashMap<u32, ObjectName>,
    vertex_array: Option<ObjectName>,
    elements: FnvHashMap<Option<ObjectName>, ObjectName>,
    active_unit: TextureUnit,
    textures: FnvHashMap<(TextureUnit, u32), ObjectName>,
    pending_error: Option<ErrorCode>,
    fail_next_bind: Option<ErrorCode>,
    fail_next_upload: Option<ErrorCode>,
    lost: bool,
    forgotten: Vec<ObjectName>,
    calls: Vec<Call>,
    queries: usize,
}

impl MockState {
    /// Decides whether a bind call takes effect, raising the error flag if it does not.
    fn accept(&mut self, kind: ObjectKind, name: Option<ObjectName>) -> bool {
        if let Some(code) = self.fail_next_bind.take() {
            self.pending_error = Some(code);

            return false;
        }

        if self.lost {
            return false;
        }

        match name {
            Some(name) if self.live.get(&name) != Some(&kind) => {
                self.pending_error = Some(ErrorCode::InvalidOperation);

                false
            }
            _ => true,
        }
    }

    fn set_context_binding(&mut self, target: u32, name: Option<ObjectName>) {
        match name {
            Some(name) => self.context_bindings.insert(target, name),
            None => self.context_bindings.remove(&target),
        };
    }

    fn set_element_binding(&mut self, vertex_array: Option<ObjectName>, name: Option<ObjectName>) {
        match name {
            Some(name) => self.elements.insert(vertex_array, name),
            None => self.elements.remove(&vertex_array),
        };
    }

    fn set_texture_binding(&mut self, unit: TextureUnit, target: u32, name: Option<ObjectName>) {
        match name {
            Some(name) => self.textures.insert((unit, target), name),
            None => self.textures.remove(&(unit, target)),
        };
    }

    fn slot(&self, slot: &Slot) -> Option<ObjectName> {
        match slot {
            Slot::Context(target) => self.context_bindings.get(target).copied(),
            Slot::Element => self.elements.get(&self.vertex_array).copied(),
            Slot::Texture(target) => self.textures.get(&(self.active_unit, *target)).copied(),
            Slot::VertexArray => self.vertex_array,
        }
    }
}

/// A [Driver] for tests.
///
/// Binding a name that does not refer to a live object of the right kind raises
/// `INVALID_OPERATION` and leaves the slot unchanged, as does WebGL. Once the context is lost,
/// every bind is ignored, every query reports no object and every error check reports
/// `CONTEXT_LOST_WEBGL`.
pub(crate) struct MockDriver {
    state: RefCell<MockState>,
}

impl MockDriver {
    pub(crate) fn new() -> Self {
        MockDriver {
            state: RefCell::new(MockState {
                next_name: 1,
                ..MockState::default()
            }),
        }
    }

    /// Every bind and upload call made so far, in order.
    pub(crate) fn calls(&self) -> Vec<Call> {
        self.state.borrow().calls.clone()
    }

    pub(crate) fn bind_calls(&self) -> usize {
        self.state
            .borrow()
            .calls
            .iter()
            .filter(|call| match call {
                Call::BufferData(..) => false,
                _ => true,
            })
            .count()
    }

    /// The number of state queries made so far.
    pub(crate) fn queries(&self) -> usize {
        self.state.borrow().queries
    }

    pub(crate) fn clear_calls(&self) {
        self.state.borrow_mut().calls.clear();
    }

    /// Makes the next bind call fail with `code` without taking effect.
    pub(crate) fn fail_next_bind(&self, code: ErrorCode) {
        self.state.borrow_mut().fail_next_bind = Some(code);
    }

    /// Makes the next `buffer_data` call fail with `code`.
    pub(crate) fn fail_next_upload(&self, code: ErrorCode) {
        self.state.borrow_mut().fail_next_upload = Some(code);
    }

    pub(crate) fn lose_context(&self) {
        self.state.borrow_mut().lost = true;
    }

    /// Restores a lost context. All objects and bindings of the lost context are gone.
    pub(crate) fn restore_context(&self) {
        let mut state = self.state.borrow_mut();
        let next_name = state.next_name;

        *state = MockState {
            next_name,
            ..MockState::default()
        };
    }

    /// Changes a binding without going through a [Connection](crate::runtime::Connection), the
    /// way other code sharing the context would.
    pub(crate) fn bind_externally(&self, parameter: BindingParameter, name: Option<ObjectName>) {
        let mut state = self.state.borrow_mut();

        match Slot::of(parameter) {
            Slot::Context(target) => state.set_context_binding(target, name),
            Slot::Element => {
                let vertex_array = state.vertex_array;

                state.set_element_binding(vertex_array, name);
            }
            Slot::Texture(target) => {
                let unit = state.active_unit;

                state.set_texture_binding(unit, target, name);
            }
            Slot::VertexArray => state.vertex_array = name,
        }
    }

    /// Binds `buffer` to the element array slot of `vertex_array` without making it current.
    pub(crate) fn bind_element_externally(
        &self,
        vertex_array: Option<ObjectName>,
        buffer: Option<ObjectName>,
    ) {
        self.state
            .borrow_mut()
            .set_element_binding(vertex_array, buffer);
    }

    /// The element array buffer bound in `vertex_array`, whether or not it is current.
    pub(crate) fn element_binding(&self, vertex_array: Option<ObjectName>) -> Option<ObjectName> {
        self.state.borrow().elements.get(&vertex_array).copied()
    }

    /// The texture bound to `target` on `unit`, whether or not the unit is active.
    pub(crate) fn texture_binding(&self, unit: TextureUnit, target: u32) -> Option<ObjectName> {
        self.state.borrow().textures.get(&(unit, target)).copied()
    }

    /// Every name the connection reported as forgotten, in order.
    pub(crate) fn forgotten(&self) -> Vec<ObjectName> {
        self.state.borrow().forgotten.clone()
    }

    pub(crate) fn is_live(&self, name: ObjectName) -> bool {
        self.state.borrow().live.contains_key(&name)
    }
}

impl Driver for MockDriver {
    fn create_object(&self, kind: ObjectKind) -> Option<ObjectName> {
        let mut state = self.state.borrow_mut();

        if state.lost {
            return None;
        }

        let name = ObjectName::new(state.next_name)?;

        state.next_name += 1;
        state.live.insert(name, kind);

        Some(name)
    }

    fn forget_object(&self, name: ObjectName) {
        self.state.borrow_mut().forgotten.push(name);
    }

    fn delete_object(&self, kind: ObjectKind, name: ObjectName) {
        let mut state = self.state.borrow_mut();

        if state.live.get(&name) != Some(&kind) {
            return;
        }

        state.live.remove(&name);
        state.context_bindings.retain(|_, bound| *bound != name);
        state.textures.retain(|_, bound| *bound != name);

        let vertex_array = state.vertex_array;

        if state.elements.get(&vertex_array) == Some(&name) {
            state.elements.remove(&vertex_array);
        }

        if kind == ObjectKind::VertexArray {
            state.elements.remove(&Some(name));

            if state.vertex_array == Some(name) {
                state.vertex_array = None;
            }
        }
    }

    fn buffer_data(&self, target: u32, data: BufferData, _usage: BufferUsage) {
        let mut state = self.state.borrow_mut();

        state.calls.push(Call::BufferData(target, data.size_in_bytes()));

        if let Some(code) = state.fail_next_upload.take() {
            state.pending_error = Some(code);

            return;
        }

        let bound = if target == Gl::ELEMENT_ARRAY_BUFFER {
            state.slot(&Slot::Element)
        } else {
            state.slot(&Slot::Context(target))
        };

        if bound.is_none() {
            state.pending_error = Some(ErrorCode::InvalidOperation);
        }
    }

    fn bind_buffer(&self, target: u32, buffer: Option<ObjectName>) {
        let mut state = self.state.borrow_mut();

        state.calls.push(Call::BindBuffer(target, buffer));

        if state.accept(ObjectKind::Buffer, buffer) {
            if target == Gl::ELEMENT_ARRAY_BUFFER {
                let vertex_array = state.vertex_array;

                state.set_element_binding(vertex_array, buffer);
            } else {
                state.set_context_binding(target, buffer);
            }
        }
    }

    fn bind_texture(&self, target: u32, texture: Option<ObjectName>) {
        let mut state = self.state.borrow_mut();

        state.calls.push(Call::BindTexture(target, texture));

        if state.accept(ObjectKind::Texture, texture) {
            let unit = state.active_unit;

            state.set_texture_binding(unit, target, texture);
        }
    }

    fn bind_framebuffer(&self, target: u32, framebuffer: Option<ObjectName>) {
        let mut state = self.state.borrow_mut();

        state.calls.push(Call::BindFramebuffer(target, framebuffer));

        if state.accept(ObjectKind::Framebuffer, framebuffer) {
            if target == Gl::FRAMEBUFFER {
                state.set_context_binding(Gl::DRAW_FRAMEBUFFER, framebuffer);
                state.set_context_binding(Gl::READ_FRAMEBUFFER, framebuffer);
            } else {
                state.set_context_binding(target, framebuffer);
            }
        }
    }

    fn bind_renderbuffer(&self, target: u32, renderbuffer: Option<ObjectName>) {
        let mut state = self.state.borrow_mut();

        state.calls.push(Call::BindRenderbuffer(target, renderbuffer));

        if state.accept(ObjectKind::Renderbuffer, renderbuffer) {
            state.set_context_binding(target, renderbuffer);
        }
    }

    fn bind_vertex_array(&self, vertex_array: Option<ObjectName>) {
        let mut state = self.state.borrow_mut();

        state.calls.push(Call::BindVertexArray(vertex_array));

        if state.accept(ObjectKind::VertexArray, vertex_array) {
            state.vertex_array = vertex_array;
        }
    }

    fn active_texture(&self, unit: TextureUnit) {
        let mut state = self.state.borrow_mut();

        state.calls.push(Call::ActiveTexture(unit));

        if let Some(code) = state.fail_next_bind.take() {
            state.pending_error = Some(code);
        } else if unit.0 >= MAX_TEXTURE_UNITS {
            state.pending_error = Some(ErrorCode::InvalidEnum);
        } else if !state.lost {
            state.active_unit = unit;
        }
    }

    fn binding(&self, parameter: BindingParameter) -> Option<ObjectName> {
        let mut state = self.state.borrow_mut();

        state.queries += 1;

        if state.lost {
            None
        } else {
            state.slot(&Slot::of(parameter))
        }
    }

    fn active_texture_unit(&self) -> TextureUnit {
        let mut state = self.state.borrow_mut();

        state.queries += 1;

        state.active_unit
    }

    fn take_error(&self) -> Option<ErrorCode> {
        let mut state = self.state.borrow_mut();

        if state.lost {
            Some(ErrorCode::ContextLost)
        } else {
            state.pending_error.take()
        }
    }

    fn is_context_lost(&self) -> bool {
        self.state.borrow().lost
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binding_an_unknown_name_is_an_invalid_operation() {
        let driver = MockDriver::new();
        let texture = driver.create_object(ObjectKind::Texture);

        driver.bind_buffer(Gl::ARRAY_BUFFER, texture);

        assert_eq!(driver.take_error(), Some(ErrorCode::InvalidOperation));
        assert_eq!(driver.binding(BindingParameter::ArrayBuffer), None);
        assert_eq!(driver.take_error(), None);
    }

    #[test]
    fn test_element_bindings_follow_the_vertex_array() {
        let driver = MockDriver::new();
        let vertex_array = driver.create_object(ObjectKind::VertexArray);
        let buffer = driver.create_object(ObjectKind::Buffer);

        driver.bind_vertex_array(vertex_array);
        driver.bind_buffer(Gl::ELEMENT_ARRAY_BUFFER, buffer);
        driver.bind_vertex_array(None);

        assert_eq!(driver.binding(BindingParameter::ElementArrayBuffer), None);
        assert_eq!(driver.element_binding(vertex_array), buffer);
    }

    #[test]
    fn test_delete_releases_bindings() {
        let driver = MockDriver::new();
        let buffer = driver.create_object(ObjectKind::Buffer);

        driver.bind_buffer(Gl::UNIFORM_BUFFER, buffer);
        driver.delete_object(ObjectKind::Buffer, buffer.unwrap());

        assert_eq!(driver.binding(BindingParameter::UniformBuffer), None);
        assert!(!driver.is_live(buffer.unwrap()));
    }

    #[test]
    fn test_framebuffer_target_binds_draw_and_read() {
        let driver = MockDriver::new();
        let framebuffer = driver.create_object(ObjectKind::Framebuffer);

        driver.bind_framebuffer(Gl::FRAMEBUFFER, framebuffer);

        assert_eq!(
            driver.binding(BindingParameter::DrawFramebuffer),
            framebuffer
        );
        assert_eq!(
            driver.binding(BindingParameter::ReadFramebuffer),
            framebuffer
        );
    }

    #[test]
    fn test_restore_context_forgets_everything() {
        let driver = MockDriver::new();
        let buffer = driver.create_object(ObjectKind::Buffer);

        driver.bind_buffer(Gl::ARRAY_BUFFER, buffer);
        driver.lose_context();

        assert_eq!(driver.take_error(), Some(ErrorCode::ContextLost));
        assert_eq!(driver.create_object(ObjectKind::Buffer), None);

        driver.restore_context();

        assert!(!driver.is_context_lost());
        assert_eq!(driver.binding(BindingParameter::ArrayBuffer), None);
        assert_ne!(driver.create_object(ObjectKind::Buffer), buffer);
    }
}
