use std::cell::Cell;

use log::{debug, warn};

use crate::runtime::binder::Binder;
use crate::runtime::binding::{
    ActiveTextureBinding, BindingKind, BufferBinding, ContainedKind, FramebufferBinding,
    IndexBufferBinding, RenderbufferBinding, TextureBinding, VertexArrayBinding,
};
use crate::runtime::container_binder::ContainerBinder;
use crate::runtime::context_options::ContextOptions;
use crate::runtime::driver::{Driver, ObjectKind, ObjectName};
use crate::runtime::error::{BindError, CreateError};
use crate::runtime::state::BindingState;

thread_local!(static ID_GEN: IdGen = IdGen::new());

struct IdGen {
    next: Cell<usize>,
}

impl IdGen {
    const fn new() -> Self {
        IdGen { next: Cell::new(0) }
    }

    fn next(&self) -> usize {
        let next = self.next.get();

        self.next.set(next + 1);

        next
    }
}

/// A driver context together with the binding state recorded for it.
///
/// Every binding of a context must go through its connection: the connection's binding state is
/// only correct as long as nothing else binds objects in the context (see
/// [ContextOptions::fast_path] for the one exception that is tolerated).
///
/// Each connection has its own [BindingState]; bindings made through one connection never affect
/// what another connection considers bound.
pub struct Connection<D> {
    pub(crate) id: usize,
    pub(crate) driver: D,
    pub(crate) state: BindingState,
    pub(crate) options: ContextOptions,
}

impl<D> Connection<D>
where
    D: Driver,
{
    /// Wraps `driver` in a new connection. All entries of its binding state start out cold.
    pub fn new(driver: D, options: ContextOptions) -> Self {
        let id = ID_GEN.with(|id_gen| id_gen.next());

        debug!(
            "created connection {} (fast path: {})",
            id,
            options.fast_path()
        );

        Connection {
            id,
            driver,
            state: BindingState::new(),
            options,
        }
    }

    /// Identifies this connection among all connections created on the current thread.
    pub fn id(&self) -> usize {
        self.id
    }

    pub fn options(&self) -> &ContextOptions {
        &self.options
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn state(&self) -> &BindingState {
        &self.state
    }

    pub fn binder<K>(&mut self) -> Binder<D, K>
    where
        K: BindingKind,
    {
        Binder::new(self)
    }

    pub fn container_binder<K>(&mut self) -> ContainerBinder<D, K>
    where
        K: ContainedKind,
    {
        ContainerBinder::new(self)
    }

    pub fn buffers(&mut self) -> Binder<D, BufferBinding> {
        self.binder()
    }

    pub fn framebuffers(&mut self) -> Binder<D, FramebufferBinding> {
        self.binder()
    }

    pub fn renderbuffers(&mut self) -> Binder<D, RenderbufferBinding> {
        self.binder()
    }

    pub fn vertex_arrays(&mut self) -> Binder<D, VertexArrayBinding> {
        self.binder()
    }

    pub fn texture_units(&mut self) -> Binder<D, ActiveTextureBinding> {
        self.binder()
    }

    /// Element array buffer bindings, per vertex array object.
    pub fn index_buffers(&mut self) -> ContainerBinder<D, IndexBufferBinding> {
        self.container_binder()
    }

    /// Texture bindings, per texture unit.
    pub fn textures(&mut self) -> ContainerBinder<D, TextureBinding> {
        self.container_binder()
    }

    /// Turns every entry of the binding state cold, so that every slot is queried from the driver
    /// (or, with the fast path enabled, assumed unbound) on next use.
    ///
    /// Call this after code that bypasses this connection has changed bindings, or after the
    /// context was restored.
    pub fn invalidate(&mut self) {
        debug!("invalidating all bindings of connection {}", self.id);

        self.state.invalidate();
    }

    /// Checks whether the driver reports that the context is lost; if so, invalidates the binding
    /// state and returns `true`.
    pub fn check_context_lost(&mut self) -> bool {
        if self.driver.is_context_lost() {
            warn!("context of connection {} is lost", self.id);

            self.state.invalidate();

            true
        } else {
            false
        }
    }

    /// Turns every binding entry that refers to `name` cold.
    ///
    /// Called when an object is deleted; the driver releases the bindings of a deleted object by
    /// itself.
    pub fn forget(&mut self, name: ObjectName) {
        self.state.forget(name);
        self.driver.forget_object(name);
    }

    pub(crate) fn create_object(&mut self, kind: ObjectKind) -> Result<ObjectName, CreateError> {
        match self.driver.create_object(kind) {
            Some(name) => {
                debug!("created {} object {}", kind, name);

                Ok(name)
            }
            None => {
                warn!("the driver could not create a {} object", kind);

                Err(CreateError::Unavailable(kind))
            }
        }
    }

    pub(crate) fn delete_object(&mut self, kind: ObjectKind, name: ObjectName) {
        debug!("deleting {} object {}", kind, name);

        self.driver.delete_object(kind, name);
        self.state.forget(name);
    }

    pub(crate) fn ensure_owns(&self, owner: usize, kind: ObjectKind) -> Result<(), BindError> {
        if owner == self.id {
            Ok(())
        } else {
            Err(BindError::ForeignConnection {
                kind,
                owner,
                connection: self.id,
            })
        }
    }
}
