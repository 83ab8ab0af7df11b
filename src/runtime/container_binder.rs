use std::marker;

use log::{debug, trace};

use crate::runtime::binder::{self, Binder};
use crate::runtime::binding::{ContainedKind, ContainerValue};
use crate::runtime::connection::Connection;
use crate::runtime::driver::{Driver, ObjectName};
use crate::runtime::error::BindError;

/// Binds, unbinds and queries the slots of a [ContainedKind], e.g. the element array buffer slot
/// of a vertex array object or the texture slots of a texture unit.
///
/// Every operation names the container it acts on. Entries are recorded per container, so
/// switching containers never invalidates what is known about the slots of other containers.
///
/// Writes make the container current first and leave it current. Reads of a warm entry never
/// switch containers; reads of a cold entry make the container current before querying the
/// driver (unless the fast path is enabled, in which case the entry is assumed unbound).
pub struct ContainerBinder<'a, D, K>
where
    D: Driver,
    K: ContainedKind,
{
    connection: &'a mut Connection<D>,
    _marker: marker::PhantomData<K>,
}

impl<'a, D, K> ContainerBinder<'a, D, K>
where
    D: Driver,
    K: ContainedKind,
{
    pub(crate) fn new(connection: &'a mut Connection<D>) -> Self {
        ContainerBinder {
            connection,
            _marker: marker::PhantomData,
        }
    }

    /// The container that is currently active.
    pub fn current_container(&mut self) -> ContainerValue<K> {
        binder::bound::<D, K::Container>(self.connection, K::CONTAINER_SLOT)
    }

    /// Returns what occupies the `target` slot of `container`.
    pub fn bound(
        &mut self,
        container: ContainerValue<K>,
        target: K::Target,
    ) -> Result<Option<ObjectName>, BindError> {
        bound::<D, K>(self.connection, container, target)
    }

    /// Binds `value` to the `target` slot of `container`, making `container` current first.
    pub fn bind(
        &mut self,
        container: ContainerValue<K>,
        target: K::Target,
        value: Option<ObjectName>,
    ) -> Result<(), BindError> {
        bind::<D, K>(self.connection, container, target, value)
    }

    pub fn unbind(
        &mut self,
        container: ContainerValue<K>,
        target: K::Target,
    ) -> Result<(), BindError> {
        bind::<D, K>(self.connection, container, target, None)
    }

    /// Unbinds the `target` slot of `container` only if it is occupied by `value`.
    pub fn unbind_if(
        &mut self,
        container: ContainerValue<K>,
        target: K::Target,
        value: Option<ObjectName>,
    ) -> Result<(), BindError> {
        if bound::<D, K>(self.connection, container, target)? == value {
            bind::<D, K>(self.connection, container, target, None)
        } else {
            Ok(())
        }
    }

    /// Runs `action` with `value` bound to the `target` slot of `container`, then binds the
    /// previous value again and makes the previously active container current again.
    ///
    /// Errors are reported as for [Binder::with_bound].
    pub fn with_bound<F, T, E>(
        &mut self,
        container: ContainerValue<K>,
        target: K::Target,
        value: Option<ObjectName>,
        action: F,
    ) -> Result<T, E>
    where
        F: FnOnce(&mut Connection<D>) -> Result<T, E>,
        E: From<BindError>,
    {
        let mut containers = Binder::<D, K::Container>::new(&mut *self.connection);
        let mut scope = containers
            .scoped(K::CONTAINER_SLOT, container)
            .map_err(|err| stale::<K>(container, err))?;

        let previous = bound::<D, K>(&mut *scope, container, target)?;

        bind::<D, K>(&mut *scope, container, target, value)?;

        let result = action(&mut *scope);
        let restored = bind::<D, K>(&mut *scope, container, target, previous);
        let restored_container = scope.restore();

        binder::settle(result, restored.and(restored_container), K::NAME)
    }
}

fn bound<D, K>(
    connection: &mut Connection<D>,
    container: ContainerValue<K>,
    target: K::Target,
) -> Result<Option<ObjectName>, BindError>
where
    D: Driver,
    K: ContainedKind,
{
    let key = (container, target);
    let fast_path = connection.options.fast_path();

    if let Some(value) = K::cache(&mut connection.state).peek(key) {
        return Ok(value);
    }

    if fast_path {
        debug!(
            "assuming cold {} slot {:?} of {:?} is unbound (fast path)",
            K::NAME,
            target,
            container
        );
    } else {
        make_current::<D, K>(connection, container)?;
    }

    let Connection { driver, state, .. } = connection;

    let value = K::cache(state).get(key, fast_path, None, || {
        let value = K::query(&*driver, target);

        debug!(
            "warmed cold {} slot {:?} of {:?} from the driver: {:?}",
            K::NAME,
            target,
            container,
            value
        );

        value
    });

    Ok(value)
}

fn bind<D, K>(
    connection: &mut Connection<D>,
    container: ContainerValue<K>,
    target: K::Target,
    value: Option<ObjectName>,
) -> Result<(), BindError>
where
    D: Driver,
    K: ContainedKind,
{
    make_current::<D, K>(connection, container)?;

    if bound::<D, K>(connection, container, target)? == value {
        return Ok(());
    }

    let key = (container, target);

    trace!(
        "binding {:?} to {} slot {:?} of {:?}",
        value,
        K::NAME,
        target,
        container
    );

    K::issue(&connection.driver, target, value);

    if let Some(code) = connection.driver.take_error() {
        K::cache(&mut connection.state).cool(key);

        return Err(binder::rejected(connection, K::NAME, &key, &value, code));
    }

    K::cache(&mut connection.state).set(key, value);

    Ok(())
}

fn make_current<D, K>(
    connection: &mut Connection<D>,
    container: ContainerValue<K>,
) -> Result<(), BindError>
where
    D: Driver,
    K: ContainedKind,
{
    binder::bind::<D, K::Container>(connection, K::CONTAINER_SLOT, container)
        .map_err(|err| stale::<K>(container, err))
}

fn stale<K>(container: ContainerValue<K>, err: BindError) -> BindError
where
    K: ContainedKind,
{
    match err {
        BindError::DriverRejectedBind(cause) => BindError::StaleContainer {
            kind: K::NAME,
            container: format!("{:?}", container),
            cause,
        },
        err => err,
    }
}
