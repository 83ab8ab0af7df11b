use std::marker;
use std::ops::{Deref, DerefMut};

use log::{debug, trace, warn};

use crate::runtime::binding::BindingKind;
use crate::runtime::connection::Connection;
use crate::runtime::driver::{Driver, ErrorCode};
use crate::runtime::error::{BindError, RejectedBind};

/// Binds, unbinds and queries the slots of one [BindingKind] of a [Connection].
///
/// Obtained from [Connection::binder] or one of the per-kind shorthands such as
/// [Connection::buffers]. Every operation consults the connection's binding state first and only
/// calls into the driver when the requested state differs from the recorded state.
pub struct Binder<'a, D, K>
where
    D: Driver,
    K: BindingKind,
{
    connection: &'a mut Connection<D>,
    _marker: marker::PhantomData<K>,
}

impl<'a, D, K> Binder<'a, D, K>
where
    D: Driver,
    K: BindingKind,
{
    pub(crate) fn new(connection: &'a mut Connection<D>) -> Self {
        Binder {
            connection,
            _marker: marker::PhantomData,
        }
    }

    /// Returns what currently occupies the `target` slot.
    ///
    /// The first call for a slot asks the driver, unless the connection was created with
    /// [ContextOptions::fast_path](crate::runtime::ContextOptions::fast_path), in which case the
    /// slot is assumed to be unbound.
    pub fn bound(&mut self, target: K::Target) -> K::Value {
        bound::<D, K>(self.connection, target)
    }

    /// Binds `value` to the `target` slot.
    ///
    /// Does nothing if `value` is already bound to the slot.
    pub fn bind(&mut self, target: K::Target, value: K::Value) -> Result<(), BindError> {
        bind::<D, K>(self.connection, target, value)
    }

    /// Unbinds whatever occupies the `target` slot.
    pub fn unbind(&mut self, target: K::Target) -> Result<(), BindError> {
        bind::<D, K>(self.connection, target, K::UNBOUND)
    }

    /// Unbinds the `target` slot only if it is occupied by `value`.
    ///
    /// Use this when releasing an object, so that a different object that has since taken the
    /// slot is left alone.
    pub fn unbind_if(&mut self, target: K::Target, value: K::Value) -> Result<(), BindError> {
        if bound::<D, K>(self.connection, target) == value {
            bind::<D, K>(self.connection, target, K::UNBOUND)
        } else {
            Ok(())
        }
    }

    /// Binds `value` to the `target` slot and returns a guard that binds the previous value again
    /// when it is restored or dropped.
    ///
    /// The guard dereferences to the [Connection], so other bindings can be made while it is
    /// alive. Scopes nest like a stack.
    pub fn scoped(
        &mut self,
        target: K::Target,
        value: K::Value,
    ) -> Result<ScopedBinding<D, K>, BindError> {
        let previous = bound::<D, K>(self.connection, target);

        bind::<D, K>(self.connection, target, value)?;

        Ok(ScopedBinding {
            connection: &mut *self.connection,
            target,
            previous: Some(previous),
        })
    }

    /// Runs `action` with `value` bound to the `target` slot, then binds the previous value again,
    /// whether or not `action` succeeded.
    ///
    /// If `action` fails, its error is returned after the previous value was restored. If
    /// restoring fails as well, the restore error is logged and the error of `action` is returned.
    /// If only restoring fails, the restore error is returned.
    pub fn with_bound<F, T, E>(&mut self, target: K::Target, value: K::Value, action: F) -> Result<T, E>
    where
        F: FnOnce(&mut Connection<D>) -> Result<T, E>,
        E: From<BindError>,
    {
        let mut scope = self.scoped(target, value)?;
        let result = action(&mut *scope);
        let restored = scope.restore();

        settle(result, restored, K::NAME)
    }
}

/// Guard returned by [Binder::scoped].
///
/// Restores the binding that was displaced when the guard was created, either explicitly through
/// [ScopedBinding::restore] or when the guard is dropped (also during unwinding). Failures to
/// restore on drop are logged.
pub struct ScopedBinding<'a, D, K>
where
    D: Driver,
    K: BindingKind,
{
    connection: &'a mut Connection<D>,
    target: K::Target,
    previous: Option<K::Value>,
}

impl<'a, D, K> ScopedBinding<'a, D, K>
where
    D: Driver,
    K: BindingKind,
{
    /// The value that will be bound again.
    pub fn previous(&self) -> Option<K::Value> {
        self.previous
    }

    /// Binds the displaced value again and reports whether that succeeded.
    pub fn restore(mut self) -> Result<(), BindError> {
        match self.previous.take() {
            Some(previous) => bind::<D, K>(self.connection, self.target, previous),
            None => Ok(()),
        }
    }
}

impl<'a, D, K> Deref for ScopedBinding<'a, D, K>
where
    D: Driver,
    K: BindingKind,
{
    type Target = Connection<D>;

    fn deref(&self) -> &Connection<D> {
        self.connection
    }
}

impl<'a, D, K> DerefMut for ScopedBinding<'a, D, K>
where
    D: Driver,
    K: BindingKind,
{
    fn deref_mut(&mut self) -> &mut Connection<D> {
        self.connection
    }
}

impl<'a, D, K> Drop for ScopedBinding<'a, D, K>
where
    D: Driver,
    K: BindingKind,
{
    fn drop(&mut self) {
        if let Some(previous) = self.previous.take() {
            if let Err(err) = bind::<D, K>(self.connection, self.target, previous) {
                warn!(
                    "failed to restore {} binding {:?} for slot {:?}: {}",
                    K::NAME,
                    previous,
                    self.target,
                    err
                );
            }
        }
    }
}

pub(crate) fn bound<D, K>(connection: &mut Connection<D>, target: K::Target) -> K::Value
where
    D: Driver,
    K: BindingKind,
{
    let fast_path = connection.options.fast_path();
    let Connection { driver, state, .. } = connection;
    let cache = K::cache(state);

    if fast_path && !cache.is_warm(target) {
        debug!(
            "assuming cold {} slot {:?} is unbound (fast path)",
            K::NAME,
            target
        );
    }

    cache.get(target, fast_path, K::UNBOUND, || {
        let value = K::query(&*driver, target);

        debug!(
            "warmed cold {} slot {:?} from the driver: {:?}",
            K::NAME,
            target,
            value
        );

        value
    })
}

pub(crate) fn bind<D, K>(
    connection: &mut Connection<D>,
    target: K::Target,
    value: K::Value,
) -> Result<(), BindError>
where
    D: Driver,
    K: BindingKind,
{
    if bound::<D, K>(connection, target) == value {
        return Ok(());
    }

    trace!("binding {:?} to {} slot {:?}", value, K::NAME, target);

    K::issue(&connection.driver, target, value);

    if let Some(code) = connection.driver.take_error() {
        K::cache(&mut connection.state).cool(target);

        return Err(rejected(connection, K::NAME, &target, &value, code));
    }

    K::cache(&mut connection.state).set(target, value);

    Ok(())
}

/// Turns an error code reported after a bind into a [BindError]; a lost context invalidates all
/// bindings of the connection.
pub(crate) fn rejected<D, S, V>(
    connection: &mut Connection<D>,
    kind: &'static str,
    slot: &S,
    value: &V,
    code: ErrorCode,
) -> BindError
where
    D: Driver,
    S: std::fmt::Debug,
    V: std::fmt::Debug,
{
    if code == ErrorCode::ContextLost {
        warn!("context lost while binding {} slot {:?}", kind, slot);

        connection.state.invalidate();

        return BindError::ContextLost;
    }

    warn!(
        "driver rejected binding {:?} to {} slot {:?}: {}",
        value, kind, slot, code
    );

    BindError::DriverRejectedBind(RejectedBind {
        kind,
        slot: format!("{:?}", slot),
        value: format!("{:?}", value),
        code,
    })
}

/// Combines the outcome of a scoped action with the outcome of restoring the displaced binding.
pub(crate) fn settle<T, E>(
    result: Result<T, E>,
    restored: Result<(), BindError>,
    kind: &'static str,
) -> Result<T, E>
where
    E: From<BindError>,
{
    match (result, restored) {
        (result, Ok(())) => result,
        (Ok(_), Err(err)) => Err(err.into()),
        (Err(err), Err(restore_err)) => {
            warn!(
                "failed to restore {} binding after a failed scoped action: {}",
                kind, restore_err
            );

            Err(err)
        }
    }
}
