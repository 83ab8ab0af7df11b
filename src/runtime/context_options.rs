use serde_derive::Serialize;

/// Hints to the browser which GPU to use for a context on systems with more than one GPU.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PowerPreference {
    Default,
    HighPerformance,
    LowPower,
}

impl Default for PowerPreference {
    fn default() -> Self {
        PowerPreference::Default
    }
}

/// Options for a [Connection](crate::runtime::Connection), fixed for the lifetime of the
/// connection.
///
/// Create options with [ContextOptions::begin]:
///
/// ```rust
/// use glitz_state::runtime::{ContextOptions, PowerPreference};
///
/// let options = ContextOptions::begin()
///     .fast_path(true)
///     .enable_depth()
///     .power_preference(PowerPreference::HighPerformance)
///     .finish();
///
/// assert!(options.fast_path());
/// assert!(options.depth());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ContextOptions {
    fast_path: bool,
    alpha: bool,
    antialias: bool,
    depth: bool,
    stencil: bool,
    premultiplied_alpha: bool,
    preserve_drawing_buffer: bool,
    fail_if_major_performance_caveat: bool,
    power_preference: PowerPreference,
}

impl ContextOptions {
    pub fn begin() -> ContextOptionsBuilder {
        ContextOptionsBuilder {
            options: ContextOptions::default(),
        }
    }

    /// Whether cold binding cache entries are assumed to be unbound rather than queried from the
    /// driver.
    ///
    /// This saves a driver round-trip for every slot on first use, at the cost of correctness if
    /// anything other than this crate binds an object to a slot before the slot's first use: the
    /// cache then disagrees with the driver until the slot is next bound through this crate.
    /// Disabled by default.
    pub fn fast_path(&self) -> bool {
        self.fast_path
    }

    pub fn alpha(&self) -> bool {
        self.alpha
    }

    pub fn antialias(&self) -> bool {
        self.antialias
    }

    pub fn depth(&self) -> bool {
        self.depth
    }

    pub fn stencil(&self) -> bool {
        self.stencil
    }

    pub fn premultiplied_alpha(&self) -> bool {
        self.premultiplied_alpha
    }

    pub fn preserve_drawing_buffer(&self) -> bool {
        self.preserve_drawing_buffer
    }

    pub fn fail_if_major_performance_caveat(&self) -> bool {
        self.fail_if_major_performance_caveat
    }

    pub fn power_preference(&self) -> PowerPreference {
        self.power_preference
    }

    pub(crate) fn context_attributes(&self) -> ContextAttributes {
        ContextAttributes {
            alpha: self.alpha,
            antialias: self.antialias,
            depth: self.depth,
            stencil: self.stencil,
            premultiplied_alpha: self.premultiplied_alpha,
            preserve_drawing_buffer: self.preserve_drawing_buffer,
            fail_if_major_performance_caveat: self.fail_if_major_performance_caveat,
            power_preference: self.power_preference,
        }
    }
}

impl Default for ContextOptions {
    fn default() -> Self {
        ContextOptions {
            fast_path: false,
            alpha: true,
            antialias: true,
            depth: false,
            stencil: false,
            premultiplied_alpha: true,
            preserve_drawing_buffer: false,
            fail_if_major_performance_caveat: false,
            power_preference: PowerPreference::default(),
        }
    }
}

pub struct ContextOptionsBuilder {
    options: ContextOptions,
}

impl ContextOptionsBuilder {
    /// See [ContextOptions::fast_path].
    pub fn fast_path(mut self, fast_path: bool) -> Self {
        self.options.fast_path = fast_path;

        self
    }

    pub fn disable_alpha(mut self) -> Self {
        self.options.alpha = false;

        self
    }

    pub fn disable_antialias(mut self) -> Self {
        self.options.antialias = false;

        self
    }

    pub fn enable_depth(mut self) -> Self {
        self.options.depth = true;

        self
    }

    pub fn enable_stencil(mut self) -> Self {
        self.options.stencil = true;

        self
    }

    pub fn premultiplied_alpha(mut self, premultiplied_alpha: bool) -> Self {
        self.options.premultiplied_alpha = premultiplied_alpha;

        self
    }

    pub fn preserve_drawing_buffer(mut self, preserve_drawing_buffer: bool) -> Self {
        self.options.preserve_drawing_buffer = preserve_drawing_buffer;

        self
    }

    pub fn fail_if_major_performance_caveat(
        mut self,
        fail_if_major_performance_caveat: bool,
    ) -> Self {
        self.options.fail_if_major_performance_caveat = fail_if_major_performance_caveat;

        self
    }

    pub fn power_preference(mut self, power_preference: PowerPreference) -> Self {
        self.options.power_preference = power_preference;

        self
    }

    pub fn finish(self) -> ContextOptions {
        self.options
    }
}

/// The `WebGLContextAttributes` dictionary passed to `getContext`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ContextAttributes {
    alpha: bool,
    antialias: bool,
    depth: bool,
    stencil: bool,
    premultiplied_alpha: bool,
    preserve_drawing_buffer: bool,
    fail_if_major_performance_caveat: bool,
    power_preference: PowerPreference,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fast_path_is_opt_in() {
        assert!(!ContextOptions::default().fast_path());
        assert!(!ContextOptions::begin().finish().fast_path());
        assert!(ContextOptions::begin().fast_path(true).finish().fast_path());
    }

    #[test]
    fn test_builder_sets_context_attributes() {
        let options = ContextOptions::begin()
            .disable_alpha()
            .disable_antialias()
            .enable_stencil()
            .preserve_drawing_buffer(true)
            .power_preference(PowerPreference::LowPower)
            .finish();

        let attributes = options.context_attributes();

        assert_eq!(
            attributes,
            ContextAttributes {
                alpha: false,
                antialias: false,
                depth: false,
                stencil: true,
                premultiplied_alpha: true,
                preserve_drawing_buffer: true,
                fail_if_major_performance_caveat: false,
                power_preference: PowerPreference::LowPower,
            }
        );
    }
}
