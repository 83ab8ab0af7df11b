//! Keeps track of which objects are bound to which binding slots of a WebGL 2.0 context, so that
//! redundant bind calls are never sent to the driver.
//!
//! Start with a [Connection](runtime::Connection) and create objects through it:
//!
//! ```rust,ignore
//! use glitz_state::buffer::{Buffer, BufferData, BufferTarget, BufferUsage};
//! use glitz_state::runtime::{Connection, ContextOptions};
//!
//! let mut connection = Connection::from_canvas(&canvas, ContextOptions::default())?;
//! let buffer = Buffer::new(
//!     &mut connection,
//!     BufferTarget::ArrayBuffer,
//!     BufferUsage::StaticDraw,
//!     BufferData::FromData(&data),
//! )?;
//!
//! buffer.bind(&mut connection)?;
//! buffer.bind(&mut connection)?; // Already bound: no driver call.
//! ```

pub mod buffer;
pub mod framebuffer;
pub mod renderbuffer;
pub mod runtime;
pub mod texture;
pub mod vertex;
