//! Vertex array objects and the index buffers they own.

mod index_buffer;
pub use self::index_buffer::{IndexBuffer, IndexBufferTarget, IndexData, IndexType};

mod vertex_array;
pub use self::vertex_array::{VertexArray, VertexArrayTarget};
