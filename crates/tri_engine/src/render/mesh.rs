//! Static triangle geometry and its GPU upload

use crate::render::gl::{
    AttributeType, BufferHandle, BufferUsage, GraphicsApi, VertexArrayHandle, VertexAttribute,
};

/// One vertex position in normalized device coordinates
pub type Position = [f32; 3];

/// The single triangle drawn every frame
pub const TRIANGLE: [Position; 3] = [
    [-0.5, 0.5, 0.0],
    [0.5, -0.5, 0.0],
    [-0.5, -0.5, 0.0],
];

#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
const POSITION_STRIDE: i32 = std::mem::size_of::<Position>() as i32;

/// Layout of [`Position`] in the array buffer: slot 0, tightly packed xyz
pub const POSITION_ATTRIBUTE: VertexAttribute = VertexAttribute {
    location: 0,
    components: 3,
    kind: AttributeType::Float,
    normalized: false,
    stride: POSITION_STRIDE,
    offset: 0,
};

/// GPU-resident copy of a three-vertex triangle
///
/// Owns a vertex array object (mandatory in core profile contexts) that
/// captures the buffer binding and attribute layout, so drawing only needs
/// [`TriangleMesh::bind`].
#[derive(Debug, PartialEq, Eq)]
pub struct TriangleMesh {
    vertex_array: VertexArrayHandle,
    buffer: BufferHandle,
}

impl TriangleMesh {
    /// Number of vertices drawn
    pub const VERTEX_COUNT: i32 = 3;

    /// Upload `vertices` with a static-draw hint and describe their layout
    ///
    /// Order matters: the vertex array must be bound before the buffer, and
    /// the buffer before the attribute pointer is recorded.
    pub fn upload<G: GraphicsApi + ?Sized>(gl: &mut G, vertices: &[Position; 3]) -> Self {
        let vertex_array = gl.create_vertex_array();
        gl.bind_vertex_array(vertex_array);

        let buffer = gl.create_buffer();
        gl.bind_array_buffer(buffer);
        gl.upload_array_buffer(bytemuck::cast_slice(vertices), BufferUsage::StaticDraw);

        gl.vertex_attrib_pointer(&POSITION_ATTRIBUTE);
        gl.enable_vertex_attrib_array(POSITION_ATTRIBUTE.location);

        log::debug!(
            "Uploaded {} vertices to buffer {:?} (vertex array {:?})",
            vertices.len(),
            buffer,
            vertex_array
        );

        Self { vertex_array, buffer }
    }

    /// Bind the vertex array (and with it the buffer and layout)
    pub fn bind<G: GraphicsApi + ?Sized>(&self, gl: &mut G) {
        gl.bind_vertex_array(self.vertex_array);
    }

    /// Issue the draw call for all vertices
    pub fn draw<G: GraphicsApi + ?Sized>(&self, gl: &mut G) {
        gl.draw_triangles(0, Self::VERTEX_COUNT);
    }

    /// The array buffer holding the positions
    pub fn buffer(&self) -> BufferHandle {
        self.buffer
    }

    /// The vertex array capturing the layout
    pub fn vertex_array(&self) -> VertexArrayHandle {
        self.vertex_array
    }

    /// Delete the buffer and vertex array
    pub fn release<G: GraphicsApi + ?Sized>(self, gl: &mut G) {
        gl.delete_buffer(self.buffer);
        gl.delete_vertex_array(self.vertex_array);
    }
}
