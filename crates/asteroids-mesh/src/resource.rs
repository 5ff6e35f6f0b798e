//! Hand-off point between the generator and whatever owns mesh resources.

use crate::packer::PackedAsteroidMesh;

/// Turns packed meshes into renderable resources.
///
/// The generator only constructs meshes; lifetime of the returned handles is
/// the implementor's business.
pub trait MeshResourceFactory {
    type Handle;

    fn create_mesh(&mut self, mesh: PackedAsteroidMesh) -> Self::Handle;
}

/// Dense id of a mesh stored in a [`MeshLibrary`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MeshHandle(pub u32);

/// In-memory mesh store. Useful headless and in tests.
#[derive(Debug, Default)]
pub struct MeshLibrary {
    meshes: Vec<PackedAsteroidMesh>,
}

impl MeshLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, handle: MeshHandle) -> Option<&PackedAsteroidMesh> {
        self.meshes.get(handle.0 as usize)
    }

    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (MeshHandle, &PackedAsteroidMesh)> {
        self.meshes
            .iter()
            .enumerate()
            .map(|(i, mesh)| (MeshHandle(i as u32), mesh))
    }

    /// Bytes of vertex and index data held by the library.
    pub fn total_bytes(&self) -> usize {
        self.meshes
            .iter()
            .map(|m| m.vertex_buffer_bytes() + m.index_buffer_bytes())
            .sum()
    }
}

impl MeshResourceFactory for MeshLibrary {
    type Handle = MeshHandle;

    fn create_mesh(&mut self, mesh: PackedAsteroidMesh) -> MeshHandle {
        let handle = MeshHandle(self.meshes.len() as u32);
        self.meshes.push(mesh);
        handle
    }
}
