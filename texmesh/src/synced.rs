//! A mesh paired with the sink that mirrors it on the GPU

use crate::ops::{changes, MeshOps};
use texmesh_algorithms::{NormalStats, SmoothingOptions, SmoothingStats};
use texmesh_core::{BufferSync, Changes, Mesh, Result};
use texmesh_simplification::{ClusteringStats, VertexClusterer};

/// Owns a mesh and notifies a [`BufferSync`] after every successful
/// mutation with the set of arrays that changed.
///
/// Failed operations leave the mesh untouched and send nothing.
#[derive(Debug)]
pub struct SyncedMesh<S: BufferSync> {
    mesh: Mesh,
    sink: S,
}

impl<S: BufferSync> SyncedMesh<S> {
    pub fn new(mesh: Mesh, sink: S) -> Self {
        Self { mesh, sink }
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_parts(self) -> (Mesh, S) {
        (self.mesh, self.sink)
    }

    /// Upload every array, e.g. after the renderer recreated its buffers.
    pub fn sync_all(&mut self) {
        self.sink.upload(&self.mesh, Changes::ALL);
    }

    /// Run a custom edit and report `changes` if it succeeds.
    pub fn edit<T>(&mut self, changes: Changes, op: impl FnOnce(&mut Mesh) -> Result<T>) -> Result<T> {
        let out = op(&mut self.mesh)?;
        if !changes.is_empty() {
            log::trace!("mesh changed: {:?}", changes);
            self.sink.upload(&self.mesh, changes);
        }
        Ok(out)
    }
}

impl<S: BufferSync> MeshOps for SyncedMesh<S> {
    fn init(&mut self) -> Result<NormalStats> {
        self.edit(changes::INIT, |mesh| mesh.init())
    }

    fn recompute_per_vertex_normals(&mut self, angle_based: bool) -> Result<NormalStats> {
        self.edit(changes::NORMALS, |mesh| mesh.recompute_per_vertex_normals(angle_based))
    }

    fn laplacian_filter(&mut self, alpha: f32, cotangent_weights: bool) -> Result<SmoothingStats> {
        self.edit(changes::SMOOTH, |mesh| mesh.laplacian_filter(alpha, cotangent_weights))
    }

    fn simplify(&mut self, resolution: usize) -> Result<ClusteringStats> {
        self.edit(changes::CLUSTER, |mesh| mesh.simplify(resolution))
    }

    fn adaptive_simplify(&mut self, capacity: usize) -> Result<ClusteringStats> {
        self.edit(changes::CLUSTER, |mesh| mesh.adaptive_simplify(capacity))
    }

    fn subdivide(&mut self) -> Result<NormalStats> {
        self.edit(changes::SUBDIVIDE, |mesh| mesh.subdivide())
    }

    fn smooth(&mut self, options: &SmoothingOptions) -> Result<SmoothingStats> {
        self.edit(changes::SMOOTH, |mesh| mesh.smooth(options))
    }

    fn cluster(&mut self, clusterer: &dyn VertexClusterer) -> Result<ClusteringStats> {
        self.edit(changes::CLUSTER, |mesh| MeshOps::cluster(mesh, clusterer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use texmesh_core::shapes;

    #[derive(Default)]
    struct Recorder {
        uploads: Vec<(Changes, usize)>,
    }

    impl BufferSync for Recorder {
        fn upload(&mut self, mesh: &Mesh, changes: Changes) {
            self.uploads.push((changes, mesh.vertex_count()));
        }
    }

    #[test]
    fn test_uploads_follow_operations() {
        let mut synced = SyncedMesh::new(shapes::tetrahedron(), Recorder::default());
        synced.init().unwrap();
        synced.laplacian_filter(0.1, true).unwrap();
        synced.simplify(2).unwrap();
        synced.subdivide().unwrap();

        let uploads = &synced.sink().uploads;
        assert_eq!(uploads.len(), 4);
        assert_eq!(uploads[0], (Changes::DERIVED, 4));
        assert!(uploads[1].0.contains(Changes::POSITIONS));
        assert!(!uploads[2].0.contains(Changes::TOPOLOGY));
        assert_eq!(uploads[3], (Changes::ALL, 16));
    }

    #[test]
    fn test_failed_operation_sends_nothing() {
        let mut synced = SyncedMesh::new(shapes::tetrahedron(), Recorder::default());
        // no cached bounding box yet
        assert!(synced.simplify(4).is_err());
        assert!(synced.adaptive_simplify(0).is_err());
        assert!(synced.laplacian_filter(f32::INFINITY, false).is_err());
        assert!(synced.sink().uploads.is_empty());

        let (mesh, _) = synced.into_parts();
        assert_eq!(mesh, shapes::tetrahedron());
    }

    #[test]
    fn test_closure_sink() {
        let mut count = 0;
        {
            let mut synced = SyncedMesh::new(shapes::unit_quad(), |_: &Mesh, _: Changes| count += 1);
            synced.sync_all();
            synced.init().unwrap();
        }
        assert_eq!(count, 2);
    }
}
