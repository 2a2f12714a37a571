//! Contracts between the geometry core and its host

use crate::mesh::Mesh;

/// Set of mesh arrays touched by an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Changes(u8);

impl Changes {
    pub const NONE: Changes = Changes(0);
    pub const POSITIONS: Changes = Changes(1);
    pub const NORMALS: Changes = Changes(1 << 1);
    pub const TANGENT_FRAME: Changes = Changes(1 << 2);
    pub const TEX_COORDS: Changes = Changes(1 << 3);
    pub const TOPOLOGY: Changes = Changes(1 << 4);

    /// Everything the estimator and parameterizer derive from positions
    pub const DERIVED: Changes = Self::NORMALS.union(Self::TANGENT_FRAME).union(Self::TEX_COORDS);
    pub const ALL: Changes = Self::POSITIONS.union(Self::DERIVED).union(Self::TOPOLOGY);

    pub const fn union(self, other: Changes) -> Changes {
        Changes(self.0 | other.0)
    }

    pub fn contains(self, other: Changes) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl std::ops::BitOr for Changes {
    type Output = Changes;

    fn bitor(self, rhs: Changes) -> Changes {
        self.union(rhs)
    }
}

impl std::ops::BitOrAssign for Changes {
    fn bitor_assign(&mut self, rhs: Changes) {
        self.0 |= rhs.0;
    }
}

/// Receiver of mesh updates, typically the renderer's GPU buffer upload.
///
/// Called after a mutating operation has fully committed, never in the
/// middle of one. `changes` lists the arrays that must be re-uploaded; a
/// change of [`Changes::TOPOLOGY`] means buffer sizes changed too.
pub trait BufferSync {
    fn upload(&mut self, mesh: &Mesh, changes: Changes);
}

/// Sink that ignores every update, for headless use.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSync;

impl BufferSync for NoSync {
    fn upload(&mut self, _mesh: &Mesh, _changes: Changes) {}
}

impl<F> BufferSync for F
where
    F: FnMut(&Mesh, Changes),
{
    fn upload(&mut self, mesh: &Mesh, changes: Changes) {
        self(mesh, changes)
    }
}
