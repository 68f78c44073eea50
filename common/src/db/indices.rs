use std::fmt::Debug;

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct NetId(pub u32);

impl NetId {
    #[inline(always)]
    pub fn new(id: usize) -> Self {
        Self(id as u32)
    }
    #[inline(always)]
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl Debug for NetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "NetId({})", self.0)
    }
}
