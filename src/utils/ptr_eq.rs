//! Node identity.
//!
//! IR nodes are compared structurally by the optimizer only through CSE keys; everywhere else
//! two nodes are the same node only if they are the same allocation.

/// A borrowed node compared, hashed and printed by address.
#[repr(transparent)]
pub struct PtrEq<'a, T: ?Sized>(pub &'a T);
impl<'a, T: ?Sized> PtrEq<'a, T> {
    /// Address of the node, without pointer metadata.
    #[inline(always)]
    pub fn addr(self) -> usize {
        (self.0 as *const T).cast::<()>() as usize
    }
}
impl<T: ?Sized> Clone for PtrEq<'_, T> {
    #[inline(always)]
    fn clone(&self) -> Self {
        Self(self.0)
    }
}
impl<T: ?Sized> Copy for PtrEq<'_, T> {}
impl<T: ?Sized> PartialEq for PtrEq<'_, T> {
    #[inline(always)]
    fn eq(&self, other: &Self) -> bool {
        self.addr() == other.addr()
    }
}
impl<T: ?Sized> Eq for PtrEq<'_, T> {}
impl<T: ?Sized> core::hash::Hash for PtrEq<'_, T> {
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        state.write_usize(self.addr());
    }
}
impl<T: ?Sized> core::fmt::Debug for PtrEq<'_, T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}@{:#x}", core::any::type_name::<T>(), self.addr())
    }
}
impl<'a, T: ?Sized> From<&'a T> for PtrEq<'a, T> {
    #[inline(always)]
    fn from(value: &'a T) -> Self {
        Self(value)
    }
}
impl<T: ?Sized> core::ops::Deref for PtrEq<'_, T> {
    type Target = T;

    #[inline(always)]
    fn deref(&self) -> &T {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::PtrEq;

    #[test]
    fn equal_contents_are_distinct_identities() {
        let a = 1;
        let b = 1;

        assert_eq!(PtrEq(&a), PtrEq::from(&a));
        assert_ne!(PtrEq(&a), PtrEq(&b));
        assert_eq!(*PtrEq(&a), *PtrEq(&b));

        let set = [PtrEq(&a), PtrEq(&b), PtrEq(&a)]
            .into_iter()
            .collect::<HashSet<_>>();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn unsized_nodes_compare_by_address() {
        let xs = [1, 2, 3];
        let whole: &[i32] = &xs;
        let head: &[i32] = &xs[..1];

        // 先頭アドレスは同じ
        assert_eq!(PtrEq(whole), PtrEq(head));
        assert_eq!(PtrEq(whole).addr(), xs.as_ptr() as usize);
        assert!(format!("{:?}", PtrEq(&xs[1])).starts_with("i32@0x"));
    }
}
