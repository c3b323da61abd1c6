//! Reader/writer lock with a writer entry gate
//!
//! Readers pass through the gate only long enough to take a shared lock, so
//! any number of them may read at once and the first one in holds writers
//! off until the last one leaves. A writer takes the gate and keeps it while
//! it waits for, and then holds, the exclusive lock: readers arriving in the
//! meantime queue on the gate instead of overtaking it.

use parking_lot::{Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::ops::{Deref, DerefMut};

pub struct GatedRwLock<T> {
    gate: Mutex<()>,
    data: RwLock<T>,
}

/// Exclusive access; releases the data lock, then the gate
pub struct GatedWriteGuard<'a, T> {
    data: RwLockWriteGuard<'a, T>,
    _gate: MutexGuard<'a, ()>,
}

impl<T> GatedRwLock<T> {
    pub fn new(value: T) -> Self {
        Self {
            gate: Mutex::new(()),
            data: RwLock::new(value),
        }
    }

    pub fn read(&self) -> RwLockReadGuard<'_, T> {
        let _gate = self.gate.lock();
        self.data.read()
    }

    pub fn write(&self) -> GatedWriteGuard<'_, T> {
        let gate = self.gate.lock();
        let data = self.data.write();
        GatedWriteGuard { data, _gate: gate }
    }
}

impl<T: Default> Default for GatedRwLock<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> Deref for GatedWriteGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.data
    }
}

impl<T> DerefMut for GatedWriteGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.data
    }
}
