//! A generational arena for storing values behind stable handles.
//!
//! Slots are reused once freed but each reuse bumps the slot's generation so that
//! any [Key] still referring to the old value no longer resolves.
use std::fmt;

/// A stable handle to a value stored in an [Arena]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Key {
    index: u32,
    generation: u32,
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index, self.generation)
    }
}

#[derive(Debug, Clone)]
enum Slot<T> {
    Occupied { generation: u32, value: T },
    Free { generation: u32, next_free: Option<u32> },
}

/// Owned storage for values of type `T`, addressed by [Key].
#[derive(Debug, Clone)]
pub struct Arena<T> {
    slots: Vec<Slot<T>>,
    free_head: Option<u32>,
    len: usize,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            free_head: None,
            len: 0,
        }
    }
}

impl<T> Arena<T> {
    /// Create a new empty arena
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of values currently stored
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether or not the arena is currently empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Store `value`, returning the [Key] that can be used to look it up again.
    pub fn insert(&mut self, value: T) -> Key {
        self.len += 1;

        match self.free_head {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                let (generation, next_free) = match slot {
                    Slot::Free {
                        generation,
                        next_free,
                    } => (*generation, *next_free),
                    Slot::Occupied { .. } => unreachable!("free list points at an occupied slot"),
                };
                *slot = Slot::Occupied { generation, value };
                self.free_head = next_free;

                Key { index, generation }
            }

            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot::Occupied {
                    generation: 0,
                    value,
                });

                Key {
                    index,
                    generation: 0,
                }
            }
        }
    }

    /// Remove the value referenced by `key` if it is still present.
    pub fn remove(&mut self, key: Key) -> Option<T> {
        let slot = self.slots.get_mut(key.index as usize)?;
        match slot {
            Slot::Occupied { generation, .. } if *generation == key.generation => (),
            _ => return None,
        }

        let freed = Slot::Free {
            generation: key.generation.wrapping_add(1),
            next_free: self.free_head,
        };

        match std::mem::replace(slot, freed) {
            Slot::Occupied { value, .. } => {
                self.free_head = Some(key.index);
                self.len -= 1;
                Some(value)
            }
            Slot::Free { .. } => None,
        }
    }

    /// Check whether `key` still refers to a live value
    pub fn contains(&self, key: Key) -> bool {
        self.get(key).is_some()
    }

    /// A reference to the value behind `key` if it is still present
    pub fn get(&self, key: Key) -> Option<&T> {
        match self.slots.get(key.index as usize)? {
            Slot::Occupied { generation, value } if *generation == key.generation => Some(value),
            _ => None,
        }
    }

    /// A mutable reference to the value behind `key` if it is still present
    pub fn get_mut(&mut self, key: Key) -> Option<&mut T> {
        match self.slots.get_mut(key.index as usize)? {
            Slot::Occupied { generation, value } if *generation == key.generation => Some(value),
            _ => None,
        }
    }

    /// Iterate over all live keys and values in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (Key, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| match slot {
                Slot::Occupied { generation, value } => Some((
                    Key {
                        index: index as u32,
                        generation: *generation,
                    },
                    value,
                )),
                Slot::Free { .. } => None,
            })
    }

    /// Iterate mutably over all live keys and values in slot order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Key, &mut T)> {
        self.slots
            .iter_mut()
            .enumerate()
            .filter_map(|(index, slot)| match slot {
                Slot::Occupied { generation, value } => Some((
                    Key {
                        index: index as u32,
                        generation: *generation,
                    },
                    value,
                )),
                Slot::Free { .. } => None,
            })
    }

    /// Find the key of the first value matching the given predicate.
    pub fn find_key<F>(&self, pred: F) -> Option<Key>
    where
        F: Fn(&T) -> bool,
    {
        self.iter().find(|(_, v)| pred(v)).map(|(k, _)| k)
    }
}

impl<T> std::ops::Index<Key> for Arena<T> {
    type Output = T;

    fn index(&self, key: Key) -> &T {
        match self.get(key) {
            Some(v) => v,
            None => panic!("stale arena key: {key}"),
        }
    }
}

impl<T> std::ops::IndexMut<Key> for Arena<T> {
    fn index_mut(&mut self, key: Key) -> &mut T {
        match self.get_mut(key) {
            Some(v) => v,
            None => panic!("stale arena key: {key}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_get() {
        let mut a = Arena::new();
        let k1 = a.insert("one");
        let k2 = a.insert("two");

        assert_eq!(a.get(k1), Some(&"one"));
        assert_eq!(a.get(k2), Some(&"two"));
        assert_eq!(a.len(), 2);
    }

    #[test]
    fn removed_keys_do_not_resolve_after_slot_reuse() {
        let mut a = Arena::new();
        let k1 = a.insert(1);
        assert_eq!(a.remove(k1), Some(1));

        let k2 = a.insert(2);

        assert_ne!(k1, k2);
        assert_eq!(a.get(k1), None);
        assert_eq!(a.get(k2), Some(&2));
        assert_eq!(a.remove(k1), None);
        assert_eq!(a.len(), 1);
    }

    #[test]
    fn iter_skips_free_slots() {
        let mut a = Arena::new();
        let keys: Vec<Key> = (0..5).map(|n| a.insert(n)).collect();
        a.remove(keys[1]);
        a.remove(keys[3]);

        let remaining: Vec<i32> = a.iter().map(|(_, &v)| v).collect();

        assert_eq!(remaining, vec![0, 2, 4]);
    }

    #[test]
    fn find_key_returns_first_match() {
        let mut a = Arena::new();
        a.insert(10);
        let k = a.insert(20);
        a.insert(30);

        assert_eq!(a.find_key(|&v| v > 15), Some(k));
    }
}
