//! Scene graph container
//!
//! The SceneGraph owns every [`SceneObject`] and keeps parent/children links
//! mutually consistent. Objects are stored in a slotmap for stable keys, and a
//! separate list remembers the host's native object order, which decides the
//! order roots are exported in.

use level_math::{mat4, Mat4};
use slotmap::SlotMap;

use crate::metadata::ObjectMetadata;
use crate::object::{DirtyFlags, ObjectKey, SceneObject};
use crate::Transform;

/// A forest of scene objects
#[derive(Clone, Debug, Default)]
pub struct SceneGraph {
    objects: SlotMap<ObjectKey, SceneObject>,
    /// Native scene order of all live objects
    order: Vec<ObjectKey>,
}

impl SceneGraph {
    /// Create a new empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a graph with pre-allocated capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            objects: SlotMap::with_capacity_and_key(capacity),
            order: Vec::with_capacity(capacity),
        }
    }

    /// Add an object as a new root, returning its key
    ///
    /// Any parent/children links carried by `object` are discarded.
    pub fn add_object(&mut self, mut object: SceneObject) -> ObjectKey {
        object.parent = None;
        object.children.clear();
        object.mark_dirty(DirtyFlags::ALL);
        let key = self.objects.insert(object);
        self.order.push(key);
        key
    }

    /// Add an object as the last child of `parent`
    ///
    /// Returns `None` (and does not insert) if `parent` does not exist.
    pub fn add_child(&mut self, parent: ObjectKey, object: SceneObject) -> Option<ObjectKey> {
        if !self.objects.contains_key(parent) {
            return None;
        }
        let key = self.add_object(object);
        self.set_parent(key, Some(parent));
        Some(key)
    }

    /// Re-parent an object, appending it to the new parent's children
    ///
    /// Returns false, leaving the graph unchanged, if either key is missing or
    /// the move would make an object its own ancestor.
    pub fn set_parent(&mut self, child: ObjectKey, new_parent: Option<ObjectKey>) -> bool {
        if !self.objects.contains_key(child) {
            return false;
        }
        if let Some(parent) = new_parent {
            if !self.objects.contains_key(parent) || self.is_ancestor_or_self(child, parent) {
                return false;
            }
        }

        // Remove from old parent's children list
        if let Some(old_parent) = self.objects[child].parent {
            if let Some(old) = self.objects.get_mut(old_parent) {
                old.children.retain(|&k| k != child);
            }
        }

        // Set new parent and add to new parent's children list
        self.objects[child].parent = new_parent;
        if let Some(parent) = new_parent {
            self.objects[parent].children.push(child);
        }

        self.mark_subtree_dirty(child, DirtyFlags::TRANSFORM);
        self.objects[child].mark_dirty(DirtyFlags::HIERARCHY);
        true
    }

    /// Remove an object together with its whole subtree
    ///
    /// Returns the removed object itself (its descendants are dropped).
    pub fn remove_object(&mut self, key: ObjectKey) -> Option<SceneObject> {
        let parent = self.objects.get(key)?.parent;
        if let Some(parent) = parent {
            if let Some(p) = self.objects.get_mut(parent) {
                p.children.retain(|&k| k != key);
            }
        }

        let subtree = self.subtree(key);
        let mut removed = None;
        for k in subtree {
            let object = self.objects.remove(k);
            if k == key {
                removed = object;
            }
        }
        let objects = &self.objects;
        self.order.retain(|k| objects.contains_key(*k));
        removed
    }

    /// Get an object by key
    #[inline]
    pub fn get(&self, key: ObjectKey) -> Option<&SceneObject> {
        self.objects.get(key)
    }

    /// True if the key refers to a live object
    #[inline]
    pub fn contains(&self, key: ObjectKey) -> bool {
        self.objects.contains_key(key)
    }

    /// Find an object by name
    pub fn find_by_name(&self, name: &str) -> Option<ObjectKey> {
        self.iter().find(|(_, object)| object.name == name).map(|(key, _)| key)
    }

    /// Replace an object's local transform, dirtying it and its descendants
    pub fn set_local_transform(&mut self, key: ObjectKey, transform: Transform) -> bool {
        match self.objects.get_mut(key) {
            Some(object) => object.local_transform = transform,
            None => return false,
        }
        self.mark_subtree_dirty(key, DirtyFlags::TRANSFORM);
        true
    }

    /// Replace an object's metadata
    pub fn set_metadata(&mut self, key: ObjectKey, metadata: ObjectMetadata) -> bool {
        self.metadata_mut(key).map(|m| *m = metadata).is_some()
    }

    /// Mutable access to an object's metadata; marks it metadata-dirty
    pub fn metadata_mut(&mut self, key: ObjectKey) -> Option<&mut ObjectMetadata> {
        let object = self.objects.get_mut(key)?;
        object.mark_dirty(DirtyFlags::METADATA);
        Some(&mut object.metadata)
    }

    /// Root objects in native scene order
    pub fn roots(&self) -> impl Iterator<Item = ObjectKey> + '_ {
        self.order
            .iter()
            .copied()
            .filter(move |&k| self.objects[k].parent.is_none())
    }

    /// Children of an object in native order (empty if the key is missing)
    pub fn children(&self, key: ObjectKey) -> &[ObjectKey] {
        self.objects.get(key).map(|o| o.children.as_slice()).unwrap_or(&[])
    }

    /// All objects with their keys in native scene order
    pub fn iter(&self) -> impl Iterator<Item = (ObjectKey, &SceneObject)> + '_ {
        self.order.iter().map(move |&k| (k, &self.objects[k]))
    }

    /// Number of objects
    #[inline]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// True if the graph has no objects
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Number of ancestors above an object (roots are depth 0)
    pub fn depth(&self, key: ObjectKey) -> Option<usize> {
        let mut depth = 0;
        let mut current = self.objects.get(key)?.parent;
        while let Some(parent) = current {
            depth += 1;
            current = self.objects[parent].parent;
        }
        Some(depth)
    }

    /// World matrix: the local matrix composed with every ancestor's
    pub fn world_matrix(&self, key: ObjectKey) -> Option<Mat4> {
        let object = self.objects.get(key)?;
        let mut world = object.local_transform.to_matrix();
        let mut current = object.parent;
        while let Some(parent) = current {
            let p = &self.objects[parent];
            world = mat4::mul(p.local_transform.to_matrix(), world);
            current = p.parent;
        }
        Some(world)
    }

    /// Collect every dirty object's flags and reset them
    pub fn take_dirty(&mut self) -> Vec<(ObjectKey, DirtyFlags)> {
        let mut taken = Vec::new();
        for &key in &self.order {
            let object = &mut self.objects[key];
            if !object.dirty_flags().is_empty() {
                taken.push((key, object.dirty_flags()));
                object.clear_dirty();
            }
        }
        taken
    }

    /// The object and all its descendants, pre-order
    fn subtree(&self, key: ObjectKey) -> Vec<ObjectKey> {
        let mut out = Vec::new();
        let mut stack = vec![key];
        while let Some(k) = stack.pop() {
            out.push(k);
            if let Some(object) = self.objects.get(k) {
                stack.extend(object.children.iter().rev().copied());
            }
        }
        out
    }

    fn mark_subtree_dirty(&mut self, key: ObjectKey, flags: DirtyFlags) {
        for k in self.subtree(key) {
            if let Some(object) = self.objects.get_mut(k) {
                object.mark_dirty(flags);
            }
        }
    }

    /// True if `ancestor` is `key` itself or lies on `key`'s parent chain
    fn is_ancestor_or_self(&self, ancestor: ObjectKey, key: ObjectKey) -> bool {
        let mut current = Some(key);
        while let Some(k) = current {
            if k == ancestor {
                return true;
            }
            current = self.objects.get(k).and_then(|o| o.parent);
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use level_math::Vec3;

    fn object(name: &str) -> SceneObject {
        SceneObject::new(name, "EMPTY")
    }

    #[test]
    fn test_graph_new() {
        let graph = SceneGraph::new();
        assert!(graph.is_empty());
        assert_eq!(graph.len(), 0);
        assert_eq!(graph.roots().count(), 0);
    }

    #[test]
    fn test_add_child_links_both_ways() {
        let mut graph = SceneGraph::new();
        let a = graph.add_object(object("A"));
        let b = graph.add_child(a, object("B")).unwrap();

        assert_eq!(graph.get(b).unwrap().parent(), Some(a));
        assert_eq!(graph.children(a), &[b]);
        assert_eq!(graph.roots().collect::<Vec<_>>(), vec![a]);
        assert_eq!(graph.depth(b), Some(1));
    }

    #[test]
    fn test_add_child_missing_parent() {
        let mut graph = SceneGraph::new();
        let a = graph.add_object(object("A"));
        graph.remove_object(a);
        assert!(graph.add_child(a, object("B")).is_none());
        assert!(graph.is_empty());
    }

    #[test]
    fn test_roots_follow_insertion_order() {
        let mut graph = SceneGraph::new();
        let z = graph.add_object(object("Z"));
        let a = graph.add_object(object("A"));
        let m = graph.add_object(object("M"));
        assert_eq!(graph.roots().collect::<Vec<_>>(), vec![z, a, m]);
    }

    #[test]
    fn test_set_parent_moves_between_parents() {
        let mut graph = SceneGraph::new();
        let a = graph.add_object(object("A"));
        let b = graph.add_object(object("B"));
        let c = graph.add_child(a, object("C")).unwrap();

        assert!(graph.set_parent(c, Some(b)));
        assert!(graph.children(a).is_empty());
        assert_eq!(graph.children(b), &[c]);

        assert!(graph.set_parent(c, None));
        assert!(graph.children(b).is_empty());
        assert_eq!(graph.roots().count(), 3);
    }

    #[test]
    fn test_set_parent_rejects_cycles() {
        let mut graph = SceneGraph::new();
        let a = graph.add_object(object("A"));
        let b = graph.add_child(a, object("B")).unwrap();
        let c = graph.add_child(b, object("C")).unwrap();

        assert!(!graph.set_parent(a, Some(c)));
        assert!(!graph.set_parent(a, Some(a)));
        assert_eq!(graph.get(a).unwrap().parent(), None);
        assert_eq!(graph.children(c), &[] as &[ObjectKey]);
    }

    #[test]
    fn test_remove_object_drops_subtree() {
        let mut graph = SceneGraph::new();
        let a = graph.add_object(object("A"));
        let b = graph.add_child(a, object("B")).unwrap();
        let c = graph.add_child(b, object("C")).unwrap();
        let d = graph.add_object(object("D"));

        let removed = graph.remove_object(b).unwrap();
        assert_eq!(removed.name, "B");
        assert!(!graph.contains(b));
        assert!(!graph.contains(c));
        assert!(graph.children(a).is_empty());
        assert_eq!(graph.iter().map(|(k, _)| k).collect::<Vec<_>>(), vec![a, d]);
    }

    #[test]
    fn test_find_by_name() {
        let mut graph = SceneGraph::new();
        graph.add_object(object("Lamp"));
        let cube = graph.add_object(object("Cube"));
        assert_eq!(graph.find_by_name("Cube"), Some(cube));
        assert_eq!(graph.find_by_name("Missing"), None);
    }

    #[test]
    fn test_world_matrix_composes_ancestors() {
        let mut graph = SceneGraph::new();
        let parent = graph.add_object(
            object("Parent").with_transform(
                Transform::from_translation(Vec3::new(10.0, 0.0, 0.0))
                    .with_euler_degrees(0.0, 0.0, 90.0),
            ),
        );
        let child = graph
            .add_child(
                parent,
                object("Child").with_transform(
                    Transform::from_translation(Vec3::new(1.0, 0.0, 0.0)).with_scale(Vec3::splat(2.0)),
                ),
            )
            .unwrap();

        let world = graph.world_matrix(child).unwrap();
        // child origin: (1, 0, 0) rotated 90 deg about Z -> (0, 1, 0), + (10, 0, 0)
        let p = mat4::transform_point(world, Vec3::ZERO);
        assert!((p - Vec3::new(10.0, 1.0, 0.0)).length() < 1e-4, "got {:?}", p);
        // child X axis: scaled by 2, rotated onto Y
        let q = mat4::transform_point(world, Vec3::X);
        assert!((q - Vec3::new(10.0, 3.0, 0.0)).length() < 1e-4, "got {:?}", q);
    }

    #[test]
    fn test_transform_change_dirties_descendants() {
        let mut graph = SceneGraph::new();
        let a = graph.add_object(object("A"));
        let b = graph.add_child(a, object("B")).unwrap();
        let c = graph.add_object(object("C"));
        graph.take_dirty();

        graph.set_local_transform(a, Transform::from_translation(Vec3::X));
        assert!(!graph.get(c).unwrap().is_dirty(DirtyFlags::ALL));
        assert_eq!(
            graph.take_dirty(),
            vec![(a, DirtyFlags::TRANSFORM), (b, DirtyFlags::TRANSFORM)]
        );
    }

    #[test]
    fn test_take_dirty_clears() {
        let mut graph = SceneGraph::new();
        let a = graph.add_object(object("A"));
        let taken = graph.take_dirty();
        assert_eq!(taken, vec![(a, DirtyFlags::ALL)]);
        assert!(graph.take_dirty().is_empty());

        graph.metadata_mut(a).unwrap().add_file_name();
        assert_eq!(graph.take_dirty(), vec![(a, DirtyFlags::METADATA)]);
    }
}
