//! The provider's category hierarchy and membership tests against it.
//!
//! The hierarchy is a forest: top-level categories are roots and own their
//! children. Real data is about three levels deep, but nothing here assumes a
//! depth; traversal uses an explicit stack.

use std::collections::HashSet;

use placemap_common::{Category, CategoryRef, Place};

pub struct CategoryTree {
    roots: Vec<Category>,
}

impl CategoryTree {
    pub fn new(roots: Vec<Category>) -> Self {
        let tree = Self { roots };
        if let Some(dup) = tree.first_duplicate_id() {
            tracing::warn!(category_id = dup.as_str(), "Duplicate category id in hierarchy");
        }
        tree
    }

    pub fn roots(&self) -> &[Category] {
        &self.roots
    }

    pub fn root(&self, id: &str) -> Option<&Category> {
        self.roots.iter().find(|c| c.id == id)
    }

    /// Find a category at any depth.
    pub fn find(&self, id: &str) -> Option<&Category> {
        let mut stack: Vec<&Category> = self.roots.iter().collect();
        while let Some(category) = stack.pop() {
            if category.id == id {
                return Some(category);
            }
            stack.extend(category.children.iter());
        }
        None
    }

    /// Top-level categories the place is reachable through.
    pub fn resolve(&self, place: &Place) -> Vec<CategoryRef> {
        resolve_membership(place, &self.roots)
    }

    fn first_duplicate_id(&self) -> Option<String> {
        let mut seen = HashSet::new();
        let mut stack: Vec<&Category> = self.roots.iter().collect();
        while let Some(category) = stack.pop() {
            if !seen.insert(category.id.as_str()) {
                return Some(category.id.clone());
            }
            stack.extend(category.children.iter());
        }
        None
    }
}

/// True if `candidate_id` is `ancestor` itself or any category below it.
/// Unknown ids are simply not found.
pub fn is_ancestor_or_self(ancestor: &Category, candidate_id: &str) -> bool {
    let mut stack = vec![ancestor];
    while let Some(category) = stack.pop() {
        if category.id == candidate_id {
            return true;
        }
        stack.extend(category.children.iter());
    }
    false
}

/// Every root whose subtree contains one of the place's leaf tags, in root
/// order and without duplicates. Pure; calling it twice gives the same set.
pub fn resolve_membership(place: &Place, roots: &[Category]) -> Vec<CategoryRef> {
    roots
        .iter()
        .filter(|root| {
            place
                .leaf_category_ids()
                .any(|leaf| is_ancestor_or_self(root, leaf))
        })
        .map(Category::summary)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use placemap_common::{GeoPoint, OpenHours};

    fn food() -> Category {
        Category::new("food", "Food", "Food").with_children(vec![
            Category::new("asian", "Asian Restaurant", "Asian Restaurants").with_children(vec![
                Category::new("sushi", "Sushi Restaurant", "Sushi Restaurants"),
            ]),
            Category::new("pizza", "Pizza Place", "Pizza Places"),
        ])
    }

    fn nightlife() -> Category {
        Category::new("nightlife", "Nightlife Spot", "Nightlife Spots")
            .with_children(vec![Category::new("bar", "Bar", "Bars")])
    }

    fn tagged(leaves: &[&str]) -> Place {
        Place {
            id: "p".into(),
            name: "Somewhere".into(),
            location: GeoPoint::new(0.0, 0.0),
            address_lines: vec![],
            leaf_categories: leaves
                .iter()
                .map(|id| CategoryRef {
                    id: id.to_string(),
                    name: id.to_string(),
                    plural_name: String::new(),
                })
                .collect(),
            resolved_categories: vec![],
            hours: OpenHours::Unavailable,
            photos: vec![],
        }
    }

    #[test]
    fn category_is_its_own_ancestor() {
        assert!(is_ancestor_or_self(&food(), "food"));
    }

    #[test]
    fn descendants_at_any_depth_are_found() {
        let food = food();
        assert!(is_ancestor_or_self(&food, "asian"));
        assert!(is_ancestor_or_self(&food, "sushi"));
        assert!(is_ancestor_or_self(&food, "pizza"));
    }

    #[test]
    fn ancestry_is_asymmetric() {
        let food = food();
        let asian = &food.children[0];
        assert!(is_ancestor_or_self(&food, &asian.id));
        assert!(!is_ancestor_or_self(asian, &food.id));
    }

    #[test]
    fn unknown_ids_are_not_found() {
        assert!(!is_ancestor_or_self(&food(), "does-not-exist"));
        assert!(!is_ancestor_or_self(&food(), "bar"));
    }

    #[test]
    fn deep_chains_do_not_assume_depth() {
        let mut node = Category::new("leaf", "Leaf", "Leaves");
        for i in 0..200 {
            node = Category::new(format!("n{i}"), "N", "Ns").with_children(vec![node]);
        }
        assert!(is_ancestor_or_self(&node, "leaf"));
    }

    #[test]
    fn leaf_resolves_to_its_root() {
        let place = tagged(&["asian"]);
        let resolved = resolve_membership(&place, &[food()]);
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].id, "food");
    }

    #[test]
    fn leaves_under_different_roots_resolve_to_both() {
        let place = tagged(&["sushi", "bar"]);
        let ids: Vec<_> = resolve_membership(&place, &[food(), nightlife()])
            .into_iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(ids, vec!["food", "nightlife"]);
    }

    #[test]
    fn two_leaves_under_one_root_resolve_once() {
        let place = tagged(&["sushi", "pizza"]);
        assert_eq!(resolve_membership(&place, &[food()]).len(), 1);
    }

    #[test]
    fn resolution_is_idempotent() {
        let tree = CategoryTree::new(vec![food(), nightlife()]);
        let place = tagged(&["pizza", "bar"]);
        assert_eq!(tree.resolve(&place), tree.resolve(&place));
    }

    #[test]
    fn untagged_place_resolves_to_nothing() {
        let tree = CategoryTree::new(vec![food()]);
        assert!(tree.resolve(&tagged(&["unknown"])).is_empty());
    }

    #[test]
    fn find_searches_every_level() {
        let tree = CategoryTree::new(vec![food(), nightlife()]);
        assert_eq!(tree.find("sushi").map(|c| c.name.as_str()), Some("Sushi Restaurant"));
        assert!(tree.root("sushi").is_none());
        assert!(tree.root("nightlife").is_some());
    }
}
