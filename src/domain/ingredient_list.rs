//! Generic editing for the appendable ingredient lists of a recipe.
//!
//! Grains, hops and additional ingredients all behave the same way: rows are
//! appended from a default-row factory, removed by their id, and rendered one
//! line at a time. [`ListEditor`] and [`render_rows`] provide that behaviour
//! once for any row type implementing [`ListItem`].

use uuid::Uuid;

use crate::domain::{AdditionalIngredient, Grain, Hop};

/// A row that can be addressed by its own id.
pub trait ListItem {
    /// The row's stable identifier.
    fn id(&self) -> Uuid;
}

impl ListItem for Grain {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl ListItem for Hop {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl ListItem for AdditionalIngredient {
    fn id(&self) -> Uuid {
        self.id
    }
}

/// Mutable view over an ingredient list.
#[derive(Debug)]
pub struct ListEditor<'a, T> {
    rows: &'a mut Vec<T>,
}

impl<'a, T: ListItem> ListEditor<'a, T> {
    /// Wrap a list for editing.
    pub const fn new(rows: &'a mut Vec<T>) -> Self {
        Self { rows }
    }

    /// Append a row built by `factory`, which receives a freshly minted id.
    pub fn append_with(&mut self, factory: impl FnOnce(Uuid) -> T) -> &T {
        self.rows.push(factory(Uuid::new_v4()));
        &self.rows[self.rows.len() - 1]
    }

    /// Remove the row with the given id, keeping the order of the rest.
    pub fn remove(&mut self, id: Uuid) -> Option<T> {
        let index = self.rows.iter().position(|row| row.id() == id)?;
        Some(self.rows.remove(index))
    }

    /// Number of rows in the list.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the list has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Render each row with `render`, which receives the row's position and the
/// row itself.
pub fn render_rows<T>(rows: &[T], render: impl Fn(usize, &T) -> String) -> Vec<String> {
    rows.iter()
        .enumerate()
        .map(|(index, row)| render(index, row))
        .collect()
}
